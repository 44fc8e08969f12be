//! The patch model: operation types, pure appliers, and validation.
//!
//! Grounded on `packages/json-joy/src/json-patch/`, narrowed to the
//! operation kinds this system recognizes (`add|replace|remove|move|copy`
//! plus the semantic `@inc|@bit|@min|@max|@txt` extensions) and wire-coded
//! with `serde` derives rather than a hand-rolled codec.

pub mod apply;
pub mod delta;
pub mod types;
pub mod util;
pub mod validate;

pub use apply::{apply_op, apply_ops, apply_patch, get_at};
pub use delta::{Delta, DeltaOp};
pub use types::{ApplyPatchOptions, Op, OpResult, PatchError, Path};
pub use util::{matcher, path_starts_with};
pub use validate::{validate_operation, validate_operations, ValidationError};
