//! patches-core — the patch model, transform engine, change batching, and
//! inline-text OT shared by the patches server and client.

pub mod batch;
pub mod change;
pub mod json_patch;
pub mod json_patch_ot;
pub mod json_size;
pub mod patch_builder;

pub use batch::{break_change, break_into_batches, SizeCalculator};
pub use change::{Change, ChangeInput, PatchesSnapshot, Tombstone, VersionOrigin, VersionRecord};
pub use json_patch::{Op, PatchError};
pub use patch_builder::{path, PatchBuilder, PathBuilder};
