//! Core types for the patch model: the `Op` kind registry and its errors.
//!
//! Grounded on the `Op` class hierarchy in the teacher's
//! `packages/json-joy/src/json-patch/op/`, narrowed to the operation kinds
//! this system recognizes (`add|replace|remove|move|copy|@inc|@bit|@min|@max|@txt`)
//! and extended with the `soft` idempotent-init flag and `ts` timestamp.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use patches_pointer::Path;

use super::delta::Delta;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("NOT_A_STRING")]
    NotAString,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("INVALID_TARGET")]
    InvalidTarget,
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
}

// ── Op ────────────────────────────────────────────────────────────────────

/// A single patch operation.
///
/// Kinds partition into *structural* (`add|replace|remove|move|copy`) and
/// *semantic* (`@inc|@bit|@min|@max|@txt`). `path` uses JSON Pointer syntax;
/// `from` is carried by `move`/`copy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Op {
    #[serde(rename = "add")]
    Add {
        path: Path,
        value: Value,
        /// Apply only if the target path is absent (idempotent init).
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        soft: bool,
    },
    #[serde(rename = "replace")]
    Replace {
        path: Path,
        value: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old_value: Option<Value>,
    },
    #[serde(rename = "remove")]
    Remove {
        path: Path,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old_value: Option<Value>,
    },
    #[serde(rename = "move")]
    Move { path: Path, from: Path },
    #[serde(rename = "copy")]
    Copy { path: Path, from: Path },
    #[serde(rename = "@inc")]
    Inc { path: Path, inc: f64 },
    /// OR/AND a single bit. `value = true` sets the bit, `false` clears it.
    #[serde(rename = "@bit")]
    Bit { path: Path, bit: u32, value: bool },
    #[serde(rename = "@min")]
    Min { path: Path, value: f64 },
    #[serde(rename = "@max")]
    Max { path: Path, value: f64 },
    #[serde(rename = "@txt")]
    Txt { path: Path, delta: Delta },
}

impl Op {
    /// The operation name string, matching the wire `op` discriminant.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Replace { .. } => "replace",
            Op::Remove { .. } => "remove",
            Op::Move { .. } => "move",
            Op::Copy { .. } => "copy",
            Op::Inc { .. } => "@inc",
            Op::Bit { .. } => "@bit",
            Op::Min { .. } => "@min",
            Op::Max { .. } => "@max",
            Op::Txt { .. } => "@txt",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Op::Add { path, .. } => path,
            Op::Replace { path, .. } => path,
            Op::Remove { path, .. } => path,
            Op::Move { path, .. } => path,
            Op::Copy { path, .. } => path,
            Op::Inc { path, .. } => path,
            Op::Bit { path, .. } => path,
            Op::Min { path, .. } => path,
            Op::Max { path, .. } => path,
            Op::Txt { path, .. } => path,
        }
    }

    pub fn path_mut(&mut self) -> &mut Path {
        match self {
            Op::Add { path, .. } => path,
            Op::Replace { path, .. } => path,
            Op::Remove { path, .. } => path,
            Op::Move { path, .. } => path,
            Op::Copy { path, .. } => path,
            Op::Inc { path, .. } => path,
            Op::Bit { path, .. } => path,
            Op::Min { path, .. } => path,
            Op::Max { path, .. } => path,
            Op::Txt { path, .. } => path,
        }
    }

    /// `from` path, present on `move` and `copy`.
    pub fn from_path(&self) -> Option<&Path> {
        match self {
            Op::Move { from, .. } | Op::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// True for `@inc|@bit|@min|@max|@txt` — ops whose effect depends on the
    /// current value rather than replacing it wholesale.
    pub fn is_semantic(&self) -> bool {
        matches!(self, Op::Inc { .. } | Op::Bit { .. } | Op::Min { .. } | Op::Max { .. } | Op::Txt { .. })
    }

    /// True if this op is a soft (apply-only-if-absent) `add`.
    pub fn is_soft(&self) -> bool {
        matches!(self, Op::Add { soft: true, .. })
    }

    /// Returns true if `self` and `other` target the same path with the same
    /// op kind — two ops "like" each other in the sense of occupying the
    /// same slot in a patch.
    pub fn like(&self, other: &Op) -> bool {
        self.path() == other.path() && self.op_name() == other.op_name()
    }
}

// ── Result types ──────────────────────────────────────────────────────────

/// Result of applying a single operation: the value at `path` before the op.
#[derive(Debug, Clone, PartialEq)]
pub struct OpResult {
    pub old: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ApplyPatchOptions {
    /// If true, mutate the document in place rather than cloning first.
    pub mutate: bool,
}

impl Default for ApplyPatchOptions {
    fn default() -> Self {
        Self { mutate: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(steps: &[&str]) -> Path {
        steps.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn op_name_and_path_round_trip_each_kind() {
        let ops = vec![
            Op::Add { path: p(&["a"]), value: json!(1), soft: false },
            Op::Replace { path: p(&["a"]), value: json!(1), old_value: None },
            Op::Remove { path: p(&["a"]), old_value: None },
            Op::Move { path: p(&["a"]), from: p(&["b"]) },
            Op::Copy { path: p(&["a"]), from: p(&["b"]) },
            Op::Inc { path: p(&["a"]), inc: 1.0 },
            Op::Bit { path: p(&["a"]), bit: 0, value: true },
            Op::Min { path: p(&["a"]), value: 1.0 },
            Op::Max { path: p(&["a"]), value: 1.0 },
            Op::Txt { path: p(&["a"]), delta: vec![] },
        ];
        for op in ops {
            assert_eq!(op.path(), &p(&["a"]));
        }
    }

    #[test]
    fn soft_add_is_soft_only_when_flagged() {
        let soft = Op::Add { path: p(&["x"]), value: json!(1), soft: true };
        let hard = Op::Add { path: p(&["x"]), value: json!(1), soft: false };
        assert!(soft.is_soft());
        assert!(!hard.is_soft());
    }

    #[test]
    fn like_matches_same_kind_and_path() {
        let a = Op::Add { path: p(&["x"]), value: json!(1), soft: false };
        let b = Op::Add { path: p(&["x"]), value: json!(2), soft: false };
        let c = Op::Remove { path: p(&["x"]), old_value: None };
        assert!(a.like(&b));
        assert!(!a.like(&c));
    }

    #[test]
    fn serde_round_trip_add() {
        let op = Op::Add { path: p(&["a", "b"]), value: json!(42), soft: true };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "add");
        assert_eq!(json["soft"], true);
        let back: Op = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn serde_round_trip_txt() {
        let op = Op::Txt {
            path: p(&["doc"]),
            delta: vec![crate::json_patch::delta::DeltaOp::retain(3), crate::json_patch::delta::DeltaOp::insert("hi")],
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "@txt");
        let back: Op = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }
}
