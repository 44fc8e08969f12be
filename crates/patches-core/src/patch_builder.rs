//! Accumulates `Op`s for a single local edit.
//!
//! Grounded on the teacher's `patch_builder.rs` accumulate-then-take shape,
//! adapted from CRDT ops to structured JSON-Patch ops: callers push
//! operations against a `Path` built from string/index segments rather than
//! a property-access proxy.

use serde::Serialize;
use serde_json::Value;

use crate::json_patch::delta::Delta;
use crate::json_patch::types::{Op, Path};

/// A path under construction, e.g. `PathBuilder::new().key("text").index(0)`.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder(Path);

impl PathBuilder {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(k.into());
        self
    }

    pub fn index(mut self, i: usize) -> Self {
        self.0.push(i.to_string());
        self
    }

    /// Append-to-array marker ("-" in JSON Pointer).
    pub fn append(mut self) -> Self {
        self.0.push("-".to_string());
        self
    }

    pub fn build(self) -> Path {
        self.0
    }
}

/// Shorthand for a path literal, e.g. `path(&["text", "0"])`.
pub fn path(steps: &[&str]) -> Path {
    steps.iter().map(|s| s.to_string()).collect()
}

/// Accumulates ops for one local edit. Handed to the mutator closure passed
/// to the client reconciliation core's `change()`.
#[derive(Debug, Default)]
pub struct PatchBuilder {
    ops: Vec<Op>,
}

impl PatchBuilder {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn push(&mut self, op: Op) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn add(&mut self, path: Path, value: impl Serialize) -> &mut Self {
        self.push(Op::Add { path, value: to_value(value), soft: false })
    }

    pub fn add_soft(&mut self, path: Path, value: impl Serialize) -> &mut Self {
        self.push(Op::Add { path, value: to_value(value), soft: true })
    }

    pub fn replace(&mut self, path: Path, value: impl Serialize) -> &mut Self {
        self.push(Op::Replace { path, value: to_value(value), old_value: None })
    }

    pub fn remove(&mut self, path: Path) -> &mut Self {
        self.push(Op::Remove { path, old_value: None })
    }

    pub fn mov(&mut self, from: Path, path: Path) -> &mut Self {
        self.push(Op::Move { path, from })
    }

    pub fn copy(&mut self, from: Path, path: Path) -> &mut Self {
        self.push(Op::Copy { path, from })
    }

    pub fn inc(&mut self, path: Path, by: f64) -> &mut Self {
        self.push(Op::Inc { path, inc: by })
    }

    pub fn bit(&mut self, path: Path, bit: u32, value: bool) -> &mut Self {
        self.push(Op::Bit { path, bit, value })
    }

    pub fn min(&mut self, path: Path, value: f64) -> &mut Self {
        self.push(Op::Min { path, value })
    }

    pub fn max(&mut self, path: Path, value: f64) -> &mut Self {
        self.push(Op::Max { path, value })
    }

    pub fn txt(&mut self, path: Path, delta: Delta) -> &mut Self {
        self.push(Op::Txt { path, delta })
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }
}

fn to_value(v: impl Serialize) -> Value {
    serde_json::to_value(v).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_mixed_patch() {
        let mut b = PatchBuilder::new();
        b.add(path(&["settings"]), serde_json::json!({})).replace(path(&["title"]), "hi").inc(path(&["count"]), 1.0);
        let ops = b.into_ops();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].op_name(), "add");
        assert_eq!(ops[1].op_name(), "replace");
        assert_eq!(ops[2].op_name(), "@inc");
    }

    #[test]
    fn path_builder_matches_literal() {
        let built = PathBuilder::new().key("text").index(0).build();
        assert_eq!(built, path(&["text", "0"]));
    }

    #[test]
    fn empty_builder_reports_empty() {
        let b = PatchBuilder::new();
        assert!(b.is_empty());
    }
}
