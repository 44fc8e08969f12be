//! Utility functions for JSON Patch operations.
//!
//! Mirrors `packages/json-joy/src/json-patch/util.ts`.
//!
//! The upstream `util.ts` exports Slate-editor helpers and a regex-matcher
//! factory.  In Rust we expose the path-prefix matcher that is most generally
//! useful for JSON Patch consumers.

use super::types::Op;
use patches_pointer::Path;

// ── Path matcher ───────────────────────────────────────────────────────────

/// Creates a closure that returns `true` if an `Op`'s path starts with the
/// given `prefix` path.
///
/// An op matches when its path is equal to the prefix **or** longer and has
/// the prefix as an ancestor (i.e. the prefix is a proper prefix of the path).
///
/// This mirrors the path-filtering pattern used in the upstream TypeScript
/// when consumers want to narrow a patch to a specific subtree.
///
/// # Example
///
/// ```
/// use patches_core::json_patch::{Op, util::matcher};
///
/// let prefix: Vec<String> = vec!["foo".to_string()];
/// let is_under_foo = matcher(&prefix);
///
/// let add_under_foo = Op::Add {
///     path: vec!["foo".to_string(), "bar".to_string()],
///     value: serde_json::json!(1),
///     soft: false,
/// };
/// assert!(is_under_foo(&add_under_foo));
///
/// let add_elsewhere = Op::Add {
///     path: vec!["baz".to_string()],
///     value: serde_json::json!(2),
///     soft: false,
/// };
/// assert!(!is_under_foo(&add_elsewhere));
/// ```
pub fn matcher(prefix: &Path) -> impl Fn(&Op) -> bool + '_ {
    move |op: &Op| {
        let path = op.path();
        path_starts_with(path, prefix)
    }
}

/// Returns `true` if `path` starts with `prefix` (i.e. prefix is a prefix
/// of path — path == prefix or path has more components and all prefix
/// components match).
pub fn path_starts_with(path: &[String], prefix: &[String]) -> bool {
    if path.len() < prefix.len() {
        return false;
    }
    path[..prefix.len()] == *prefix
}

// ── Tests ─────────────────────────────────────────────────────────────────
