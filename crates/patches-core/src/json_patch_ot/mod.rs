//! Operational transformation for the patch model.
//!
//! Grounded on `packages/json-joy/src/json-patch-ot/`'s path-shifting state
//! machine, narrowed to the ten operation kinds this system recognizes and
//! extended with tie-break rules for the semantic ops (`@inc|@bit|@min|@max|@txt`)
//! and the `soft` idempotent-init flag.
//!
//! `transform(accepted, proposed)` rewrites a list of *proposed* operations —
//! not yet committed — so they can be applied on top of a document that has
//! already received `accepted`.

use crate::json_patch::delta;
use crate::json_patch::types::{Op, Path};

// ── Path utilities ────────────────────────────────────────────────────────

fn is_root(path: &[String]) -> bool {
    path.is_empty()
}

fn is_valid_index(s: &str) -> bool {
    s == "-" || s.parse::<usize>().is_ok()
}

fn is_child(parent: &[String], child: &[String]) -> bool {
    child.len() > parent.len() && child.starts_with(parent)
}

fn path_equal(a: &[String], b: &[String]) -> bool {
    a == b
}

/// Bump the array index in `path2` at the depth of `path1`'s last step, if
/// `path2` is a sibling in the same array at or after `path1`'s index.
fn bump_array_path(path1: &[String], path2: &[String]) -> Option<Vec<String>> {
    let last_idx = path1.len().checked_sub(1)?;
    let index1: usize = path1.last()?.parse().ok()?;
    if path2.len() <= last_idx || path1[..last_idx] != path2[..last_idx] {
        return None;
    }
    let step2 = &path2[last_idx];
    if !is_valid_index(step2) {
        return None;
    }
    let index2: usize = step2.parse().ok()?;
    if index1 <= index2 {
        let mut new_path = path2.to_vec();
        new_path[last_idx] = (index2 + 1).to_string();
        Some(new_path)
    } else {
        None
    }
}

/// Lower the array index in `path2` at the depth of `path1`'s last step, if
/// `path2` is a sibling in the same array strictly after `path1`'s index.
fn lower_array_path(path1: &[String], path2: &[String]) -> Option<Vec<String>> {
    let last_idx = path1.len().checked_sub(1)?;
    let index1: usize = path1.last()?.parse().ok()?;
    if path2.len() <= last_idx || path1[..last_idx] != path2[..last_idx] {
        return None;
    }
    let step2 = &path2[last_idx];
    if !is_valid_index(step2) {
        return None;
    }
    let index2: usize = step2.parse().ok()?;
    if index1 < index2 {
        let mut new_path = path2.to_vec();
        new_path[last_idx] = (index2 - 1).to_string();
        Some(new_path)
    } else {
        None
    }
}

fn op_from(op: &Op) -> Option<&Path> {
    op.from_path()
}

fn with_path(op: &Op, new_path: Path) -> Op {
    match op.clone() {
        Op::Add { value, soft, .. } => Op::Add { path: new_path, value, soft },
        Op::Replace { value, old_value, .. } => Op::Replace { path: new_path, value, old_value },
        Op::Remove { old_value, .. } => Op::Remove { path: new_path, old_value },
        Op::Move { from, .. } => Op::Move { path: new_path, from },
        Op::Copy { from, .. } => Op::Copy { path: new_path, from },
        Op::Inc { inc, .. } => Op::Inc { path: new_path, inc },
        Op::Bit { bit, value, .. } => Op::Bit { path: new_path, bit, value },
        Op::Min { value, .. } => Op::Min { path: new_path, value },
        Op::Max { value, .. } => Op::Max { path: new_path, value },
        Op::Txt { delta, .. } => Op::Txt { path: new_path, delta },
    }
}

fn with_from(op: &Op, new_from: Path) -> Op {
    match op.clone() {
        Op::Copy { path, .. } => Op::Copy { path, from: new_from },
        Op::Move { path, .. } => Op::Move { path, from: new_from },
        other => other,
    }
}

/// True for ops whose effect at `path` is invalidated once `path` (or an
/// ancestor of it) has been structurally removed.
fn targets_removed_value(op: &Op) -> bool {
    matches!(
        op,
        Op::Remove { .. } | Op::Replace { .. } | Op::Inc { .. } | Op::Bit { .. }
            | Op::Min { .. } | Op::Max { .. } | Op::Txt { .. }
    )
}

// ── Structural transforms ─────────────────────────────────────────────────

/// Transform `proposed` against an accepted `add`.
fn x_add(add_path: &Path, proposed: &Op) -> Vec<Op> {
    if is_root(add_path) {
        // Root add replaced the whole document; nothing proposed survives.
        return vec![];
    }
    if is_root(proposed.path()) {
        return vec![proposed.clone()];
    }

    // A soft add racing against a value the accepted op already established
    // at the same path is a no-op: the path is no longer absent.
    if proposed.is_soft() && path_equal(add_path, proposed.path()) {
        return vec![];
    }

    let last_step = match add_path.last() {
        Some(s) => s,
        None => return vec![proposed.clone()],
    };
    let last_is_index = is_valid_index(last_step);

    // Concurrent add/add at the exact same object key: server wins, the
    // accepted add already claimed this slot. At the same array index the
    // accepted add comes first and the proposed insert is re-indexed after
    // it, handled by the bump below.
    if !last_is_index && matches!(proposed, Op::Add { .. }) && path_equal(add_path, proposed.path()) {
        return vec![];
    }

    if is_child(add_path, proposed.path()) && !last_is_index {
        // Added a non-array value that proposed targets inside of.
        return vec![];
    }

    if last_is_index {
        let new_path = bump_array_path(add_path, proposed.path());
        let new_from = op_from(proposed).and_then(|f| bump_array_path(add_path, f));
        if new_path.is_some() || new_from.is_some() {
            let mut result = proposed.clone();
            if let Some(p) = new_path {
                result = with_path(&result, p);
            }
            if let Some(f) = new_from {
                result = with_from(&result, f);
            }
            return vec![result];
        }
    }

    vec![proposed.clone()]
}

/// Transform `proposed` against an accepted `replace`.
fn x_replace(replace_path: &Path, proposed: &Op) -> Vec<Op> {
    if path_equal(replace_path, proposed.path()) {
        // Concurrent replace/replace at the same path: server wins.
        if matches!(proposed, Op::Replace { .. }) {
            return vec![];
        }
        // A semantic op atop a value the accepted op just replaced is stale.
        if targets_removed_value(proposed) && !matches!(proposed, Op::Remove { .. }) {
            return vec![];
        }
        if proposed.is_soft() {
            return vec![];
        }
    }
    vec![proposed.clone()]
}

/// Transform `proposed` against an accepted `remove`.
fn x_remove(rem_path: &Path, proposed: &Op) -> Vec<Op> {
    if is_root(rem_path) {
        return vec![];
    }
    if is_root(proposed.path()) {
        return vec![proposed.clone()];
    }

    let last_step = match rem_path.last() {
        Some(s) => s,
        None => return vec![proposed.clone()],
    };
    let last_is_index = is_valid_index(last_step);

    // Concurrent remove at the exact same path: the client's remove is
    // already satisfied, becomes a no-op.
    if path_equal(rem_path, proposed.path()) && targets_removed_value(proposed) {
        return vec![];
    }

    // Proposed targets a descendant of what was removed (structurally gone).
    if is_child(rem_path, proposed.path()) {
        return vec![];
    }
    if let Some(from) = op_from(proposed) {
        if is_child(rem_path, from) || path_equal(rem_path, from) {
            return vec![];
        }
    }

    if last_is_index {
        let new_path = lower_array_path(rem_path, proposed.path());
        let new_from = op_from(proposed).and_then(|f| lower_array_path(rem_path, f));
        if new_path.is_some() || new_from.is_some() {
            let mut result = proposed.clone();
            if let Some(p) = new_path {
                result = with_path(&result, p);
            }
            if let Some(f) = new_from {
                result = with_from(&result, f);
            }
            return vec![result];
        }
    }

    vec![proposed.clone()]
}

/// Transform `proposed` against an accepted `move` (or `copy`, which shares
/// the same path-redirection shape since it also creates a value at `path`).
fn x_move(move_from: &Path, move_to: &Path, proposed: &Op) -> Vec<Op> {
    if path_equal(move_from, move_to) {
        // A no-op move (identity) leaves everything unchanged.
        return vec![proposed.clone()];
    }
    if is_root(move_to) {
        return vec![proposed.clone()];
    }
    if is_child(move_from, proposed.path()) {
        let mut new_path = move_to.to_vec();
        new_path.extend_from_slice(&proposed.path()[move_from.len()..]);
        return vec![with_path(proposed, new_path)];
    }
    vec![proposed.clone()]
}

// ── Semantic transforms ───────────────────────────────────────────────────

/// `@txt` against an accepted `@txt` at the same path: transform the delta,
/// right-wins on concurrent inserts at the same index.
fn x_txt(accepted_path: &Path, accepted_delta: &delta::Delta, proposed: &Op) -> Vec<Op> {
    match proposed {
        Op::Txt { path, delta: proposed_delta } if path_equal(path, accepted_path) => {
            let transformed = delta::transform(proposed_delta, accepted_delta, true);
            vec![Op::Txt { path: path.clone(), delta: transformed }]
        }
        _ => vec![proposed.clone()],
    }
}

// ── Main transform ────────────────────────────────────────────────────────

/// Transform `proposed` operations so they apply correctly after `accepted`
/// operations have already been applied.
pub fn transform(accepted: &[Op], proposed: &[Op]) -> Vec<Op> {
    let mut proposed = proposed.to_vec();
    for acc in accepted {
        let mut next = Vec::new();
        for prop in &proposed {
            next.extend(apply_xform(acc, prop));
        }
        proposed = next;
    }
    proposed
}

fn apply_xform(accepted: &Op, proposed: &Op) -> Vec<Op> {
    match accepted {
        Op::Add { path, .. } => x_add(path, proposed),
        Op::Replace { path, .. } => x_replace(path, proposed),
        Op::Remove { path, .. } => x_remove(path, proposed),
        Op::Move { path, from } => x_move(from, path, proposed),
        Op::Copy { path, .. } => x_move(path, path, proposed),
        Op::Txt { path, delta } => x_txt(path, delta, proposed),
        // @inc/@bit/@min/@max commute and are idempotent against one another
        // and don't shift paths; nothing to transform.
        Op::Inc { .. } | Op::Bit { .. } | Op::Min { .. } | Op::Max { .. } => vec![proposed.clone()],
    }
}
