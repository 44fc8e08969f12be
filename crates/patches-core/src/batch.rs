//! Change batching / splitter: keeps individual stored changes under a byte
//! budget, including chunking a large `@txt` inline-text delta.
//!
//! Grounded on the teacher's size-estimation pattern in `json_size`,
//! extended with the splitting contract for `breakChange`/`breakIntoBatches`.

use crate::change::Change;
use crate::json_patch::delta::{self, Delta, DeltaOp};
use crate::json_patch::Op;
use crate::json_size::json_size_fast;

/// Pluggable size estimator: an op's serialized byte size, used to decide
/// when a change must be split. Defaults to [`json_size_fast`] over the
/// op's JSON encoding.
pub type SizeCalculator = dyn Fn(&Op) -> usize;

fn default_size(op: &Op) -> usize {
    match serde_json::to_value(op) {
        Ok(v) => json_size_fast(&v),
        Err(_) => 0,
    }
}

/// Split an oversized `@txt` delta into chunks whose cumulative string
/// length stays under `max_chars`, adjusting each chunk's leading `retain`
/// so applied positions remain correct. Attributes on `insert` survive
/// per-chunk.
fn chunk_delta(d: &Delta, max_chars: usize) -> Vec<Delta> {
    if max_chars == 0 {
        return vec![d.clone()];
    }
    let mut chunks: Vec<Delta> = Vec::new();
    let mut current: Delta = Vec::new();
    let mut current_len = 0usize;
    let mut leading_retain = 0usize;

    for comp in d {
        let comp_len = match comp {
            DeltaOp::Retain { retain } => *retain,
            DeltaOp::Delete { delete } => *delete,
            DeltaOp::Insert { insert, .. } => insert.chars().count(),
        };

        if current.is_empty() && matches!(comp, DeltaOp::Retain { .. }) {
            // Leading retain of a fresh chunk: fold into the position
            // offset rather than emitting it, then re-add it up front.
            leading_retain += comp_len;
            continue;
        }

        if current_len + comp_len > max_chars && !current.is_empty() {
            let mut chunk = Vec::with_capacity(current.len() + 1);
            if leading_retain > 0 {
                chunk.push(DeltaOp::retain(leading_retain));
            }
            chunk.extend(current.drain(..));
            chunks.push(delta::normalize(chunk));
            current_len = 0;
            leading_retain = 0;
        }

        current.push(comp.clone());
        current_len += comp_len;
    }

    if !current.is_empty() || leading_retain > 0 {
        let mut chunk = Vec::with_capacity(current.len() + 1);
        if leading_retain > 0 {
            chunk.push(DeltaOp::retain(leading_retain));
        }
        chunk.extend(current);
        chunks.push(delta::normalize(chunk));
    }

    if chunks.is_empty() {
        chunks.push(Vec::new());
    }
    chunks
}

/// Split one oversized op into several ops whose individual size fits
/// `max_bytes`, when the kind declares a splitter. Only `@txt` has one; all
/// other kinds return the op unsplit (caller emits it over-budget with a
/// warning).
fn split_op(op: &Op, max_bytes: usize, size_of: &SizeCalculator) -> Vec<Op> {
    match op {
        Op::Txt { path, delta } => {
            let whole = size_of(op).max(1);
            let per_char = (whole / delta.iter().map(|c| match c {
                DeltaOp::Insert { insert, .. } => insert.chars().count().max(1),
                _ => 1,
            }).sum::<usize>().max(1)).max(1);
            let max_chars = (max_bytes / per_char).max(1);
            chunk_delta(delta, max_chars)
                .into_iter()
                .map(|d| Op::Txt { path: path.clone(), delta: d })
                .collect()
        }
        _ => {
            tracing::warn!(op = op.op_name(), "operation exceeds max_bytes and has no splitter");
            vec![op.clone()]
        }
    }
}

/// Split `change` into a list of changes whose concatenated ops equal
/// `change.ops` (order-preserving) and whose serialised size is each
/// `<= max_bytes`, assigning fresh ids and `rev = change.rev + k`.
pub fn break_change(change: &Change, max_bytes: usize, size_calculator: Option<&SizeCalculator>) -> Vec<Change> {
    let size_of: &SizeCalculator = size_calculator.unwrap_or(&default_size);
    let batch_id = change.batch_id.clone().unwrap_or_else(|| change.id.clone());

    let mut groups: Vec<Vec<Op>> = Vec::new();
    let mut current: Vec<Op> = Vec::new();
    let mut current_size = 0usize;

    for op in &change.ops {
        let op_size = size_of(op);
        if op_size > max_bytes {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
                current_size = 0;
            }
            for piece in split_op(op, max_bytes, size_of) {
                groups.push(vec![piece]);
            }
            continue;
        }
        if current_size + op_size > max_bytes && !current.is_empty() {
            groups.push(std::mem::take(&mut current));
            current_size = 0;
        }
        current.push(op.clone());
        current_size += op_size;
    }
    if !current.is_empty() {
        groups.push(current);
    }
    if groups.is_empty() {
        groups.push(Vec::new());
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(k, ops)| Change {
            id: format!("{}-{}", change.id, k),
            ops,
            base_rev: change.base_rev,
            rev: change.rev + k as u64,
            created_at: change.created_at,
            committed_at: change.committed_at,
            batch_id: Some(batch_id.clone()),
        })
        .collect()
}

/// Pack a sequence of changes into payload-sized groups, splitting any
/// individual change that overflows `max_payload_bytes`. All members of a
/// batch in which any split occurred share a `batchId`.
pub fn break_into_batches(
    changes: &[Change],
    max_payload_bytes: usize,
    size_calculator: Option<&SizeCalculator>,
) -> Vec<Vec<Change>> {
    let size_of: &SizeCalculator = size_calculator.unwrap_or(&default_size);

    let mut batches: Vec<Vec<Change>> = Vec::new();
    let mut current_batch: Vec<Change> = Vec::new();
    let mut current_size = 0usize;

    for change in changes {
        let change_size: usize = change.ops.iter().map(|op| size_of(op)).sum();
        let pieces = if change_size > max_payload_bytes {
            break_change(change, max_payload_bytes, Some(size_of))
        } else {
            vec![change.clone()]
        };

        for piece in pieces {
            let piece_size: usize = piece.ops.iter().map(|op| size_of(op)).sum();
            if current_size + piece_size > max_payload_bytes && !current_batch.is_empty() {
                batches.push(std::mem::take(&mut current_batch));
                current_size = 0;
            }
            current_size += piece_size;
            current_batch.push(piece);
        }
    }
    if !current_batch.is_empty() {
        batches.push(current_batch);
    }
    batches
}
