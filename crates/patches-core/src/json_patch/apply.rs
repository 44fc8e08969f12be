//! Pure per-operation apply functions for the patch model.
//!
//! Grounded on `applyAdd`/`applyRemove`/... in the teacher's
//! `packages/json-joy/src/json-patch/applyPatch/`, narrowed to the ten
//! operation kinds this system recognizes and extended with `@bit`/`@min`/
//! `@max`/`@txt` appliers and `soft`-write semantics.

use serde_json::Value;

use super::delta;
use super::types::{ApplyPatchOptions, Op, OpResult, PatchError};

// ── Path navigation ───────────────────────────────────────────────────────

fn path_to_pointer(path: &[String]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut ptr = String::with_capacity(path.len() * 8);
    for key in path {
        ptr.push('/');
        ptr.push_str(&key.replace('~', "~0").replace('/', "~1"));
    }
    ptr
}

/// Look up the value at `path`, if any. Exposed for callers (e.g. the
/// commit pipeline's rebase-to-head step) that need to test path existence
/// without performing a full apply.
pub fn get_at<'a>(doc: &'a Value, path: &[String]) -> Option<&'a Value> {
    let ptr = path_to_pointer(path);
    doc.pointer(&ptr)
}

fn get_mut_at<'a>(doc: &'a mut Value, path: &[String]) -> Result<&'a mut Value, PatchError> {
    let ptr = path_to_pointer(path);
    doc.pointer_mut(&ptr).ok_or(PatchError::NotFound)
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(doc: &mut Value, path: &[String], value: Value, soft: bool) -> Result<Option<Value>, PatchError> {
    if soft && get_at(doc, path).is_some() {
        return Ok(get_at(doc, path).cloned());
    }
    if path.is_empty() {
        let old = std::mem::replace(doc, value);
        return Ok(Some(old));
    }
    let (parent_path, key) = path.split_at(path.len() - 1);
    let key = &key[0];
    let parent = get_mut_at(doc, parent_path)?;
    match parent {
        Value::Object(map) => Ok(map.insert(key.clone(), value)),
        Value::Array(arr) => {
            if key == "-" {
                arr.push(value);
                Ok(None)
            } else {
                let idx: usize = key.parse().map_err(|_| PatchError::InvalidIndex)?;
                if idx > arr.len() {
                    return Err(PatchError::InvalidIndex);
                }
                arr.insert(idx, value);
                Ok(None)
            }
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_remove(doc: &mut Value, path: &[String]) -> Result<Option<Value>, PatchError> {
    if path.is_empty() {
        return Err(PatchError::InvalidTarget);
    }
    let (parent_path, key) = path.split_at(path.len() - 1);
    let key = &key[0];
    let parent = get_mut_at(doc, parent_path)?;
    match parent {
        Value::Object(map) => map.remove(key).ok_or(PatchError::NotFound).map(Some),
        Value::Array(arr) => {
            let idx: usize = key.parse().map_err(|_| PatchError::InvalidIndex)?;
            if idx >= arr.len() {
                return Err(PatchError::NotFound);
            }
            Ok(Some(arr.remove(idx)))
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_replace(doc: &mut Value, path: &[String], value: Value) -> Result<Option<Value>, PatchError> {
    if path.is_empty() {
        let old = std::mem::replace(doc, value);
        return Ok(Some(old));
    }
    let (parent_path, key) = path.split_at(path.len() - 1);
    let key = &key[0];
    let parent = get_mut_at(doc, parent_path)?;
    match parent {
        Value::Object(map) => {
            let old = map.insert(key.clone(), value).ok_or(PatchError::NotFound)?;
            Ok(Some(old))
        }
        Value::Array(arr) => {
            let idx: usize = key.parse().map_err(|_| PatchError::InvalidIndex)?;
            if idx >= arr.len() {
                return Err(PatchError::NotFound);
            }
            let old = std::mem::replace(&mut arr[idx], value);
            Ok(Some(old))
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_copy(doc: &mut Value, path: &[String], from: &[String]) -> Result<Option<Value>, PatchError> {
    let src = get_at(doc, from).ok_or(PatchError::NotFound)?.clone();
    apply_add(doc, path, src, false)
}

fn apply_move(doc: &mut Value, path: &[String], from: &[String]) -> Result<Option<Value>, PatchError> {
    if path.len() >= from.len() && path[..from.len()] == from[..] {
        return Err(PatchError::InvalidTarget);
    }
    let value = apply_remove(doc, from)?.ok_or(PatchError::NotFound)?;
    apply_add(doc, path, value, false)
}

/// Resolve `path` for a semantic op that coalesces a missing leaf to `0`
/// (`x := (x ?? 0) + v`): the leaf itself may be absent, but every ancestor
/// container must already exist.
fn get_mut_or_init<'a>(doc: &'a mut Value, path: &[String]) -> Result<&'a mut Value, PatchError> {
    if path.is_empty() || get_at(doc, path).is_some() {
        return get_mut_at(doc, path);
    }

    let (parent_path, key) = path.split_at(path.len() - 1);
    let key = &key[0];
    let parent = get_mut_at(doc, parent_path)?;
    match parent {
        Value::Object(map) => Ok(map.entry(key.clone()).or_insert(Value::Null)),
        Value::Array(arr) => {
            if key == "-" {
                arr.push(Value::Null);
                Ok(arr.last_mut().expect("just pushed"))
            } else {
                let idx: usize = key.parse().map_err(|_| PatchError::InvalidIndex)?;
                if idx > arr.len() {
                    return Err(PatchError::NotFound);
                }
                if idx == arr.len() {
                    arr.push(Value::Null);
                }
                Ok(&mut arr[idx])
            }
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_inc(doc: &mut Value, path: &[String], inc: f64) -> Result<(), PatchError> {
    let target = get_mut_or_init(doc, path)?;
    match target {
        Value::Null => {
            *target = serde_json::Number::from_f64(inc).map(Value::Number).ok_or(PatchError::InvalidTarget)?;
            Ok(())
        }
        Value::Number(n) => {
            let current = n.as_f64().ok_or(PatchError::InvalidTarget)?;
            *target = serde_json::Number::from_f64(current + inc)
                .map(Value::Number)
                .ok_or(PatchError::InvalidTarget)?;
            Ok(())
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_bit(doc: &mut Value, path: &[String], bit: u32, value: bool) -> Result<(), PatchError> {
    let target = get_mut_at(doc, path)?;
    let current = match target {
        Value::Null => 0u64,
        Value::Number(n) => n.as_u64().ok_or(PatchError::InvalidTarget)?,
        _ => return Err(PatchError::InvalidTarget),
    };
    let mask = 1u64 << bit;
    let updated = if value { current | mask } else { current & !mask };
    *target = Value::Number(updated.into());
    Ok(())
}

fn apply_min(doc: &mut Value, path: &[String], value: f64) -> Result<(), PatchError> {
    let target = get_mut_at(doc, path)?;
    match target {
        Value::Number(n) => {
            let current = n.as_f64().ok_or(PatchError::InvalidTarget)?;
            let result = current.min(value);
            *target = serde_json::Number::from_f64(result).map(Value::Number).ok_or(PatchError::InvalidTarget)?;
            Ok(())
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_max(doc: &mut Value, path: &[String], value: f64) -> Result<(), PatchError> {
    let target = get_mut_at(doc, path)?;
    match target {
        Value::Number(n) => {
            let current = n.as_f64().ok_or(PatchError::InvalidTarget)?;
            let result = current.max(value);
            *target = serde_json::Number::from_f64(result).map(Value::Number).ok_or(PatchError::InvalidTarget)?;
            Ok(())
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_txt(doc: &mut Value, path: &[String], d: &delta::Delta) -> Result<(), PatchError> {
    let target = get_mut_at(doc, path)?;
    match target {
        Value::String(s) => {
            *s = delta::apply(s, d);
            Ok(())
        }
        _ => Err(PatchError::NotAString),
    }
}

// ── Main apply function ───────────────────────────────────────────────────

/// Apply a single operation to the document in place, returning the value at
/// the path before the operation (where meaningful).
pub fn apply_op(doc: &mut Value, op: &Op) -> Result<Option<Value>, PatchError> {
    match op {
        Op::Add { path, value, soft } => apply_add(doc, path, value.clone(), *soft),
        Op::Remove { path, .. } => apply_remove(doc, path),
        Op::Replace { path, value, .. } => apply_replace(doc, path, value.clone()),
        Op::Copy { path, from } => apply_copy(doc, path, from),
        Op::Move { path, from } => apply_move(doc, path, from),
        Op::Inc { path, inc } => {
            apply_inc(doc, path, *inc)?;
            Ok(None)
        }
        Op::Bit { path, bit, value } => {
            apply_bit(doc, path, *bit, *value)?;
            Ok(None)
        }
        Op::Min { path, value } => {
            apply_min(doc, path, *value)?;
            Ok(None)
        }
        Op::Max { path, value } => {
            apply_max(doc, path, *value)?;
            Ok(None)
        }
        Op::Txt { path, delta } => {
            apply_txt(doc, path, delta)?;
            Ok(None)
        }
    }
}

/// Apply a sequence of operations in order, stopping at the first error.
pub fn apply_ops(mut doc: Value, ops: &[Op]) -> Result<(Value, Vec<OpResult>), PatchError> {
    let mut results = Vec::with_capacity(ops.len());
    for op in ops {
        let old = apply_op(&mut doc, op)?;
        results.push(OpResult { old });
    }
    Ok((doc, results))
}

/// Apply a patch, optionally cloning first per `options.mutate`.
pub fn apply_patch(doc: Value, ops: &[Op], options: &ApplyPatchOptions) -> Result<Value, PatchError> {
    let mut working = if options.mutate { doc } else { doc.clone() };
    for op in ops {
        apply_op(&mut working, op)?;
    }
    Ok(working)
}

// ── Tests ─────────────────────────────────────────────────────────────────
