//! Approximate JSON encoding size estimation, used by the change splitter to
//! decide when a batch of operations has grown too large to send in one
//! message.
//!
//! Grounded on `packages/json-joy/src/json-size/msgpackSizeFast.ts`'s
//! heuristic, adapted from `PackValue` to `serde_json::Value` directly since
//! this system encodes ops as JSON rather than MessagePack.

use serde_json::Value;

/// Approximate the byte size of a [`Value`] as if it were encoded compactly.
///
/// - null / bool → 1 byte
/// - number → 9 bytes (worst case: 1 header + 8-byte float64)
/// - string → 4 + byte length (header bytes for length-prefixing)
/// - array → 2 + sum of element sizes
/// - object → 2 + sum of (2 + key bytes + value size) per entry
pub fn json_size_fast(value: &Value) -> usize {
    match value {
        Value::Null => 1,
        Value::Bool(_) => 1,
        Value::Number(_) => 9,
        Value::String(s) => 4 + s.len(),
        Value::Array(arr) => {
            let mut size = 2usize;
            for item in arr {
                size += json_size_fast(item);
            }
            size
        }
        Value::Object(obj) => {
            let mut size = 2usize;
            for (key, val) in obj {
                size += 2 + key.len() + json_size_fast(val);
            }
            size
        }
    }
}
