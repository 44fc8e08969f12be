//! Inline-text delta: the operand of the `@txt` operation.
//!
//! Grounded on the state-machine shape of a retain/insert/delete irreversible
//! text-OT walk, extended with per-insert `attributes` so rich-text
//! formatting marks survive apply/compose/transform.

use serde::{Deserialize, Serialize};
use serde_json::Map;

/// One component of an inline-text delta.
///
/// Encoded on the wire as `{retain:n}`, `{insert:s,attributes?}`, or
/// `{delete:n}` — an object shape rather than a bare number, so the variant
/// is unambiguous to deserialize (an untagged enum of bare numbers couldn't
/// tell retain from delete apart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeltaOp {
    Retain { retain: usize },
    Insert {
        insert: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attributes: Option<Map<String, serde_json::Value>>,
    },
    Delete { delete: usize },
}

/// A `@txt` delta: a sequence of retain/insert/delete components.
pub type Delta = Vec<DeltaOp>;

impl DeltaOp {
    pub fn retain(n: usize) -> Self {
        DeltaOp::Retain { retain: n }
    }

    pub fn delete(n: usize) -> Self {
        DeltaOp::Delete { delete: n }
    }

    pub fn insert(text: impl Into<String>) -> Self {
        DeltaOp::Insert { insert: text.into(), attributes: None }
    }

    pub fn insert_with(text: impl Into<String>, attrs: Map<String, serde_json::Value>) -> Self {
        DeltaOp::Insert { insert: text.into(), attributes: Some(attrs) }
    }

    fn is_insert(&self) -> bool {
        matches!(self, DeltaOp::Insert { .. })
    }

    fn insert_len(&self) -> usize {
        match self {
            DeltaOp::Insert { insert, .. } => insert.chars().count(),
            _ => 0,
        }
    }
}

/// Append a component to `delta`, merging with the last component when both
/// are retains, both are deletes, or both are inserts with identical
/// attributes.
fn append(delta: &mut Delta, comp: DeltaOp) {
    match (delta.last_mut(), &comp) {
        (Some(DeltaOp::Retain { retain: n }), DeltaOp::Retain { retain: m }) => {
            *n += m;
            return;
        }
        (Some(DeltaOp::Delete { delete: n }), DeltaOp::Delete { delete: m }) => {
            *n += m;
            return;
        }
        (
            Some(DeltaOp::Insert { insert: s, attributes: a }),
            DeltaOp::Insert { insert: t, attributes: b },
        ) if a == b => {
            s.push_str(t);
            return;
        }
        _ => {}
    }
    delta.push(comp);
}

/// Drop trailing no-op retains.
pub fn trim(delta: &mut Delta) {
    while matches!(delta.last(), Some(DeltaOp::Retain { .. })) {
        delta.pop();
    }
}

/// Coalesce adjacent same-shape components and strip trailing retains.
pub fn normalize(delta: Delta) -> Delta {
    let mut result: Delta = Vec::new();
    for comp in delta {
        match &comp {
            DeltaOp::Retain { retain: 0 } | DeltaOp::Delete { delete: 0 } => {}
            DeltaOp::Insert { insert, .. } if insert.is_empty() => {}
            _ => append(&mut result, comp),
        }
    }
    trim(&mut result);
    result
}

/// Apply a delta to a string, returning the resulting string.
pub fn apply(s: &str, delta: &Delta) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();
    let mut idx = 0usize;

    for comp in delta {
        match comp {
            DeltaOp::Retain { retain: n } => {
                result.extend(chars[idx..(idx + n).min(chars.len())].iter());
                idx += n;
            }
            DeltaOp::Delete { delete: n } => {
                idx += n;
            }
            DeltaOp::Insert { insert, .. } => {
                result.push_str(insert);
            }
        }
    }
    result.extend(chars[idx.min(chars.len())..].iter());
    result
}

/// Compose two sequential deltas into one equivalent delta: `apply(apply(s, a), b) == apply(s, compose(a, b))`.
pub fn compose(a: &Delta, b: &Delta) -> Delta {
    let mut result: Delta = Vec::new();
    let mut iter_a = a.iter().cloned();
    let mut iter_b = b.iter().cloned();
    let mut rem_a: Option<DeltaOp> = None;
    let mut rem_b: Option<DeltaOp> = None;

    loop {
        let ca = rem_a.take().or_else(|| iter_a.next());
        let cb = rem_b.take().or_else(|| iter_b.next());

        match (ca, cb) {
            (None, None) => break,
            (Some(c), None) => append(&mut result, c),
            (None, Some(c)) => append(&mut result, c),
            (Some(ca), Some(cb)) => match (&ca, &cb) {
                (DeltaOp::Delete { delete: n }, _) => {
                    append(&mut result, DeltaOp::delete(*n));
                    rem_b = Some(cb);
                }
                (_, DeltaOp::Insert { .. }) => {
                    append(&mut result, cb);
                    rem_a = Some(ca);
                }
                (DeltaOp::Retain { retain: n }, DeltaOp::Retain { retain: m }) => {
                    let min = (*n).min(*m);
                    append(&mut result, DeltaOp::retain(min));
                    if n > m {
                        rem_a = Some(DeltaOp::retain(n - m));
                    } else if m > n {
                        rem_b = Some(DeltaOp::retain(m - n));
                    }
                }
                (DeltaOp::Retain { retain: n }, DeltaOp::Delete { delete: m }) => {
                    let min = (*n).min(*m);
                    append(&mut result, DeltaOp::delete(min));
                    if n > m {
                        rem_a = Some(DeltaOp::retain(n - m));
                    } else if m > n {
                        rem_b = Some(DeltaOp::delete(m - n));
                    }
                }
                (DeltaOp::Insert { insert, attributes }, DeltaOp::Retain { retain: m }) => {
                    let len = insert.chars().count();
                    let kept: String = insert.chars().take(*m).collect();
                    append(&mut result, DeltaOp::Insert { insert: kept, attributes: attributes.clone() });
                    if len > *m {
                        let rest: String = insert.chars().skip(*m).collect();
                        rem_a = Some(DeltaOp::Insert { insert: rest, attributes: attributes.clone() });
                    } else if *m > len {
                        rem_b = Some(DeltaOp::retain(m - len));
                    }
                }
                (DeltaOp::Insert { insert, attributes }, DeltaOp::Delete { delete: m }) => {
                    let len = insert.chars().count();
                    if len > *m {
                        let rest: String = insert.chars().skip(*m).collect();
                        rem_a = Some(DeltaOp::Insert { insert: rest, attributes: attributes.clone() });
                    } else if *m > len {
                        rem_b = Some(DeltaOp::delete(m - len));
                    }
                    // equal lengths: insert and delete cancel out entirely
                }
            },
        }
    }
    normalize(result)
}

/// Transform `delta` against a concurrently-applied `against`, producing a
/// delta that can be applied after `against` with the same net intent.
///
/// Concurrent inserts at the same index: "right-wins" — `against`'s insert
/// is placed before `delta`'s when `right_wins` is true (the default used by
/// the transform engine, matching the `@txt` contract's documented
/// "right-wins" tie-break).
pub fn transform(delta: &Delta, against: &Delta, right_wins: bool) -> Delta {
    let mut result: Delta = Vec::new();
    let mut iter_d = delta.iter().cloned();
    let mut iter_a = against.iter().cloned();
    let mut rem_d: Option<DeltaOp> = None;
    let mut rem_a: Option<DeltaOp> = None;

    loop {
        let d = rem_d.take().or_else(|| iter_d.next());
        let a = rem_a.take().or_else(|| iter_a.next());

        match (d, a) {
            (None, _) => break,
            (Some(d), None) => append(&mut result, d),
            (Some(d), Some(a)) => match (&d, &a) {
                (_, DeltaOp::Insert { .. }) if !d.is_insert() => {
                    let n = a.insert_len();
                    // against inserted text here: skip over it with a retain,
                    // then continue comparing `d` to whatever follows `a`.
                    let left_wins = !right_wins;
                    if left_wins {
                        rem_d = Some(d);
                        append(&mut result, DeltaOp::retain(n));
                    } else {
                        append(&mut result, DeltaOp::retain(n));
                        rem_d = Some(d);
                    }
                }
                (DeltaOp::Insert { .. }, DeltaOp::Insert { .. }) => {
                    // Both sides insert at this position: right-wins means the
                    // concurrent (against) insert is considered to have landed
                    // first, so `delta`'s insert passes through after it.
                    if right_wins {
                        append(&mut result, d.clone());
                        rem_a = Some(a);
                    } else {
                        append(&mut result, DeltaOp::retain(a.insert_len()));
                        rem_d = Some(d);
                    }
                }
                (DeltaOp::Insert { .. }, _) => {
                    append(&mut result, d.clone());
                    rem_a = Some(a);
                }
                (DeltaOp::Retain { retain: n }, DeltaOp::Retain { retain: m }) => {
                    let min = (*n).min(*m);
                    append(&mut result, DeltaOp::retain(min));
                    if n > m {
                        rem_d = Some(DeltaOp::retain(n - m));
                    } else if m > n {
                        rem_a = Some(DeltaOp::retain(m - n));
                    }
                }
                (DeltaOp::Retain { retain: n }, DeltaOp::Delete { delete: m }) => {
                    if n > m {
                        rem_d = Some(DeltaOp::retain(n - m));
                    } else if m > n {
                        rem_a = Some(DeltaOp::delete(m - n));
                    }
                    // the retained span was deleted concurrently: drop it, no output
                }
                (DeltaOp::Delete { delete: n }, DeltaOp::Retain { retain: m }) => {
                    let min = (*n).min(*m);
                    append(&mut result, DeltaOp::delete(min));
                    if n > m {
                        rem_d = Some(DeltaOp::delete(n - m));
                    } else if m > n {
                        rem_a = Some(DeltaOp::retain(m - n));
                    }
                }
                (DeltaOp::Delete { delete: n }, DeltaOp::Delete { delete: m }) => {
                    if n > m {
                        rem_d = Some(DeltaOp::delete(n - m));
                    } else if m > n {
                        rem_a = Some(DeltaOp::delete(m - n));
                    }
                    // both delete the same span: redundant, no output
                }
            },
        }
    }
    normalize(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_insert() {
        let d = vec![DeltaOp::insert("hello")];
        assert_eq!(apply("", &d), "hello");
    }

    #[test]
    fn apply_retain_then_insert() {
        let d = vec![DeltaOp::retain(5), DeltaOp::insert(" world")];
        assert_eq!(apply("hello", &d), "hello world");
    }

    #[test]
    fn apply_delete() {
        let d = vec![DeltaOp::delete(3)];
        assert_eq!(apply("hello", &d), "lo");
    }

    #[test]
    fn apply_preserves_attributes_on_insert() {
        let mut attrs = Map::new();
        attrs.insert("bold".into(), serde_json::json!(true));
        let d = vec![DeltaOp::insert_with("hi", attrs.clone())];
        assert_eq!(apply("", &d), "hi");
        if let DeltaOp::Insert { attributes, .. } = &d[0] {
            assert_eq!(attributes.as_ref(), Some(&attrs));
        } else {
            panic!("expected insert");
        }
    }

    #[test]
    fn compose_insert_then_delete_cancels() {
        let a = vec![DeltaOp::insert("X")];
        let b = vec![DeltaOp::delete(1)];
        assert!(compose(&a, &b).is_empty());
    }

    #[test]
    fn compose_is_equivalent_to_sequential_apply() {
        let base = "hello world";
        let a = vec![DeltaOp::retain(5), DeltaOp::insert(" there"), DeltaOp::retain(6)];
        let b = vec![DeltaOp::retain(11), DeltaOp::delete(6)];
        let composed = compose(&a, &b);
        let sequential = apply(&apply(base, &a), &b);
        assert_eq!(apply(base, &composed), sequential);
    }

    #[test]
    fn transform_concurrent_inserts_right_wins() {
        let d = vec![DeltaOp::insert("A")];
        let against = vec![DeltaOp::insert("B")];
        let t = transform(&d, &against, true);
        // against's insert already landed; d's insert comes after it.
        let result = apply("B", &t);
        assert_eq!(result, "BA");
    }

    #[test]
    fn transform_retain_past_concurrent_delete_drops_stale_span() {
        let d = vec![DeltaOp::retain(5), DeltaOp::insert("!")];
        let against = vec![DeltaOp::delete(5)];
        let t = transform(&d, &against, true);
        assert_eq!(apply("", &t), "!");
    }

    #[test]
    fn transform_delete_past_concurrent_insert_keeps_delete_count() {
        // against inserted 2 chars before the region delta wants to delete.
        let d = vec![DeltaOp::retain(2), DeltaOp::delete(3)];
        let against = vec![DeltaOp::insert("XY")];
        let t = transform(&d, &against, true);
        assert_eq!(apply("XYabc", &t), "XY");
    }
}
