//! Canonical change envelope, client-submitted input, and the persisted
//! shapes the server commit pipeline and client reconciliation core share.
//!
//! Grounded on the `Change`/`PatchesSnapshot` record shapes described for
//! the document model, following the teacher's convention of keeping wire
//! records as plain `serde`-derived structs alongside the op types in
//! `json_patch::types`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json_patch::Op;

/// A canonical, server-assigned change: a patch plus commit metadata.
///
/// `id` is client-generated and globally unique; it is the only safe dedupe
/// key across retries and reconnects and must never be rewritten by
/// transform. `rev` is strictly increasing per document; `baseRev < rev`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub id: String,
    pub ops: Vec<Op>,
    pub base_rev: u64,
    pub rev: u64,
    pub created_at: i64,
    pub committed_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

/// A client-submitted change, before the server has assigned it a `rev`.
///
/// `base_rev: None` means "apply to head" — the server fills it in during
/// commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInput {
    pub id: String,
    pub ops: Vec<Op>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_rev: Option<u64>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

impl ChangeInput {
    /// Finalize this input into a committed `Change` at the given revision.
    pub fn into_change(self, rev: u64, base_rev: u64, committed_at: i64) -> Change {
        Change {
            id: self.id,
            ops: self.ops,
            base_rev,
            rev,
            created_at: self.created_at.min(committed_at),
            committed_at,
            batch_id: self.batch_id,
        }
    }
}

/// A materialised document state at a revision, plus any not-yet-committed
/// local changes whose `baseRev >= rev`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchesSnapshot {
    pub state: Value,
    pub rev: u64,
    pub changes: Vec<Change>,
}

/// Marks a document as deleted; blocks re-creation under the same id while
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tombstone {
    pub doc_id: String,
    pub deleted_at: i64,
    pub last_rev: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by_client_id: Option<String>,
}

/// Where a version originated: a normal fast-forward commit, a reconciled
/// offline branch, or an explicit branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionOrigin {
    Main,
    OfflineBranch,
    Branch,
}

/// Emitted by the commit pipeline's session/offline versioner: links a
/// contiguous run of committed revisions into a DAG of sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub id: String,
    pub origin: VersionOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub start_rev: u64,
    pub end_rev: u64,
    pub started_at: i64,
    pub ended_at: i64,
    pub is_offline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ops() -> Vec<Op> {
        vec![Op::Add { path: vec!["a".into()], value: json!(1), soft: false }]
    }

    #[test]
    fn change_input_finalizes_with_clamped_created_at() {
        let input = ChangeInput {
            id: "c1".into(),
            ops: ops(),
            base_rev: Some(4),
            created_at: 1_000,
            batch_id: None,
        };
        let change = input.into_change(5, 4, 500);
        assert_eq!(change.rev, 5);
        assert_eq!(change.base_rev, 4);
        assert_eq!(change.created_at, 500);
        assert_eq!(change.committed_at, 500);
    }

    #[test]
    fn change_serde_round_trip() {
        let change = Change {
            id: "c1".into(),
            ops: ops(),
            base_rev: 1,
            rev: 2,
            created_at: 10,
            committed_at: 11,
            batch_id: Some("b1".into()),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["baseRev"], 1);
        let back: Change = serde_json::from_value(json).unwrap();
        assert_eq!(back, change);
    }
}
