//! Local persistence contract (§4.7 outline): a KV store of per-doc records
//! with atomic multi-store transactions across `snapshots`, `committedChanges`,
//! `pendingChanges`, and `tombstones`.
//!
//! The reconciliation core treats this as an external collaborator; its only
//! hard requirement is atomicity between "append committed" and "drop acked
//! pending range" — expressed here as a single transaction method rather
//! than separate calls the core would otherwise have to sequence itself.

use async_trait::async_trait;

use patches_core::{Change, PatchesSnapshot, Tombstone};

use crate::error::StoreError;

/// One atomic local-store write. Fields left `None`/empty are untouched.
#[derive(Debug, Clone, Default)]
pub struct StoreTransaction {
    pub snapshot: Option<PatchesSnapshot>,
    pub append_committed: Vec<Change>,
    /// Pending-change ids to drop (acked by the server).
    pub drop_pending_ids: Vec<String>,
    pub append_pending: Vec<Change>,
    pub set_sending: Option<Option<Change>>,
    pub tombstone: Option<Tombstone>,
    pub remove_tombstone: bool,
}

#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn load_snapshot(&self, doc_id: &str) -> Result<Option<PatchesSnapshot>, StoreError>;

    async fn load_committed(&self, doc_id: &str) -> Result<Vec<Change>, StoreError>;

    async fn load_pending(&self, doc_id: &str) -> Result<Vec<Change>, StoreError>;

    async fn load_sending(&self, doc_id: &str) -> Result<Option<Change>, StoreError>;

    async fn load_tombstone(&self, doc_id: &str) -> Result<Option<Tombstone>, StoreError>;

    /// Apply `txn` atomically.
    async fn commit_transaction(&self, doc_id: &str, txn: StoreTransaction) -> Result<(), StoreError>;

    /// Replace a prefix of `committedChanges` up to and including `upto_rev`
    /// with `snapshot`. Implementations must refuse (return `Ok(false)`)
    /// if any pending change's `baseRev` falls inside the replaced prefix.
    async fn compact(&self, doc_id: &str, snapshot: PatchesSnapshot, upto_rev: u64) -> Result<bool, StoreError>;
}
