//! Store interfaces consumed by the commit pipeline.
//!
//! The pipeline treats durable storage as an external collaborator —
//! grounded on the `ChangeStore` shape described for the server-facing API,
//! implemented with `async-trait` the way the teacher's own async surfaces
//! (wherever the teacher crosses an I/O boundary) are expressed.

use async_trait::async_trait;
use serde_json::Value;

use patches_core::{Change, Tombstone, VersionRecord};

use crate::error::StoreError;

#[derive(Debug, Clone, Default)]
pub struct ListChangesQuery {
    pub start_after: Option<u64>,
    pub end_before: Option<u64>,
    pub limit: Option<usize>,
    pub reverse: bool,
    pub without_batch_id: bool,
}

/// Durable, per-document revision log plus tombstone side-table.
///
/// Implementations must provide atomic append semantics for
/// [`ChangeStore::save_changes`]: either all changes in the call are
/// persisted and the head revision advances, or none are.
#[async_trait]
pub trait ChangeStore: Send + Sync {
    async fn head_rev(&self, doc_id: &str) -> Result<u64, StoreError>;

    async fn state_at(&self, doc_id: &str, rev: u64) -> Result<Value, StoreError>;

    async fn list_changes(&self, doc_id: &str, query: ListChangesQuery) -> Result<Vec<Change>, StoreError>;

    async fn save_changes(&self, doc_id: &str, changes: Vec<Change>) -> Result<(), StoreError>;

    async fn save_version_records(&self, doc_id: &str, records: Vec<VersionRecord>) -> Result<(), StoreError>;

    /// The most recently saved version record for this doc, if any, so a new
    /// commit's session can chain its `parentId` onto the last one.
    async fn latest_version_record(&self, doc_id: &str) -> Result<Option<VersionRecord>, StoreError>;

    async fn get_tombstone(&self, doc_id: &str) -> Result<Option<Tombstone>, StoreError>;

    async fn create_tombstone(&self, tombstone: Tombstone) -> Result<(), StoreError>;

    async fn remove_tombstone(&self, doc_id: &str) -> Result<(), StoreError>;
}
