//! Server-emitted notifications.
//!
//! Grounded on the `onChangesCommitted`/`onDocDeleted` events in §6: emitted
//! *after* persistence, in commit order, tagged with the originating client
//! so a transport can skip echoing back to its author.

use async_trait::async_trait;

use patches_core::Change;

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn on_changes_committed(&self, doc_id: &str, changes: &[Change], origin_client_id: Option<&str>);

    async fn on_doc_deleted(&self, doc_id: &str, origin_client_id: Option<&str>);
}

/// An [`EventSink`] that drops every event; useful as a default for callers
/// that only care about the return value of `commit_changes`.
pub struct NullEventSink;

#[async_trait]
impl EventSink for NullEventSink {
    async fn on_changes_committed(&self, _doc_id: &str, _changes: &[Change], _origin_client_id: Option<&str>) {}
    async fn on_doc_deleted(&self, _doc_id: &str, _origin_client_id: Option<&str>) {}
}
