//! Glues [`PatchesDoc`] to a [`LocalStore`]: loads buffers on open, and
//! persists mutations atomically per the §4.7 contract.

use std::sync::Arc;

use patches_core::{Change, PatchesSnapshot};

use crate::doc::{DocView, PatchesDoc};
use crate::error::ClientError;
use crate::store::{LocalStore, StoreTransaction};

pub struct PersistentDoc<S: LocalStore> {
    store: Arc<S>,
    doc_id: String,
    doc: PatchesDoc,
}

impl<S: LocalStore> PersistentDoc<S> {
    /// Load `doc_id`'s buffers from `store`, defaulting to an empty snapshot
    /// if none exists yet.
    pub async fn open(store: Arc<S>, doc_id: impl Into<String>) -> Result<Self, ClientError> {
        let doc_id = doc_id.into();
        let snapshot = store
            .load_snapshot(&doc_id)
            .await?
            .unwrap_or_else(|| PatchesSnapshot { state: serde_json::json!({}), rev: 0, changes: Vec::new() });

        let mut doc = PatchesDoc::new(snapshot);
        for change in store.load_committed(&doc_id).await? {
            doc.apply_changes(vec![change], 0).ok();
        }
        for change in store.load_pending(&doc_id).await? {
            doc.restore_pending(change);
        }
        if let Some(sending) = store.load_sending(&doc_id).await? {
            doc.restore_sending(sending);
        }
        if store.load_tombstone(&doc_id).await?.is_some() {
            doc.delete_doc();
        }

        Ok(Self { store, doc_id, doc })
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn get_doc(&mut self, now: i64) -> Result<DocView, ClientError> {
        self.doc.get_doc(now)
    }

    pub async fn change(
        &mut self,
        created_at: i64,
        mutator: impl FnOnce(&mut patches_core::PatchBuilder),
    ) -> Result<Option<String>, ClientError> {
        let id = self.doc.change(created_at, mutator)?;
        if let Some(id) = &id {
            if let Some(change) = self.doc.pending().iter().find(|c| &c.id == id).cloned() {
                self.store
                    .commit_transaction(
                        &self.doc_id,
                        StoreTransaction { append_pending: vec![change], ..Default::default() },
                    )
                    .await?;
            }
        }
        Ok(id)
    }

    pub async fn apply_server_changes(&mut self, changes: Vec<Change>, now: i64) -> Result<(), ClientError> {
        tracing::debug!(doc_id = %self.doc_id, count = changes.len(), "applying server changes");
        let acked_sending = self.doc.sending().map(|s| s.id.clone());
        self.doc.apply_server_changes(changes.clone(), now)?;

        let drop_pending_ids = changes.iter().map(|c| c.id.clone()).collect();
        let set_sending = acked_sending
            .filter(|id| changes.iter().any(|c| &c.id == id))
            .map(|_| None);

        self.store
            .commit_transaction(
                &self.doc_id,
                StoreTransaction {
                    append_committed: changes,
                    drop_pending_ids,
                    set_sending,
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    pub async fn save_sending_change(&mut self, change: Change) -> Result<(), ClientError> {
        self.doc.save_sending_change(change.clone());
        self.store
            .commit_transaction(
                &self.doc_id,
                StoreTransaction {
                    drop_pending_ids: vec![change.id.clone()],
                    set_sending: Some(Some(change)),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    pub async fn delete_doc(&mut self, tombstone: patches_core::Tombstone) -> Result<(), ClientError> {
        self.doc.delete_doc();
        self.store
            .commit_transaction(
                &self.doc_id,
                StoreTransaction { tombstone: Some(tombstone), ..Default::default() },
            )
            .await?;
        Ok(())
    }

    pub async fn confirm_delete_doc(&mut self) -> Result<(), ClientError> {
        self.doc.confirm_delete_doc();
        self.store
            .commit_transaction(&self.doc_id, StoreTransaction { remove_tombstone: true, ..Default::default() })
            .await?;
        Ok(())
    }
}
