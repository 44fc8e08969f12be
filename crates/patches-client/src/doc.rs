//! Client reconciliation core: per-document buffers plus the rules that
//! rebase in-flight edits when server changes arrive.
//!
//! Grounded on §4.6 of the document-model contract. Deliberately "thin": it
//! does not cache a materialised document across calls — `get_doc` recomputes
//! from `snapshot` + `committed` on every call, so there is a single source
//! of truth and no reversible-apply bookkeeping to maintain. This struct has
//! no knowledge of durable storage; see [`crate::persistent::PersistentDoc`]
//! for the store-backed wrapper.

use serde_json::Value;

use patches_core::json_patch::{apply_patch, ApplyPatchOptions};
use patches_core::json_patch_ot::transform;
use patches_core::{Change, Op, PatchBuilder, PatchesSnapshot};

use crate::error::ClientError;

/// The materialised state plus the revision it reflects and the still-local
/// pending tail, as returned by [`PatchesDoc::get_doc`].
#[derive(Debug, Clone)]
pub struct DocView {
    pub state: Value,
    pub committed_rev: u64,
    pub pending: Vec<Change>,
}

#[derive(Debug, Clone)]
pub struct PatchesDoc {
    snapshot: PatchesSnapshot,
    committed: Vec<Change>,
    pending: Vec<Change>,
    sending: Option<Change>,
    deleted: bool,
    next_change_id: u64,
}

impl PatchesDoc {
    pub fn new(snapshot: PatchesSnapshot) -> Self {
        Self {
            snapshot,
            committed: Vec::new(),
            pending: Vec::new(),
            sending: None,
            deleted: false,
            next_change_id: 1,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn pending(&self) -> &[Change] {
        &self.pending
    }

    pub fn sending(&self) -> Option<&Change> {
        self.sending.as_ref()
    }

    /// Reinsert a previously-persisted pending change without re-running
    /// `change()`'s id/rev assignment. Used when reloading from a store.
    pub fn restore_pending(&mut self, change: Change) {
        self.pending.push(change);
    }

    /// Reinsert a previously-persisted `sending` change. Used when reloading
    /// from a store.
    pub fn restore_sending(&mut self, change: Change) {
        self.sending = Some(change);
    }

    fn committed_head_rev(&self) -> u64 {
        self.committed.last().map(|c| c.rev).unwrap_or(self.snapshot.rev)
    }

    /// Reconstruct `(state, committedRev, pending)`, rebasing `pending` onto
    /// the committed head first if it has fallen behind.
    pub fn get_doc(&mut self, now: i64) -> Result<DocView, ClientError> {
        if self.deleted {
            return Err(ClientError::DocDeleted);
        }
        let committed_rev = self.committed_head_rev();

        if let Some(first) = self.pending.first() {
            if first.base_rev < committed_rev {
                self.rebase_pending(committed_rev, now)?;
            }
        }

        let mut state = self.snapshot.state.clone();
        for change in &self.committed {
            state = apply_patch(state, &change.ops, &ApplyPatchOptions::default())?;
        }

        Ok(DocView { state, committed_rev, pending: self.pending.clone() })
    }

    fn rebase_pending(&mut self, committed_rev: u64, _now: i64) -> Result<(), ClientError> {
        let pending_base = self.pending[0].base_rev;
        let concurrent_ops: Vec<Op> = self
            .committed
            .iter()
            .filter(|c| c.rev > pending_base)
            .flat_map(|c| c.ops.iter().cloned())
            .collect();

        for p in &mut self.pending {
            p.rev += committed_rev - p.base_rev;
            p.ops = transform(&concurrent_ops, &p.ops);
            p.base_rev = committed_rev;
        }
        Ok(())
    }

    /// Run `mutator` against a fresh [`PatchBuilder`] and append the
    /// resulting ops as a new pending change. Returns the new change's id,
    /// or `None` if the mutator produced no ops.
    pub fn change(
        &mut self,
        created_at: i64,
        mutator: impl FnOnce(&mut PatchBuilder),
    ) -> Result<Option<String>, ClientError> {
        if self.deleted {
            return Err(ClientError::DocDeleted);
        }
        let mut builder = PatchBuilder::new();
        mutator(&mut builder);
        if builder.is_empty() {
            return Ok(None);
        }
        let ops = builder.into_ops();

        let base_rev = self.committed_head_rev();
        let next_local_rev = base_rev + self.pending.len() as u64 + 1;
        let id = format!("local-{}", self.next_change_id);
        self.next_change_id += 1;

        let change = Change {
            id: id.clone(),
            ops,
            base_rev,
            rev: next_local_rev,
            created_at,
            // Not yet assigned by the server; overwritten when the matching
            // committed change is applied via `apply_server_changes`.
            committed_at: created_at,
            batch_id: None,
        };
        self.pending.push(change);
        Ok(Some(id))
    }

    /// Apply server-committed changes to `committed`. `changes` must extend
    /// `committed` contiguously from `snapshot.rev + committed.len() + 1`.
    pub fn apply_changes(&mut self, changes: Vec<Change>, now: i64) -> Result<(), ClientError> {
        if changes.is_empty() {
            return Ok(());
        }
        let expected = self.committed_head_rev() + 1;
        let got = changes[0].rev;
        if got != expected {
            return Err(ClientError::MissingChanges { expected, got });
        }
        for w in changes.windows(2) {
            if w[1].rev != w[0].rev + 1 {
                return Err(ClientError::MissingChanges { expected: w[0].rev + 1, got: w[1].rev });
            }
        }

        let incoming_ids: std::collections::HashSet<&str> =
            changes.iter().map(|c| c.id.as_str()).collect();

        self.committed.extend(changes);
        self.pending.retain(|p| !incoming_ids.contains(p.id.as_str()));

        if !self.pending.is_empty() {
            self.rebase_pending(self.committed_head_rev(), now)?;
        }
        Ok(())
    }

    /// Same as [`Self::apply_changes`], but additionally clears `sending`
    /// when the ack's id matches it.
    pub fn apply_server_changes(&mut self, changes: Vec<Change>, now: i64) -> Result<(), ClientError> {
        if let Some(sending) = &self.sending {
            if changes.iter().any(|c| c.id == sending.id) {
                self.sending = None;
            }
        }
        self.apply_changes(changes, now)
    }

    /// Move the leading prefix of `pending` up to and including `change`'s
    /// id into `sending`. Idempotent: callers retransmit the same returned
    /// object on reconnect until the server acks by id.
    pub fn save_sending_change(&mut self, change: Change) {
        if let Some(idx) = self.pending.iter().position(|p| p.id == change.id) {
            self.pending.drain(0..=idx);
        }
        self.sending = Some(change);
    }

    pub fn confirm_sending_change(&mut self) {
        self.sending = None;
    }

    pub fn delete_doc(&mut self) {
        self.deleted = true;
        self.committed.clear();
        self.pending.clear();
        self.sending = None;
    }

    pub fn confirm_delete_doc(&mut self) {
        self.deleted = true;
    }
}
