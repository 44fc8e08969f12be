//! Server commit pipeline: validate a client batch, rebase onto head,
//! transform against concurrent history, assign revisions, persist, and
//! emit a notification.
//!
//! Grounded on §4.4 of the document-model contract; the ten numbered steps
//! there map directly onto this function's structure.

use patches_core::json_patch::{apply_patch, get_at, ApplyPatchOptions};
use patches_core::json_patch_ot;
use patches_core::{Change, ChangeInput, VersionOrigin};

use crate::error::CommitError;
use crate::events::EventSink;
use crate::locks::DocLocks;
use crate::store::{ChangeStore, ListChangesQuery};
use crate::versioner::build_version_records;

#[derive(Debug, Clone)]
pub struct CommitOptions {
    pub session_timeout_millis: i64,
    /// Keep changes whose ops transform to empty instead of dropping them
    /// (used when replaying historical data where revision continuity
    /// matters more than a no-op change being skipped).
    pub force_commit: bool,
    /// Preserve `committedAt` from the input rather than stamping `now`.
    pub historical_import: bool,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self { session_timeout_millis: 30 * 60 * 1000, force_commit: false, historical_import: false }
    }
}

/// Commit a batch of client-submitted changes. Returns
/// `(priorCommitted, newlyCommitted)`: changes already present by `id`, and
/// the freshly transformed+persisted changes from this call.
pub async fn commit_changes(
    store: &dyn ChangeStore,
    locks: &DocLocks,
    events: &dyn EventSink,
    doc_id: &str,
    incoming: Vec<ChangeInput>,
    options: CommitOptions,
    origin_client_id: Option<&str>,
    now: i64,
) -> Result<(Vec<Change>, Vec<Change>), CommitError> {
    if incoming.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    if let Some(_tombstone) = store.get_tombstone(doc_id).await? {
        tracing::warn!(doc_id, "rejecting commit against a tombstoned document");
        return Err(CommitError::DocDeleted { doc_id: doc_id.to_string() });
    }

    let _guard = locks.acquire(doc_id).await;

    let head_rev = store.head_rev(doc_id).await?;

    // Step 2: baseRev normalisation — fill omitted baseRev with head, then
    // require all inputs share one.
    let filled: Vec<ChangeInput> = incoming
        .into_iter()
        .map(|mut c| {
            if c.base_rev.is_none() {
                c.base_rev = Some(head_rev);
            }
            c
        })
        .collect();
    let base_rev = filled[0].base_rev.unwrap();
    if filled.iter().any(|c| c.base_rev != Some(base_rev)) {
        return Err(CommitError::InconsistentBaseRev);
    }

    // Step 3: sanity + rebase-to-head for a never-synced client.
    if base_rev > head_rev {
        return Err(CommitError::ClientAhead { base_rev, head_rev });
    }

    let mut working = filled;
    let mut effective_base_rev = base_rev;

    if base_rev == 0 && head_rev > 0 {
        let root_add_or_replace = working.iter().any(|c| {
            c.ops.iter().any(|op| {
                op.path().is_empty()
                    && matches!(op, patches_core::Op::Add { .. } | patches_core::Op::Replace { .. })
            })
        });
        let is_explicit_initial_batch =
            options.historical_import && working.iter().any(|c| c.batch_id.is_some());

        if root_add_or_replace && !is_explicit_initial_batch {
            return Err(CommitError::DocExists);
        }

        let state_at_head = store.state_at(doc_id, head_rev).await?;
        for change in &mut working {
            change.ops.retain(|op| {
                if op.is_soft() && get_at(&state_at_head, op.path()).is_some() {
                    return false;
                }
                if let patches_core::Op::Add { path, value, .. } = op {
                    let is_empty_container = matches!(value, serde_json::Value::Object(m) if m.is_empty())
                        || matches!(value, serde_json::Value::Array(a) if a.is_empty());
                    if is_empty_container && get_at(&state_at_head, path).is_some() {
                        return false;
                    }
                }
                true
            });
        }
        working.retain(|c| !c.ops.is_empty());
        effective_base_rev = head_rev;

        if working.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
    }

    // Step 4: idempotency — split already-committed ids from new ones.
    let batch_ids: Vec<&str> = working.iter().filter_map(|c| c.batch_id.as_deref()).collect();
    let concurrent = store
        .list_changes(
            doc_id,
            ListChangesQuery { start_after: Some(effective_base_rev), ..Default::default() },
        )
        .await?;
    let concurrent: Vec<Change> = concurrent
        .into_iter()
        .filter(|c| c.batch_id.as_deref().map(|b| !batch_ids.contains(&b)).unwrap_or(true))
        .collect();

    let already_committed_ids: std::collections::HashSet<&str> =
        concurrent.iter().map(|c| c.id.as_str()).collect();
    let (prior_inputs, new_inputs): (Vec<ChangeInput>, Vec<ChangeInput>) =
        working.into_iter().partition(|c| already_committed_ids.contains(c.id.as_str()));

    let prior_committed: Vec<Change> = concurrent
        .iter()
        .filter(|c| prior_inputs.iter().any(|p| p.id == c.id))
        .cloned()
        .collect();

    if new_inputs.is_empty() {
        return Ok((prior_committed, Vec::new()));
    }

    // Step 5: offline / session classification.
    let has_batch_id = new_inputs.iter().any(|c| c.batch_id.is_some());
    let first_created_at = new_inputs.iter().map(|c| c.created_at).min().unwrap_or(now);
    let is_offline = has_batch_id || (now - first_created_at > options.session_timeout_millis);
    let has_concurrent_committed = !concurrent.is_empty();
    let origin = if is_offline && has_concurrent_committed {
        VersionOrigin::OfflineBranch
    } else {
        VersionOrigin::Main
    };

    // Step 6: transform new changes against concurrent committed history.
    let concurrent_ops: Vec<patches_core::Op> =
        concurrent.iter().flat_map(|c| c.ops.iter().cloned()).collect();

    let mut transformed: Vec<Change> = Vec::new();
    let mut next_rev = head_rev + 1;
    for input in new_inputs {
        let transformed_ops = json_patch_ot::transform(&concurrent_ops, &input.ops);
        if transformed_ops.is_empty() && !options.force_commit {
            continue;
        }
        let committed_at = if options.historical_import { input.created_at } else { now };
        let mut change = input.into_change(next_rev, effective_base_rev, committed_at);
        change.ops = transformed_ops;
        // Step 9: timestamp clamping.
        change.created_at = change.created_at.min(change.committed_at);
        transformed.push(change);
        next_rev += 1;
    }

    if transformed.is_empty() {
        return Ok((prior_committed, Vec::new()));
    }

    // Verify every op still applies cleanly; if not, the whole commit fails
    // atomically (nothing persisted). Transformed ops are meant to run after
    // every concurrently-committed change, so replay starts at head, not at
    // the batch's baseRev.
    let mut state = store.state_at(doc_id, head_rev).await?;
    for change in &transformed {
        state = apply_patch(state, &change.ops, &ApplyPatchOptions::default())?;
    }

    // Step 7: session/offline versioning.
    let prior_change = concurrent.last();
    let prior_version = store.latest_version_record(doc_id).await?;
    let group_id = uuid::Uuid::new_v4().to_string();
    let mut id_counter = 0u64;
    let records = build_version_records(
        &transformed,
        options.session_timeout_millis,
        prior_change.map(|c| c.created_at),
        prior_version.map(|v| v.id),
        origin,
        is_offline,
        group_id,
        || {
            id_counter += 1;
            uuid::Uuid::new_v4().to_string()
        },
    );

    // Step 8: persist.
    store.save_changes(doc_id, transformed.clone()).await?;
    store.save_version_records(doc_id, records).await?;

    tracing::debug!(doc_id, from_rev = head_rev + 1, to_rev = next_rev - 1, "committed changes");

    // Step 10: emit.
    events.on_changes_committed(doc_id, &transformed, origin_client_id).await;

    Ok((prior_committed, transformed))
}

/// Mark `doc_id` deleted: writes a tombstone if the store supports it,
/// emits `onDocDeleted`.
pub async fn delete_doc(
    store: &dyn ChangeStore,
    events: &dyn EventSink,
    doc_id: &str,
    deleted_by_client_id: Option<String>,
    now: i64,
    origin_client_id: Option<&str>,
) -> Result<(), CommitError> {
    let last_rev = store.head_rev(doc_id).await?;
    store
        .create_tombstone(patches_core::Tombstone {
            doc_id: doc_id.to_string(),
            deleted_at: now,
            last_rev,
            deleted_by_client_id,
        })
        .await?;
    events.on_doc_deleted(doc_id, origin_client_id).await;
    Ok(())
}

/// Remove the tombstone for `doc_id`, if present. Returns whether one was
/// removed.
pub async fn undelete_doc(store: &dyn ChangeStore, doc_id: &str) -> Result<bool, CommitError> {
    let existed = store.get_tombstone(doc_id).await?.is_some();
    if existed {
        store.remove_tombstone(doc_id).await?;
    }
    Ok(existed)
}
