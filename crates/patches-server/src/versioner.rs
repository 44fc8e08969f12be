//! Session/offline versioner: groups a freshly-committed run of changes into
//! `VersionRecord`s by scanning `createdAt` gaps.
//!
//! Grounded on §4.5 of the document-model contract. A session is a maximal
//! run of changes whose adjacent `createdAt` gap is `<= session_timeout_millis`.
//! All records from one `commit_changes` call share a `group_id`; the first
//! continues the prior version's chain only if the gap since the previous
//! committed change is itself within the timeout.

use patches_core::{Change, VersionOrigin, VersionRecord};

/// Build the `VersionRecord`s for one batch of newly-committed, already
/// revision-assigned `changes`.
///
/// `prior_committed_at`/`prior_version_id` describe the last change/version
/// committed to this doc *before* this batch, if any — used to decide
/// whether the first session here continues that version's chain.
pub fn build_version_records(
    changes: &[Change],
    session_timeout_millis: i64,
    prior_committed_at: Option<i64>,
    prior_version_id: Option<String>,
    origin: VersionOrigin,
    is_offline: bool,
    group_id: String,
    mut next_id: impl FnMut() -> String,
) -> Vec<VersionRecord> {
    if changes.is_empty() {
        return Vec::new();
    }

    let mut records = Vec::new();
    let mut session_start = 0usize;
    let mut parent_id = match prior_committed_at {
        Some(prev) if changes[0].created_at - prev <= session_timeout_millis => prior_version_id,
        _ => None,
    };

    for i in 1..=changes.len() {
        let is_last = i == changes.len();
        let gap_exceeded = !is_last
            && (changes[i].created_at - changes[i - 1].created_at) > session_timeout_millis;

        if gap_exceeded || is_last {
            let session = &changes[session_start..i];
            let id = next_id();
            records.push(VersionRecord {
                id: id.clone(),
                origin,
                group_id: Some(group_id.clone()),
                parent_id: parent_id.clone(),
                start_rev: session.first().unwrap().rev,
                end_rev: session.last().unwrap().rev,
                started_at: session.first().unwrap().created_at,
                ended_at: session.last().unwrap().created_at,
                is_offline,
            });
            parent_id = Some(id);
            session_start = i;
        }
    }

    records
}
