//! Error taxonomy for the commit pipeline.
//!
//! Grounded on §7 of the document-model contract: validation failures are
//! synchronous and non-retryable, `ClientAhead`/`MissingChanges` are
//! recoverable by reload, and a tombstoned doc raises `DocDeleted`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("InconsistentBaseRev: incoming changes do not share one baseRev")]
    InconsistentBaseRev,
    #[error("ClientAhead: baseRev {base_rev} is beyond head {head_rev}")]
    ClientAhead { base_rev: u64, head_rev: u64 },
    #[error("DocExists: root add/replace on a document that already exists")]
    DocExists,
    #[error("DocDeleted: document {doc_id} is tombstoned")]
    DocDeleted { doc_id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Patch(#[from] patches_core::PatchError),
}
