//! Error taxonomy for the client reconciliation core.
//!
//! Grounded on the conflict/recoverable and fatal categories laid out for
//! the client path: `MissingChanges` signals a transport-level resync;
//! a local apply failure is fatal for the doc.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("MissingChanges: expected next rev {expected}, got {got}")]
    MissingChanges { expected: u64, got: u64 },
    #[error("local apply of a server change failed, local state is no longer trustworthy: {0}")]
    LocalApplyFailed(#[from] patches_core::PatchError),
    #[error("document is deleted")]
    DocDeleted,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("local store backend error: {0}")]
    Backend(String),
}
