//! Real-time collaborative-document engine: a structured-JSON patch format
//! with operational transformation, a server commit pipeline, and a client
//! reconciliation core.
//!
//! This crate is a thin facade over [`patches_core`], [`patches_server`],
//! and [`patches_client`] for callers that want the whole stack behind one
//! dependency.

pub use patches_client as client;
pub use patches_core as core;
pub use patches_server as server;

pub use patches_core::{
    break_change, break_into_batches, path, Change, ChangeInput, Op, PatchBuilder, PatchError,
    PatchesSnapshot, Tombstone, VersionOrigin, VersionRecord,
};
pub use patches_server::{commit_changes, delete_doc, undelete_doc, ChangeStore, CommitError, CommitOptions};
pub use patches_client::{ClientError, LocalStore, PatchesDoc, PersistentDoc};
