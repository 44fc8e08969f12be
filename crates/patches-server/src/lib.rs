//! Server-side commit pipeline for patches: a single-writer-per-document
//! transform-and-persist loop plus the session/offline versioner that
//! annotates the committed history.
//!
//! Grounded on §4.4–§4.5 of the document-model contract. The pipeline is
//! storage-agnostic: callers implement [`ChangeStore`] and [`EventSink`]
//! against whatever durable backend they have.

pub mod commit;
pub mod error;
pub mod events;
pub mod locks;
pub mod store;
pub mod versioner;

pub use commit::{commit_changes, delete_doc, undelete_doc, CommitOptions};
pub use error::{CommitError, StoreError};
pub use events::{EventSink, NullEventSink};
pub use locks::DocLocks;
pub use store::{ChangeStore, ListChangesQuery};
pub use versioner::build_version_records;
