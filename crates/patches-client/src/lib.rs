//! Client-side reconciliation core for patches: per-document buffers
//! (snapshot, committed tail, pending queue, in-flight sending change) and
//! the rebase rules that keep local edits convergent with the server.
//!
//! Grounded on §4.6–§4.7 of the document-model contract. [`doc::PatchesDoc`]
//! is the pure, storage-agnostic core; [`persistent::PersistentDoc`] wires
//! it to a [`store::LocalStore`] implementation.

pub mod doc;
pub mod error;
pub mod persistent;
pub mod store;

pub use doc::{DocView, PatchesDoc};
pub use error::{ClientError, StoreError};
pub use persistent::PersistentDoc;
pub use store::{LocalStore, StoreTransaction};
