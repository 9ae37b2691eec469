//! snapdiff core - snapshot diffing over a remote namespace
//!
//! This crate compares two point-in-time snapshots of a storage service's
//! namespace purely through its HTTP API and produces an ordered list of
//! created, deleted and modified paths. It provides:
//! - The `Transport` port through which every remote call is made
//! - Namespace inspection (stat, paged listings, lazy subtree walks)
//! - Paginated access to the server-side directory and file diff endpoints
//! - The recursive snapshot diff engine
//! - Renderers for change lists and snapshot catalogues
//! - The error and logging facilities shared by the other crates

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod namespace;
pub mod path;
pub mod render;
pub mod snapshots;
pub mod transport;

// Re-export commonly used types
pub use diff::{diff_snapshots, SnapshotDiffer};
pub use errors::{DiffError, ExError, ExErrorKind, Result};
pub use model::{ChangeEntry, ChangeKind, EntryType, NamespaceEntry, Snapshot, SnapshotId};
pub use namespace::Namespace;
pub use render::OutputStyle;
pub use snapshots::list_snapshots;
pub use transport::{ApiRequest, CancelToken, Transport};

#[doc(hidden)]
pub use snapdiff_core_types;
#[doc(hidden)]
pub use tracing as __tracing;
