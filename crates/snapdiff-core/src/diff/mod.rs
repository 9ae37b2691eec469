//! Snapshot diff engine.
//!
//! Compares a namespace subtree between two snapshots of the remote
//! storage service and produces an ordered, rsync-style change list.
//!
//! ## Entry point
//!
//! ```ignore
//! use snapdiff_core::diff::diff_snapshots;
//!
//! let changes = diff_snapshots(&session, &source, &dest, "/data")?;
//! ```
//!
//! ## Guarantees
//!
//! - **Ordering**: a directory's own row precedes the rows of its
//!   descendants; siblings follow server order for diffs and name order
//!   for subtree expansion.
//! - **All or nothing**: any failure aborts the whole diff.
//! - **Type changes**: a path whose type changed below the root is reported
//!   as a DELETE block followed by a CREATE block, never as MODIFY.

pub mod engine;
pub mod fetch;

pub use engine::{diff_snapshots, SnapshotDiffer};
pub use fetch::{DiffFetcher, DiffPages, DiffScope};
