pub mod change;
pub mod entry;
pub mod snapshot;

pub use change::{ChangeEntry, ChangeKind, DirChildChange, DirChildKind, FileExtentChange};
pub use entry::{EntryType, NamespaceEntry};
pub use snapshot::{Snapshot, SnapshotId};
