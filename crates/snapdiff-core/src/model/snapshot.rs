use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque snapshot identifier as understood by the storage service
///
/// The service hands out integer ids, but the diff engine only ever
/// forwards them into URLs, so they are carried as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for SnapshotId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SnapshotId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A server-managed, immutable point-in-time view of the namespace
///
/// Read-only for this tool: snapshots are listed, never created or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Numeric snapshot id
    pub sid: u64,
    /// Policy that produced the snapshot
    #[serde(default)]
    pub policy: String,
    /// Lifecycle state reported by the service
    #[serde(default)]
    pub state: String,
    /// Creation time (seconds since the epoch)
    #[serde(default)]
    pub stime: i64,
    /// Id of the process that took the snapshot
    #[serde(default)]
    pub spid: i64,
}

impl Snapshot {
    /// The id to pass to diff and namespace calls
    pub fn id(&self) -> SnapshotId {
        SnapshotId::from(self.sid)
    }
}
