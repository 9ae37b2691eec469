use serde::{Deserialize, Serialize};
use std::fmt;

/// How an entry differs between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Create,
    Delete,
    Modify,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Create => "CREATE",
            ChangeKind::Delete => "DELETE",
            ChangeKind::Modify => "MODIFY",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a diff result
///
/// Serializes as `{"name": .., "type": ..}`, the shape the change list has
/// always had on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Absolute path; directories carry a trailing slash
    #[serde(rename = "name")]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
}

impl ChangeEntry {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn create(path: impl Into<String>) -> Self {
        Self::new(path, ChangeKind::Create)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(path, ChangeKind::Delete)
    }

    pub fn modify(path: impl Into<String>) -> Self {
        Self::new(path, ChangeKind::Modify)
    }
}

/// Server classification of a child in a directory diff
///
/// `CREATE` and `DELETE` are authoritative. Any other tag means the name
/// exists on both sides and must be compared further; `MODIFY` is kept
/// apart because it is the only such tag that becomes a change entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DirChildKind {
    Create,
    Delete,
    Modify,
    Unclassified(String),
}

impl From<String> for DirChildKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CREATE" => DirChildKind::Create,
            "DELETE" => DirChildKind::Delete,
            "MODIFY" => DirChildKind::Modify,
            _ => DirChildKind::Unclassified(s),
        }
    }
}

impl DirChildKind {
    /// The change kind to emit for a child present in both snapshots
    pub fn reported_change(&self) -> Option<ChangeKind> {
        match self {
            DirChildKind::Create => Some(ChangeKind::Create),
            DirChildKind::Delete => Some(ChangeKind::Delete),
            DirChildKind::Modify => Some(ChangeKind::Modify),
            DirChildKind::Unclassified(_) => None,
        }
    }
}

/// One child record returned by the directory diff endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirChildChange {
    /// Child name relative to the diffed directory
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DirChildKind,
}

/// A byte range that differs between two versions of a file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileExtentChange {
    pub offset: u64,
    pub length: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
}
