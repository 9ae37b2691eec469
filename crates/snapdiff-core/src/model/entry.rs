use serde::{Deserialize, Serialize};
use std::fmt;

const TYPE_FILE: &str = "file";
const TYPE_DIRECTORY: &str = "directory";

/// Type of a namespace entry as reported by the `type` field of a stat
///
/// Anything other than `file` or `directory` (links, devices, ...) is kept
/// verbatim so that type comparisons between snapshots stay exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    File,
    Directory,
    Other(String),
}

impl EntryType {
    /// True for directories
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryType::Directory)
    }

    /// The wire name of this type
    pub fn as_str(&self) -> &str {
        match self {
            EntryType::File => TYPE_FILE,
            EntryType::Directory => TYPE_DIRECTORY,
            EntryType::Other(s) => s,
        }
    }
}

impl From<String> for EntryType {
    fn from(s: String) -> Self {
        match s.as_str() {
            TYPE_FILE => EntryType::File,
            TYPE_DIRECTORY => EntryType::Directory,
            _ => EntryType::Other(s),
        }
    }
}

impl From<EntryType> for String {
    fn from(t: EntryType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path in one snapshot together with its type
///
/// Produced by stat and directory listings; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceEntry {
    /// Absolute, slash-separated path without trailing slash
    pub path: String,
    pub entry_type: EntryType,
}

impl NamespaceEntry {
    pub fn new(path: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            path: path.into(),
            entry_type,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type.is_dir()
    }

    /// Path as it appears in change lists: directories get a trailing slash
    pub fn display_path(&self) -> String {
        crate::path::display_path(&self.path, self.is_dir())
    }
}
