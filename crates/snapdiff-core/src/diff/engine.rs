//! Snapshot diff computation engine.
//!
//! The entry point is [`diff_snapshots`] (or [`SnapshotDiffer::diff`] when
//! page size or cancellation need configuring). It walks the namespace
//! below a root path, asking the server which children changed, and turns
//! the answer into an ordered list of [`ChangeEntry`] rows.
//!
//! Classification per child reported by the directory diff:
//!
//! - `DELETE`: the child and, for a directory, its whole subtree at the
//!   source snapshot are emitted as DELETE.
//! - `CREATE`: the same, against the destination snapshot.
//! - anything else: both sides are re-stat'ed. Equal types emit the
//!   server's `MODIFY` tag (if it gave one) and recurse into directories.
//!   Different types are emitted as a full DELETE block followed by a
//!   full CREATE block.
//!
//! A root that is a file is compared through the file diff endpoint and
//! yields at most one MODIFY row.

use crate::diff::fetch::DiffFetcher;
use crate::errors::{DiffError, Result};
use crate::model::{ChangeEntry, ChangeKind, DirChildKind, NamespaceEntry, SnapshotId};
use crate::namespace::Namespace;
use crate::path;
use crate::transport::{CancelToken, Transport};
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::HashSet;
use std::time::Instant;

/// Compare `root` between two snapshots with default settings.
///
/// # Errors
///
/// - `TypeMismatch`: `root` is a file in one snapshot and a directory in the other
/// - `NotFound`: `root` is absent, or an entry vanished mid-diff
/// - `InvalidPath`, `CycleDetected`, `Decode`
/// - `Transport`, `Timeout`, `Unauthorised` from the transport
pub fn diff_snapshots<T: Transport + ?Sized>(
    transport: &T,
    source: &SnapshotId,
    dest: &SnapshotId,
    root: &str,
) -> Result<Vec<ChangeEntry>> {
    SnapshotDiffer::new(transport).diff(source, dest, root)
}

/// Configurable diff engine bound to one transport
pub struct SnapshotDiffer<'a, T: ?Sized> {
    namespace: Namespace<'a, T>,
    fetcher: DiffFetcher<'a, T>,
}

impl<'a, T: Transport + ?Sized> SnapshotDiffer<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self {
            namespace: Namespace::new(transport),
            fetcher: DiffFetcher::new(transport),
        }
    }

    /// Check `cancel` before every remote call
    pub fn with_cancel(self, cancel: CancelToken) -> Self {
        Self {
            namespace: self.namespace.with_cancel(cancel.clone()),
            fetcher: self.fetcher.with_cancel(cancel),
        }
    }

    /// Page size for directory listings and directory diffs
    pub fn with_page_size(self, page_size: u32) -> Self {
        Self {
            namespace: self.namespace.with_page_size(page_size),
            fetcher: self.fetcher.with_page_size(page_size),
        }
    }

    /// Compute the ordered change list for `root`.
    ///
    /// Either the complete list is returned or an error; entries gathered
    /// before a failure are discarded.
    pub fn diff(
        &self,
        source: &SnapshotId,
        dest: &SnapshotId,
        root: &str,
    ) -> Result<Vec<ChangeEntry>> {
        let root = path::normalize(root);
        let started = Instant::now();
        log_op_start!(
            "snapshot_diff",
            source_id = source.as_str(),
            dest_id = dest.as_str(),
            path = root.as_str()
        );

        let mut run = DiffRun {
            namespace: &self.namespace,
            fetcher: &self.fetcher,
            source,
            dest,
            visited: HashSet::new(),
            out: Vec::new(),
        };

        let duration_ms = || started.elapsed().as_millis() as u64;
        match run.diff_path(&root, true) {
            Ok(()) => {
                log_op_end!(
                    "snapshot_diff",
                    duration_ms = duration_ms(),
                    entry_count = run.out.len()
                );
                Ok(run.out)
            }
            Err(e) => {
                log_op_error!(
                    "snapshot_diff",
                    e.clone(),
                    duration_ms = duration_ms(),
                    path = root.as_str()
                );
                Err(e)
            }
        }
    }
}

/// State of one `diff` invocation
struct DiffRun<'r, 'a, T: ?Sized> {
    namespace: &'r Namespace<'a, T>,
    fetcher: &'r DiffFetcher<'a, T>,
    source: &'r SnapshotId,
    dest: &'r SnapshotId,
    visited: HashSet<String>,
    out: Vec<ChangeEntry>,
}

impl<T: Transport + ?Sized> DiffRun<'_, '_, T> {
    fn diff_path(&mut self, ns_path: &str, check_type: bool) -> Result<()> {
        let dest_entry = self.namespace.stat(ns_path, self.dest)?;

        if check_type {
            let source_entry = self.namespace.stat(ns_path, self.source)?;
            if source_entry.entry_type != dest_entry.entry_type {
                return Err(DiffError::RootTypeMismatch {
                    path: ns_path.to_string(),
                    source_type: source_entry.entry_type.to_string(),
                    dest_type: dest_entry.entry_type.to_string(),
                }
                .into());
            }
        }

        if !dest_entry.is_dir() {
            let extents = self.fetcher.diff_file(self.source, self.dest, ns_path)?;
            if !extents.is_empty() {
                self.out.push(ChangeEntry::modify(dest_entry.display_path()));
            }
            return Ok(());
        }

        if !self.visited.insert(ns_path.to_string()) {
            return Err(DiffError::DirectoryRevisited {
                path: ns_path.to_string(),
            }
            .into());
        }

        let children = self.fetcher.diff_directory(self.source, self.dest, ns_path)?;
        for child in children {
            let child_path = path::join(ns_path, &child.name);
            match child.kind {
                DirChildKind::Delete => {
                    let entry = self.namespace.stat(&child_path, self.source)?;
                    self.expand(entry, ChangeKind::Delete)?;
                }
                DirChildKind::Create => {
                    let entry = self.namespace.stat(&child_path, self.dest)?;
                    self.expand(entry, ChangeKind::Create)?;
                }
                kind => {
                    let old = self.namespace.stat(&child_path, self.source)?;
                    let new = self.namespace.stat(&child_path, self.dest)?;
                    if old.entry_type == new.entry_type {
                        if let Some(reported) = kind.reported_change() {
                            self.out.push(ChangeEntry::new(new.display_path(), reported));
                        }
                        if new.is_dir() {
                            self.diff_path(&child_path, false)?;
                        }
                    } else {
                        self.expand(old, ChangeKind::Delete)?;
                        self.expand(new, ChangeKind::Create)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Emit `entry` and, for a directory, every descendant with `kind`
    fn expand(&mut self, entry: NamespaceEntry, kind: ChangeKind) -> Result<()> {
        let snapshot = match kind {
            ChangeKind::Delete => self.source,
            _ => self.dest,
        };
        self.out.push(ChangeEntry::new(entry.display_path(), kind));
        if entry.is_dir() {
            for descendant in self.namespace.walk(&entry.path, snapshot) {
                self.out
                    .push(ChangeEntry::new(descendant?.display_path(), kind));
            }
        }
        Ok(())
    }
}
