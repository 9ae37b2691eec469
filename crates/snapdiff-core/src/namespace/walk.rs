use crate::errors::{DiffError, ExError, Result};
use crate::model::{NamespaceEntry, SnapshotId};
use crate::namespace::inspector::{ChildPages, Namespace};
use crate::transport::Transport;
use std::collections::{HashSet, VecDeque};

struct Frame<'a, T: ?Sized> {
    pages: ChildPages<'a, T>,
    pending: VecDeque<NamespaceEntry>,
}

/// Pre-order subtree enumeration
///
/// Each directory's listing is fetched only when the walk reaches it, so a
/// consumer that stops early issues no further requests. A directory seen
/// twice ends the walk with `CycleDetected`; any other error ends it with
/// that error.
pub struct SubtreeWalk<'a, T: ?Sized> {
    namespace: Namespace<'a, T>,
    snapshot: SnapshotId,
    stack: Vec<Frame<'a, T>>,
    visited: HashSet<String>,
}

impl<'a, T: Transport + ?Sized> SubtreeWalk<'a, T> {
    pub(crate) fn new(namespace: Namespace<'a, T>, root: &str, snapshot: &SnapshotId) -> Self {
        let frame = Frame {
            pages: namespace.children(root, snapshot),
            pending: VecDeque::new(),
        };
        let mut visited = HashSet::new();
        visited.insert(root.to_string());
        Self {
            namespace,
            snapshot: snapshot.clone(),
            stack: vec![frame],
            visited,
        }
    }

    fn fail(&mut self, err: ExError) -> Option<Result<NamespaceEntry>> {
        self.stack.clear();
        Some(Err(err))
    }
}

impl<T: Transport + ?Sized> Iterator for SubtreeWalk<'_, T> {
    type Item = Result<NamespaceEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;

            if let Some(entry) = frame.pending.pop_front() {
                if entry.is_dir() {
                    if !self.visited.insert(entry.path.clone()) {
                        return self.fail(
                            DiffError::DirectoryRevisited {
                                path: entry.path.clone(),
                            }
                            .into(),
                        );
                    }
                    let pages = self.namespace.children(&entry.path, &self.snapshot);
                    self.stack.push(Frame {
                        pages,
                        pending: VecDeque::new(),
                    });
                }
                return Some(Ok(entry));
            }

            match frame.pages.next() {
                Some(Ok(page)) => frame.pending.extend(page),
                Some(Err(e)) => return self.fail(e),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
