use crate::errors::Result;
use crate::model::{EntryType, NamespaceEntry, SnapshotId};
use crate::namespace::walk::SubtreeWalk;
use crate::path;
use crate::transport::{get_json, ApiRequest, CancelToken, Transport};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Listing page size used unless overridden
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// The subset of the stat payload the engine relies on
#[derive(Debug, Deserialize)]
struct StatBody {
    #[serde(rename = "type")]
    entry_type: EntryType,
}

/// One page of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildPage {
    /// Children in name order, with absolute paths
    pub children: Vec<NamespaceEntry>,
    /// Offset of the following page, `None` once a short page was returned
    pub next_offset: Option<u64>,
}

/// Read-only view of the namespace through a transport
pub struct Namespace<'a, T: ?Sized> {
    transport: &'a T,
    cancel: CancelToken,
    page_size: u32,
}

impl<T: ?Sized> Clone for Namespace<'_, T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport,
            cancel: self.cancel.clone(),
            page_size: self.page_size,
        }
    }
}

impl<'a, T: Transport + ?Sized> Namespace<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            cancel: CancelToken::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Abort remote calls once `cancel` is tripped
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Override the listing page size (minimum 1)
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Stat `ns_path` at `snapshot`
    ///
    /// # Errors
    ///
    /// - `NotFound`: the path does not exist in that snapshot
    /// - `Decode`: the body has no usable `type` field
    /// - `Transport`, `Timeout`, `Unauthorised`, `Cancelled`
    pub fn stat(&self, ns_path: &str, snapshot: &SnapshotId) -> Result<NamespaceEntry> {
        self.cancel.check()?;
        let request = ApiRequest::namespace(ns_path)
            .query("metadata", "true")
            .query("sid", snapshot);
        let body: StatBody = get_json(self.transport, &request, "stat")
            .map_err(|e| e.with_path(ns_path).with_snapshot_id(snapshot.as_str()))?;
        Ok(NamespaceEntry::new(ns_path, body.entry_type))
    }

    /// Fetch one page of the children of directory `ns_path`
    ///
    /// The listing is a JSON object keyed by child name; children are
    /// returned in name order. A page shorter than the page size ends the
    /// listing.
    pub fn list_children(
        &self,
        ns_path: &str,
        snapshot: &SnapshotId,
        offset: u64,
    ) -> Result<ChildPage> {
        self.cancel.check()?;
        let request = ApiRequest::namespace(ns_path)
            .query("sid", snapshot)
            .query("offset", offset)
            .query("count", self.page_size);
        let body: BTreeMap<String, StatBody> = get_json(self.transport, &request, "readdir")
            .map_err(|e| e.with_path(ns_path).with_snapshot_id(snapshot.as_str()))?;

        let returned = body.len() as u64;
        let children: Vec<NamespaceEntry> = body
            .into_iter()
            .filter(|(name, _)| name != "." && name != "..")
            .map(|(name, stat)| NamespaceEntry::new(path::join(ns_path, &name), stat.entry_type))
            .collect();

        tracing::debug!(
            path = ns_path,
            sid = snapshot.as_str(),
            page_offset = offset,
            page_len = returned,
            "listed namespace page"
        );

        let next_offset = if returned < u64::from(self.page_size) {
            None
        } else {
            Some(offset + returned)
        };
        Ok(ChildPage {
            children,
            next_offset,
        })
    }

    /// Lazy sequence of listing pages for `ns_path`, starting at offset 0
    pub fn children(&self, ns_path: &str, snapshot: &SnapshotId) -> ChildPages<'a, T> {
        ChildPages {
            namespace: self.clone(),
            path: ns_path.to_string(),
            snapshot: snapshot.clone(),
            offset: Some(0),
        }
    }

    /// Lazy pre-order enumeration of everything below `ns_path`
    ///
    /// The root itself is not yielded.
    pub fn walk(&self, ns_path: &str, snapshot: &SnapshotId) -> SubtreeWalk<'a, T> {
        SubtreeWalk::new(self.clone(), ns_path, snapshot)
    }
}

/// Iterator over the listing pages of one directory
///
/// Stops after the first error. Calling [`Namespace::children`] again
/// restarts from the first page.
pub struct ChildPages<'a, T: ?Sized> {
    namespace: Namespace<'a, T>,
    path: String,
    snapshot: SnapshotId,
    offset: Option<u64>,
}

impl<T: Transport + ?Sized> Iterator for ChildPages<'_, T> {
    type Item = Result<Vec<NamespaceEntry>>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offset.take()?;
        match self
            .namespace
            .list_children(&self.path, &self.snapshot, offset)
        {
            Ok(page) => {
                self.offset = page.next_offset;
                if page.children.is_empty() && page.next_offset.is_none() {
                    return None;
                }
                Some(Ok(page.children))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
