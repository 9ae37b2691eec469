//! Paginated access to the server-side snapshot diff endpoints.
//!
//! Both endpoints page with an `offset` cursor and answer with
//! `{"content": [...], "next": n}`; a missing, null or zero `next` ends
//! the listing. [`DiffPages`] exposes the pages lazily, and the `diff_*`
//! functions gather every page before returning so that a directory is
//! never compared against a partial listing.

use crate::errors::{DiffError, Result};
use crate::model::{DirChildChange, FileExtentChange, SnapshotId};
use crate::namespace::DEFAULT_PAGE_SIZE;
use crate::path;
use crate::transport::{get_json, ApiRequest, CancelToken, Transport};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::marker::PhantomData;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "E: Deserialize<'de>"))]
struct DiffPageBody<E> {
    // Empty pages may arrive as `null` rather than `[]`
    #[serde(default)]
    content: Option<Vec<E>>,
    #[serde(default)]
    next: Option<u64>,
}

/// Which diff endpoint variant to query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffScope {
    /// Child names with CREATE/DELETE/other tags
    Directory,
    /// Changed byte extents of one file
    File,
}

impl DiffScope {
    fn as_str(self) -> &'static str {
        match self {
            DiffScope::Directory => "directory",
            DiffScope::File => "file",
        }
    }

    fn op(self) -> &'static str {
        match self {
            DiffScope::Directory => "diff_directory",
            DiffScope::File => "diff_file",
        }
    }
}

/// Lazy page sequence over one diff endpoint call
///
/// Yields one `Vec<E>` per page and stops after the last page or the first
/// error. The sequence is not resumable after an error; start a new one.
pub struct DiffPages<'a, T: ?Sized, E> {
    transport: &'a T,
    cancel: CancelToken,
    source: SnapshotId,
    dest: SnapshotId,
    path: String,
    scope: DiffScope,
    page_size: u32,
    cursor: Option<u64>,
    _item: PhantomData<E>,
}

impl<T: Transport + ?Sized, E: DeserializeOwned> DiffPages<'_, T, E> {
    fn fetch(&mut self, offset: u64) -> Result<Vec<E>> {
        self.cancel.check()?;
        let mut request = ApiRequest::snapshot_diff(&self.source, &self.dest, &self.path)
            .query("type", self.scope.as_str())
            .query("offset", offset);
        if self.scope == DiffScope::Directory {
            request = request.query("count", self.page_size);
        }

        let body: DiffPageBody<E> = get_json(self.transport, &request, self.scope.op())
            .map_err(|e| e.with_path(self.path.as_str()))?;
        let content = body.content.unwrap_or_default();
        let next = body.next.unwrap_or_default();

        tracing::debug!(
            path = self.path.as_str(),
            scope = self.scope.as_str(),
            page_offset = offset,
            page_len = content.len(),
            next,
            "fetched snapshot diff page"
        );

        self.cursor = match next {
            0 => None,
            next if next <= offset => {
                return Err(DiffError::CursorStalled {
                    path: self.path.clone(),
                    cursor: next,
                }
                .into())
            }
            next => Some(next),
        };
        Ok(content)
    }
}

impl<T: Transport + ?Sized, E: DeserializeOwned> Iterator for DiffPages<'_, T, E> {
    type Item = Result<Vec<E>>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.cursor.take()?;
        Some(self.fetch(offset))
    }
}

/// Client for the snapshot diff endpoints
pub struct DiffFetcher<'a, T: ?Sized> {
    transport: &'a T,
    cancel: CancelToken,
    page_size: u32,
}

impl<'a, T: Transport + ?Sized> DiffFetcher<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            cancel: CancelToken::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Override the `count` sent with directory diff pages (minimum 1)
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Lazy pages of the directory diff for `dir`
    pub fn directory_pages(
        &self,
        source: &SnapshotId,
        dest: &SnapshotId,
        dir: &str,
    ) -> DiffPages<'a, T, DirChildChange> {
        self.pages(source, dest, dir, DiffScope::Directory)
    }

    /// Lazy pages of the file diff for `file`
    ///
    /// # Errors
    ///
    /// `InvalidPath` if `file` is the namespace root.
    pub fn file_pages(
        &self,
        source: &SnapshotId,
        dest: &SnapshotId,
        file: &str,
    ) -> Result<DiffPages<'a, T, FileExtentChange>> {
        if path::is_root(file) {
            return Err(DiffError::RootAsFile {
                path: file.to_string(),
            }
            .into());
        }
        Ok(self.pages(source, dest, file, DiffScope::File))
    }

    /// Every child change of `dir`, in server order
    ///
    /// Fails as a whole if any page fails; results from earlier pages are
    /// dropped.
    pub fn diff_directory(
        &self,
        source: &SnapshotId,
        dest: &SnapshotId,
        dir: &str,
    ) -> Result<Vec<DirChildChange>> {
        collect_pages(self.directory_pages(source, dest, dir))
    }

    /// Every changed extent of `file`; empty means unmodified
    pub fn diff_file(
        &self,
        source: &SnapshotId,
        dest: &SnapshotId,
        file: &str,
    ) -> Result<Vec<FileExtentChange>> {
        collect_pages(self.file_pages(source, dest, file)?)
    }

    fn pages<E>(
        &self,
        source: &SnapshotId,
        dest: &SnapshotId,
        ns_path: &str,
        scope: DiffScope,
    ) -> DiffPages<'a, T, E> {
        DiffPages {
            transport: self.transport,
            cancel: self.cancel.clone(),
            source: source.clone(),
            dest: dest.clone(),
            path: ns_path.to_string(),
            scope,
            page_size: self.page_size,
            cursor: Some(0),
            _item: PhantomData,
        }
    }
}

fn collect_pages<I, E>(pages: I) -> Result<Vec<E>>
where
    I: Iterator<Item = Result<Vec<E>>>,
{
    let mut all = Vec::new();
    for page in pages {
        all.extend(page?);
    }
    Ok(all)
}
