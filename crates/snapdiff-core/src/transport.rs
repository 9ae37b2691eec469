//! The authenticated transport port
//!
//! The engine never talks HTTP directly. It builds [`ApiRequest`]s relative
//! to the service's API root and hands them to a [`Transport`], which owns
//! credentials, TLS, timeouts and status mapping.

use crate::errors::{DiffError, ExError, ExErrorKind, Result};
use crate::model::SnapshotId;
use crate::path;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A GET request against the storage service API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    path: String,
    query: Vec<(&'static str, String)>,
}

impl ApiRequest {
    /// Create a request for an API-relative path such as `snapshots`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// `namespace/{path}`; the root maps to `namespace/`
    pub fn namespace(ns_path: &str) -> Self {
        Self::new(format!("namespace/{}", path::relative(ns_path)))
    }

    /// `snapshots/{source}/diff/{dest}/{path}`
    pub fn snapshot_diff(source: &SnapshotId, dest: &SnapshotId, ns_path: &str) -> Self {
        Self::new(format!(
            "snapshots/{}/diff/{}/{}",
            source,
            dest,
            path::relative(ns_path)
        ))
    }

    /// Append a query parameter
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// API-relative path, `/`-separated, not percent-encoded
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order
    pub fn query_pairs(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// Look up a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Executes authenticated requests against the storage service
///
/// Implementations must map a missing path to `NotFound`, rejected
/// credentials to `Unauthorised` and every other failure to `Transport`
/// or `Timeout`. Success returns the raw response body.
pub trait Transport {
    fn get(&self, request: &ApiRequest) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, request: &ApiRequest) -> Result<Vec<u8>> {
        (**self).get(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, request: &ApiRequest) -> Result<Vec<u8>> {
        (**self).get(request)
    }
}

/// Issue a request and decode its JSON body
pub(crate) fn get_json<T, R>(transport: &T, request: &ApiRequest, op: &str) -> Result<R>
where
    T: Transport + ?Sized,
    R: DeserializeOwned,
{
    let body = transport.get(request).map_err(|e| e.with_op(op))?;
    serde_json::from_slice(&body).map_err(|e| {
        ExError::new(ExErrorKind::Decode)
            .with_op(op)
            .with_path(request.path())
            .with_message(format!("malformed response body: {}", e))
    })
}

/// Shared cancellation flag
///
/// Cloning shares the flag. The engine checks it before every remote call;
/// once set, the current operation unwinds with `Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fail with `Cancelled` if cancellation was requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(DiffError::Cancelled.into());
        }
        Ok(())
    }

    /// The underlying flag, for registration with signal handlers
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.flag.clone()
    }
}
