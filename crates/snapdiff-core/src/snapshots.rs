//! Snapshot catalogue queries

use crate::errors::Result;
use crate::model::Snapshot;
use crate::transport::{get_json, ApiRequest, Transport};

/// List every snapshot known to the service (`GET /snapshots`)
///
/// # Errors
///
/// `Decode` if the body is not an array of snapshot records, plus any
/// transport failure.
pub fn list_snapshots<T: Transport + ?Sized>(transport: &T) -> Result<Vec<Snapshot>> {
    let snapshots: Vec<Snapshot> =
        get_json(transport, &ApiRequest::new("snapshots"), "list_snapshots")?;
    tracing::debug!(entry_count = snapshots.len(), "listed snapshots");
    Ok(snapshots)
}
