//! URL construction for API requests

use crate::errors::{invalid_host, Result};
use reqwest::Url;
use snapdiff_core::errors::{ExError, ExErrorKind};
use snapdiff_core::ApiRequest;

/// API root below the service host
pub const API_PREFIX: &str = "api/v1";

/// `https://{host}/api/v1`
///
/// # Errors
///
/// `InvalidInput` if `host` is empty, carries a scheme or path, or does not
/// parse as a URL authority.
pub fn base_url(host: &str) -> Result<Url> {
    if host.trim().is_empty() {
        return Err(invalid_host(host, "host is empty"));
    }
    if host.contains('/') {
        return Err(invalid_host(host, "expected host[:port] without scheme or path"));
    }
    Url::parse(&format!("https://{}/{}", host, API_PREFIX))
        .map_err(|e| invalid_host(host, &e.to_string()))
}

/// Resolve `request` against `base`
///
/// Each path segment is percent-encoded. A request path ending in `/`
/// (the namespace root) keeps its trailing slash.
pub fn endpoint_url(base: &Url, request: &ApiRequest) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("endpoint_url")
                .with_message(format!("{} cannot be a base URL", base))
        })?;
        segments.pop_if_empty();
        segments.extend(request.path().split('/'));
    }

    let query = request.query_pairs();
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}
