//! Error handling for snapdiff-http
//!
//! Wraps snapdiff-core ExError with transport-specific helpers

use snapdiff_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an error for a request that never produced a response
///
/// Client-side timeouts map to `Timeout`, everything else to `Transport`.
pub fn transport_error(operation: &str, err: &reqwest::Error) -> ExError {
    let kind = if err.is_timeout() {
        ExErrorKind::Timeout
    } else {
        ExErrorKind::Transport
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an error for a non-success HTTP status
pub fn status_error(operation: &str, status: u16, url_path: &str) -> ExError {
    let kind = match status {
        401 | 403 => ExErrorKind::Unauthorised,
        404 => ExErrorKind::NotFound,
        _ => ExErrorKind::Transport,
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_status(status)
        .with_message(format!("{} returned status {}", url_path, status))
}

/// Create a login failure error
pub fn auth_error(reason: &str) -> ExError {
    ExError::new(ExErrorKind::Unauthorised)
        .with_op("auth_token")
        .with_message(reason.to_string())
}

/// Create an error for a host that does not form a valid URL
pub fn invalid_host(host: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("connect")
        .with_message(format!("invalid host {:?}: {}", host, reason))
}
