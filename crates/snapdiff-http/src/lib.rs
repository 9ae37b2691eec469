//! snapdiff http - authenticated transport for the storage service API
//!
//! Provides:
//! - Token login and bearer-authenticated blocking requests (`HttpSession`)
//! - URL construction with percent-encoded namespace paths
//! - Mapping of HTTP failures onto the core error taxonomy

pub mod endpoint;
pub mod errors;
pub mod session;

// Re-export key types
pub use errors::Result;
pub use session::{ConnectionConfig, HttpSession, DEFAULT_TIMEOUT};
