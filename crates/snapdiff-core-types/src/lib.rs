//! Core types shared across snapdiff facilities
//!
//! This crate provides foundational types used by the error facility,
//! the logging facility and the HTTP transport:
//!
//! - **Correlation**: `RequestId` stamped on every remote call
//! - **Sensitive data**: `Sensitive<T>` for passwords and bearer tokens
//! - **Schema constants**: canonical log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
