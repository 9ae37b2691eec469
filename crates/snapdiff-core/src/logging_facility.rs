//! Structured logging facility for snapdiff
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Subscriber output always goes to stderr; stdout is reserved for the
//! rendered change list.
//!
//! # Usage
//!
//! ```rust
//! use snapdiff_core::logging_facility::{init, Profile};
//!
//! init(Profile::Terminal);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
