//! Canonical schema constants for structured logging
//!
//! The `log_op_*` macros stamp these event names, and the test capture
//! layer reads events back by these field keys.

// Canonical field keys for structured logging
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
