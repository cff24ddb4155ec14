//! Structured logging facility for ctxlog
//!
//! This module provides:
//! - Single initialization point for the tracing subscriber via `init(profile)`
//! - printf-style macros over the default logger (`infof!`, `errorf!`, ...) and `kv!`
//! - Test capture mode for deterministic assertions on emitted events
//!
//! # Usage
//!
//! ```rust
//! use ctxlog_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
