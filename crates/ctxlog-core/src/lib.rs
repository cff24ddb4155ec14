//! ctxlog Core - context-decorated logging with secret-aware serialization
//!
//! This crate provides:
//! - A field cache that memoizes the correlation fields of each request context
//! - A leveled logger gating every severity before any field work happens
//! - A process-wide default logger with a free-function and macro facade
//! - A JSON serializer that writes secrets through their masked form
//!
//! # Example
//!
//! ```
//! use ctxlog_core::sink::MemorySink;
//! use ctxlog_core::{kv, Level, Logger, RequestContext};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = Logger::new(Level::Info, sink.clone());
//! let ctx = RequestContext::from_trace_id("trace-1").with_user_id(42);
//!
//! logger.infof(&ctx, format_args!("{} items", 3));
//! logger.infow(&ctx, "checkout", &kv!["order", 17]);
//!
//! let records = sink.records();
//! assert_eq!(records[0].message, "3 items");
//! assert_eq!(records[1].fields.get("order"), Some(&serde_json::json!(17)));
//! ```

pub mod condition;
pub mod config;
pub mod errors;
pub mod facade;
pub mod field_cache;
pub mod json;
pub mod level;
pub mod logger;
pub mod logging_facility;
pub mod probe;
pub mod sink;

// Re-export commonly used types
pub use config::LoggerConfig;
pub use ctxlog_core_types::{
    impl_secret_serialize, masked, Fields, PreparedEntry, RequestContext, Secret, Sensitive,
    SpanId, TraceId,
};
pub use errors::{CtxLogError, EncodingError, ExErrorKind, Result};
pub use facade::{default_logger, set_default_logger, set_persistent_fields};
pub use json::serialize;
pub use level::Level;
pub use logger::Logger;
