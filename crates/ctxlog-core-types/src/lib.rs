//! Core types shared across ctxlog facilities
//!
//! This crate provides the data carriers used by the field cache,
//! the logger and the secret-aware serializer:
//!
//! - **Correlation types**: TraceId, SpanId, RequestContext, PreparedEntry
//! - **Fields**: ordered, de-duplicated structured field sets
//! - **Sensitive data**: the `Secret` capability, `Sensitive<T>` and masked serde helpers
//! - **Schema constants**: Canonical field keys

pub mod correlation;
pub mod fields;
pub mod schema;
pub mod sensitive;

pub use correlation::{PreparedEntry, RequestContext, SpanId, TraceId};
pub use fields::Fields;
pub use sensitive::{masked, Secret, Sensitive};

#[doc(hidden)]
pub use serde as __serde;
