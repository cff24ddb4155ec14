//! Correlation types for request tracking
//!
//! These types carry the identifiers that decorate every log record emitted
//! on behalf of one logical unit of work, and hold the per-request slots the
//! field cache reads and writes.

use crate::fields::Fields;
use serde::{Deserialize, Serialize};
use std::cell::{OnceCell, RefCell};
use std::sync::Arc;
use uuid::Uuid;

/// Trace identifier correlating every record of one request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a new random TraceId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string
    ///
    /// An empty string is accepted; it is logged as-is.
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TraceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TraceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span identifier for hierarchical tracing within a trace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanId(String);

impl SpanId {
    /// Generate a new random SpanId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SpanId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SpanId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for SpanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The field-decorated logging handle derived from a context
///
/// Once built it is immutable; the field cache shares it through an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedEntry {
    fields: Fields,
}

impl PreparedEntry {
    pub fn new(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

/// Context carried through one logical unit of work for log correlation
///
/// The identifiers are fixed at construction. The remaining slots use
/// interior mutability so that a shared reference is enough to log, which
/// makes the type `Send` but not `Sync`: one context is driven by one thread
/// at a time. Use [`RequestContext::fork`] to hand a derived context to a
/// concurrent sub-task.
#[derive(Debug)]
pub struct RequestContext {
    trace_id: TraceId,
    span_id: Option<SpanId>,
    user_id: i64,
    execution_unit: OnceCell<u64>,
    persistent_fields: RefCell<Option<Arc<Fields>>>,
    prepared: RefCell<Option<Arc<PreparedEntry>>>,
}

impl RequestContext {
    /// Create a new context with a fresh TraceId
    pub fn new() -> Self {
        Self::from_trace_id(TraceId::new())
    }

    /// Create a context with an existing TraceId
    pub fn from_trace_id(trace_id: impl Into<TraceId>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: None,
            user_id: 0,
            execution_unit: OnceCell::new(),
            persistent_fields: RefCell::new(None),
            prepared: RefCell::new(None),
        }
    }

    /// Add a SpanId to the context
    pub fn with_span_id(mut self, span_id: impl Into<SpanId>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }

    /// Add a user id to the context; zero or negative means unset
    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// The span id, if one is set and non-empty
    pub fn span_id(&self) -> Option<&SpanId> {
        self.span_id.as_ref().filter(|s| !s.is_empty())
    }

    /// The user id, if one is set (greater than zero)
    pub fn user_id(&self) -> Option<i64> {
        (self.user_id > 0).then_some(self.user_id)
    }

    /// The execution-unit id, if it has already been resolved
    pub fn execution_unit_id(&self) -> Option<u64> {
        self.execution_unit.get().copied()
    }

    /// The execution-unit id, resolving it with `resolve` on first use
    ///
    /// The resolved id is stored on the context, so `resolve` runs at most once.
    pub fn execution_unit_id_or_init(&self, resolve: impl FnOnce() -> u64) -> u64 {
        *self.execution_unit.get_or_init(resolve)
    }

    /// Fields attached with [`RequestContext::set_persistent_fields`]
    pub fn persistent_fields(&self) -> Option<Arc<Fields>> {
        self.persistent_fields.borrow().clone()
    }

    /// Attach fields that decorate every subsequent record of this context
    ///
    /// Replaces previously attached fields and discards the memoized entry,
    /// so the next record picks the new fields up.
    pub fn set_persistent_fields(&self, fields: Fields) {
        *self.persistent_fields.borrow_mut() = Some(Arc::new(fields));
        self.prepared.borrow_mut().take();
    }

    /// The memoized entry, if one has been stored
    pub fn prepared_entry(&self) -> Option<Arc<PreparedEntry>> {
        self.prepared.borrow().clone()
    }

    /// Memoize the canonical entry of this context
    pub fn store_prepared_entry(&self, entry: Arc<PreparedEntry>) {
        *self.prepared.borrow_mut() = Some(entry);
    }

    /// Derive a context for a concurrent sub-task
    ///
    /// Identifiers and persistent fields are shared; the memoized entry and
    /// execution-unit id are resolved afresh by whichever thread drives the fork.
    pub fn fork(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: self.span_id.clone(),
            user_id: self.user_id,
            execution_unit: OnceCell::new(),
            persistent_fields: RefCell::new(self.persistent_fields()),
            prepared: RefCell::new(None),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_id_generation() {
        let id1 = TraceId::new();
        let id2 = TraceId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_trace_id_display() {
        let id = TraceId::from("t-1");
        assert_eq!(format!("{}", id), "t-1");
    }

    #[test]
    fn test_request_context_creation() {
        let ctx = RequestContext::new();
        assert!(!ctx.trace_id().as_str().is_empty());
        assert!(ctx.span_id().is_none());
        assert!(ctx.user_id().is_none());
        assert!(ctx.prepared_entry().is_none());
    }

    #[test]
    fn test_empty_span_id_is_absent() {
        let ctx = RequestContext::from_trace_id("t").with_span_id("");
        assert!(ctx.span_id().is_none());
    }

    #[test]
    fn test_non_positive_user_id_is_absent() {
        assert!(RequestContext::new().with_user_id(0).user_id().is_none());
        assert!(RequestContext::new().with_user_id(-4).user_id().is_none());
        assert_eq!(RequestContext::new().with_user_id(42).user_id(), Some(42));
    }

    #[test]
    fn test_execution_unit_resolved_once() {
        let ctx = RequestContext::new();
        let mut calls = 0;

        let first = ctx.execution_unit_id_or_init(|| {
            calls += 1;
            7
        });
        let second = ctx.execution_unit_id_or_init(|| 99);

        assert_eq!(first, 7);
        assert_eq!(second, 7);
        assert_eq!(calls, 1);
        assert_eq!(ctx.execution_unit_id(), Some(7));
    }

    #[test]
    fn test_set_persistent_fields_discards_memoized_entry() {
        let ctx = RequestContext::new();
        ctx.store_prepared_entry(Arc::new(PreparedEntry::new(Fields::new())));

        ctx.set_persistent_fields([("tenant", "acme")].into_iter().collect());

        assert!(ctx.prepared_entry().is_none());
        assert!(ctx.persistent_fields().is_some());
    }

    #[test]
    fn test_fork_keeps_ids_and_resets_slots() {
        let ctx = RequestContext::from_trace_id("t-fork")
            .with_span_id("s-1")
            .with_user_id(5);
        ctx.set_persistent_fields([("k", "v")].into_iter().collect());
        ctx.execution_unit_id_or_init(|| 1);
        ctx.store_prepared_entry(Arc::new(PreparedEntry::new(Fields::new())));

        let forked = ctx.fork();

        assert_eq!(forked.trace_id().as_str(), "t-fork");
        assert_eq!(forked.span_id().map(SpanId::as_str), Some("s-1"));
        assert_eq!(forked.user_id(), Some(5));
        assert!(forked.persistent_fields().is_some());
        assert!(forked.execution_unit_id().is_none());
        assert!(forked.prepared_entry().is_none());
    }

    #[test]
    fn test_serialization() {
        let id = TraceId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: TraceId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
