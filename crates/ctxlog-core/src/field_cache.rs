//! Per-request field resolution and entry memoization
//!
//! A plain record (no per-call fields, no call site) reuses the entry
//! memoized on its [`RequestContext`]; anything else gets a fresh entry that
//! is never stored, so call-specific fields cannot leak into later records.

use ctxlog_core_types::schema::{
    FIELD_EXECUTION_UNIT, FIELD_FILE, FIELD_LINE, FIELD_SPAN_ID, FIELD_TRACE_ID, FIELD_USER_ID,
};
use ctxlog_core_types::{Fields, PreparedEntry, RequestContext};
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::probe::ExecutionUnitProbe;

pub struct FieldCache {
    probe: Arc<dyn ExecutionUnitProbe>,
    builds: AtomicU64,
}

impl FieldCache {
    pub fn new(probe: Arc<dyn ExecutionUnitProbe>) -> Self {
        Self {
            probe,
            builds: AtomicU64::new(0),
        }
    }

    /// Resolve the entry decorating one record
    ///
    /// `ad_hoc` fields win over persistent fields on key collision. When
    /// `call_site` is given, `file` and `line` (as a string) are attached.
    pub fn resolve(
        &self,
        ctx: &RequestContext,
        ad_hoc: Option<&Fields>,
        call_site: Option<&Location<'_>>,
    ) -> Arc<PreparedEntry> {
        let ad_hoc = ad_hoc.filter(|fields| !fields.is_empty());
        let canonical = ad_hoc.is_none() && call_site.is_none();

        if canonical {
            if let Some(entry) = ctx.prepared_entry() {
                return entry;
            }
        }

        let entry = Arc::new(self.build(ctx, ad_hoc, call_site));
        if canonical {
            ctx.store_prepared_entry(Arc::clone(&entry));
        }
        entry
    }

    /// Number of entries built so far (cache misses plus non-cacheable calls)
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    fn build(
        &self,
        ctx: &RequestContext,
        ad_hoc: Option<&Fields>,
        call_site: Option<&Location<'_>>,
    ) -> PreparedEntry {
        self.builds.fetch_add(1, Ordering::Relaxed);

        let mut fields = Fields::with_capacity(8);
        fields.insert(FIELD_TRACE_ID, ctx.trace_id().as_str());
        if let Some(span_id) = ctx.span_id() {
            fields.insert(FIELD_SPAN_ID, span_id.as_str());
        }
        if let Some(user_id) = ctx.user_id() {
            fields.insert(FIELD_USER_ID, user_id);
        }
        let execution_unit = ctx.execution_unit_id_or_init(|| self.probe.current_id());
        fields.insert(FIELD_EXECUTION_UNIT, execution_unit);

        if let Some(persistent) = ctx.persistent_fields() {
            fields.merge(&persistent);
        }
        if let Some(ad_hoc) = ad_hoc {
            fields.merge(ad_hoc);
        }
        if let Some(location) = call_site {
            fields.insert(FIELD_FILE, location.file());
            fields.insert(FIELD_LINE, location.line().to_string());
        }

        PreparedEntry::new(fields)
    }
}

impl std::fmt::Debug for FieldCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCache")
            .field("builds", &self.builds())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedUnit(u64);

    impl ExecutionUnitProbe for FixedUnit {
        fn current_id(&self) -> u64 {
            self.0
        }
    }

    fn cache() -> FieldCache {
        FieldCache::new(Arc::new(FixedUnit(3)))
    }

    #[test]
    fn test_canonical_entry_is_memoized() {
        let cache = cache();
        let ctx = RequestContext::from_trace_id("t-memo");

        let first = cache.resolve(&ctx, None, None);
        let second = cache.resolve(&ctx, None, None);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn test_empty_ad_hoc_takes_fast_path() {
        let cache = cache();
        let ctx = RequestContext::from_trace_id("t-empty");

        let first = cache.resolve(&ctx, None, None);
        let second = cache.resolve(&ctx, Some(&Fields::new()), None);

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_field_order() {
        let cache = cache();
        let ctx = RequestContext::from_trace_id("t-order")
            .with_span_id("s-1")
            .with_user_id(9);
        ctx.set_persistent_fields([("tenant", "acme")].into_iter().collect());
        let ad_hoc: Fields = [("req", "r-1")].into_iter().collect();

        let entry = cache.resolve(&ctx, Some(&ad_hoc), None);

        let keys: Vec<_> = entry.fields().keys().collect();
        assert_eq!(keys, vec!["traceId", "spanId", "uid", "gid", "tenant", "req"]);
        assert_eq!(entry.fields().get("uid"), Some(&json!(9)));
        assert_eq!(entry.fields().get("gid"), Some(&json!(3)));
    }

    #[test]
    fn test_call_site_attached_as_strings() {
        let cache = cache();
        let ctx = RequestContext::from_trace_id("t-site");
        let here = Location::caller();

        let entry = cache.resolve(&ctx, None, Some(here));

        assert_eq!(entry.fields().get("file"), Some(&json!(here.file())));
        assert_eq!(
            entry.fields().get("line"),
            Some(&json!(here.line().to_string()))
        );
        assert!(ctx.prepared_entry().is_none());
    }
}
