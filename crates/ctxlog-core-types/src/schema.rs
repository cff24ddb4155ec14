//! Canonical field keys for context-decorated log records
//!
//! These constants ensure every record carries correlation data under the same names.

// Correlation fields
pub const FIELD_TRACE_ID: &str = "traceId";
pub const FIELD_SPAN_ID: &str = "spanId";
pub const FIELD_USER_ID: &str = "uid";
pub const FIELD_EXECUTION_UNIT: &str = "gid";

// Call-site decoration
pub const FIELD_FILE: &str = "file";
pub const FIELD_LINE: &str = "line";

// Tracing sink fields
pub const FIELD_SEVERITY: &str = "severity";
pub const FIELD_FIELDS: &str = "fields";

/// Target used for every event the tracing sink emits
pub const TRACING_TARGET: &str = "ctxlog";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_keys_are_distinct() {
        let keys = [
            FIELD_TRACE_ID,
            FIELD_SPAN_ID,
            FIELD_USER_ID,
            FIELD_EXECUTION_UNIT,
            FIELD_FILE,
            FIELD_LINE,
        ];
        for (i, a) in keys.iter().enumerate() {
            assert!(!a.is_empty());
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
