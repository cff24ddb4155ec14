//! Logging macros
//!
//! printf-style shorthands for the default logger, and `kv!` for building
//! per-call fields from an alternating key/value list.

/// Build [`Fields`](crate::Fields) from alternating keys and values
///
/// Each item is converted with [`json::field_value`](crate::json::field_value),
/// so secrets are masked. A trailing key without a
/// value is dropped, and pairs whose key is not a non-empty string are skipped.
///
/// # Example
///
/// ```
/// # use ctxlog_core::kv;
/// let fields = kv!["key1", 1, "key2", "2", "dangling"];
/// assert_eq!(fields.len(), 2);
/// assert!(!fields.contains_key("dangling"));
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        $crate::Fields::new()
    };
    ($($item:expr),+ $(,)?) => {
        $crate::Fields::from_kv(::std::vec![$($crate::json::field_value(&$item)),+])
    };
}

/// Log at trace level through the default logger, printf style
#[macro_export]
macro_rules! tracef {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::tracef($ctx, ::std::format_args!($($arg)+))
    };
}

/// Log at debug level through the default logger, printf style
///
/// # Example
///
/// ```
/// # use ctxlog_core::{debugf, RequestContext};
/// let ctx = RequestContext::new();
/// debugf!(&ctx, "{}, {}", "abc", 789);
/// ```
#[macro_export]
macro_rules! debugf {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::debugf($ctx, ::std::format_args!($($arg)+))
    };
}

/// Log at info level through the default logger, printf style
#[macro_export]
macro_rules! infof {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::infof($ctx, ::std::format_args!($($arg)+))
    };
}

/// Log at warn level through the default logger, printf style
#[macro_export]
macro_rules! warnf {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::warnf($ctx, ::std::format_args!($($arg)+))
    };
}

/// Log at error level through the default logger, printf style
#[macro_export]
macro_rules! errorf {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::errorf($ctx, ::std::format_args!($($arg)+))
    };
}

/// Log at fatal level through the default logger, then exit with status 1
#[macro_export]
macro_rules! fatalf {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::fatalf($ctx, ::std::format_args!($($arg)+))
    };
}

/// Log at panic level through the default logger, then panic
#[macro_export]
macro_rules! panicf {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::panicf($ctx, ::std::format_args!($($arg)+))
    };
}
