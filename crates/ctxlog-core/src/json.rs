//! Secret-aware JSON serialization
//!
//! [`serialize`] is the process-wide encoder for payloads that may carry
//! secrets. Values whose type implements
//! [`Secret`](ctxlog_core_types::Secret) and serializes through
//! [`masked`](ctxlog_core_types::masked) are written as their masked string
//! at whatever depth they appear; `None` in place of such a value is written
//! as `null` and the masking function is not called.
//!
//! Output is deterministic: map keys are sorted while struct fields keep
//! their declaration order, and `<`, `>`, `&`, U+2028 and U+2029 are escaped
//! so the text is safe to embed in HTML. Pre-encoded JSON can be embedded
//! verbatim with [`RawJson`], which is validated.

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::ser::Formatter;
use serde_json::value::RawValue;
use serde_json::Value;
use std::io;

use crate::errors::{EncodingCategory, EncodingError};

mod sorted_maps;

use sorted_maps::SortedMaps;

/// Encode `value` as JSON bytes with secrets masked and map keys sorted
///
/// # Errors
///
/// Returns an [`EncodingError`] when the value cannot be represented as JSON
/// (for example a map with non-string keys) or embeds invalid [`RawJson`].
pub fn serialize<T>(value: &T) -> Result<Vec<u8>, EncodingError>
where
    T: Serialize + ?Sized,
{
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, HtmlSafeFormatter);
    SortedMaps(value).serialize(&mut serializer)?;
    Ok(out)
}

/// [`serialize`], as a `String`
///
/// # Errors
///
/// Same as [`serialize`].
pub fn serialize_to_string<T>(value: &T) -> Result<String, EncodingError>
where
    T: Serialize + ?Sized,
{
    let bytes = serialize(value)?;
    String::from_utf8(bytes).map_err(|e| EncodingError::new(EncodingCategory::Data, e.to_string()))
}

/// Convert `value` into a field value with secrets already masked
///
/// Use this to attach a structured payload to a record's fields. Object keys
/// of the returned value are sorted, struct fields included, and integers
/// must fit in 64 bits.
///
/// # Errors
///
/// Same as [`serialize`].
pub fn to_value<T>(value: &T) -> Result<Value, EncodingError>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_value(value)?)
}

/// Convert `value` into a field value, never failing
///
/// Used for per-call fields, where a logging call must not fail its caller:
/// a value that cannot be encoded is replaced by a string describing the error.
pub fn field_value<T>(value: &T) -> Value
where
    T: Serialize + ?Sized,
{
    to_value(value).unwrap_or_else(|e| Value::String(format!("!ENCODING_ERROR: {}", e)))
}

/// Pre-encoded JSON embedded verbatim; validated when serialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJson(String);

impl RawJson {
    pub fn new(json: impl Into<String>) -> Self {
        Self(json.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for RawJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.0.clone())
            .map_err(|e| S::Error::custom(format!("invalid raw JSON: {}", e)))?;
        raw.serialize(serializer)
    }
}

/// Compact formatter escaping HTML-significant characters in strings
#[derive(Debug, Clone, Copy, Default)]
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escape = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escape.as_bytes())?;
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
