//! Record sinks
//!
//! A sink receives a severity, a formatted message and the ordered field set
//! that decorates it. Output formatting, filtering, rotation and write
//! synchronization belong to the sink.

use ctxlog_core_types::schema::TRACING_TARGET;
use ctxlog_core_types::Fields;
use std::sync::{Mutex, PoisonError};

use crate::level::Level;

/// Destination of decorated log records; shared across threads
pub trait Sink: Send + Sync {
    fn write(&self, level: Level, message: &str, fields: &Fields);

    /// Flush buffered output; called before a fatal exit
    fn flush(&self) {}
}

/// Forwards records to the `tracing` dispatcher
///
/// Events use the `ctxlog` target and carry a `severity` field (fatal and
/// panic are mapped to `ERROR`) and a `fields` field rendering the field set
/// as a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

macro_rules! emit_event {
    ($lvl:expr, $level:expr, $message:expr, $fields:expr) => {
        tracing::event!(
            target: TRACING_TARGET,
            $lvl,
            severity = $level.as_str(),
            fields = %$fields,
            "{}",
            $message
        )
    };
}

impl Sink for TracingSink {
    fn write(&self, level: Level, message: &str, fields: &Fields) {
        match level.to_tracing() {
            tracing::Level::TRACE => emit_event!(tracing::Level::TRACE, level, message, fields),
            tracing::Level::DEBUG => emit_event!(tracing::Level::DEBUG, level, message, fields),
            tracing::Level::INFO => emit_event!(tracing::Level::INFO, level, message, fields),
            tracing::Level::WARN => emit_event!(tracing::Level::WARN, level, message, fields),
            _ => emit_event!(tracing::Level::ERROR, level, message, fields),
        }
    }
}

/// A record as handed to a sink
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records written so far
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent record, if any
    pub fn last(&self) -> Option<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, level: Level, message: &str, fields: &Fields) {
        let record = Record {
            level,
            message: message.to_string(),
            fields: fields.clone(),
        };
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}
