//! Severity gate and dispatch
//!
//! Every severity comes in four styles:
//!
//! - `infof(ctx, format_args!(..))`: printf style
//! - `info(ctx, &[&a, &b])`: operands concatenated with no separator, whatever
//!   their type (`info(ctx, &[&1, &2])` logs `12`)
//! - `infoln(ctx, &[&a, &b])`: operands joined by spaces, followed by a newline
//! - `infow(ctx, message, &fields)`: message plus per-call structured fields
//!
//! Below the configured minimum level a call returns before any field
//! resolution or formatting. Error and above attach the caller's file and
//! line; all public entry points are `#[track_caller]` so that location is the
//! public call site. Fatal and panic always fire: fatal exits the process
//! with status 1 after flushing the sink, panic unwinds with the message.

use ctxlog_core_types::{Fields, RequestContext};
use std::fmt::{self, Display, Write as _};
use std::panic::Location;
use std::sync::Arc;

use crate::config::LoggerConfig;
use crate::field_cache::FieldCache;
use crate::level::Level;
use crate::probe::{Environment, ExecutionUnitProbe, ProcessEnvironment, ThreadExecutionUnits};
use crate::sink::{Sink, TracingSink};

pub struct Logger {
    min_level: Level,
    sink: Arc<dyn Sink>,
    environment: Arc<dyn Environment>,
    cache: FieldCache,
}

/// printf style
pub(crate) fn format_message(args: fmt::Arguments<'_>) -> String {
    match args.as_str() {
        Some(s) => s.to_string(),
        None => fmt::format(args),
    }
}

/// Concatenation style; never inserts a separator, use [`concat_ln`] for spaces
pub(crate) fn concat(parts: &[&dyn Display]) -> String {
    let mut out = String::new();
    for part in parts {
        let _ = write!(out, "{}", part);
    }
    out
}

/// Line style
pub(crate) fn concat_ln(parts: &[&dyn Display]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", part);
    }
    out.push('\n');
    out
}

macro_rules! gated_level {
    ($level:expr, $f:ident, $plain:ident, $ln:ident, $w:ident) => {
        #[track_caller]
        pub fn $f(&self, ctx: &RequestContext, args: fmt::Arguments<'_>) {
            if self.enabled($level) {
                self.emit($level, ctx, None, &format_message(args));
            }
        }

        #[track_caller]
        pub fn $plain(&self, ctx: &RequestContext, parts: &[&dyn Display]) {
            if self.enabled($level) {
                self.emit($level, ctx, None, &concat(parts));
            }
        }

        #[track_caller]
        pub fn $ln(&self, ctx: &RequestContext, parts: &[&dyn Display]) {
            if self.enabled($level) {
                self.emit($level, ctx, None, &concat_ln(parts));
            }
        }

        #[track_caller]
        pub fn $w(&self, ctx: &RequestContext, message: &str, fields: &Fields) {
            if self.enabled($level) {
                self.emit($level, ctx, Some(fields), message);
            }
        }
    };
}

impl Logger {
    /// Create a logger admitting `min_level` and above, writing to `sink`
    ///
    /// Uses the process environment and per-thread execution-unit ids;
    /// override them with [`Logger::with_environment`] and
    /// [`Logger::with_execution_unit_probe`].
    pub fn new(min_level: Level, sink: Arc<dyn Sink>) -> Self {
        Self {
            min_level,
            sink,
            environment: Arc::new(ProcessEnvironment),
            cache: FieldCache::new(Arc::new(ThreadExecutionUnits)),
        }
    }

    /// Build the logger described by `config`, writing to the tracing sink
    pub fn from_config(config: &LoggerConfig) -> Self {
        let environment = ProcessEnvironment;
        Self::new(config.min_level(&environment), Arc::new(TracingSink))
    }

    /// Build a logger from `CTXLOG_LEVEL` / `CTXLOG_PROFILE`
    pub fn from_env() -> Self {
        Self::from_config(&LoggerConfig::from_env())
    }

    pub fn with_environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_execution_unit_probe(mut self, probe: Arc<dyn ExecutionUnitProbe>) -> Self {
        self.cache = FieldCache::new(probe);
        self
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Whether a record of `level` passes the gate; fatal and panic always do
    pub fn enabled(&self, level: Level) -> bool {
        level >= Level::Fatal || level >= self.min_level
    }

    pub fn field_cache(&self) -> &FieldCache {
        &self.cache
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    #[track_caller]
    fn emit(&self, level: Level, ctx: &RequestContext, ad_hoc: Option<&Fields>, message: &str) {
        let call_site = if level.needs_call_site() {
            Some(Location::caller())
        } else {
            None
        };
        let entry = self.cache.resolve(ctx, ad_hoc, call_site);
        self.sink.write(level, message, entry.fields());
    }

    #[track_caller]
    fn emit_fatal(&self, ctx: &RequestContext, ad_hoc: Option<&Fields>, message: &str) -> ! {
        self.emit(Level::Fatal, ctx, ad_hoc, message);
        self.sink.flush();
        std::process::exit(1)
    }

    #[track_caller]
    fn emit_panic(&self, ctx: &RequestContext, ad_hoc: Option<&Fields>, message: String) -> ! {
        self.emit(Level::Panic, ctx, ad_hoc, &message);
        panic!("{}", message)
    }

    gated_level!(Level::Trace, tracef, trace, traceln, tracew);
    gated_level!(Level::Debug, debugf, debug, debugln, debugw);
    gated_level!(Level::Info, infof, info, infoln, infow);
    gated_level!(Level::Warn, warnf, warn, warnln, warnw);
    gated_level!(Level::Error, errorf, error, errorln, errorw);

    #[track_caller]
    pub fn fatalf(&self, ctx: &RequestContext, args: fmt::Arguments<'_>) -> ! {
        self.emit_fatal(ctx, None, &format_message(args))
    }

    #[track_caller]
    pub fn fatal(&self, ctx: &RequestContext, parts: &[&dyn Display]) -> ! {
        self.emit_fatal(ctx, None, &concat(parts))
    }

    #[track_caller]
    pub fn fatalln(&self, ctx: &RequestContext, parts: &[&dyn Display]) -> ! {
        self.emit_fatal(ctx, None, &concat_ln(parts))
    }

    #[track_caller]
    pub fn fatalw(&self, ctx: &RequestContext, message: &str, fields: &Fields) -> ! {
        self.emit_fatal(ctx, Some(fields), message)
    }

    #[track_caller]
    pub fn panicf(&self, ctx: &RequestContext, args: fmt::Arguments<'_>) -> ! {
        self.emit_panic(ctx, None, format_message(args))
    }

    #[track_caller]
    pub fn panic(&self, ctx: &RequestContext, parts: &[&dyn Display]) -> ! {
        self.emit_panic(ctx, None, concat(parts))
    }

    #[track_caller]
    pub fn panicln(&self, ctx: &RequestContext, parts: &[&dyn Display]) -> ! {
        self.emit_panic(ctx, None, concat_ln(parts))
    }

    #[track_caller]
    pub fn panicw(&self, ctx: &RequestContext, message: &str, fields: &Fields) -> ! {
        self.emit_panic(ctx, Some(fields), message.to_string())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
