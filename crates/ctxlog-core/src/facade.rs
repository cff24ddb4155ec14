//! Process-wide default logger and free-function facade
//!
//! # Initialization order
//!
//! The default logger is process-scoped state. It is built from the
//! environment ([`Logger::from_env`]) the first time any facade function
//! runs, unless bootstrap code installed one earlier with [`install`] or
//! [`set_default_logger`]. Replacing it affects calls that start afterwards;
//! calls already running keep the logger they fetched.

use ctxlog_core_types::{Fields, RequestContext};
use std::fmt::{self, Display};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::LoggerConfig;
use crate::logger::Logger;
use crate::logging_facility;

static DEFAULT_LOGGER: RwLock<Option<Arc<Logger>>> = RwLock::new(None);

/// The current default logger, building it from the environment on first use
pub fn default_logger() -> Arc<Logger> {
    if let Some(logger) = DEFAULT_LOGGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Arc::clone(logger);
    }

    let mut slot = DEFAULT_LOGGER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(slot.get_or_insert_with(|| Arc::new(Logger::from_env())))
}

/// Replace the default logger, returning the previous one if it was built
pub fn set_default_logger(logger: impl Into<Arc<Logger>>) -> Option<Arc<Logger>> {
    DEFAULT_LOGGER
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(logger.into())
}

/// Bootstrap: install the tracing subscriber for `config.profile` and a
/// default logger built from `config`
pub fn install(config: &LoggerConfig) -> Arc<Logger> {
    logging_facility::init(config.profile);
    let logger = Arc::new(Logger::from_config(config));
    set_default_logger(Arc::clone(&logger));
    logger
}

/// Attach fields that decorate every subsequent record of `ctx`
pub fn set_persistent_fields(ctx: &RequestContext, fields: Fields) {
    ctx.set_persistent_fields(fields);
}

macro_rules! facade_fns {
    ($($name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;)*) => {
        $(
            #[track_caller]
            pub fn $name(ctx: &RequestContext, $($arg: $ty),*) $(-> $ret)? {
                default_logger().$name(ctx, $($arg),*)
            }
        )*
    };
}

facade_fns! {
    tracef(args: fmt::Arguments<'_>);
    trace(parts: &[&dyn Display]);
    traceln(parts: &[&dyn Display]);
    tracew(message: &str, fields: &Fields);

    debugf(args: fmt::Arguments<'_>);
    debug(parts: &[&dyn Display]);
    debugln(parts: &[&dyn Display]);
    debugw(message: &str, fields: &Fields);

    infof(args: fmt::Arguments<'_>);
    info(parts: &[&dyn Display]);
    infoln(parts: &[&dyn Display]);
    infow(message: &str, fields: &Fields);

    warnf(args: fmt::Arguments<'_>);
    warn(parts: &[&dyn Display]);
    warnln(parts: &[&dyn Display]);
    warnw(message: &str, fields: &Fields);

    errorf(args: fmt::Arguments<'_>);
    error(parts: &[&dyn Display]);
    errorln(parts: &[&dyn Display]);
    errorw(message: &str, fields: &Fields);

    fatalf(args: fmt::Arguments<'_>) -> !;
    fatal(parts: &[&dyn Display]) -> !;
    fatalln(parts: &[&dyn Display]) -> !;
    fatalw(message: &str, fields: &Fields) -> !;

    panicf(args: fmt::Arguments<'_>) -> !;
    panic(parts: &[&dyn Display]) -> !;
    panicln(parts: &[&dyn Display]) -> !;
    panicw(message: &str, fields: &Fields) -> !;

    condition_fatal(condition: bool, parts: &[&dyn Display]);
    condition_fatalf(condition: bool, args: fmt::Arguments<'_>);
    condition_fatalln(condition: bool, parts: &[&dyn Display]);
    prod_fatal(parts: &[&dyn Display]);
    prod_fatalf(args: fmt::Arguments<'_>);
    prod_fatalln(parts: &[&dyn Display]);
    qa_or_prod_fatal(parts: &[&dyn Display]);
    qa_or_prod_fatalf(args: fmt::Arguments<'_>);
    qa_or_prod_fatalln(parts: &[&dyn Display]);
}
