//! Conditional fatal helpers
//!
//! Escalate to fatal only where a failure must stop the process (typically
//! production), logging at error level everywhere else.

use ctxlog_core_types::RequestContext;
use std::fmt::{self, Display};

use crate::logger::Logger;

impl Logger {
    /// Fatal when `condition` holds, error otherwise
    #[track_caller]
    pub fn condition_fatal(&self, ctx: &RequestContext, condition: bool, parts: &[&dyn Display]) {
        if condition {
            self.fatal(ctx, parts)
        }
        self.error(ctx, parts);
    }

    #[track_caller]
    pub fn condition_fatalf(&self, ctx: &RequestContext, condition: bool, args: fmt::Arguments<'_>) {
        if condition {
            self.fatalf(ctx, args)
        }
        self.errorf(ctx, args);
    }

    #[track_caller]
    pub fn condition_fatalln(&self, ctx: &RequestContext, condition: bool, parts: &[&dyn Display]) {
        if condition {
            self.fatalln(ctx, parts)
        }
        self.errorln(ctx, parts);
    }

    /// Fatal in production, error elsewhere
    #[track_caller]
    pub fn prod_fatal(&self, ctx: &RequestContext, parts: &[&dyn Display]) {
        self.condition_fatal(ctx, self.is_production(), parts);
    }

    #[track_caller]
    pub fn prod_fatalf(&self, ctx: &RequestContext, args: fmt::Arguments<'_>) {
        self.condition_fatalf(ctx, self.is_production(), args);
    }

    #[track_caller]
    pub fn prod_fatalln(&self, ctx: &RequestContext, parts: &[&dyn Display]) {
        self.condition_fatalln(ctx, self.is_production(), parts);
    }

    /// Fatal in QA or production, error elsewhere
    #[track_caller]
    pub fn qa_or_prod_fatal(&self, ctx: &RequestContext, parts: &[&dyn Display]) {
        self.condition_fatal(ctx, self.is_qa_or_production(), parts);
    }

    #[track_caller]
    pub fn qa_or_prod_fatalf(&self, ctx: &RequestContext, args: fmt::Arguments<'_>) {
        self.condition_fatalf(ctx, self.is_qa_or_production(), args);
    }

    #[track_caller]
    pub fn qa_or_prod_fatalln(&self, ctx: &RequestContext, parts: &[&dyn Display]) {
        self.condition_fatalln(ctx, self.is_qa_or_production(), parts);
    }

    fn is_production(&self) -> bool {
        self.environment().is_production()
    }

    fn is_qa_or_production(&self) -> bool {
        let environment = self.environment();
        environment.is_qa() || environment.is_production()
    }
}
