//! Environment and execution-unit probes
//!
//! Both are consumed through traits so tests can substitute counting or
//! fixed implementations.

use std::sync::atomic::{AtomicU64, Ordering};

/// Environment variable naming the deployment profile
pub const PROFILE_ENV: &str = "APP_PROFILE";

/// Answers which kind of deployment the process runs in
pub trait Environment: Send + Sync {
    fn is_production(&self) -> bool;
    fn is_qa(&self) -> bool;
}

/// Reads the deployment profile from [`PROFILE_ENV`]
///
/// `prod`/`production` and `qa` are recognized (case-insensitive); anything
/// else, including an unset variable, is a development deployment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    fn profile() -> String {
        std::env::var(PROFILE_ENV)
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

impl Environment for ProcessEnvironment {
    fn is_production(&self) -> bool {
        matches!(Self::profile().as_str(), "prod" | "production")
    }

    fn is_qa(&self) -> bool {
        Self::profile() == "qa"
    }
}

/// A fixed answer, for tests and for embedding applications that already know
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
    pub production: bool,
    pub qa: bool,
}

impl StaticEnvironment {
    pub fn production() -> Self {
        Self {
            production: true,
            qa: false,
        }
    }

    pub fn qa() -> Self {
        Self {
            production: false,
            qa: true,
        }
    }

    pub fn development() -> Self {
        Self::default()
    }
}

impl Environment for StaticEnvironment {
    fn is_production(&self) -> bool {
        self.production
    }

    fn is_qa(&self) -> bool {
        self.qa
    }
}

/// Identifies the thread executing a log call
pub trait ExecutionUnitProbe: Send + Sync {
    fn current_id(&self) -> u64;
}

static NEXT_EXECUTION_UNIT: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static EXECUTION_UNIT: u64 = NEXT_EXECUTION_UNIT.fetch_add(1, Ordering::Relaxed);
}

/// Assigns each thread a small sequential id on first use
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadExecutionUnits;

impl ExecutionUnitProbe for ThreadExecutionUnits {
    fn current_id(&self) -> u64 {
        EXECUTION_UNIT.with(|id| *id)
    }
}
