//! Logger configuration
//!
//! Configuration is small enough to come from the environment or from a
//! `[logging]`-style TOML table embedded in an application's config file.

use serde::Deserialize;

use crate::errors::{CtxLogError, Result};
use crate::level::Level;
use crate::logging_facility::Profile;
use crate::probe::Environment;

/// Environment variable holding the minimum level
pub const LEVEL_ENV: &str = "CTXLOG_LEVEL";
/// Environment variable holding the output profile
pub const PROFILE_ENV: &str = "CTXLOG_PROFILE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level name; unknown names admit everything
    pub level: Option<String>,
    /// Output profile for the tracing subscriber
    pub profile: Profile,
}

impl LoggerConfig {
    /// Read [`LEVEL_ENV`] and [`PROFILE_ENV`]
    ///
    /// Missing or unrecognized values fall back to the defaults.
    pub fn from_env() -> Self {
        let level = std::env::var(LEVEL_ENV).ok().filter(|v| !v.trim().is_empty());
        let profile = std::env::var(PROFILE_ENV)
            .map(|v| Profile::parse_or_default(&v))
            .unwrap_or_default();
        Self { level, profile }
    }

    /// Parse a TOML table such as `level = "info"` / `profile = "production"`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the text is not valid TOML or a key has
    /// the wrong type.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CtxLogError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// The effective minimum level
    ///
    /// A configured level wins (unknown names fall back to `trace`);
    /// otherwise production runs at `info` and everything else at `debug`.
    pub fn min_level(&self, environment: &dyn Environment) -> Level {
        match &self.level {
            Some(level) => Level::parse_or_most_verbose(level),
            None if environment.is_production() => Level::Info,
            None => Level::Debug,
        }
    }
}
