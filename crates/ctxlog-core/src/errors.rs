use thiserror::Error;

/// Result type alias using CtxLogError
pub type Result<T> = std::result::Result<T, CtxLogError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Logging calls never fail; only serialization and configuration loading
/// surface errors to the caller. Each kind maps to a stable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// A value could not be encoded as JSON
    Encoding,
    /// Configuration text could not be parsed
    InvalidConfig,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Encoding => "ERR_ENCODING",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
        }
    }
}

/// What part of the value graph made encoding fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingCategory {
    /// Unsupported value (e.g. non-string map key, integer out of range) or
    /// invalid embedded raw JSON
    Data,
    /// The output writer failed
    Io,
}

/// Serialization failure returned by [`crate::json::serialize`]
#[derive(Debug, Clone, Error)]
#[error("encoding failed ({category:?}): {message}")]
pub struct EncodingError {
    category: EncodingCategory,
    message: String,
}

impl EncodingError {
    pub fn new(category: EncodingCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn category(&self) -> EncodingCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ExErrorKind {
        ExErrorKind::Encoding
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

/// Conversion of errors raised while encoding a value
///
/// serde_json reports some value failures ("key must be a string", "number
/// out of range") with a syntax classification; when encoding, only a writer
/// failure is not a data error.
impl From<serde_json::Error> for EncodingError {
    fn from(err: serde_json::Error) -> Self {
        let category = if err.is_io() {
            EncodingCategory::Io
        } else {
            EncodingCategory::Data
        };
        Self::new(category, err.to_string())
    }
}

/// Crate-level error
#[derive(Debug, Clone, Error)]
pub enum CtxLogError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
}

impl CtxLogError {
    pub fn kind(&self) -> ExErrorKind {
        match self {
            CtxLogError::Encoding(_) => ExErrorKind::Encoding,
            CtxLogError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
