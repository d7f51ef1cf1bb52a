//! Unified error type for riskmatrix operations.
//!
//! The taxonomy is deliberately shallow:
//! - Validation errors block a save and leave stored state untouched
//! - Not-found errors are reported when a matter has no stored record
//! - Malformed-data errors are reported when stored or imported JSON cannot be
//!   turned back into a valid assessment
//! - Storage, configuration and clipboard errors cover the I/O at the edges
//!
//! # Error Codes
//!
//! - E001-E009: Storage / filesystem errors
//! - E020-E029: Configuration errors
//! - E050-E059: Validation errors
//! - E060-E069: Record lookup and decoding errors
//! - E070-E079: Export side effects (clipboard)
//!
//! # Example
//!
//! ```rust
//! use riskmatrix::error::{ErrorCode, RiskMatrixError};
//!
//! let err = RiskMatrixError::not_found("Acme v. Widgets");
//! assert_eq!(err.code(), ErrorCode::RECORD_NOT_FOUND);
//! assert!(err.is_user_fixable());
//! ```

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Storage error - file not found
    pub const STORAGE_NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// Storage error - permission denied
    pub const STORAGE_PERMISSION_DENIED: ErrorCode = ErrorCode("E002");
    /// Storage error - generic
    pub const STORAGE_GENERIC: ErrorCode = ErrorCode("E009");

    /// Config error - invalid value
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    /// Config error - file not found
    pub const CONFIG_FILE_NOT_FOUND: ErrorCode = ErrorCode("E022");
    /// Config error - generic
    pub const CONFIG_GENERIC: ErrorCode = ErrorCode("E029");

    /// Validation error - generic
    pub const VALIDATION_GENERIC: ErrorCode = ErrorCode("E050");

    /// Lookup error - no record stored for the matter
    pub const RECORD_NOT_FOUND: ErrorCode = ErrorCode("E060");
    /// Decode error - stored data is not a valid assessment
    pub const RECORD_MALFORMED: ErrorCode = ErrorCode("E061");

    /// Export error - clipboard unavailable
    pub const CLIPBOARD: ErrorCode = ErrorCode("E070");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single rule broken by user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("matter name must not be empty")]
    EmptyMatterName,

    #[error("explanation must not be empty")]
    EmptyExplanation,

    #[error("at least one category is required")]
    MissingCategory,

    #[error("category names must not be blank")]
    BlankCategory,

    #[error("unknown {axis} category '{category}'")]
    UnknownCategory { axis: String, category: String },

    #[error("rating {0} is outside the range 1-5")]
    RatingOutOfRange(i64),

    #[error("'{0}' is not a known rating label or value")]
    UnknownRatingLabel(String),

    #[error("an assessment named '{0}' already exists")]
    MatterExists(String),
}

/// Unified error type for riskmatrix operations.
#[derive(Debug, Error)]
pub enum RiskMatrixError {
    /// User input rejected before anything was stored.
    #[error("[{}] Validation failed: {}", ErrorCode::VALIDATION_GENERIC, join_errors(.errors))]
    Validation { errors: Vec<ValidationError> },

    /// No record stored under the matter name.
    #[error("[{}] No saved assessment found for matter '{matter}'", ErrorCode::RECORD_NOT_FOUND)]
    NotFound { matter: String },

    /// Stored or imported data could not be decoded.
    #[error("[{}] Malformed assessment data under '{key}': {message}", ErrorCode::RECORD_MALFORMED)]
    MalformedData { key: String, message: String },

    /// Backing store failure.
    #[error("[{code}] Storage error: {message}")]
    Storage {
        code: ErrorCode,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration problems.
    #[error("[{code}] Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        path: Option<PathBuf>,
    },

    /// Clipboard copy failed.
    #[error("[{code}] Clipboard error: {0}", code = ErrorCode::CLIPBOARD)]
    Clipboard(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl RiskMatrixError {
    #[must_use]
    pub fn validation(error: ValidationError) -> Self {
        Self::Validation {
            errors: vec![error],
        }
    }

    #[must_use]
    pub fn validations(errors: Vec<ValidationError>) -> Self {
        Self::Validation { errors }
    }

    #[must_use]
    pub fn not_found(matter: impl Into<String>) -> Self {
        Self::NotFound {
            matter: matter.into(),
        }
    }

    #[must_use]
    pub fn malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedData {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a storage error from a std::io::Error.
    #[must_use]
    pub fn from_io_error(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::STORAGE_NOT_FOUND,
            std::io::ErrorKind::PermissionDenied => ErrorCode::STORAGE_PERMISSION_DENIED,
            _ => ErrorCode::STORAGE_GENERIC,
        };
        let message = match &path {
            Some(p) => format!("{} ({})", err, p.display()),
            None => err.to_string(),
        };
        Self::Storage {
            code,
            message,
            path,
            source: Some(err),
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
            path: None,
        }
    }

    #[must_use]
    pub fn config_with_path(
        code: ErrorCode,
        message: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Get the error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::VALIDATION_GENERIC,
            Self::NotFound { .. } => ErrorCode::RECORD_NOT_FOUND,
            Self::MalformedData { .. } => ErrorCode::RECORD_MALFORMED,
            Self::Storage { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::Clipboard(_) => ErrorCode::CLIPBOARD,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Validation",
            Self::NotFound { .. } => "NotFound",
            Self::MalformedData { .. } => "MalformedData",
            Self::Storage { .. } => "Storage",
            Self::Config { .. } => "Config",
            Self::Clipboard(_) => "Clipboard",
        }
    }

    /// Check if this error is something the user can fix.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::NotFound { .. } | Self::Config { .. }
        )
    }

    /// Get the suggested exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 3,
            Self::Validation { .. } => 4,
            Self::MalformedData { .. } => 5,
            Self::NotFound { .. } => 6,
            Self::Storage { .. } | Self::Clipboard(_) => 1,
        }
    }
}

impl From<ValidationError> for RiskMatrixError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err)
    }
}

impl From<std::io::Error> for RiskMatrixError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(err, None)
    }
}

// =============================================================================
// Serde Serialization for Structured Logging
// =============================================================================

impl Serialize for RiskMatrixError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("RiskMatrixError", 4)?;
        state.serialize_field("code", &self.code().as_str())?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("user_fixable", &self.is_user_fixable())?;
        state.end()
    }
}

pub type Result<T> = std::result::Result<T, RiskMatrixError>;
