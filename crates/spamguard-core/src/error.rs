//! Shared error type across spamguard crates.

use thiserror::Error;

/// Operator-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Rules or gateway config could not be read.
    ConfigUnreadable,
    /// Config document failed to parse or has the wrong shape.
    ConfigMalformed,
    /// A block pattern is not a valid regular expression.
    InvalidPattern,
    /// Invalid input / out-of-range setting.
    BadRequest,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ConfigUnreadable => "CONFIG_UNREADABLE",
            ErrorCode::ConfigMalformed => "CONFIG_MALFORMED",
            ErrorCode::InvalidPattern => "INVALID_PATTERN",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SpamError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum SpamError {
    #[error("config unreadable: {path}: {source}")]
    ConfigUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config malformed: {0}")]
    ConfigMalformed(String),
    #[error("invalid pattern in {category}: {pattern:?}: {source}")]
    InvalidPattern {
        category: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SpamError {
    /// Map internal error to a stable operator-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SpamError::ConfigUnreadable { .. } => ErrorCode::ConfigUnreadable,
            SpamError::ConfigMalformed(_) => ErrorCode::ConfigMalformed,
            SpamError::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            SpamError::BadRequest(_) => ErrorCode::BadRequest,
            SpamError::Internal(_) => ErrorCode::Internal,
        }
    }
}
