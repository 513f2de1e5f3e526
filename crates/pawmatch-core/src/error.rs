// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for PawMatch.

use thiserror::Error;

/// Store code for a single-row request that matched no rows.
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Store code for a unique constraint violation on insert.
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Code attached to [`ApiError`]s produced by input validation.
pub const VALIDATION_CODE: &str = "validation";

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PawError {
    /// Configuration errors (invalid TOML, missing secrets, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Relational store errors (transport failure, auth, query rejected).
    #[error("store error: {message}")]
    Store {
        message: String,
        code: Option<String>,
        details: Option<String>,
    },

    /// Generative-AI endpoint errors (network, quota, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input rejected before reaching any adapter.
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PawError {
    /// Builds a store error with an optional machine-readable code.
    pub fn store(message: impl Into<String>, code: Option<&str>) -> Self {
        PawError::Store {
            message: message.into(),
            code: code.map(str::to_string),
            details: None,
        }
    }

    /// The "no rows" error returned by single-row lookups.
    pub fn no_rows() -> Self {
        PawError::Store {
            message: "JSON object requested, multiple (or no) rows returned".into(),
            code: Some(NO_ROWS_CODE.into()),
            details: Some("The result contains 0 rows".into()),
        }
    }

    /// Machine-readable code, if the failure carries one.
    pub fn code(&self) -> Option<&str> {
        match self {
            PawError::Store { code, .. } => code.as_deref(),
            PawError::Validation(_) => Some(VALIDATION_CODE),
            _ => None,
        }
    }

    /// True when a single-row lookup matched nothing.
    pub fn is_no_rows(&self) -> bool {
        self.code() == Some(NO_ROWS_CODE)
    }
}

/// Normalized failure shape handed from the gateway and services to callers.
///
/// `message` is a human-readable, operation-specific string. `code` and
/// `details` carry the underlying store diagnostics when there are any.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub code: Option<String>,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Wraps an adapter failure under an operation-specific message.
    pub fn from_error(message: impl Into<String>, err: &PawError) -> Self {
        let details = match err {
            PawError::Store {
                message, details, ..
            } => Some(match details {
                Some(d) => format!("{message}: {d}"),
                None => message.clone(),
            }),
            other => Some(other.to_string()),
        };
        Self {
            message: message.into(),
            code: err.code().map(str::to_string),
            details,
        }
    }

    /// Re-labels an existing error, keeping its diagnostics.
    pub fn relabel(self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self {
            message: reason.into(),
            code: Some(VALIDATION_CODE.into()),
            details: None,
        }
    }

    pub fn is_no_rows(&self) -> bool {
        self.code.as_deref() == Some(NO_ROWS_CODE)
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION_CODE)
    }
}

/// Result alias for gateway and service calls.
pub type ApiResult<T> = Result<T, ApiError>;
