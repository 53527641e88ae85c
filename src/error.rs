//! Error types for the legend-sdlc service layer.
//!
//! [`SdlcError`] is returned by every API trait method and every resource
//! operation. Each variant carries a client-facing category through
//! [`SdlcError::status`], so the HTTP layer can map it without parsing
//! messages.

use std::fmt;

use sdlc_core::{BranchNameError, ValidationError};
use thiserror::Error;

/// Result alias used throughout the service layer.
pub type Result<T, E = SdlcError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// ErrorStatus
// ---------------------------------------------------------------------------

/// Client-facing category of an [`SdlcError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    BadRequest,
    NotFound,
    Conflict,
    InternalServerError,
}

impl ErrorStatus {
    /// The matching HTTP status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::InternalServerError => 500,
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::Conflict => "Conflict",
            Self::InternalServerError => "Internal Server Error",
        };
        write!(f, "{} {reason}", self.code())
    }
}

// ---------------------------------------------------------------------------
// SdlcError
// ---------------------------------------------------------------------------

/// Errors returned by the API traits and resources.
#[derive(Debug, Error)]
pub enum SdlcError {
    /// The request was malformed or violated a precondition.
    #[error("{message}")]
    BadRequest {
        /// What was wrong with the request.
        message: String,
    },

    /// A project, workspace, revision, review, or version does not exist.
    #[error("{message}")]
    NotFound {
        /// What was missing.
        message: String,
    },

    /// The request clashes with existing state (e.g. the workspace exists).
    #[error("{message}")]
    Conflict {
        /// What it clashed with.
        message: String,
    },

    /// A value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A workspace branch name could not be computed.
    #[error(transparent)]
    BranchName(#[from] BranchNameError),

    /// Anything else; the message should be enough to diagnose it.
    #[error("internal error: {message}")]
    Internal {
        /// Freeform description.
        message: String,
    },
}

impl SdlcError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The client-facing category of this error.
    #[must_use]
    pub const fn status(&self) -> ErrorStatus {
        match self {
            Self::BadRequest { .. } | Self::Validation(_) | Self::BranchName(_) => {
                ErrorStatus::BadRequest
            }
            Self::NotFound { .. } => ErrorStatus::NotFound,
            Self::Conflict { .. } => ErrorStatus::Conflict,
            Self::Internal { .. } => ErrorStatus::InternalServerError,
        }
    }
}

/// Require a parameter to be present.
///
/// # Errors
/// Returns [`SdlcError::BadRequest`] carrying `message` if `value` is `None`.
pub fn validate_non_null<T>(value: Option<T>, message: &str) -> Result<T> {
    value.ok_or_else(|| SdlcError::bad_request(message))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
