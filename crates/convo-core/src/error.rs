//! Error types shared across the convo client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level error inside a validation failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending request field (e.g. "user", "password")
    pub field: String,
    /// Human-readable description of what is wrong with the field
    #[serde(default)]
    pub message: String,
}

/// The error taxonomy for every remote operation.
///
/// The transport layer classifies HTTP outcomes into these variants; it never
/// interprets them. Only the session controller changes session state in
/// response to an error, and it does so only for `Unauthorized`.
///
/// Empty results (zero dialogues, zero variables, a null progress value) are
/// valid outcomes, not errors, and never appear here.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientError {
    /// Network failure or an unexpected HTTP status.
    #[error("transport failure{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        /// HTTP status when a response was received at all
        status: Option<u16>,
        message: String,
    },

    /// HTTP 401 on an authenticated call. The session controller reacts by
    /// dropping its cached credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// HTTP 400 carrying a structured `{code, message, fieldErrors}` envelope.
    #[error("validation failure ({code}): {message}")]
    Validation {
        status: u16,
        code: String,
        message: String,
        field_errors: Vec<FieldError>,
    },

    /// A 2xx response missing expected keys (e.g. a progress response whose
    /// non-null `value` lacks a `dialogue` key).
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Creates a Transport error without an HTTP status (network-level failure).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Transport error for an unexpected HTTP status.
    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a MalformedResponse error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Check if this is an Unauthorized error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a MalformedResponse error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

/// A type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;
