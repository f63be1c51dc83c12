//! # Client Errors
//!
//! Error types shared by the gateway, the collection stores and the controllers.
//!
//! Each layer has its own enum:
//! - [`GatewayError`] is what one HTTP round trip can produce.
//! - [`ValidationError`] is a pre-flight rejection; no request was sent.
//! - [`AdminError`] is what a controller or store operation reports to the operator.

use crate::framework::ResourceKind;
use crate::session::SessionError;
use thiserror::Error;

/// Failures surfaced by a single [`Gateway`](crate::framework::Gateway) call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// Network, DNS or timeout failure. No response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a status outside 2xx.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    HttpStatus { status: u16, message: Option<String> },

    /// A 2xx response whose body is not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("Encode error: {0}")]
    Encode(String),

    /// An authenticated request was attempted without a credential.
    #[error("Not authenticated")]
    Unauthenticated,
}

impl GatewayError {
    /// The message the server attached to a rejected request, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::HttpStatus { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// True for 401 and 403 responses.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, GatewayError::HttpStatus { status: 401 | 403, .. })
    }
}

/// Client-side rejection of a staged form.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// An entry with the same case-folded name is already in the collection.
    #[error("This {kind} already exists!")]
    Duplicate { kind: ResourceKind, name: String },

    /// The `github` field does not look like `github.com/<owner>/<repo>`.
    #[error("Please provide a valid GitHub URL (e.g., https://github.com/username/repo)")]
    InvalidGithubUrl(String),

    /// A required field was left blank.
    #[error("The {0} field is required")]
    EmptyField(&'static str),
}

/// Errors reported by the admin client to the operator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdminError {
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// A submit or remove is already outstanding on this controller.
    #[error("A {0} request is still in progress")]
    Busy(ResourceKind),

    #[error("Error saving {kind}: {source}")]
    SubmitFailed {
        kind: ResourceKind,
        source: GatewayError,
    },

    #[error("Error deleting {kind}: {source}")]
    DeleteFailed {
        kind: ResourceKind,
        source: GatewayError,
    },

    /// A collection refresh failed; the previous snapshot was kept.
    #[error("Error loading {kind}: {source}")]
    FetchFailed {
        kind: ResourceKind,
        source: GatewayError,
    },

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl AdminError {
    /// Operator-facing text: the server's own message when it sent one,
    /// otherwise a generic line for the failed operation.
    pub fn user_message(&self) -> String {
        match self {
            AdminError::SubmitFailed { kind, source } => format!(
                "Error saving {kind}: {}",
                source
                    .server_message()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("Failed to save {kind}"))
            ),
            AdminError::DeleteFailed { kind, .. } => format!("Error deleting {kind}"),
            AdminError::FetchFailed { kind, .. } => format!("Error loading {}", kind.collection()),
            AdminError::Busy(kind) => format!("Please wait, the previous {kind} request has not finished"),
            AdminError::ValidationFailed(e) => e.to_string(),
            AdminError::LoginFailed(message) => message.clone(),
            AdminError::Session(e) => e.to_string(),
            AdminError::Gateway(e) => e.to_string(),
        }
    }
}
