//! Error types for Gitea webhook operations.
//!
//! Errors are split by concern so callers can tell a request that could not
//! be trusted apart from one that could not be parsed, and both apart from a
//! failed outbound call.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised by the event model.
#[derive(Debug, Error)]
pub enum EventError {
    /// The wire event name is not one of the supported event types.
    #[error("Unsupported event type {name}")]
    UnsupportedEventType { name: String },

    /// The payload is not well-formed JSON or does not match the event schema.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

/// Rejections produced by the webhook validation chain.
///
/// Every variant maps to `400 Bad Request`. The variants mirror the order in
/// which the checks are applied; the first failing check wins.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request method was not `POST`.
    #[error("Method {method} not allowed")]
    MethodNotAllowed { method: String },

    /// The `Content-Type` header is missing or not `application/json`.
    #[error("Invalid content type")]
    InvalidContentType,

    /// The `X-Gitea-Event` header is missing or empty.
    #[error("No event header specified")]
    MissingEventHeader,

    /// The `X-Gitea-Event` header names an event type that is not supported.
    #[error("Unsupported event type {name}")]
    UnsupportedEventType { name: String },

    /// The `X-Gitea-Signature` header is missing or empty.
    #[error("No signature header specified")]
    MissingSignatureHeader,

    /// The request body could not be read.
    #[error("Could not read body: {message}")]
    BodyRead { message: String },

    /// The body signature does not match the shared secret.
    #[error("Could not validate signature of body")]
    InvalidSignature,

    /// The authenticated body could not be decoded into an event.
    #[error("Could not decode body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl WebhookError {
    /// Check if this rejection concerns the authenticity of the request.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::InvalidSignature | Self::MissingSignatureHeader)
    }

    /// Short machine-friendly label used in log records.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed { .. } => "method",
            Self::InvalidContentType => "content_type",
            Self::MissingEventHeader => "missing_event",
            Self::UnsupportedEventType { .. } => "unsupported_event",
            Self::MissingSignatureHeader => "missing_signature",
            Self::BodyRead { .. } => "body_read",
            Self::InvalidSignature => "signature",
            Self::Decode(_) => "decode",
        }
    }
}

impl From<EventError> for WebhookError {
    fn from(error: EventError) -> Self {
        match error {
            EventError::UnsupportedEventType { name } => Self::UnsupportedEventType { name },
            EventError::Decode(e) => Self::Decode(e),
        }
    }
}

/// Every rejection is a `400 Bad Request` with the diagnostic as plain text,
/// except a wrong method, which gets an empty body.
impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match self {
            Self::MethodNotAllowed { .. } => StatusCode::BAD_REQUEST.into_response(),
            other => (StatusCode::BAD_REQUEST, other.to_string()).into_response(),
        }
    }
}

/// Errors during Gitea API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status other than 200 or 201.
    #[error("Invalid status code returned: {status}")]
    UnexpectedStatus { status: u16, body: String },

    /// The configured base URL or the derived request URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry a path (e.g. `mailto:` style URLs).
    #[error("URL cannot be used as a base: {url}")]
    CannotBeABase { url: String },

    /// The repository is not of the form `owner/name`.
    #[error("Invalid repository name: '{repository}' (expected owner/name)")]
    InvalidRepository { repository: String },

    /// Serializing the request body failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client error (network, TLS, body read, etc.).
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The HTTP status code reported by the server, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
