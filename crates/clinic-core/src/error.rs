//! Error types for the clinic admin client.
//!
//! Every failure a screen can observe is one of the kinds below. The request
//! policy never lets a raw transport or decoding error escape: it is folded
//! into an [`ApiError`] first.

use serde_json::Value;
use thiserror::Error;

use crate::forms::FieldErrors;

/// The unified error type for clinic-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Login failed.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A request through the policy failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Durable session storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (bad URL, id, resource name).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The request could not be built from its description.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Login errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password was left empty; nothing was sent.
    #[error("email and password are required")]
    MissingCredentials { errors: FieldErrors },

    /// The backend answered 2xx but the body carried no token.
    #[error("login response did not include a token")]
    MissingToken,

    /// The backend rejected the login.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The login request never got a response.
    #[error("{message}")]
    Transport { message: String },

    /// The token could not be written to durable storage.
    #[error("failed to persist session: {0}")]
    Persist(#[source] StorageError),
}

/// Classified outcome of a failed request issued through the policy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The action needs a token and none is present. No request was sent.
    #[error("not logged in")]
    Unauthenticated,

    /// The backend rejected the token (401/403). The session was cleared.
    #[error("unauthorized (HTTP {status})")]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },

    /// The backend rejected the payload (422).
    #[error("validation failed")]
    ValidationFailed {
        errors: Value,
        message: Option<String>,
    },

    /// The backend refused because of a conflicting state (409).
    #[error("conflict: {}", message.as_deref().unwrap_or("resource is in use"))]
    Conflict { message: Option<String> },

    /// Any other non-2xx response or network failure.
    #[error("{message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    /// Returns the server-supplied message, if there was one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthenticated => None,
            ApiError::Unauthorized { message, .. }
            | ApiError::ValidationFailed { message, .. }
            | ApiError::Conflict { message } => message.as_deref(),
            ApiError::RequestFailed { message, .. } => Some(message),
        }
    }

    /// Returns the HTTP status that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthenticated => None,
            ApiError::Unauthorized { status, .. } => Some(*status),
            ApiError::ValidationFailed { .. } => Some(422),
            ApiError::Conflict { .. } => Some(409),
            ApiError::RequestFailed { status, .. } => *status,
        }
    }

    /// Whether the caller should send the user back to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthenticated | ApiError::Unauthorized { .. }
        )
    }
}

/// Durable storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the storage slot failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The stored record could not be decoded.
    #[error("stored session is corrupt: {message}")]
    Corrupt { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid resource id.
    #[error("invalid resource id '{value}': {reason}")]
    ResourceId { value: String, reason: String },

    /// Unknown resource name.
    #[error("unknown resource '{value}'")]
    ResourceKind { value: String },

    /// Path that does not map to a screen.
    #[error("unknown route '{value}'")]
    Route { value: String },
}
