//! Authenticated request policy.
//!
//! The policy decides, per call, whether a request may be sent, attaches the
//! bearer token from a snapshot of the session, and folds every response into
//! either the decoded body or exactly one [`ApiError`] kind.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::ApiError;
use crate::request::{ApiRequest, ApiResponse};
use crate::session::SessionStore;
use crate::tokens::BearerToken;

/// Whether an endpoint may be called without a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Sent with or without a token.
    Public,
    /// Refused locally with [`ApiError::Unauthenticated`] when logged out.
    Authenticated,
}

/// Combines requests with the current session and classifies responses.
///
/// The only state is the shared [`SessionStore`]; clones are cheap.
#[derive(Clone, Debug)]
pub struct RequestPolicy {
    session: SessionStore,
}

impl RequestPolicy {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Decide whether `request` may be sent and attach the token.
    ///
    /// Returns the request to send and the token it carries. A present token
    /// is attached regardless of `access`.
    pub fn authorize(
        &self,
        request: ApiRequest,
        access: Access,
    ) -> Result<(ApiRequest, Option<BearerToken>), ApiError> {
        match self.session.current_token() {
            Some(token) => Ok((request.with_bearer(&token), Some(token))),
            None if access == Access::Authenticated => Err(ApiError::Unauthenticated),
            None => Ok((request, None)),
        }
    }

    /// Send `request` under `access` and return the decoded response body.
    ///
    /// On 401/403 the session is cleared before [`ApiError::Unauthorized`] is
    /// returned.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn execute(&self, request: ApiRequest, access: Access) -> Result<Value, ApiError> {
        let (request, token) = match self.authorize(request, access) {
            Ok(authorized) => authorized,
            Err(e) => {
                debug!("Refusing to send request without a token");
                return Err(e);
            }
        };

        let response = match self.session.transport().send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Request failed before a response arrived");
                return Err(ApiError::RequestFailed {
                    status: None,
                    message: e.to_string(),
                });
            }
        };

        let outcome = classify(&response);

        if let Err(ApiError::Unauthorized { status, .. }) = &outcome {
            warn!(status, "Backend rejected the session token");
            if let Some(token) = &token {
                self.session.clear_if_current(token).await;
            }
        }

        outcome
    }
}

/// Map a response to its decoded body or its error kind.
pub fn classify(response: &ApiResponse) -> Result<Value, ApiError> {
    let status = response.status();

    if response.is_success() {
        return response.to_value().map_err(|e| ApiError::RequestFailed {
            status: Some(status),
            message: format!("invalid response body: {e}"),
        });
    }

    match status {
        401 | 403 => Err(ApiError::Unauthorized {
            status,
            message: response.server_message(),
        }),
        409 => Err(ApiError::Conflict {
            message: response.server_message(),
        }),
        422 => {
            let envelope = response.envelope().unwrap_or_default();
            let errors = match envelope.errors {
                Some(errors) => errors,
                None => response.to_value().unwrap_or(Value::Null),
            };
            Err(ApiError::ValidationFailed {
                errors,
                message: envelope.message,
            })
        }
        _ => Err(ApiError::RequestFailed {
            status: Some(status),
            message: response
                .server_message()
                .unwrap_or_else(|| format!("request failed with HTTP {status}")),
        }),
    }
}
