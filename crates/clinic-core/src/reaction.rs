//! What a screen does with a failed request.

use crate::error::ApiError;
use crate::forms::FieldErrors;
use crate::navigation::{Flash, Navigator, Route};

const LOGIN_REQUIRED: &str = "Please log in to continue";
const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const CONFLICT_FALLBACK: &str = "Conflict: resource cannot be deleted.";
const NETWORK_FALLBACK: &str = "Network error or no response from server.";

/// The screen-level response to an [`ApiError`].
#[derive(Clone, Debug, PartialEq)]
pub enum Reaction {
    /// Go to the login screen and show `flash` there.
    RedirectToLogin { flash: Flash },
    /// Stay on the form and show messages next to the fields.
    Inline { errors: FieldErrors },
    /// Stay on the screen and show a one-shot notification.
    Notify { flash: Flash },
}

impl Reaction {
    pub fn for_error(error: &ApiError) -> Self {
        match error {
            ApiError::Unauthenticated => Reaction::RedirectToLogin {
                flash: Flash::error(LOGIN_REQUIRED),
            },
            ApiError::Unauthorized { message, .. } => Reaction::RedirectToLogin {
                flash: Flash::error(message.as_deref().unwrap_or(SESSION_EXPIRED)),
            },
            ApiError::ValidationFailed { errors, message } => {
                let mut fields = FieldErrors::from_server(errors);
                if fields.is_empty() {
                    fields.insert(
                        FieldErrors::FORM,
                        message.as_deref().unwrap_or("Validation failed"),
                    );
                }
                Reaction::Inline { errors: fields }
            }
            ApiError::Conflict { message } => Reaction::Notify {
                flash: Flash::error(message.as_deref().unwrap_or(CONFLICT_FALLBACK)),
            },
            ApiError::RequestFailed {
                status: None,
                message,
            } => {
                let text = if message.trim().is_empty() {
                    NETWORK_FALLBACK
                } else {
                    message.as_str()
                };
                Reaction::Notify {
                    flash: Flash::error(text),
                }
            }
            ApiError::RequestFailed { message, .. } => Reaction::Notify {
                flash: Flash::error(message.as_str()),
            },
        }
    }

    /// Apply to `navigator`. Only a redirect changes the screen; a
    /// notification is queued as the current screen's flash.
    pub fn apply(&self, navigator: &mut Navigator) {
        match self {
            Reaction::RedirectToLogin { flash } => {
                navigator.navigate(Route::Login, Some(flash.clone()));
            }
            Reaction::Notify { flash } => navigator.notify(flash.clone()),
            Reaction::Inline { .. } => {}
        }
    }
}

impl From<&ApiError> for Reaction {
    fn from(error: &ApiError) -> Self {
        Reaction::for_error(error)
    }
}
