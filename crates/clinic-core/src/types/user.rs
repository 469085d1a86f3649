//! Authenticated user summary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of the logged-in user.
///
/// Only the email is required. Whatever else the backend returns about the
/// user is kept verbatim in `profile`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl UserSummary {
    /// A summary carrying only an email address.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            profile: Map::new(),
        }
    }

    /// Returns a display name from the profile, if the backend sent one.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.profile.get("name").and_then(Value::as_str) {
            return Some(name.to_string());
        }
        let first = self.profile.get("first_name").and_then(Value::as_str)?;
        let last = self
            .profile
            .get("last_name")
            .and_then(Value::as_str)
            .unwrap_or("");
        Some(format!("{first} {last}").trim().to_string())
    }
}
