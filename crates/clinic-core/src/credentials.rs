//! Login credentials type.

use std::fmt;

use crate::forms::FieldErrors;

/// Login credentials for the clinic backend.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use clinic_core::Credentials;
///
/// let creds = Credentials::new("a@b.com", "x");
/// assert_eq!(creds.email(), "a@b.com");
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    ///
    /// Use this only when constructing the login request body.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Checks that neither field is blank.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required");
        }
        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        }
        errors.into_result()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
