//! Screen context shared by every command.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clinic_core::{
    ApiError, ApiUrl, FieldErrors, Flash, Navigator, Reaction, RequestPolicy, Route,
    SessionStore, Ticket,
};
use clinic_http::HttpClient;
use clinic_store::FileStorage;
use directories::ProjectDirs;
use tracing::debug;

use crate::cli::Config;
use crate::output;

/// A failure that has already been shown to the user.
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("command failed")
    }
}

impl StdError for Reported {}

/// Session, request policy and navigation for one invocation.
pub struct App {
    policy: RequestPolicy,
    navigator: Navigator,
}

impl App {
    /// Wire up the HTTP transport and file storage, then pick up any session
    /// saved by an earlier invocation.
    pub async fn connect(config: &Config) -> Result<Self> {
        let api_url = ApiUrl::new(&config.api_url).context("Invalid API URL")?;
        let session_file = match &config.session_file {
            Some(path) => path.clone(),
            None => default_session_path()?,
        };
        debug!(api_url = %api_url, session_file = %session_file.display(), "Connecting");

        let transport = HttpClient::new(api_url).context("Failed to build HTTP client")?;
        let storage = FileStorage::new(session_file);
        let session = SessionStore::new(Arc::new(transport), Arc::new(storage));

        session
            .restore_from_storage()
            .await
            .context("Failed to read stored session")?;

        Ok(Self {
            policy: RequestPolicy::new(session),
            navigator: Navigator::default(),
        })
    }

    pub fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    pub fn session(&self) -> &SessionStore {
        self.policy.session()
    }

    pub fn current(&self) -> Route {
        self.navigator.current()
    }

    /// Switch screens. Tickets taken on the previous screen go stale.
    pub fn navigate(&mut self, route: Route, flash: Option<Flash>) {
        debug!(%route, "Navigating");
        self.navigator.navigate(route, flash);
    }

    /// Queue a notification on the current screen.
    pub fn notify(&mut self, flash: Flash) {
        self.navigator.notify(flash);
    }

    /// Take a ticket before issuing a request from the current screen.
    pub fn ticket(&self) -> Ticket {
        self.navigator.ticket()
    }

    /// Accept a response for the screen that holds `ticket`.
    ///
    /// Failures are turned into a [`Reaction`] and applied: the user is sent
    /// to the login screen, notified, or shown field messages.
    pub fn settle<T>(&mut self, ticket: &Ticket, result: Result<T, ApiError>) -> Result<T> {
        if !ticket.is_current() {
            debug!(route = %self.current(), "Dropping response for a screen that is gone");
            return Err(Reported.into());
        }

        result.map_err(|e| self.react(&e))
    }

    /// Show client-side validation messages and stay on the form.
    pub fn invalid(&mut self, errors: FieldErrors) -> anyhow::Error {
        debug!(fields = errors.len(), "Form rejected before sending");
        output::field_errors("Please correct the following fields:", &errors);
        Reported.into()
    }

    /// Report a failure as an error notification on the current screen.
    pub fn fail(&mut self, message: impl Into<String>) -> anyhow::Error {
        self.notify(Flash::error(message));
        Reported.into()
    }

    fn react(&mut self, error: &ApiError) -> anyhow::Error {
        debug!(%error, "Request failed");
        let reaction = Reaction::for_error(error);
        reaction.apply(&mut self.navigator);

        if let Reaction::Inline { errors } = &reaction {
            output::field_errors("The server rejected some fields:", errors);
        }
        Reported.into()
    }

    /// Show whatever notification the last screen left behind.
    pub fn finish(&mut self) {
        if let Some(flash) = self.navigator.take_flash() {
            output::flash(&flash);
        }
        if self.current() == Route::Login && !self.session().is_authenticated() {
            eprintln!("Run 'clinic login' to continue.");
        }
    }
}

/// `session.json` in the platform data directory.
fn default_session_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "clinic-admin")
        .context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}
