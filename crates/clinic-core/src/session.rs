//! Session store: who is logged in, and with which token.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::json;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use crate::credentials::Credentials;
use crate::endpoints::{LOGIN, LoginResponse};
use crate::error::{AuthError, StorageError};
use crate::request::ApiRequest;
use crate::storage::StoredSession;
use crate::tokens::BearerToken;
use crate::traits::{TokenStorage, Transport};
use crate::types::UserSummary;

#[derive(Clone)]
struct Authenticated {
    token: BearerToken,
    user: UserSummary,
}

/// A point-in-time view of the session.
///
/// Token and user are either both present or both absent.
#[derive(Clone, Default)]
pub struct Session {
    auth: Option<Authenticated>,
}

impl Session {
    fn authenticated(token: BearerToken, user: UserSummary) -> Self {
        Self {
            auth: Some(Authenticated { token, user }),
        }
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.auth.as_ref().map(|a| &a.token)
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.auth.as_ref().map(|a| &a.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user())
            .field("token", &self.token().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Single source of truth for "am I logged in, and as whom".
///
/// The store is created once at startup and handed to everything that
/// issues requests. Clones share state. Reads are synchronous; login,
/// logout and clear-on-rejection replace the whole session at once, so the
/// last writer wins. Mutations are serialized so that storage and memory
/// always settle on the same writer.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use clinic_core::{Credentials, MemoryStorage, SessionStore};
/// # use clinic_core::Transport;
///
/// # async fn example(transport: Arc<dyn Transport>) -> Result<(), clinic_core::Error> {
/// let session = SessionStore::new(transport, Arc::new(MemoryStorage::new()));
/// session.restore_from_storage().await?;
///
/// if !session.is_authenticated() {
///     session.login(Credentials::new("a@b.com", "x")).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    transport: Arc<dyn Transport>,
    storage: Arc<dyn TokenStorage>,
    state: RwLock<Session>,
    changes: watch::Sender<bool>,
    // Held across a storage write and the matching memory swap.
    mutation: Mutex<()>,
}

impl SessionStore {
    /// Create an empty store. Call [`SessionStore::restore_from_storage`]
    /// once afterwards to pick up a session saved by an earlier run.
    pub fn new(transport: Arc<dyn Transport>, storage: Arc<dyn TokenStorage>) -> Self {
        let (changes, _) = watch::channel(false);
        Self {
            inner: Arc::new(SessionInner {
                transport,
                storage,
                state: RwLock::new(Session::default()),
                changes,
                mutation: Mutex::new(()),
            }),
        }
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn replace(&self, session: Session) {
        let authenticated = session.is_authenticated();
        *self.write() = session;
        self.inner.changes.send_replace(authenticated);
    }

    /// Returns a copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Returns the current bearer token, if logged in.
    pub fn current_token(&self) -> Option<BearerToken> {
        self.read().token().cloned()
    }

    /// Returns the logged-in user, if any.
    pub fn current_user(&self) -> Option<UserSummary> {
        self.read().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Watch logged-in / logged-out transitions.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.changes.subscribe()
    }

    /// Exchange credentials for a token and persist it.
    ///
    /// The token is written to storage before the in-memory session changes;
    /// if either step fails the store is left as it was.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingCredentials`] when a field is blank (nothing is sent)
    /// - [`AuthError::Rejected`] for a non-2xx response
    /// - [`AuthError::MissingToken`] for a 2xx response without a token
    /// - [`AuthError::Transport`] when no response arrived
    /// - [`AuthError::Persist`] when storage failed
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: Credentials) -> Result<Session, AuthError> {
        credentials
            .validate()
            .map_err(|errors| AuthError::MissingCredentials { errors })?;

        info!("Logging in");

        let request = ApiRequest::post(
            LOGIN,
            json!({
                "email": credentials.email(),
                "password": credentials.password(),
            }),
        );

        let response = self
            .inner
            .transport
            .send(request)
            .await
            .map_err(|e| AuthError::Transport {
                message: e.to_string(),
            })?;

        if !response.is_success() {
            let status = response.status();
            warn!(status, "Login rejected");
            return Err(AuthError::Rejected {
                status,
                message: response
                    .server_message()
                    .unwrap_or_else(|| "Login failed".to_string()),
            });
        }

        let parsed: LoginResponse = response
            .to_value()
            .ok()
            .and_then(|body| serde_json::from_value(body).ok())
            .unwrap_or_default();

        let (token, user) = parsed.into_parts();
        let token = BearerToken::new(token.ok_or(AuthError::MissingToken)?);
        let user = user.unwrap_or_else(|| UserSummary::new(credentials.email()));

        let _guard = self.inner.mutation.lock().await;
        self.inner
            .storage
            .save(&StoredSession::new(&token, user.clone()))
            .await
            .map_err(AuthError::Persist)?;

        let session = Session::authenticated(token, user);
        self.replace(session.clone());

        debug!("Session established");
        Ok(session)
    }

    /// Forget the session in memory and in storage.
    ///
    /// Safe to call when already logged out. The in-memory session is
    /// cleared even if storage fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), StorageError> {
        let _guard = self.inner.mutation.lock().await;
        let was_authenticated = self.is_authenticated();
        let cleared = self.inner.storage.clear().await;
        self.replace(Session::default());
        cleared?;

        if was_authenticated {
            info!("Logged out");
        } else {
            debug!("Logout with no active session");
        }
        Ok(())
    }

    /// Load a previously persisted session into memory.
    ///
    /// The token is not checked against the backend; a revoked token is only
    /// discovered on first use. Returns whether a session was restored. A
    /// corrupt record, or one with a blank token, is ignored.
    #[instrument(skip(self))]
    pub async fn restore_from_storage(&self) -> Result<bool, StorageError> {
        let _guard = self.inner.mutation.lock().await;
        match self.inner.storage.load().await {
            Ok(Some(stored)) if stored.token.trim().is_empty() => {
                warn!("Ignoring persisted session without a token");
                Ok(false)
            }
            Ok(Some(stored)) => {
                let session = Session::authenticated(BearerToken::new(stored.token), stored.user);
                self.replace(session);
                debug!("Restored persisted session");
                Ok(true)
            }
            Ok(None) => {
                debug!("No persisted session");
                Ok(false)
            }
            Err(StorageError::Corrupt { message }) => {
                warn!(%message, "Ignoring corrupt persisted session");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Clear the session if it still holds `token`.
    ///
    /// Used when the backend rejects a request. A rejection of an older token
    /// must not log out a session established since the request was sent.
    #[instrument(skip(self, token))]
    pub async fn clear_if_current(&self, token: &BearerToken) -> bool {
        let _guard = self.inner.mutation.lock().await;
        if self.read().token() != Some(token) {
            return false;
        }

        if let Err(e) = self.inner.storage.clear().await {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.replace(Session::default());
        info!("Session cleared after the backend rejected its token");
        true
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.read())
            .finish()
    }
}
