//! Persisted session record and an in-memory storage backend.

use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::tokens::BearerToken;
use crate::traits::TokenStorage;
use crate::types::UserSummary;

/// What is written to durable storage on login.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: UserSummary,
}

impl StoredSession {
    pub fn new(token: &BearerToken, user: UserSummary) -> Self {
        Self {
            token: token.as_str().to_string(),
            user,
        }
    }
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<StoredSession>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a session, as if saved by an earlier run.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }

    /// Returns a copy of the slot's content.
    pub fn snapshot(&self) -> Option<StoredSession> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl TokenStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        Ok(self.snapshot())
    }

    async fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
