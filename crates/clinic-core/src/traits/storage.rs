//! Durable session storage trait.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::storage::StoredSession;

/// A single durable slot holding the persisted session.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Read the slot. `Ok(None)` when nothing has been stored.
    async fn load(&self) -> Result<Option<StoredSession>, StorageError>;

    /// Overwrite the slot.
    async fn save(&self, session: &StoredSession) -> Result<(), StorageError>;

    /// Empty the slot. Clearing an empty slot succeeds.
    async fn clear(&self) -> Result<(), StorageError>;
}
