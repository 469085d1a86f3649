//! Typed resource operations on top of the request policy.
//!
//! Reads are public and writes require a token. Which endpoints the real
//! backend guards cannot be told from the client side, so this split is the
//! single place to change if that turns out differently.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::endpoints::REGISTER;
use crate::error::ApiError;
use crate::policy::{Access, RequestPolicy};
use crate::request::ApiRequest;
use crate::types::{ResourceId, ResourceKind};

impl RequestPolicy {
    /// Fetch a whole collection.
    #[instrument(skip(self))]
    pub async fn list(&self, kind: ResourceKind) -> Result<Value, ApiError> {
        debug!("Listing records");
        self.execute(ApiRequest::get(kind.collection_path()), Access::Public)
            .await
    }

    /// Fetch one record.
    #[instrument(skip(self))]
    pub async fn show(&self, kind: ResourceKind, id: ResourceId) -> Result<Value, ApiError> {
        debug!("Fetching record");
        self.execute(ApiRequest::get(kind.item_path(id)), Access::Public)
            .await
    }

    /// Create a record from an already validated payload.
    #[instrument(skip(self, body))]
    pub async fn create(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError> {
        debug!("Creating record");
        self.execute(
            ApiRequest::post(kind.collection_path(), body),
            Access::Authenticated,
        )
        .await
    }

    /// Partially update a record.
    #[instrument(skip(self, body))]
    pub async fn update(
        &self,
        kind: ResourceKind,
        id: ResourceId,
        body: Value,
    ) -> Result<Value, ApiError> {
        debug!("Updating record");
        self.execute(
            ApiRequest::patch(kind.item_path(id), body),
            Access::Authenticated,
        )
        .await
    }

    /// Delete a record. A record still referenced elsewhere comes back as
    /// [`ApiError::Conflict`].
    #[instrument(skip(self))]
    pub async fn delete(&self, kind: ResourceKind, id: ResourceId) -> Result<Value, ApiError> {
        debug!("Deleting record");
        self.execute(ApiRequest::delete(kind.item_path(id)), Access::Authenticated)
            .await
    }

    /// Register a new user account.
    #[instrument(skip(self, body))]
    pub async fn register(&self, body: Value) -> Result<Value, ApiError> {
        debug!("Registering user");
        self.execute(ApiRequest::post(REGISTER, body), Access::Public)
            .await
    }
}
