//! clinic-core - Session, request policy and core types for the clinic admin client.
//!
//! All requests to the clinic backend flow through a [`RequestPolicy`], which
//! reads the bearer token from a shared [`SessionStore`] and classifies every
//! response into an [`ApiError`] kind the caller can react to.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use clinic_core::{Credentials, MemoryStorage, RequestPolicy, ResourceKind, SessionStore};
//! # use clinic_core::Transport;
//!
//! # async fn example(transport: Arc<dyn Transport>) -> Result<(), clinic_core::Error> {
//! let session = SessionStore::new(transport, Arc::new(MemoryStorage::new()));
//! session.login(Credentials::new("admin@clinic.test", "secret")).await?;
//!
//! let policy = RequestPolicy::new(session);
//! let doctors = policy.list(ResourceKind::Doctors).await?;
//! println!("{doctors}");
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod forms;
pub mod navigation;
pub mod policy;
pub mod reaction;
pub mod request;
mod resources;
pub mod search;
pub mod session;
pub mod storage;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::{ApiError, AuthError, Error, InvalidInputError, StorageError, TransportError};
pub use forms::{FieldErrors, FormInput, FormMode};
pub use navigation::{Flash, FlashKind, Navigator, Route, ScreenEpoch, Ticket};
pub use policy::{Access, RequestPolicy};
pub use reaction::Reaction;
pub use request::{ApiRequest, ApiResponse, Method};
pub use search::RecordFilter;
pub use session::{Session, SessionStore};
pub use storage::{MemoryStorage, StoredSession};
pub use tokens::BearerToken;
pub use traits::{TokenStorage, Transport};
pub use types::{ApiUrl, ResourceId, ResourceKind, UserSummary};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
