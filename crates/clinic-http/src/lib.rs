//! clinic-http - reqwest-backed transport for the clinic admin client.
//!
//! ```no_run
//! use std::sync::Arc;
//! use clinic_core::{ApiUrl, MemoryStorage, RequestPolicy, ResourceKind, SessionStore};
//! use clinic_http::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(ApiUrl::new("https://ca2-med-api.vercel.app")?)?;
//! let session = SessionStore::new(Arc::new(client), Arc::new(MemoryStorage::new()));
//! let doctors = RequestPolicy::new(session).list(ResourceKind::Doctors).await?;
//! # Ok(())
//! # }
//! ```

mod client;

pub use client::HttpClient;
