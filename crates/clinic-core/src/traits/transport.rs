//! Transport trait.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::{ApiRequest, ApiResponse};

/// Issues requests against the clinic backend.
///
/// A transport sends exactly the headers it is given. It does not retry and
/// does not interpret the status code; classification is the policy's job.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return whatever response came back.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
