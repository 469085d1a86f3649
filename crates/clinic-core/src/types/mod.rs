//! Core clinic types.
//!
//! These types enforce their invariants at construction time, so a URL,
//! resource name or id that reaches the policy is already known to be valid.

mod api_url;
mod resource;
mod user;

pub use api_url::ApiUrl;
pub use resource::{ResourceId, ResourceKind};
pub use user::UserSummary;
