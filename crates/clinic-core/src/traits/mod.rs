//! Core traits for transport and durable storage.

mod storage;
mod transport;

pub use storage::TokenStorage;
pub use transport::Transport;
