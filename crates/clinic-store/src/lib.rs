//! clinic-store - durable session storage on the local filesystem.

mod file;

pub use file::FileStorage;
