//! Durable key-value storage.

use async_trait::async_trait;
use mockall::automock;

mod errors;
mod file;
mod memory;

pub use errors::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Async string key-value store backing cart snapshots.
#[automock]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
