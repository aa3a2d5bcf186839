use async_trait::async_trait;

use crate::application::errors::StorageError;
use crate::domain::entities::{NewQrRecord, QrRecord, User};

/// Store trait - abstraction for data persistence
#[async_trait]
pub trait Store: Send + Sync {
    // User operations

    /// Insert the user unless it already exists. Returns `true` if inserted.
    async fn ensure_user(&self, user_id: &str, name: Option<&str>) -> Result<bool, StorageError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StorageError>;

    // History operations
    async fn add_history(&self, record: &NewQrRecord) -> Result<(), StorageError>;

    /// Most recent entries first
    async fn recent_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<QrRecord>, StorageError>;
}
