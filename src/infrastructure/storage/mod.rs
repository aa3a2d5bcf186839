//! In-memory storage implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::entities::{NewQrRecord, QrRecord, User};
use crate::domain::traits::Store;

/// Store kept in process memory, for console mode and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    history: Arc<RwLock<Vec<QrRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ensure_user(&self, user_id: &str, name: Option<&str>) -> Result<bool, StorageError> {
        let mut users = self.users.write().await;
        if users.contains_key(user_id) {
            return Ok(false);
        }
        users.insert(
            user_id.to_string(),
            User {
                user_id: user_id.to_string(),
                name: name.map(|n| n.to_string()),
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StorageError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    async fn add_history(&self, record: &NewQrRecord) -> Result<(), StorageError> {
        let mut history = self.history.write().await;
        history.push(QrRecord {
            user_id: record.user_id.clone(),
            data: record.data.clone(),
            fill_color: record.fill_color.clone(),
            bg_color: record.bg_color.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn recent_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<QrRecord>, StorageError> {
        let history = self.history.read().await;
        Ok(history
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, data: &str) -> NewQrRecord {
        NewQrRecord {
            user_id: user.to_string(),
            data: data.to_string(),
            fill_color: "black".to_string(),
            bg_color: "white".to_string(),
        }
    }

    #[tokio::test]
    async fn ensure_user_keeps_first_name() {
        let store = MemoryStore::new();
        assert!(store.ensure_user("1", Some("Ann")).await.unwrap());
        assert!(!store.ensure_user("1", Some("Bob")).await.unwrap());
        let user = store.get_user("1").await.unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("Ann"));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn history_is_per_user_newest_first() {
        let store = MemoryStore::new();
        for i in 0..3 {
            store.add_history(&record("1", &format!("a{}", i))).await.unwrap();
        }
        store.add_history(&record("2", "other")).await.unwrap();

        let recent = store.recent_history("1", 2).await.unwrap();
        let data: Vec<&str> = recent.iter().map(|r| r.data.as_str()).collect();
        assert_eq!(data, ["a2", "a1"]);
        assert!(store.recent_history("3", 5).await.unwrap().is_empty());
    }
}
