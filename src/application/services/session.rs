use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::ColorChoice;

/// Per-user color selection, kept in memory only
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    colors: Arc<RwLock<HashMap<i64, ColorChoice>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current choice for a user, or black on white
    pub async fn colors(&self, user_id: i64) -> ColorChoice {
        let colors = self.colors.read().await;
        colors.get(&user_id).cloned().unwrap_or_default()
    }

    pub async fn set_colors(&self, user_id: i64, choice: ColorChoice) {
        let mut colors = self.colors.write().await;
        colors.insert(user_id, choice);
    }
}
