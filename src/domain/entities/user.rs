use chrono::{DateTime, Utc};
use std::fmt;

/// A user as stored by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The author of an incoming update
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sender {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl Sender {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            username: None,
            first_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_first_name(mut self, first: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self
    }

    /// Storage key for this sender
    pub fn user_id(&self) -> String {
        self.id.to_string()
    }

    pub fn display_name(&self) -> String {
        if let Some(ref first) = self.first_name {
            first.clone()
        } else if let Some(ref username) = self.username {
            username.clone()
        } else {
            self.id.to_string()
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
