use chrono::{DateTime, Utc};

/// A generated QR code as kept in a user's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRecord {
    pub user_id: String,
    pub data: String,
    pub fill_color: String,
    pub bg_color: String,
    pub created_at: DateTime<Utc>,
}

/// History entry to be inserted; the store assigns the timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQrRecord {
    pub user_id: String,
    pub data: String,
    pub fill_color: String,
    pub bg_color: String,
}
