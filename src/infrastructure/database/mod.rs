//! Postgres-backed storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::time::Duration;

use crate::application::errors::StorageError;
use crate::domain::entities::{NewQrRecord, QrRecord, User};
use crate::domain::traits::Store;
use crate::infrastructure::config::DatabaseConfig;

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    user_id: String,
    name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: row.user_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct HistoryRow {
    user_id: String,
    data: String,
    fill_color: String,
    bg_color: String,
    created_at: DateTime<Utc>,
}

impl From<HistoryRow> for QrRecord {
    fn from(row: HistoryRow) -> Self {
        QrRecord {
            user_id: row.user_id,
            data: row.data,
            fill_color: row.fill_color,
            bg_color: row.bg_color,
            created_at: row.created_at,
        }
    }
}

/// Users and QR history in Postgres
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, retrying while the database container is still starting
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StorageError> {
        let attempts = config.connect_attempts.max(1);
        let delay = Duration::from_secs(config.connect_delay_secs);

        let mut attempt = 1;
        loop {
            tracing::info!(
                "Connecting to database (attempt {}/{}, max_connections={})",
                attempt,
                attempts,
                config.max_connections
            );
            match PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await
            {
                Ok(pool) => return Ok(Self::from_pool(pool)),
                Err(e) if attempt < attempts => {
                    tracing::warn!("Database not ready: {}; retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Create tables and indexes if they do not exist yet
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        tracing::info!("Initializing database schema");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                name TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                id SERIAL PRIMARY KEY,
                user_id TEXT NOT NULL,
                data TEXT NOT NULL,
                fill_color TEXT NOT NULL,
                bg_color TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_history_user_created ON history (user_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ensure_user(&self, user_id: &str, name: Option<&str>) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "INSERT INTO users (user_id, name) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StorageError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT user_id, name, created_at FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    async fn add_history(&self, record: &NewQrRecord) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO history (user_id, data, fill_color, bg_color) VALUES ($1, $2, $3, $4)",
        )
        .bind(&record.user_id)
        .bind(&record.data)
        .bind(&record.fill_color)
        .bind(&record.bg_color)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<QrRecord>, StorageError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT user_id, data, fill_color, bg_color, created_at
            FROM history
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(QrRecord::from).collect())
    }
}
