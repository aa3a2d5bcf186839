//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Database: Postgres persistence
//! - Storage: In-memory persistence
//! - Adapters: Platform integrations (Telegram, console)

pub mod adapters;
pub mod config;
pub mod database;
pub mod storage;
