//! Telegram bot that turns text into QR codes and keeps a per-user history.

pub mod application;
pub mod domain;
pub mod infrastructure;
