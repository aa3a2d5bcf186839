//! Configuration management

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::application::errors::ConfigError;
use crate::application::messaging::{texts, DispatcherSettings};
use crate::application::services::{ErrorCorrection, QrStyle, MAX_BORDER, MAX_BOX_SIZE};

/// Environment variable holding the Telegram bot token
pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable holding the Postgres connection string
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Telegram holds long polls for at most this many seconds
const MAX_POLL_TIMEOUT: u64 = 50;
/// Upper bound for entries on the history screen
const MAX_HISTORY_LIMIT: usize = 50;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub database: DatabaseConfig,
    pub qr: QrConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    /// Photo sent with the welcome screen on /start
    pub logo_path: PathBuf,
    pub history_limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donate_text: Option<String>,
    /// Offset applied to history timestamps, in whole hours
    pub utc_offset_hours: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub api_base: String,
    /// Long polling timeout in seconds
    pub poll_timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_attempts: u32,
    pub connect_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct QrConfig {
    pub box_size: u32,
    pub border: u32,
    pub error_correction: ErrorCorrection,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "qr-bot".to_string(),
            logo_path: PathBuf::from("assets/logo.png"),
            history_limit: 5,
            donate_text: None,
            utc_offset_hours: 0,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.telegram.org".to_string(),
            poll_timeout: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            connect_attempts: 10,
            connect_delay_secs: 2,
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        let style = QrStyle::default();
        Self {
            box_size: style.box_size,
            border: style.border,
            error_correction: style.error_correction,
        }
    }
}

/// Credentials required to run against Telegram and Postgres
#[derive(Debug, Clone)]
pub struct RunCredentials {
    pub token: String,
    pub database_url: String,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults, then the YAML file if it exists, then the process environment
    pub fn load_env(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Config::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config {}: {}, using defaults", path.display(), e);
                Config::default()
            })
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Overlay values found through `lookup`; empty values are ignored
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(TOKEN_ENV) {
            self.telegram.token = Some(token);
        }
        if let Some(url) = non_empty(DATABASE_URL_ENV) {
            self.database.url = Some(url);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_BOX_SIZE).contains(&self.qr.box_size) {
            return Err(ConfigError::InvalidValue(format!(
                "qr.box-size must be between 1 and {}",
                MAX_BOX_SIZE
            )));
        }
        if self.qr.border > MAX_BORDER {
            return Err(ConfigError::InvalidValue(format!(
                "qr.border must be at most {}",
                MAX_BORDER
            )));
        }
        if !(1..=MAX_HISTORY_LIMIT).contains(&self.bot.history_limit) {
            return Err(ConfigError::InvalidValue(format!(
                "bot.history-limit must be between 1 and {}",
                MAX_HISTORY_LIMIT
            )));
        }
        if self.telegram.poll_timeout > MAX_POLL_TIMEOUT {
            return Err(ConfigError::InvalidValue(format!(
                "telegram.poll-timeout must be at most {}",
                MAX_POLL_TIMEOUT
            )));
        }
        if self.utc_offset().is_none() {
            return Err(ConfigError::InvalidValue(format!(
                "bot.utc-offset-hours out of range: {}",
                self.bot.utc_offset_hours
            )));
        }
        Ok(())
    }

    /// Token and database URL, both mandatory for `run`
    pub fn credentials(&self) -> Result<RunCredentials, ConfigError> {
        let token = self
            .telegram
            .token
            .clone()
            .ok_or(ConfigError::MissingEnv(TOKEN_ENV))?;
        let database_url = self
            .database
            .url
            .clone()
            .ok_or(ConfigError::MissingEnv(DATABASE_URL_ENV))?;
        Ok(RunCredentials { token, database_url })
    }

    fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.bot.utc_offset_hours.checked_mul(3600)?)
    }

    pub fn qr_style(&self) -> QrStyle {
        QrStyle {
            box_size: self.qr.box_size,
            border: self.qr.border,
            error_correction: self.qr.error_correction,
        }
    }

    pub fn dispatcher_settings(&self) -> DispatcherSettings {
        let defaults = DispatcherSettings::default();
        DispatcherSettings {
            logo_path: self.bot.logo_path.clone(),
            history_limit: self.bot.history_limit,
            donate_text: self
                .bot
                .donate_text
                .clone()
                .unwrap_or_else(|| texts::DEFAULT_DONATE.to_string()),
            utc_offset: self.utc_offset().unwrap_or(defaults.utc_offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "bot:\n  history-limit: 10\nqr:\n  error-correction: low\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.bot.history_limit, 10);
        assert_eq!(config.bot.name, "qr-bot");
        assert_eq!(config.qr.error_correction, ErrorCorrection::Low);
        assert_eq!(config.qr.box_size, 10);
        assert_eq!(config.telegram.poll_timeout, 30);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(Config::from_yaml("qr:\n  box-size: 0\n").is_err());
        assert!(Config::from_yaml("bot:\n  utc-offset-hours: 30\n").is_err());
        assert!(Config::from_yaml("qr:\n  error-correction: extreme\n").is_err());
    }

    #[test]
    fn rejects_values_that_would_overflow() {
        assert!(Config::from_yaml("qr:\n  box-size: 4294967295\n").is_err());
        assert!(Config::from_yaml("qr:\n  box-size: 21\n").is_err());
        assert!(Config::from_yaml("qr:\n  border: 11\n").is_err());
        assert!(Config::from_yaml("telegram:\n  poll-timeout: 18446744073709551615\n").is_err());
        assert!(Config::from_yaml("bot:\n  history-limit: 1000\n").is_err());

        let edge = "qr:\n  box-size: 20\n  border: 10\ntelegram:\n  poll-timeout: 50\n";
        let config = Config::from_yaml(edge).unwrap();
        assert_eq!(config.qr_style().box_size, MAX_BOX_SIZE);
    }

    #[test]
    fn environment_overrides_file() {
        let env: HashMap<&str, &str> = [(TOKEN_ENV, "123:abc"), (DATABASE_URL_ENV, "postgres://db/qr")]
            .into_iter()
            .collect();
        let mut config = Config::from_yaml("telegram:\n  token: from-file\n").unwrap();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        let creds = config.credentials().unwrap();
        assert_eq!(creds.token, "123:abc");
        assert_eq!(creds.database_url, "postgres://db/qr");
    }

    #[test]
    fn missing_credentials_are_reported() {
        let mut config = Config::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert!(matches!(config.credentials(), Err(ConfigError::MissingEnv(TOKEN_ENV))));

        config.telegram.token = Some("t".to_string());
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingEnv(DATABASE_URL_ENV))
        ));
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.bot.logo_path, PathBuf::from("assets/logo.png"));
    }

    #[test]
    fn dispatcher_settings_follow_config() {
        let config = Config::from_yaml("bot:\n  utc-offset-hours: 3\n  donate-text: thanks\n").unwrap();
        let settings = config.dispatcher_settings();
        assert_eq!(settings.donate_text, "thanks");
        assert_eq!(settings.utc_offset.local_minus_utc(), 3 * 3600);
    }
}
