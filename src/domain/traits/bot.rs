use async_trait::async_trait;
use std::path::PathBuf;

use crate::application::errors::BotError;
use crate::domain::entities::MessageRef;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a text message, returning its message id
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &SendOptions,
    ) -> Result<i64, BotError>;

    /// Send a photo with an optional caption
    async fn send_photo(
        &self,
        chat_id: i64,
        photo: PhotoSource,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> Result<i64, BotError>;

    /// Replace the text of a text message
    async fn edit_message_text(
        &self,
        target: MessageRef,
        text: &str,
        options: &SendOptions,
    ) -> Result<(), BotError>;

    /// Replace the caption of a media message
    async fn edit_message_caption(
        &self,
        target: MessageRef,
        caption: &str,
        options: &SendOptions,
    ) -> Result<(), BotError>;

    /// Answer a callback query
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Keyboard button for inline keyboards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
    pub callback_data: Option<String>,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
        }
    }

    pub fn with_callback(mut self, data: impl Into<String>) -> Self {
        self.callback_data = Some(data.into());
        self
    }
}

/// Rows of inline buttons
pub type Keyboard = Vec<Vec<KeyboardButton>>;

/// Telegram text formatting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Markdown => "Markdown",
        }
    }
}

/// Reply markup and formatting shared by all outgoing calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub keyboard: Option<Keyboard>,
    pub parse_mode: Option<ParseMode>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn markdown(mut self) -> Self {
        self.parse_mode = Some(ParseMode::Markdown);
        self
    }
}

/// Where the bytes of an outgoing photo come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSource {
    Bytes { data: Vec<u8>, file_name: String },
    Path(PathBuf),
}

impl PhotoSource {
    pub fn png(data: Vec<u8>) -> Self {
        PhotoSource::Bytes {
            data,
            file_name: "qr.png".to_string(),
        }
    }
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
