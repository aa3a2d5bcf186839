//! Telegram adapter

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{BotCommand, Message as DomainMessage, MessageRef, Sender};
use crate::domain::traits::{Bot, BotInfo, Keyboard, PhotoSource, SendOptions};

/// Telegram API base URL
pub const API_BASE: &str = "https://api.telegram.org";

/// Telegram refuses edits that change nothing; those count as success
const NOT_MODIFIED: &str = "message is not modified";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl From<&User> for Sender {
    fn from(user: &User) -> Self {
        Sender {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
        }
    }
}

/// Envelope around every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResult {
    message_id: i64,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(buttons: &Keyboard) -> Self {
        let inline_keyboard = buttons
            .iter()
            .map(|row| {
                row.iter()
                    .map(|btn| InlineKeyboardButton {
                        text: btn.text.clone(),
                        callback_data: btn.callback_data.clone(),
                    })
                    .collect()
            })
            .collect();
        Self { inline_keyboard }
    }
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    api_base: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, API_BASE)
    }

    /// Use a different Bot API server, e.g. a self-hosted one
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "qr-bot".to_string(),
                username: "qr_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Token prefix that is safe to log
    fn token_hint(&self) -> &str {
        let end = self
            .token
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.token.len());
        &self.token[..end]
    }

    async fn read_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BotError> {
        let status = response.status();
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} (HTTP {})", e, status)))?;

        if !body.ok {
            return Err(BotError::Api(
                body.description.unwrap_or_else(|| format!("HTTP {}", status)),
            ));
        }

        body.result
            .ok_or_else(|| BotError::Parse("response without result".to_string()))
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, BotError> {
        let response = self.client.post(self.api_url(method)).json(body).send().await?;
        Self::read_response(response).await
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let response = self.client.get(self.api_url("getMe")).send().await?;
        let data: BotInfoResponse = Self::read_response(response).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            name: data.first_name,
            username: data.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string(), "callback_query".to_string()],
        };

        // Leave headroom over the long-poll timeout
        let response = self
            .client
            .post(self.api_url("getUpdates"))
            .timeout(Duration::from_secs(timeout.saturating_add(10)))
            .json(&request)
            .send()
            .await?;

        Self::read_response(response).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> Option<i64> {
        updates.iter().map(|u| u.update_id + 1).max()
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let commands = BotCommand::ALL
            .iter()
            .map(|c| Command {
                command: c.name().to_string(),
                description: c.description().to_string(),
            })
            .collect();

        let _: bool = self
            .call("setMyCommands", &SetMyCommandsRequest { commands })
            .await?;

        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }

    /// Convert an update into a domain message; unsupported updates yield `None`
    pub fn to_message(&self, update: &Update) -> Option<DomainMessage> {
        let parser = MessageParser::default().with_bot_username(&self.info.username);

        if let Some(msg) = &update.message {
            let sender = Sender::from(msg.from.as_ref()?);
            let text = msg.text.as_ref()?;
            return parser
                .parse(msg.chat.id, text.as_str(), sender)
                .map(|m| m.with_id(msg.message_id));
        }

        if let Some(cb) = &update.callback_query {
            let data = cb.data.as_ref()?;
            let origin = cb.message.as_ref().map(|m| MessageRef {
                chat_id: m.chat.id,
                message_id: m.message_id,
            });
            return Some(parser.parse_callback(cb.id.as_str(), data.as_str(), Sender::from(&cb.from), origin));
        }

        None
    }

    async fn photo_part(photo: PhotoSource) -> Result<Part, BotError> {
        match photo {
            PhotoSource::Bytes { data, file_name } => Ok(Part::bytes(data).file_name(file_name)),
            PhotoSource::Path(path) => {
                let data = tokio::fs::read(&path)
                    .await
                    .map_err(|e| BotError::Internal(format!("Cannot read {}: {}", path.display(), e)))?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "photo".to_string());
                Ok(Part::bytes(data).file_name(file_name))
            }
        }
    }

    fn ignore_not_modified(result: Result<serde_json::Value, BotError>) -> Result<(), BotError> {
        match result {
            Ok(_) => Ok(()),
            Err(BotError::Api(description)) if description.contains(NOT_MODIFIED) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &SendOptions,
    ) -> Result<i64, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: i64,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'static str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<InlineKeyboardMarkup>,
        }

        tracing::debug!("Sending to {}: {}", chat_id, text);

        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: options.parse_mode.map(|p| p.as_str()),
            reply_markup: options.keyboard.as_ref().map(InlineKeyboardMarkup::from),
        };

        let result: MessageResult = self.call("sendMessage", &request).await?;
        Ok(result.message_id)
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo: PhotoSource,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> Result<i64, BotError> {
        tracing::debug!("Sending photo to {}", chat_id);

        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", Self::photo_part(photo).await?);

        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }
        if let Some(mode) = options.parse_mode {
            form = form.text("parse_mode", mode.as_str());
        }
        if let Some(keyboard) = &options.keyboard {
            let markup = serde_json::to_string(&InlineKeyboardMarkup::from(keyboard))
                .map_err(|e| BotError::Internal(e.to_string()))?;
            form = form.text("reply_markup", markup);
        }

        let response = self
            .client
            .post(self.api_url("sendPhoto"))
            .multipart(form)
            .send()
            .await?;

        let result: MessageResult = Self::read_response(response).await?;
        Ok(result.message_id)
    }

    async fn edit_message_text(
        &self,
        target: MessageRef,
        text: &str,
        options: &SendOptions,
    ) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct EditTextRequest<'a> {
            chat_id: i64,
            message_id: i64,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'static str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<InlineKeyboardMarkup>,
        }

        let request = EditTextRequest {
            chat_id: target.chat_id,
            message_id: target.message_id,
            text,
            parse_mode: options.parse_mode.map(|p| p.as_str()),
            reply_markup: options.keyboard.as_ref().map(InlineKeyboardMarkup::from),
        };

        Self::ignore_not_modified(self.call("editMessageText", &request).await)
    }

    async fn edit_message_caption(
        &self,
        target: MessageRef,
        caption: &str,
        options: &SendOptions,
    ) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct EditCaptionRequest<'a> {
            chat_id: i64,
            message_id: i64,
            caption: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'static str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<InlineKeyboardMarkup>,
        }

        let request = EditCaptionRequest {
            chat_id: target.chat_id,
            message_id: target.message_id,
            caption,
            parse_mode: options.parse_mode.map(|p| p.as_str()),
            reply_markup: options.keyboard.as_ref().map(InlineKeyboardMarkup::from),
        };

        Self::ignore_not_modified(self.call("editMessageCaption", &request).await)
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct AnswerRequest<'a> {
            callback_query_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
        }

        let request = AnswerRequest {
            callback_query_id: callback_id,
            text,
        };

        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

impl TelegramAdapter {
    /// Log which bot this adapter talks to, without leaking the token
    pub fn describe(&self) -> String {
        format!("@{} (token: {}...)", self.info.username, self.token_hint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Content;
    use crate::domain::traits::KeyboardButton;

    fn update(json: serde_json::Value) -> Update {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn text_update_becomes_text_message() {
        let adapter = TelegramAdapter::new("123:abc");
        let msg = adapter
            .to_message(&update(serde_json::json!({
                "update_id": 10,
                "message": {
                    "message_id": 5,
                    "from": { "id": 42, "first_name": "Ann" },
                    "chat": { "id": 42 },
                    "text": "https://example.com"
                }
            })))
            .unwrap();

        assert_eq!(msg.id, Some(5));
        assert_eq!(msg.sender.first_name.as_deref(), Some("Ann"));
        assert_eq!(msg.content, Content::Text("https://example.com".to_string()));
    }

    #[test]
    fn callback_update_keeps_origin() {
        let adapter = TelegramAdapter::new("123:abc");
        let msg = adapter
            .to_message(&update(serde_json::json!({
                "update_id": 11,
                "callback_query": {
                    "id": "cb1",
                    "from": { "id": 42 },
                    "message": { "message_id": 9, "chat": { "id": 42 } },
                    "data": "create_qr"
                }
            })))
            .unwrap();

        assert_eq!(
            msg.content,
            Content::Callback {
                query_id: "cb1".to_string(),
                data: "create_qr".to_string(),
                origin: Some(MessageRef { chat_id: 42, message_id: 9 }),
            }
        );
    }

    #[test]
    fn non_text_updates_are_skipped() {
        let adapter = TelegramAdapter::new("123:abc");
        let sticker = update(serde_json::json!({
            "update_id": 12,
            "message": { "message_id": 1, "from": { "id": 1 }, "chat": { "id": 1 } }
        }));
        assert!(adapter.to_message(&sticker).is_none());
        assert!(adapter.to_message(&update(serde_json::json!({ "update_id": 13 }))).is_none());
    }

    #[test]
    fn next_offset_follows_highest_update() {
        let updates = vec![
            update(serde_json::json!({ "update_id": 7 })),
            update(serde_json::json!({ "update_id": 9 })),
        ];
        assert_eq!(TelegramAdapter::get_next_offset(&updates), Some(10));
        assert_eq!(TelegramAdapter::get_next_offset(&[]), None);
    }

    #[test]
    fn keyboard_serializes_without_empty_fields() {
        let keyboard = vec![vec![KeyboardButton::new("Go").with_callback("main_menu")]];
        let json = serde_json::to_value(InlineKeyboardMarkup::from(&keyboard)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "inline_keyboard": [[{ "text": "Go", "callback_data": "main_menu" }]] })
        );
    }

    #[test]
    fn not_modified_edits_are_ok() {
        let err = BotError::Api("Bad Request: message is not modified".to_string());
        assert!(TelegramAdapter::ignore_not_modified(Err(err)).is_ok());
        let err = BotError::Api("Bad Request: message to edit not found".to_string());
        assert!(TelegramAdapter::ignore_not_modified(Err(err)).is_err());
    }

    #[test]
    fn token_is_truncated_for_logs() {
        let adapter = TelegramAdapter::new("123456789:secret");
        assert_eq!(adapter.describe(), "@qr_bot (token: 12345678...)");
    }
}
