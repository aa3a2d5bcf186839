//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Message, MessageRef, Sender};

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
        }
    }

    /// Accept `/command@username` addressed to this bot
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: i64, text: impl Into<String>, sender: Sender) -> Option<Message> {
        let text = text.into();

        if text.starts_with(&self.command_prefix) {
            return self.parse_command(chat_id, &text, sender);
        }

        Some(Message::from_text(chat_id, sender, text))
    }

    /// Parse a command message. Commands addressed to another bot are dropped.
    fn parse_command(&self, chat_id: i64, text: &str, sender: Sender) -> Option<Message> {
        let cmd_text = &text[self.command_prefix.len()..];

        let mut parts = cmd_text.split_whitespace();
        let head = parts.next().unwrap_or_default();
        let args = parts.map(|s| s.to_string()).collect();

        let name = match head.split_once('@') {
            Some((name, target)) => {
                let ours = self
                    .bot_username
                    .as_deref()
                    .map_or(true, |me| me.eq_ignore_ascii_case(target));
                if !ours {
                    return None;
                }
                name
            }
            None => head,
        };

        Some(Message::from_command(chat_id, sender, name, args))
    }

    /// Parse a callback query (inline button press)
    pub fn parse_callback(
        &self,
        query_id: impl Into<String>,
        data: impl Into<String>,
        sender: Sender,
        origin: Option<MessageRef>,
    ) -> Message {
        // Callbacks from inline messages have no chat; answer in the private chat
        let chat_id = origin.map(|m| m.chat_id).unwrap_or(sender.id);
        Message::from_callback(chat_id, sender, query_id, data, origin)
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new("/")
    }
}
