use super::Sender;

/// Type of message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Text,
    Command,
    Callback,
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Text => "text",
            MessageType::Command => "command",
            MessageType::Callback => "callback",
        }
    }
}

/// A message the bot has already sent, addressable for edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
    Callback {
        query_id: String,
        data: String,
        /// Message carrying the pressed keyboard, if Telegram still has it
        origin: Option<MessageRef>,
    },
}

/// Represents an incoming message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: Option<i64>,
    pub chat_id: i64,
    pub sender: Sender,
    pub content: Content,
    pub message_type: MessageType,
}

impl Message {
    pub fn new(chat_id: i64, sender: Sender, content: Content) -> Self {
        let message_type = match content {
            Content::Text(_) => MessageType::Text,
            Content::Command { .. } => MessageType::Command,
            Content::Callback { .. } => MessageType::Callback,
        };
        Self {
            id: None,
            chat_id,
            sender,
            content,
            message_type,
        }
    }

    pub fn from_text(chat_id: i64, sender: Sender, text: impl Into<String>) -> Self {
        Self::new(chat_id, sender, Content::Text(text.into()))
    }

    pub fn from_command(
        chat_id: i64,
        sender: Sender,
        name: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self::new(chat_id, sender, Content::Command { name: name.into(), args })
    }

    pub fn from_callback(
        chat_id: i64,
        sender: Sender,
        query_id: impl Into<String>,
        data: impl Into<String>,
        origin: Option<MessageRef>,
    ) -> Self {
        Self::new(
            chat_id,
            sender,
            Content::Callback {
                query_id: query_id.into(),
                data: data.into(),
                origin,
            },
        )
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
