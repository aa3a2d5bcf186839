//! Console adapter for development/testing

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::application::errors::BotError;
use crate::domain::entities::MessageRef;
use crate::domain::traits::{Bot, BotInfo, Keyboard, PhotoSource, SendOptions};

/// Chat id used for everything typed into the console
pub const CONSOLE_CHAT: i64 = 1;

/// Console bot adapter for local development.
///
/// Texts and keyboards are printed; photos are written to `out_dir`.
pub struct ConsoleAdapter {
    info: BotInfo,
    out_dir: PathBuf,
    last_message: AtomicI64,
}

impl ConsoleAdapter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "qr-bot".to_string(),
                username: "console".to_string(),
            },
            out_dir: out_dir.into(),
            last_message: AtomicI64::new(0),
        }
    }

    /// The most recent message "sent", so button presses can target it
    pub fn last_message(&self) -> Option<MessageRef> {
        match self.last_message.load(Ordering::SeqCst) {
            0 => None,
            message_id => Some(MessageRef { chat_id: CONSOLE_CHAT, message_id }),
        }
    }

    fn next_id(&self) -> i64 {
        self.last_message.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn print_keyboard(keyboard: Option<&Keyboard>) {
        for row in keyboard.into_iter().flatten() {
            let row_text: Vec<String> = row
                .iter()
                .map(|b| match &b.callback_data {
                    Some(data) => format!("{} [#{}]", b.text, data),
                    None => b.text.clone(),
                })
                .collect();
            println!("  [Buttons] {}", row_text.join(" | "));
        }
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn send_message(
        &self,
        _chat_id: i64,
        text: &str,
        options: &SendOptions,
    ) -> Result<i64, BotError> {
        println!("[BOT] {}", text.trim());
        Self::print_keyboard(options.keyboard.as_ref());
        Ok(self.next_id())
    }

    async fn send_photo(
        &self,
        _chat_id: i64,
        photo: PhotoSource,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> Result<i64, BotError> {
        let id = self.next_id();
        match photo {
            PhotoSource::Bytes { data, .. } => {
                tokio::fs::create_dir_all(&self.out_dir)
                    .await
                    .map_err(|e| BotError::Internal(e.to_string()))?;
                let path = self.out_dir.join(format!("qr-{}.png", id));
                tokio::fs::write(&path, data)
                    .await
                    .map_err(|e| BotError::Internal(e.to_string()))?;
                println!("[BOT] <photo saved to {}>", path.display());
            }
            PhotoSource::Path(path) => println!("[BOT] <photo {}>", path.display()),
        }
        if let Some(caption) = caption {
            println!("[BOT] {}", caption.trim());
        }
        Self::print_keyboard(options.keyboard.as_ref());
        Ok(id)
    }

    async fn edit_message_text(
        &self,
        target: MessageRef,
        text: &str,
        options: &SendOptions,
    ) -> Result<(), BotError> {
        println!("[BOT edit #{}] {}", target.message_id, text.trim());
        Self::print_keyboard(options.keyboard.as_ref());
        Ok(())
    }

    async fn edit_message_caption(
        &self,
        target: MessageRef,
        caption: &str,
        options: &SendOptions,
    ) -> Result<(), BotError> {
        self.edit_message_text(target, caption, options).await
    }

    async fn answer_callback(
        &self,
        _callback_id: &str,
        _text: Option<&str>,
    ) -> Result<(), BotError> {
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
