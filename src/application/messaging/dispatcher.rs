//! Message dispatcher - Routes messages to handlers

use chrono::{FixedOffset, Offset, Utc};
use std::path::PathBuf;

use super::callback::CallbackAction;
use super::{keyboards, texts};
use crate::application::errors::{BotError, QrError};
use crate::application::services::{format_history, QrRenderer, SessionStore};
use crate::domain::entities::{
    BotCommand, Content, Message, MessageRef, NewQrRecord, QrRequest, Sender,
};
use crate::domain::traits::{Bot, PhotoSource, SendOptions, Store};

/// Handler result
pub type HandlerResult = Result<(), BotError>;

/// Knobs the dispatcher needs from configuration
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    pub logo_path: PathBuf,
    pub history_limit: usize,
    pub donate_text: String,
    /// Offset used when printing history timestamps
    pub utc_offset: FixedOffset,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            logo_path: PathBuf::from("assets/logo.png"),
            history_limit: 5,
            donate_text: texts::DEFAULT_DONATE.to_string(),
            utc_offset: Utc.fix(),
        }
    }
}

/// Message dispatcher - routes commands, texts and button presses to handlers
pub struct Dispatcher<B: Bot, S: Store> {
    bot: B,
    store: S,
    sessions: SessionStore,
    renderer: QrRenderer,
    settings: DispatcherSettings,
}

impl<B: Bot, S: Store> Dispatcher<B, S> {
    pub fn new(bot: B, store: S, renderer: QrRenderer, settings: DispatcherSettings) -> Self {
        Self {
            bot,
            store,
            sessions: SessionStore::new(),
            renderer,
            settings,
        }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Process a message through the dispatcher
    pub async fn handle(&self, message: Message) -> HandlerResult {
        tracing::debug!(
            "[{}] {} from {}",
            message.chat_id,
            message.message_type.as_str(),
            message.sender.id
        );

        match &message.content {
            Content::Command { name, .. } => self.on_command(&message, name).await,
            Content::Text(text) => self.on_text(&message, text).await,
            Content::Callback { query_id, data, origin } => {
                self.on_callback(&message, query_id, data, *origin).await
            }
        }
    }

    async fn on_command(&self, message: &Message, name: &str) -> HandlerResult {
        let Some(command) = BotCommand::find(name) else {
            tracing::debug!("Ignoring unknown command /{}", name);
            return Ok(());
        };

        match command {
            BotCommand::Start => self.start(message.chat_id, &message.sender).await,
            BotCommand::Help => {
                self.bot
                    .send_message(message.chat_id, texts::HELP, &Self::back_markdown())
                    .await?;
                Ok(())
            }
            BotCommand::History => {
                let text = self.history_text(&message.sender).await?;
                self.bot
                    .send_message(message.chat_id, &text, &Self::back_markdown())
                    .await?;
                Ok(())
            }
        }
    }

    /// Register the user and show the welcome screen, with the logo when available
    async fn start(&self, chat_id: i64, sender: &Sender) -> HandlerResult {
        match self
            .store
            .ensure_user(&sender.user_id(), sender.first_name.as_deref())
            .await
        {
            Ok(true) => tracing::info!("New user {} ({})", sender.id, sender),
            Ok(false) => {}
            Err(e) => tracing::error!("Failed to register user {}: {}", sender.id, e),
        }

        let name = sender.display_name();
        let welcome = texts::welcome(Some(name.as_str()));
        let options = SendOptions::new()
            .with_keyboard(keyboards::main_menu())
            .markdown();

        if self.settings.logo_path.is_file() {
            let logo = PhotoSource::Path(self.settings.logo_path.clone());
            self.bot.send_photo(chat_id, logo, Some(&welcome), &options).await?;
        } else {
            self.bot.send_message(chat_id, &welcome, &options).await?;
        }
        Ok(())
    }

    async fn on_callback(
        &self,
        message: &Message,
        query_id: &str,
        data: &str,
        origin: Option<MessageRef>,
    ) -> HandlerResult {
        if let Err(e) = self.bot.answer_callback(query_id, None).await {
            tracing::warn!("Failed to answer callback {}: {}", query_id, e);
        }

        let Some(action) = CallbackAction::parse(data) else {
            tracing::debug!("Ignoring unknown callback data {:?}", data);
            return Ok(());
        };

        match action {
            CallbackAction::CreateQr => {
                let options = SendOptions::new().with_keyboard(keyboards::colors());
                self.show(message.chat_id, origin, texts::COLOR_PROMPT, &options).await
            }
            CallbackAction::ShowHistory => {
                let text = self.history_text(&message.sender).await?;
                self.show(message.chat_id, origin, &text, &Self::back_markdown()).await
            }
            CallbackAction::Help => {
                self.show(message.chat_id, origin, texts::HELP, &Self::back_markdown()).await
            }
            CallbackAction::Donate => {
                let text = self.settings.donate_text.clone();
                self.show(message.chat_id, origin, &text, &Self::back_markdown()).await
            }
            CallbackAction::MainMenu | CallbackAction::BackToMenu => {
                let options = SendOptions::new()
                    .with_keyboard(keyboards::main_menu())
                    .markdown();
                self.show(message.chat_id, origin, &texts::welcome(None), &options).await
            }
            CallbackAction::PickColor(choice) => {
                tracing::debug!(
                    "User {} picked {} on {}",
                    message.sender.id,
                    choice.fill,
                    choice.background
                );
                self.sessions.set_colors(message.sender.id, choice).await;
                self.show(message.chat_id, origin, texts::COLOR_CHOSEN, &Self::back_markdown())
                    .await
            }
        }
    }

    /// Turn a text into a QR code, remember it and return to the menu
    async fn on_text(&self, message: &Message, text: &str) -> HandlerResult {
        let chat_id = message.chat_id;
        let sender = &message.sender;

        let defaults = self.sessions.colors(sender.id).await;
        let request = QrRequest::parse(text, &defaults);

        let png = match self.renderer.render(&request.data, &request.colors) {
            Ok(png) => png,
            Err(QrError::InvalidColor(spec)) => {
                tracing::info!("User {} sent unknown color {:?}", sender.id, spec);
                let options = SendOptions::new().markdown();
                self.bot
                    .send_message(chat_id, &texts::invalid_color(&spec), &options)
                    .await?;
                return Ok(());
            }
            Err(QrError::EmptyPayload) => {
                self.bot
                    .send_message(chat_id, texts::EMPTY_PAYLOAD, &SendOptions::new())
                    .await?;
                return Ok(());
            }
            Err(QrError::Encode(e)) => {
                tracing::warn!(
                    "Cannot encode {} bytes for {}: {}",
                    request.data.len(),
                    sender.id,
                    e
                );
                self.bot
                    .send_message(chat_id, texts::TOO_LONG, &SendOptions::new())
                    .await?;
                return Ok(());
            }
            Err(e) => {
                tracing::error!("Rendering failed for {}: {}", sender.id, e);
                self.bot
                    .send_message(chat_id, texts::RENDER_FAILED, &SendOptions::new())
                    .await?;
                return Err(e.into());
            }
        };

        let record = NewQrRecord {
            user_id: sender.user_id(),
            data: request.data,
            fill_color: request.colors.fill,
            bg_color: request.colors.background,
        };
        if let Err(e) = self.store.add_history(&record).await {
            tracing::error!("Failed to save history for {}: {}", sender.id, e);
        }

        let options = SendOptions::new().with_keyboard(keyboards::back_to_menu());
        self.bot
            .send_photo(chat_id, PhotoSource::png(png), Some(texts::QR_CAPTION), &options)
            .await?;

        self.start(chat_id, sender).await
    }

    /// Replace the screen behind a button; falls back to the caption when the
    /// message is a photo, and to a new message when there is nothing to edit
    async fn show(
        &self,
        chat_id: i64,
        origin: Option<MessageRef>,
        text: &str,
        options: &SendOptions,
    ) -> HandlerResult {
        let Some(target) = origin else {
            self.bot.send_message(chat_id, text, options).await?;
            return Ok(());
        };

        if let Err(e) = self.bot.edit_message_text(target, text, options).await {
            tracing::debug!("Text edit failed ({}), editing caption", e);
            self.bot.edit_message_caption(target, text, options).await?;
        }
        Ok(())
    }

    async fn history_text(&self, sender: &Sender) -> Result<String, BotError> {
        let records = self
            .store
            .recent_history(&sender.user_id(), self.settings.history_limit)
            .await?;
        Ok(format_history(&records, self.settings.utc_offset))
    }

    fn back_markdown() -> SendOptions {
        SendOptions::new()
            .with_keyboard(keyboards::back_to_menu())
            .markdown()
    }
}
