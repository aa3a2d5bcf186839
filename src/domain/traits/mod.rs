//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod store;

pub use bot::{Bot, BotInfo, Keyboard, KeyboardButton, ParseMode, PhotoSource, SendOptions};
pub use store::Store;
