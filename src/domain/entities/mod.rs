//! Domain entities - Core business objects with no external dependencies

pub mod color;
pub mod command;
pub mod history;
pub mod message;
pub mod request;
pub mod user;

pub use color::{ColorChoice, Preset, Rgb, PALETTE};
pub use command::BotCommand;
pub use history::{NewQrRecord, QrRecord};
pub use message::{Content, Message, MessageRef, MessageType};
pub use request::QrRequest;
pub use user::{Sender, User};
