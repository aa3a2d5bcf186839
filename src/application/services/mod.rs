//! Application services - Business logic orchestration

pub mod history;
pub mod qr;
pub mod session;

pub use history::{format_history, telegram_len, CAPTION_LIMIT};
pub use qr::{ErrorCorrection, QrRenderer, QrStyle, MAX_BORDER, MAX_BOX_SIZE};
pub use session::SessionStore;
