//! Inline keyboards shown by the bot

use super::callback::CallbackAction;
use crate::domain::entities::{ColorChoice, PALETTE};
use crate::domain::traits::{Keyboard, KeyboardButton};

fn button(text: &str, action: CallbackAction) -> KeyboardButton {
    KeyboardButton::new(text).with_callback(action.to_data())
}

/// Main menu, one action per row
pub fn main_menu() -> Keyboard {
    vec![
        vec![button("🆕 Создать QR-код", CallbackAction::CreateQr)],
        vec![button("📜 История", CallbackAction::ShowHistory)],
        vec![button("ℹ️ Помощь", CallbackAction::Help)],
        vec![button("❤️ Поддержать создателя", CallbackAction::Donate)],
    ]
}

pub fn back_to_menu() -> Keyboard {
    vec![vec![button("🏡 Главное меню", CallbackAction::MainMenu)]]
}

/// Palette presets followed by a back button
pub fn colors() -> Keyboard {
    let mut rows: Keyboard = PALETTE
        .iter()
        .map(|preset| {
            let choice = ColorChoice::new(preset.fill, preset.background);
            vec![button(preset.label, CallbackAction::PickColor(choice))]
        })
        .collect();
    rows.push(vec![button("⬅️ Назад", CallbackAction::BackToMenu)]);
    rows
}
