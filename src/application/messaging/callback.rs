//! Inline button payloads

use crate::domain::entities::ColorChoice;

/// What an inline button asks the bot to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    CreateQr,
    ShowHistory,
    Help,
    Donate,
    MainMenu,
    BackToMenu,
    PickColor(ColorChoice),
}

impl CallbackAction {
    /// Parse button data. Unknown or malformed data yields `None`.
    pub fn parse(data: &str) -> Option<Self> {
        let action = match data {
            "create_qr" => CallbackAction::CreateQr,
            "show_history" => CallbackAction::ShowHistory,
            "help" => CallbackAction::Help,
            "donate" => CallbackAction::Donate,
            "main_menu" => CallbackAction::MainMenu,
            "back_to_menu" => CallbackAction::BackToMenu,
            other => {
                let mut parts = other.split('|');
                if parts.next() != Some("color") {
                    return None;
                }
                let (fill, background) = (parts.next()?, parts.next()?);
                if parts.next().is_some() || fill.is_empty() || background.is_empty() {
                    return None;
                }
                CallbackAction::PickColor(ColorChoice::new(fill, background))
            }
        };
        Some(action)
    }

    /// Button data for this action; stays within Telegram's 64 byte limit
    /// for palette colors
    pub fn to_data(&self) -> String {
        match self {
            CallbackAction::CreateQr => "create_qr".to_string(),
            CallbackAction::ShowHistory => "show_history".to_string(),
            CallbackAction::Help => "help".to_string(),
            CallbackAction::Donate => "donate".to_string(),
            CallbackAction::MainMenu => "main_menu".to_string(),
            CallbackAction::BackToMenu => "back_to_menu".to_string(),
            CallbackAction::PickColor(choice) => {
                format!("color|{}|{}", choice.fill, choice.background)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_actions() {
        assert_eq!(CallbackAction::parse("create_qr"), Some(CallbackAction::CreateQr));
        assert_eq!(CallbackAction::parse("main_menu"), Some(CallbackAction::MainMenu));
        assert_eq!(CallbackAction::parse("back_to_menu"), Some(CallbackAction::BackToMenu));
    }

    #[test]
    fn parses_color_picks() {
        assert_eq!(
            CallbackAction::parse("color|red|white"),
            Some(CallbackAction::PickColor(ColorChoice::new("red", "white")))
        );
    }

    #[test]
    fn rejects_malformed_data() {
        assert_eq!(CallbackAction::parse("color|red"), None);
        assert_eq!(CallbackAction::parse("color|red|white|blue"), None);
        assert_eq!(CallbackAction::parse("color||white"), None);
        assert_eq!(CallbackAction::parse("colour|red|white"), None);
        assert_eq!(CallbackAction::parse("delete_all"), None);
    }

    #[test]
    fn data_parses_back() {
        let actions = [
            CallbackAction::Help,
            CallbackAction::Donate,
            CallbackAction::PickColor(ColorChoice::new("white", "black")),
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.to_data()), Some(action));
        }
    }
}
