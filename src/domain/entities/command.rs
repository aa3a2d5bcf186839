/// Slash commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotCommand {
    Start,
    Help,
    History,
}

impl BotCommand {
    pub const ALL: [BotCommand; 3] = [BotCommand::Start, BotCommand::Help, BotCommand::History];

    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::Help => "help",
            BotCommand::History => "history",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BotCommand::Start => "Главное меню",
            BotCommand::Help => "Как пользоваться ботом",
            BotCommand::History => "Последние QR-коды",
        }
    }

    /// Look up a command by name, ignoring case
    pub fn find(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}
