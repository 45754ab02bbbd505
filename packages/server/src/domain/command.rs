//! Slash commands typed into the chat box.

/// Reply text for `/help`
pub const HELP_TEXT: &str = concat!(
    "Available commands: /help (show this list), ",
    "/users (list users in this room), ",
    "/time (show server time)"
);

/// Command recognized by a leading `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Users,
    Time,
    Unknown(String),
}

impl ChatCommand {
    /// Parse a trimmed message. Returns `None` when the text is not a command.
    pub fn parse(text: &str) -> Option<Self> {
        let body = text.strip_prefix('/')?;
        let name = body.split_whitespace().next().unwrap_or_default();

        let command = match name.to_ascii_lowercase().as_str() {
            "help" => Self::Help,
            "users" => Self::Users,
            "time" => Self::Time,
            _ => Self::Unknown(name.to_string()),
        };
        Some(command)
    }
}
