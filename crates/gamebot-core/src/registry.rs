//! Static command and menu texts.
//!
//! Every builder is pure; the same builder serves a slash command and its menu
//! button so both produce identical output.

use crate::domain::UserProfile;

pub const CMD_START: &str = "/start";
pub const CMD_HELP: &str = "/help";
pub const CMD_PROFILE: &str = "/profile";
pub const CMD_GAMES: &str = "/games";

pub const BUTTON_PROFILE: &str = "👤 Profile";
pub const BUTTON_GAMES: &str = "🎮 Games";
pub const BUTTON_HELP: &str = "ℹ️ Help";

const NOT_SET: &str = "not set";

/// Which registry text a command or button resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Profile,
    Games,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CommandRegistry;

impl CommandRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, command: Command, user: &UserProfile) -> String {
        match command {
            Command::Start => welcome_text(&user.first_name),
            Command::Help => help_text(),
            Command::Profile => profile_text(user),
            Command::Games => games_text(),
        }
    }
}

pub fn welcome_text(first_name: &str) -> String {
    format!(
        "
👋 Hi, {first_name}!

🤖 I'm your Telegram bot!

📱 Use the buttons or commands:
/start - Start
/help - Help
/profile - Profile
/games - Games

🎮 Available games:
• Guess the number (1-100)
• Rock-Paper-Scissors
"
    )
}

pub fn help_text() -> String {
    "
📚 HELP

Commands:
/start - Get started
/help - This help
/profile - Your profile
/games - Games

Games:
1. Guess the number - send a number from 1 to 100
2. RPS - send: rock, scissors or paper

Buttons:
👤 Profile - information about you
🎮 Games - pick a game
ℹ️ Help - this help
"
    .to_string()
}

pub fn profile_text(user: &UserProfile) -> String {
    let last_name = user.last_name.as_deref().unwrap_or(NOT_SET);
    let handle = user.handle.as_deref().unwrap_or(NOT_SET);
    let is_bot = if user.is_bot { "✅ Yes" } else { "❌ No" };

    format!(
        "
👤 YOUR PROFILE

🆔 ID: {id}
👤 First name: {first_name}
📛 Last name: {last_name}
🔗 Username: @{handle}
🤖 Bot: {is_bot}
",
        id = user.id.0,
        first_name = user.first_name,
    )
}

pub fn games_text() -> String {
    "
🎮 AVAILABLE GAMES

1. 🎲 Guess the number
   Send a number from 1 to 100
   I'll pick a number and tell you higher or lower

2. ✂️ Rock-Paper-Scissors
   Send: rock, scissors or paper
   Let's play the classic game

How to play:
Just send a message with:
- A number from 1 to 100
- Or a word: rock, scissors, paper
"
    .to_string()
}
