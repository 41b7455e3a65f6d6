//! Message routing.
//!
//! Routing is an explicit, ordered rule list: the first rule whose matcher
//! accepts the text selects the route, and exactly one handler runs.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use crate::{
    domain::InboundMessage,
    games::{resolve_guess, resolve_rps, Choice},
    ports::{RandomSource, TranscriptStore},
    registry::{
        Command, CommandRegistry, BUTTON_GAMES, BUTTON_HELP, BUTTON_PROFILE, CMD_GAMES, CMD_HELP,
        CMD_PROFILE, CMD_START,
    },
    Result,
};

const DIGITS_PATTERN: &str = r"^[0-9]+$";

/// What a message resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Command(Command),
    GuessNumber,
    RockPaperScissors,
    Echo,
}

#[derive(Clone, Debug)]
pub enum Matcher {
    /// Case-sensitive whole-text equality.
    Exact(&'static str),
    /// Regex applied to the raw text.
    Pattern(Regex),
    /// Lower-cased text equals one of the words.
    OneOfLowercase(Vec<&'static str>),
    Always,
}

impl Matcher {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Exact(s) => text == *s,
            Self::Pattern(re) => re.is_match(text),
            Self::OneOfLowercase(words) => {
                let lower = text.to_lowercase();
                words.iter().any(|w| *w == lower)
            }
            Self::Always => true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Rule {
    pub matcher: Matcher,
    pub route: Route,
}

impl Rule {
    fn new(matcher: Matcher, route: Route) -> Self {
        Self { matcher, route }
    }
}

/// Text produced for one inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub route: Route,
    pub text: String,
    /// Attach the main menu keyboard.
    pub show_menu: bool,
}

pub struct Dispatcher {
    rules: Vec<Rule>,
    registry: CommandRegistry,
    rng: Arc<dyn RandomSource>,
    store: Arc<dyn TranscriptStore>,
}

impl Dispatcher {
    pub fn new(
        registry: CommandRegistry,
        rng: Arc<dyn RandomSource>,
        store: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self {
            rules: default_rules(),
            registry,
            rng,
            store,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First matching route. Total: the last rule always matches.
    pub fn route(&self, text: &str) -> Route {
        self.rules
            .iter()
            .find(|r| r.matcher.matches(text))
            .map(|r| r.route)
            .unwrap_or(Route::Echo)
    }

    /// Build the reply for an already-routed message.
    pub fn respond(&self, route: Route, msg: &InboundMessage) -> Reply {
        let text = match route {
            Route::Command(cmd) => self.registry.render(cmd, &msg.sender),
            Route::GuessNumber => resolve_guess(&msg.text, self.rng.as_ref()).to_string(),
            Route::RockPaperScissors => match resolve_rps(&msg.text, self.rng.as_ref()) {
                Some(outcome) => outcome.to_string(),
                None => echo_text(&msg.text),
            },
            Route::Echo => echo_text(&msg.text),
        };

        Reply {
            route,
            text,
            show_menu: route == Route::Command(Command::Start),
        }
    }

    /// Route the message, record it in the transcript and build the reply.
    ///
    /// The sender is upserted before the inbound line is written; the store
    /// keeps the first row, so repeat senders are a no-op. Store failures are
    /// logged and the reply is produced regardless.
    pub async fn dispatch(&self, msg: &InboundMessage) -> Reply {
        let route = self.route(&msg.text);
        debug!(user_id = msg.sender.id.0, ?route, "dispatching message");

        let sender = &msg.sender;
        log_store_failure(
            "upsert_user",
            self.store
                .upsert_user(sender.id, sender.handle.as_deref(), &sender.first_name)
                .await,
        );

        log_store_failure(
            "append_message",
            self.store
                .append_message(msg.sender.id, &msg.text, false)
                .await,
        );

        self.respond(route, msg)
    }
}

pub fn echo_text(text: &str) -> String {
    format!("💬 You wrote: {text}\n\nUse the buttons or commands!")
}

pub(crate) fn log_store_failure(op: &str, res: Result<()>) {
    if let Err(e) = res {
        warn!(op, "transcript write failed: {e}");
    }
}

fn default_rules() -> Vec<Rule> {
    let digits = Regex::new(DIGITS_PATTERN).expect("valid regex");
    let rps_words = Choice::ALL.iter().map(|c| c.as_str()).collect();

    vec![
        Rule::new(Matcher::Exact(CMD_START), Route::Command(Command::Start)),
        Rule::new(Matcher::Exact(CMD_HELP), Route::Command(Command::Help)),
        Rule::new(Matcher::Exact(CMD_PROFILE), Route::Command(Command::Profile)),
        Rule::new(Matcher::Exact(CMD_GAMES), Route::Command(Command::Games)),
        Rule::new(
            Matcher::Exact(BUTTON_PROFILE),
            Route::Command(Command::Profile),
        ),
        Rule::new(Matcher::Exact(BUTTON_GAMES), Route::Command(Command::Games)),
        Rule::new(Matcher::Exact(BUTTON_HELP), Route::Command(Command::Help)),
        Rule::new(Matcher::Pattern(digits), Route::GuessNumber),
        Rule::new(
            Matcher::OneOfLowercase(rps_words),
            Route::RockPaperScissors,
        ),
        Rule::new(Matcher::Always, Route::Echo),
    ]
}
