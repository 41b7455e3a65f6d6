use crate::registry::{BUTTON_GAMES, BUTTON_HELP, BUTTON_PROFILE};

/// Reply keyboard shown under the input field.
///
/// Rows are top to bottom, buttons left to right. Pressing a button sends its
/// label back as an ordinary text message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<String>>,
    pub resize: bool,
}

impl ReplyKeyboard {
    /// Lay `labels` out `per_row[0]` on the first row, `per_row[1]` on the next, etc.
    /// The last width repeats for any remaining labels.
    pub fn adjusted(labels: &[&str], per_row: &[usize]) -> Self {
        let mut rows = Vec::new();
        let mut rest = labels;
        let mut widths = per_row.iter().copied();
        let mut width = widths.next().unwrap_or(1).max(1);

        while !rest.is_empty() {
            let take = width.min(rest.len());
            rows.push(rest[..take].iter().map(|s| s.to_string()).collect());
            rest = &rest[take..];
            if let Some(next) = widths.next() {
                width = next.max(1);
            }
        }

        Self { rows, resize: true }
    }

    /// Main menu: profile and games on top, help below.
    pub fn main_menu() -> Self {
        Self::adjusted(&[BUTTON_PROFILE, BUTTON_GAMES, BUTTON_HELP], &[2, 1])
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_reply_keyboards: bool,
    pub max_message_len: usize,
}
