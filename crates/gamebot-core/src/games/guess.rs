use std::fmt;

use tracing::debug;

use crate::{errors::Error, ports::RandomSource, Result};

pub const GUESS_MIN: u32 = 1;
pub const GUESS_MAX: u32 = 100;

/// Result of one guess against a freshly drawn secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Win { secret: u32 },
    /// The secret is larger than the guess.
    Higher { guess: u32 },
    /// The secret is smaller than the guess.
    Lower { guess: u32 },
    OutOfRange,
    NotANumber,
}

impl fmt::Display for GuessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win { secret } => write!(f, "🎉 HOORAY! You guessed it! The number was {secret}"),
            Self::Higher { guess } => write!(f, "📈 Higher! My number is greater than {guess}"),
            Self::Lower { guess } => write!(f, "📉 Lower! My number is less than {guess}"),
            Self::OutOfRange => write!(
                f,
                "🔢 Enter a number from {GUESS_MIN} to {GUESS_MAX} to play"
            ),
            Self::NotANumber => write!(f, "❌ Enter a number to play"),
        }
    }
}

/// Resolve one guess. A secret is drawn only for guesses inside the range.
pub fn resolve_guess(input: &str, rng: &dyn RandomSource) -> GuessOutcome {
    let guess = match parse_guess(input) {
        Ok(g) => g,
        Err(e) => {
            debug!("guess rejected: {e}");
            return GuessOutcome::NotANumber;
        }
    };

    let guess = match u32::try_from(guess) {
        Ok(g) if (GUESS_MIN..=GUESS_MAX).contains(&g) => g,
        _ => return GuessOutcome::OutOfRange,
    };

    let secret = rng.uniform(GUESS_MIN, GUESS_MAX);
    match guess.cmp(&secret) {
        std::cmp::Ordering::Equal => GuessOutcome::Win { secret },
        std::cmp::Ordering::Less => GuessOutcome::Higher { guess },
        std::cmp::Ordering::Greater => GuessOutcome::Lower { guess },
    }
}

fn parse_guess(input: &str) -> Result<u64> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Parse(format!("not a decimal number: {input:?}")));
    }
    input
        .parse::<u64>()
        .map_err(|e| Error::Parse(format!("{input:?}: {e}")))
}
