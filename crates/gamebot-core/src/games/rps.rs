use std::fmt;

use crate::ports::RandomSource;

/// Rock-paper-scissors choice.
///
/// Variants are declared in cyclic order: each one beats the next, and the last
/// beats the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Choice {
    Rock,
    Scissors,
    Paper,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Scissors, Choice::Paper];

    /// Case-insensitive exact match on the choice word.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == lower)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Scissors => "scissors",
            Self::Paper => "paper",
        }
    }

    fn rank(self) -> u32 {
        self as u32
    }

    /// Outcome from `self`'s point of view.
    pub fn against(self, other: Choice) -> RoundResult {
        match (other.rank() + 3 - self.rank()) % 3 {
            0 => RoundResult::Tie,
            1 => RoundResult::Win,
            _ => RoundResult::Loss,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundResult {
    Win,
    Loss,
    Tie,
}

impl RoundResult {
    pub fn label(self) -> &'static str {
        match self {
            Self::Win => "🎉 You won!",
            Self::Loss => "😢 You lost!",
            Self::Tie => "🤝 It's a tie!",
        }
    }
}

/// One resolved round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RpsOutcome {
    pub user: Choice,
    pub bot: Choice,
    pub result: RoundResult,
}

impl fmt::Display for RpsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "
✂️ ROCK-PAPER-SCISSORS

👤 Your choice: {}
🤖 My choice: {}

{}
",
            self.user,
            self.bot,
            self.result.label()
        )
    }
}

/// Resolve one round. Returns `None` when `input` is not a choice word; no
/// draw happens in that case.
pub fn resolve_rps(input: &str, rng: &dyn RandomSource) -> Option<RpsOutcome> {
    let user = Choice::parse(input)?;
    let idx = rng.uniform(0, (Choice::ALL.len() - 1) as u32) as usize;
    let bot = Choice::ALL[idx.min(Choice::ALL.len() - 1)];
    Some(RpsOutcome {
        user,
        bot,
        result: user.against(bot),
    })
}
