//! Stateless mini-game resolvers.
//!
//! Each call resolves one message on its own: nothing is remembered between
//! guesses or rounds. Randomness comes from an injected [`RandomSource`].

pub mod guess;
pub mod random;
pub mod rps;

pub use guess::{resolve_guess, GuessOutcome};
pub use random::ThreadRandom;
pub use rps::{resolve_rps, Choice, RoundResult, RpsOutcome};

pub use crate::ports::RandomSource;
