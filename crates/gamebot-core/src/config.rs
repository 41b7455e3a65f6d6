use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::debug;

use crate::{errors::Error, Result};

const TOKEN_PREFIX_LEN: usize = 10;

/// Typed configuration for the bot.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub bot_token: String,
    pub admin_id: i64,

    // Storage
    pub database_path: PathBuf,
    pub persist_max_retries: u32,
    pub persist_retry_delay: Duration,
}

impl Config {
    /// Load from `.env` (if present) and the process environment.
    pub fn load() -> Result<Self> {
        load_env_file(Path::new(".env"))?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = lookup("BOT_TOKEN").unwrap_or_default().trim().to_string();
        if bot_token.is_empty() {
            return Err(Error::Config(
                "BOT_TOKEN is not set; add it to the environment or a .env file".to_string(),
            ));
        }

        let admin_id = parse_or(&lookup, "ADMIN_ID", 0i64)?;

        let database_path = lookup("DATABASE_PATH")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("bot.db"));

        let persist_max_retries = parse_or(&lookup, "PERSIST_MAX_RETRIES", 2u32)?;
        let persist_retry_delay =
            Duration::from_millis(parse_or(&lookup, "PERSIST_RETRY_DELAY_MS", 50u64)?);

        Ok(Self {
            bot_token,
            admin_id,
            database_path,
            persist_max_retries,
            persist_retry_delay,
        })
    }

    /// Token prefix safe to print in the startup banner.
    pub fn masked_token(&self) -> String {
        let prefix: String = self.bot_token.chars().take(TOKEN_PREFIX_LEN).collect();
        format!("{prefix}...")
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{key} must be an integer, got {raw:?}")))
}

/// Apply `KEY=value` pairs from `path` to the process environment. A missing
/// file is fine; variables already set are left alone.
fn load_env_file(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "loaded env file");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::Config(format!("{}: {e}", path.display()))),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
