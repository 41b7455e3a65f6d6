use std::sync::Arc;

use teloxide::{dptree, prelude::*};

use gamebot_core::{
    config::Config,
    games::ThreadRandom,
    messaging::port::MessagingPort,
    ports::TranscriptStore,
    session::BotSession,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<BotSession>,
}

/// Startup banner printed before polling starts.
pub fn banner(cfg: &Config) -> String {
    let rule = "=".repeat(40);
    format!(
        "{rule}\n🤖 TELEGRAM BOT STARTING\n{rule}\n🔑 Token: {}\n📁 Database: {}\n👑 Admin ID: {}\n{rule}",
        cfg.masked_token(),
        cfg.database_path.display(),
        cfg.admin_id,
    )
}

pub async fn run_polling(cfg: Arc<Config>, store: Arc<dyn TranscriptStore>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    println!("{}", banner(&cfg));
    if let Ok(me) = bot.get_me().await {
        println!("✅ Bot started: @{}", me.username());
    }
    println!("🔄 Press Ctrl+C to stop");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let session = Arc::new(BotSession::new(
        &cfg,
        store,
        messenger,
        Arc::new(ThreadRandom),
    ));

    let state = Arc::new(AppState { session });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    tracing::info!("starting long polling");
    teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            tracing::debug!(update_id = ?upd.id, "unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "an error has occurred in the dispatcher",
        ))
        .build()
        .dispatch()
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn banner_masks_token_and_names_database() {
        let cfg = Config {
            bot_token: "1234567890:very-secret-token".to_string(),
            admin_id: 7,
            database_path: "bot.db".into(),
            persist_max_retries: 2,
            persist_retry_delay: Duration::from_millis(50),
        };
        let text = banner(&cfg);
        assert!(text.contains("Token: 1234567890..."));
        assert!(!text.contains("very-secret-token"));
        assert!(text.contains("Database: bot.db"));
        assert!(text.contains("Admin ID: 7"));
    }
}
