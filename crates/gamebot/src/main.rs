use std::sync::Arc;

use gamebot_core::{config::Config, ports::TranscriptStore};
use gamebot_storage::SqliteTranscript;

#[tokio::main]
async fn main() -> Result<(), gamebot_core::Error> {
    gamebot_core::logging::init("gamebot")?;

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("❌ {e}");
            return Err(e);
        }
    };

    let location = cfg.database_path.to_string_lossy().to_string();
    let store: Arc<dyn TranscriptStore> = Arc::new(SqliteTranscript::new(&location).await?);

    if let Err(e) = gamebot_telegram::router::run_polling(cfg, store).await {
        tracing::error!("telegram bot stopped: {e:#}");
        eprintln!("❌ Error: {e}");
    }

    Ok(())
}
