//! Telegram update handlers.
//!
//! Text messages are converted into transport-agnostic `InboundMessage`s and
//! handed to the core session; everything else is ignored.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crate::router::AppState;

mod text;

pub use text::{inbound_from_parts, profile_from_user};

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if msg.text().is_some() {
        return text::handle_text(msg, state).await;
    }

    tracing::debug!(chat_id = msg.chat.id.0, "ignoring non-text message");
    Ok(())
}
