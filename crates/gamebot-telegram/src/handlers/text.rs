use std::sync::Arc;

use teloxide::{prelude::*, types::User};

use gamebot_core::domain::{ChatId, InboundMessage, UserId, UserProfile};

use crate::router::AppState;

pub async fn handle_text(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let inbound = inbound_from_parts(msg.chat.id.0, text, profile_from_user(user));
    let reply = state.session.handle(inbound).await;
    tracing::debug!(
        chat_id = msg.chat.id.0,
        route = ?reply.route,
        "message handled"
    );

    // Failures are already logged by the session; never stop the dispatcher.
    Ok(())
}

pub fn profile_from_user(user: &User) -> UserProfile {
    UserProfile {
        id: UserId(user.id.0 as i64),
        handle: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_bot: user.is_bot,
    }
}

pub fn inbound_from_parts(chat_id: i64, text: &str, sender: UserProfile) -> InboundMessage {
    InboundMessage {
        chat_id: ChatId(chat_id),
        text: text.to_string(),
        sender,
    }
}
