//! Update Handler module: the teloxide endpoint for every update

use std::sync::Arc;

use anyhow::Result;
use teloxide::types::{Update, UpdateKind, User};
use tracing::{debug, warn};

use crate::router::{InboundUpdate, Sender};

use super::transport::{dispatch_actions, TelegramTransport};
use super::BotState;

fn sender_from_user(user: &User) -> Sender {
    Sender {
        id: user.id.0,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
    }
}

/// Convert a Telegram update into the transport-independent form
pub fn inbound_from_telegram(update: &Update) -> InboundUpdate {
    match &update.kind {
        UpdateKind::Message(msg) => InboundUpdate::Message {
            chat_id: msg.chat.id,
            sender: msg.from.as_ref().map(sender_from_user),
            text: msg.text().map(str::to_string),
        },
        UpdateKind::CallbackQuery(q) => InboundUpdate::Callback {
            callback_id: q.id.clone(),
            chat_id: q.message.as_ref().map(|m| m.chat().id),
            message_id: q.message.as_ref().map(|m| m.id()),
            data: q.data.clone(),
        },
        _ => InboundUpdate::Other,
    }
}

/// Route, handle and deliver a single update
pub async fn update_handler(
    update: Update,
    state: Arc<BotState>,
    transport: Arc<TelegramTransport>,
) -> Result<()> {
    let inbound = inbound_from_telegram(&update);
    let actions = state.process(&inbound);
    if actions.is_empty() {
        return Ok(());
    }

    let report = dispatch_actions(transport.as_ref(), &actions).await;
    if report.failed > 0 {
        warn!(
            update_id = ?update.id,
            delivered = report.delivered,
            failed = report.failed,
            "Some actions could not be delivered"
        );
    } else {
        debug!(update_id = ?update.id, delivered = report.delivered, "Update handled");
    }

    Ok(())
}
