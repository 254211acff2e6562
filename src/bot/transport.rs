//! Chat transport: the seam between the conversation core and the platform

use std::future::Future;

use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, ChatId, MessageId};
use tracing::{debug, error};

use crate::callback_codec::{CallbackCodec, CallbackToken};
use crate::errors::TransportError;
use crate::handlers::OutboundAction;

use super::ui_builder::create_reaction_keyboard;

/// Delivery side of a chat platform
pub trait ChatTransport: Send + Sync {
    fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&[CallbackToken; 2]>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn answer_callback(
        &self,
        callback_id: &CallbackQueryId,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Telegram Bot API transport
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
    codec: CallbackCodec,
}

impl TelegramTransport {
    pub fn new(bot: Bot, codec: CallbackCodec) -> Self {
        Self { bot, codec }
    }
}

impl ChatTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&[CallbackToken; 2]>,
    ) -> Result<(), TransportError> {
        let request = self.bot.send_message(chat_id, text);
        match keyboard {
            Some(buttons) => {
                request
                    .reply_markup(create_reaction_keyboard(&self.codec, buttons))
                    .await?;
            }
            None => {
                request.await?;
            }
        }
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &CallbackQueryId) -> Result<(), TransportError> {
        self.bot.answer_callback_query(callback_id.clone()).await?;
        Ok(())
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        self.bot.edit_message_text(chat_id, message_id, text).await?;
        Ok(())
    }
}

/// Outcome of delivering one batch of actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Perform `actions` in order.
///
/// A failed action is logged and skipped; the rest are still attempted and
/// nothing is retried here.
pub async fn dispatch_actions<T: ChatTransport>(
    transport: &T,
    actions: &[OutboundAction],
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for action in actions {
        let result = match action {
            OutboundAction::SendText { chat_id, text } => {
                transport.send_message(*chat_id, text, None).await
            }
            OutboundAction::SendTextWithKeyboard {
                chat_id,
                text,
                buttons,
            } => transport.send_message(*chat_id, text, Some(buttons)).await,
            OutboundAction::AnswerCallback { callback_id } => {
                transport.answer_callback(callback_id).await
            }
            OutboundAction::EditMessageText {
                chat_id,
                message_id,
                text,
            } => transport.edit_message_text(*chat_id, *message_id, text).await,
        };

        match result {
            Ok(()) => {
                debug!(action = action.kind(), "Action delivered");
                report.delivered += 1;
            }
            Err(e) => {
                error!(action = action.kind(), error = %e, "Failed to deliver action");
                report.failed += 1;
            }
        }
    }

    report
}
