//! # Conversation Handlers Module
//!
//! Turns a classified update into the ordered list of actions the transport
//! should perform. Handlers hold no per-chat state; the only input besides
//! the route is the random generator used to pick the next question.

use rand::Rng;
use teloxide::types::{CallbackQueryId, ChatId, MessageId};
use tracing::info;

use crate::callback_codec::{CallbackCodec, CallbackToken, Reaction};
use crate::router::{Command, Route, Sender};

/// Decorative prefix for every question
pub const QUESTION_GLYPH: &str = "💬";

pub const LIKE_GLYPH: &str = "❤️";
pub const DISLIKE_GLYPH: &str = "😢";
/// Reply for a reaction score no button carries
pub const UNKNOWN_REACTION_GLYPH: &str = "🤷‍♂️";

pub const INVALID_BUTTON_TEXT: &str =
    "Sorry, I could not process this button click 😕 Please send /n to get a new question.";

/// Something the transport must do, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    SendText {
        chat_id: ChatId,
        text: String,
    },
    SendTextWithKeyboard {
        chat_id: ChatId,
        text: String,
        buttons: [CallbackToken; 2],
    },
    AnswerCallback {
        callback_id: CallbackQueryId,
    },
    EditMessageText {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
}

impl OutboundAction {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundAction::SendText { .. } => "send_text",
            OutboundAction::SendTextWithKeyboard { .. } => "send_text_with_keyboard",
            OutboundAction::AnswerCallback { .. } => "answer_callback",
            OutboundAction::EditMessageText { .. } => "edit_message_text",
        }
    }
}

pub fn format_question(question: &str) -> String {
    format!("{QUESTION_GLYPH} {question}")
}

pub fn greeting_text(first_name: &str) -> String {
    format!(
        "Hey {first_name}!\nI am simple bot to help you maintain everyday mindfulness. \
         Whenever you are up to, send me /n or /next to get a random question to contemplate \
         for a few minutes! After each question, you can tell me if you liked it 👍 or not 👎."
    )
}

pub fn not_understood_text(first_name: &str) -> String {
    format!("Sorry {first_name}, I am not yet smart enough to understand this!")
}

pub fn reaction_glyph(token: &CallbackToken) -> &'static str {
    match token.reaction() {
        Some(Reaction::Like) => LIKE_GLYPH,
        Some(Reaction::Dislike) => DISLIKE_GLYPH,
        None => UNKNOWN_REACTION_GLYPH,
    }
}

/// Stateless handlers sharing one question bank through the codec
#[derive(Debug, Clone)]
pub struct ConversationHandlers {
    codec: CallbackCodec,
}

impl ConversationHandlers {
    pub fn new(codec: CallbackCodec) -> Self {
        Self { codec }
    }

    /// Dispatch a classified update to its handler
    pub fn handle<R: Rng + ?Sized>(&self, route: Route, rng: &mut R) -> Vec<OutboundAction> {
        match route {
            Route::Command {
                command,
                chat_id,
                sender,
            } => match command {
                Command::Start | Command::Help => self.on_start(chat_id, &sender),
                Command::N | Command::Next => self.on_next_command(chat_id, rng),
            },
            Route::TextMessage {
                text,
                chat_id,
                sender,
            } => self.on_text_message(chat_id, &sender, &text),
            Route::ButtonCallback {
                token,
                chat_id,
                callback_id,
            } => self.on_button_callback(&token, chat_id, callback_id, rng),
            Route::InvalidButtonCallback {
                callback_id,
                chat_id,
                message_id,
            } => self.on_invalid_button_callback(callback_id, chat_id, message_id),
            Route::DetachedButtonCallback { callback_id } => {
                self.on_detached_button_callback(callback_id)
            }
        }
    }

    /// Greeting for `/start` and `/help`
    pub fn on_start(&self, chat_id: ChatId, sender: &Sender) -> Vec<OutboundAction> {
        info!(
            chat_id = %chat_id,
            user_id = sender.id,
            username = sender.username.as_deref().unwrap_or(""),
            name = %sender.full_name(),
            "User started the conversation"
        );

        vec![OutboundAction::SendText {
            chat_id,
            text: greeting_text(&sender.first_name),
        }]
    }

    pub fn on_text_message(
        &self,
        chat_id: ChatId,
        sender: &Sender,
        text: &str,
    ) -> Vec<OutboundAction> {
        info!(chat_id = %chat_id, text = %text, "User sent a message");

        vec![OutboundAction::SendText {
            chat_id,
            text: not_understood_text(&sender.first_name),
        }]
    }

    pub fn on_next_command<R: Rng + ?Sized>(
        &self,
        chat_id: ChatId,
        rng: &mut R,
    ) -> Vec<OutboundAction> {
        vec![self.next_question(chat_id, rng)]
    }

    /// Acknowledge the press, reply with the reaction glyph, then ask again
    pub fn on_button_callback<R: Rng + ?Sized>(
        &self,
        token: &CallbackToken,
        chat_id: ChatId,
        callback_id: CallbackQueryId,
        rng: &mut R,
    ) -> Vec<OutboundAction> {
        let glyph = reaction_glyph(token);
        info!(
            chat_id = %chat_id,
            question = %token.question(),
            reaction = %glyph,
            "User responded to a question"
        );

        vec![
            OutboundAction::AnswerCallback { callback_id },
            OutboundAction::SendText {
                chat_id,
                text: glyph.to_string(),
            },
            self.next_question(chat_id, rng),
        ]
    }

    /// The button's token is stale; replace the old question with an apology
    pub fn on_invalid_button_callback(
        &self,
        callback_id: CallbackQueryId,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Vec<OutboundAction> {
        vec![
            OutboundAction::AnswerCallback { callback_id },
            OutboundAction::EditMessageText {
                chat_id,
                message_id,
                text: INVALID_BUTTON_TEXT.to_string(),
            },
        ]
    }

    /// Stop the client's loading indicator; there is no chat to reply in
    pub fn on_detached_button_callback(&self, callback_id: CallbackQueryId) -> Vec<OutboundAction> {
        vec![OutboundAction::AnswerCallback { callback_id }]
    }

    fn next_question<R: Rng + ?Sized>(&self, chat_id: ChatId, rng: &mut R) -> OutboundAction {
        let question = self.codec.questions().pick_random_with(rng);
        info!(chat_id = %chat_id, question = %question, "Sending next question");

        OutboundAction::SendTextWithKeyboard {
            chat_id,
            text: format_question(question),
            buttons: [
                CallbackToken::new(Reaction::Like, question),
                CallbackToken::new(Reaction::Dislike, question),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QuestionBank;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn handlers() -> ConversationHandlers {
        ConversationHandlers::new(CallbackCodec::new(Arc::new(QuestionBank::default())))
    }

    fn ada() -> Sender {
        Sender {
            id: 42,
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            username: Some("ada".to_string()),
        }
    }

    #[test]
    fn test_format_question() {
        assert_eq!(format_question("Who?"), "💬 Who?");
    }

    #[test]
    fn test_greeting_mentions_commands_and_reactions() {
        let text = greeting_text("Ada");
        assert!(text.starts_with("Hey Ada!"));
        assert!(text.contains("/n"));
        assert!(text.contains("/next"));
        assert!(text.contains("👍"));
        assert!(text.contains("👎"));
    }

    #[test]
    fn test_help_is_the_greeting() {
        let handlers = handlers();
        let mut rng = StdRng::seed_from_u64(1);
        let route = |command| Route::Command {
            command,
            chat_id: ChatId(5),
            sender: ada(),
        };
        assert_eq!(
            handlers.handle(route(Command::Help), &mut rng),
            handlers.handle(route(Command::Start), &mut rng)
        );
    }

    #[test]
    fn test_text_message_apology() {
        let actions = handlers().on_text_message(ChatId(5), &ada(), "hello");
        assert_eq!(
            actions,
            vec![OutboundAction::SendText {
                chat_id: ChatId(5),
                text: "Sorry Ada, I am not yet smart enough to understand this!".to_string(),
            }]
        );
    }

    #[test]
    fn test_reaction_glyphs() {
        assert_eq!(reaction_glyph(&CallbackToken::new(Reaction::Like, "q")), "❤️");
        assert_eq!(reaction_glyph(&CallbackToken::new(Reaction::Dislike, "q")), "😢");
    }

    #[test]
    fn test_action_kinds() {
        let action = OutboundAction::AnswerCallback {
            callback_id: CallbackQueryId("1".to_string()),
        };
        assert_eq!(action.kind(), "answer_callback");
    }
}
