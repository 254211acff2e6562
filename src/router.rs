//! # Update Router Module
//!
//! Classifies every inbound update into exactly one route: a known command,
//! a free-text message, a decodable button press or a stale button press.
//! Classification is memoryless; nothing is kept between updates.

use teloxide::types::{CallbackQueryId, ChatId, MessageId};
use teloxide::utils::command::BotCommands;
use tracing::warn;

use crate::callback_codec::{CallbackCodec, CallbackToken};
use crate::errors::UnroutableUpdate;

/// Commands understood by the bot
#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "introduce the bot")]
    Start,
    #[command(description = "show how to use the bot")]
    Help,
    #[command(description = "get a random question")]
    N,
    #[command(description = "get a random question")]
    Next,
}

impl Command {
    /// Parse the leading command of a message text.
    ///
    /// Accepts `/name`, `/name@bot` and trailing arguments, case-insensitively.
    /// A mention of a different bot means the command is not ours.
    pub fn from_text(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let word = text.strip_prefix('/')?.split(char::is_whitespace).next()?;

        let (name, mention) = match word.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (word, None),
        };

        if let (Some(mention), Some(me)) = (mention, bot_username) {
            if !mention.eq_ignore_ascii_case(me) {
                return None;
            }
        }

        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "n" => Some(Command::N),
            "next" => Some(Command::Next),
            _ => None,
        }
    }

    /// `/n` and `/next` both ask for a question
    pub fn asks_for_question(self) -> bool {
        matches!(self, Command::N | Command::Next)
    }
}

/// The user who sent a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl Sender {
    /// Stand-in for messages without a sender (e.g. channel posts)
    pub fn unknown() -> Self {
        Self {
            id: 0,
            first_name: "there".to_string(),
            last_name: None,
            username: None,
        }
    }

    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// Transport-independent view of one inbound update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundUpdate {
    Message {
        chat_id: ChatId,
        sender: Option<Sender>,
        text: Option<String>,
    },
    Callback {
        callback_id: CallbackQueryId,
        chat_id: Option<ChatId>,
        message_id: Option<MessageId>,
        data: Option<String>,
    },
    Other,
}

/// Classification of an inbound update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Command {
        command: Command,
        chat_id: ChatId,
        sender: Sender,
    },
    TextMessage {
        text: String,
        chat_id: ChatId,
        sender: Sender,
    },
    ButtonCallback {
        token: CallbackToken,
        chat_id: ChatId,
        callback_id: CallbackQueryId,
    },
    InvalidButtonCallback {
        callback_id: CallbackQueryId,
        chat_id: ChatId,
        message_id: MessageId,
    },
    /// A press whose message is unknown; it can only be acknowledged
    DetachedButtonCallback { callback_id: CallbackQueryId },
}

#[derive(Debug, Clone)]
pub struct UpdateRouter {
    codec: CallbackCodec,
    bot_username: Option<String>,
}

impl UpdateRouter {
    pub fn new(codec: CallbackCodec, bot_username: Option<String>) -> Self {
        Self {
            codec,
            bot_username,
        }
    }

    pub fn codec(&self) -> &CallbackCodec {
        &self.codec
    }

    /// Classify `update`; commands win over plain text
    pub fn route(&self, update: &InboundUpdate) -> Result<Route, UnroutableUpdate> {
        match update {
            InboundUpdate::Message {
                chat_id,
                sender,
                text,
            } => {
                let text = text.as_deref().ok_or(UnroutableUpdate::NonTextMessage)?;
                let sender = sender.clone().unwrap_or_else(Sender::unknown);

                match Command::from_text(text, self.bot_username.as_deref()) {
                    Some(command) => Ok(Route::Command {
                        command,
                        chat_id: *chat_id,
                        sender,
                    }),
                    None => Ok(Route::TextMessage {
                        text: text.to_string(),
                        chat_id: *chat_id,
                        sender,
                    }),
                }
            }
            InboundUpdate::Callback {
                callback_id,
                chat_id,
                message_id,
                data,
            } => {
                let (Some(chat_id), Some(message_id)) = (chat_id, message_id) else {
                    warn!(callback_id = %callback_id, "Button press without an attached message");
                    return Ok(Route::DetachedButtonCallback {
                        callback_id: callback_id.clone(),
                    });
                };

                match self.codec.decode(data.as_deref().unwrap_or_default()) {
                    Ok(token) => Ok(Route::ButtonCallback {
                        token,
                        chat_id: *chat_id,
                        callback_id: callback_id.clone(),
                    }),
                    Err(e) => {
                        warn!(chat_id = %chat_id, callback_id = %callback_id, error = %e, "Stale or unrecognized button press");
                        Ok(Route::InvalidButtonCallback {
                            callback_id: callback_id.clone(),
                            chat_id: *chat_id,
                            message_id: *message_id,
                        })
                    }
                }
            }
            InboundUpdate::Other => Err(UnroutableUpdate::UnsupportedKind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::from_text("/start", None), Some(Command::Start));
        assert_eq!(Command::from_text("/help", None), Some(Command::Help));
        assert_eq!(Command::from_text("/n", None), Some(Command::N));
        assert_eq!(Command::from_text("/next", None), Some(Command::Next));
        assert_eq!(Command::from_text("/NEXT please", None), Some(Command::Next));
        assert_eq!(
            Command::from_text("/next@MindBot", Some("mindbot")),
            Some(Command::Next)
        );
    }

    #[test]
    fn test_non_commands() {
        assert_eq!(Command::from_text("next", None), None);
        assert_eq!(Command::from_text(" /next", None), None);
        assert_eq!(Command::from_text("/", None), None);
        assert_eq!(Command::from_text("/ next", None), None);
        assert_eq!(Command::from_text("/nextt", None), None);
        assert_eq!(Command::from_text("/foo", None), None);
        assert_eq!(Command::from_text("/next@otherbot", Some("mindbot")), None);
    }

    #[test]
    fn test_question_commands() {
        assert!(Command::N.asks_for_question());
        assert!(Command::Next.asks_for_question());
        assert!(!Command::Start.asks_for_question());
        assert!(!Command::Help.asks_for_question());
    }

    #[test]
    fn test_bot_command_descriptions() {
        let descriptions = Command::descriptions().to_string();
        for name in ["/start", "/help", "/n", "/next"] {
            assert!(descriptions.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_sender_full_name() {
        let mut sender = Sender {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: None,
            username: None,
        };
        assert_eq!(sender.full_name(), "Ada");
        sender.last_name = Some("Lovelace".to_string());
        assert_eq!(sender.full_name(), "Ada Lovelace");
    }
}
