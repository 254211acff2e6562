//! # Error Types Module
//!
//! Error types shared by the bot: startup configuration failures, callback
//! tokens that cannot be decoded, and delivery failures reported by the
//! chat transport.

/// Fatal configuration errors raised while the bot starts up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No bot token in the environment
    MissingToken,
    /// The token variable is set but blank
    EmptyToken,
    /// Unknown value for the log format variable
    InvalidLogFormat(String),
    /// A question bank needs at least one question
    EmptyQuestionBank,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingToken => write!(
                f,
                "Configuration error: TELEGRAM_BOT_KEY (or TELEGRAM_BOT_TOKEN) must be set"
            ),
            ConfigError::EmptyToken => write!(f, "Configuration error: bot token is empty"),
            ConfigError::InvalidLogFormat(value) => write!(
                f,
                "Configuration error: unsupported log format '{value}' (expected 'text' or 'json')"
            ),
            ConfigError::EmptyQuestionBank => {
                write!(f, "Configuration error: question bank is empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors produced when decoding button callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload was not minted by this process's encoding (stale or garbled)
    Unrecognized,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Unrecognized => write!(f, "Decode error: unrecognized callback token"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Reasons an inbound update cannot be routed to any handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnroutableUpdate {
    /// A message without text (photo, sticker, service message...)
    NonTextMessage,
    /// Any other kind of update (edits, polls, member changes...)
    UnsupportedKind,
}

impl std::fmt::Display for UnroutableUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnroutableUpdate::NonTextMessage => write!(f, "Unroutable update: message has no text"),
            UnroutableUpdate::UnsupportedKind => write!(f, "Unroutable update: unsupported kind"),
        }
    }
}

impl std::error::Error for UnroutableUpdate {}

/// Delivery failures reported by a chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The platform rejected or failed the request
    Request(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Request(msg) => write!(f, "Transport error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<teloxide::RequestError> for TransportError {
    fn from(err: teloxide::RequestError) -> Self {
        TransportError::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DecodeError::Unrecognized.to_string(),
            "Decode error: unrecognized callback token"
        );
        assert_eq!(
            TransportError::Request("timed out".to_string()).to_string(),
            "Transport error: timed out"
        );
        assert!(ConfigError::InvalidLogFormat("xml".to_string())
            .to_string()
            .contains("'xml'"));
    }
}
