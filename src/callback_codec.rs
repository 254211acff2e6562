//! # Callback Codec Module
//!
//! Encodes the user's choice into the data attached to an inline button and
//! decodes it again when the button is pressed.
//!
//! Wire format (ASCII, at most [`MAX_CALLBACK_DATA_BYTES`] bytes):
//!
//! ```text
//! mq1:<fingerprint>:<score>:i<index>   question taken from the bank
//! mq1:<fingerprint>:<score>:t<text>    any other question, text truncated to fit
//! ```
//!
//! `fingerprint` is the question bank fingerprint as 8 lowercase hex digits.
//! Tokens minted by a deployment with a different question list carry a
//! different fingerprint and are rejected as [`DecodeError::Unrecognized`].

use std::sync::Arc;

use crate::errors::DecodeError;
use crate::questions::QuestionBank;

/// Telegram's limit for `callback_data`
pub const MAX_CALLBACK_DATA_BYTES: usize = 64;

const TOKEN_VERSION: &str = "mq1";
const INDEX_TAG: char = 'i';
const TEXT_TAG: char = 't';

/// The user's reaction to a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    /// Numeric score carried on the wire
    pub fn score(self) -> u8 {
        match self {
            Reaction::Like => 1,
            Reaction::Dislike => 0,
        }
    }

    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Reaction::Like),
            0 => Some(Reaction::Dislike),
            _ => None,
        }
    }
}

/// Decoded content of a reaction button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackToken {
    score: u8,
    question: String,
}

impl CallbackToken {
    pub fn new(reaction: Reaction, question: impl Into<String>) -> Self {
        Self {
            score: reaction.score(),
            question: question.into(),
        }
    }

    /// The reaction, or `None` for a score no button ever carries
    pub fn reaction(&self) -> Option<Reaction> {
        Reaction::from_score(self.score)
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Encoder/decoder bound to one question bank
#[derive(Debug, Clone)]
pub struct CallbackCodec {
    questions: Arc<QuestionBank>,
}

impl CallbackCodec {
    pub fn new(questions: Arc<QuestionBank>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    /// Encode a reaction to `question` as button callback data
    pub fn encode(&self, reaction: Reaction, question: &str) -> String {
        self.encode_score(reaction.score(), question)
    }

    pub fn encode_token(&self, token: &CallbackToken) -> String {
        self.encode_score(token.score(), token.question())
    }

    fn encode_score(&self, score: u8, question: &str) -> String {
        // single decimal digit on the wire
        let header = format!(
            "{TOKEN_VERSION}:{:08x}:{}:",
            self.questions.fingerprint(),
            score % 10
        );

        match self.questions.index_of(question) {
            Some(index) => format!("{header}{INDEX_TAG}{index}"),
            None => {
                let budget = MAX_CALLBACK_DATA_BYTES - header.len() - TEXT_TAG.len_utf8();
                format!(
                    "{header}{TEXT_TAG}{}",
                    truncate_on_char_boundary(question, budget)
                )
            }
        }
    }

    /// Decode callback data produced by [`CallbackCodec::encode`].
    ///
    /// Anything else, including tokens from a different question list,
    /// yields [`DecodeError::Unrecognized`].
    pub fn decode(&self, data: &str) -> Result<CallbackToken, DecodeError> {
        if data.len() > MAX_CALLBACK_DATA_BYTES {
            return Err(DecodeError::Unrecognized);
        }

        let mut parts = data.splitn(4, ':');
        let (Some(version), Some(fingerprint), Some(score), Some(payload)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(DecodeError::Unrecognized);
        };

        if version != TOKEN_VERSION
            || parse_fingerprint(fingerprint) != Some(self.questions.fingerprint())
        {
            return Err(DecodeError::Unrecognized);
        }

        let score = match score.as_bytes() {
            [digit] if digit.is_ascii_digit() => digit - b'0',
            _ => return Err(DecodeError::Unrecognized),
        };

        let question = if let Some(index) = payload.strip_prefix(INDEX_TAG) {
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DecodeError::Unrecognized);
            }
            let index: usize = index.parse().map_err(|_| DecodeError::Unrecognized)?;
            self.questions
                .get(index)
                .ok_or(DecodeError::Unrecognized)?
                .to_string()
        } else if let Some(text) = payload.strip_prefix(TEXT_TAG) {
            text.to_string()
        } else {
            return Err(DecodeError::Unrecognized);
        };

        Ok(CallbackToken { score, question })
    }
}

fn parse_fingerprint(raw: &str) -> Option<u32> {
    let well_formed = raw.len() == 8
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if !well_formed {
        return None;
    }
    u32::from_str_radix(raw, 16).ok()
}

fn truncate_on_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
