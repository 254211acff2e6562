//! UI Builder module for creating reaction keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::callback_codec::{CallbackCodec, CallbackToken, Reaction};
use crate::handlers::UNKNOWN_REACTION_GLYPH;

pub const LIKE_LABEL: &str = "Like 👍";
pub const DISLIKE_LABEL: &str = "Dislike 👎";

/// Button caption for a reaction token
pub fn button_label(token: &CallbackToken) -> &'static str {
    match token.reaction() {
        Some(Reaction::Like) => LIKE_LABEL,
        Some(Reaction::Dislike) => DISLIKE_LABEL,
        None => UNKNOWN_REACTION_GLYPH,
    }
}

/// Create a one-row inline keyboard with one button per token
pub fn create_reaction_keyboard(
    codec: &CallbackCodec,
    buttons: &[CallbackToken; 2],
) -> InlineKeyboardMarkup {
    let row = buttons
        .iter()
        .map(|token| InlineKeyboardButton::callback(button_label(token), codec.encode_token(token)))
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(vec![row])
}
