//! # Mindfulness Telegram Bot
//!
//! A Telegram bot that asks a random reflective question, lets the user
//! react with inline buttons and answers with an emoji followed by the next
//! question.

pub mod bot;
pub mod callback_codec;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod questions;
pub mod router;
