use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mindfulness_bot::bot::{spawn_terminate_handler, update_handler, BotState, TelegramTransport};
use mindfulness_bot::callback_codec::CallbackCodec;
use mindfulness_bot::config::{BotConfig, LogFormat};
use mindfulness_bot::questions::QuestionBank;
use mindfulness_bot::router::Command;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Token and log format come from the environment (and .env)
    let config = BotConfig::from_env().context("Failed to load bot configuration")?;

    init_tracing(config.log_format);

    info!("Starting Mindfulness Telegram Bot");

    let questions = Arc::new(QuestionBank::default());
    let fingerprint = format!("{:08x}", questions.fingerprint());
    info!(
        questions = questions.len(),
        fingerprint = %fingerprint,
        "Question bank loaded"
    );
    let codec = CallbackCodec::new(questions);

    let bot = Bot::new(config.bot_token.clone());

    // Needed to tell `/next@thisbot` apart from commands for other bots
    let bot_username = match bot.get_me().await {
        Ok(me) => me.username.clone(),
        Err(e) => {
            warn!(error = %e, "Failed to fetch bot identity, accepting any command mention");
            None
        }
    };

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register command menu");
    }

    let state = Arc::new(BotState::new(codec.clone(), bot_username));
    let transport = Arc::new(TelegramTransport::new(bot.clone(), codec));

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry().endpoint(update_handler);

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state, transport])
        .enable_ctrlc_handler()
        .build();

    if let Err(e) = spawn_terminate_handler(dispatcher.shutdown_token()) {
        warn!(error = %e, "Failed to listen for SIGTERM, only Ctrl-C stops the bot gracefully");
    }

    dispatcher.dispatch().await;

    info!("Update loop stopped");

    Ok(())
}
