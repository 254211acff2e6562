//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `update_handler`: converts Telegram updates and delivers the resulting actions
//! - `shutdown`: stops the dispatcher on SIGTERM
//! - `transport`: the `ChatTransport` seam and its Telegram implementation
//! - `ui_builder`: creates reaction keyboards

pub mod shutdown;
pub mod transport;
pub mod ui_builder;
pub mod update_handler;

use rand::Rng;
use tracing::warn;

use crate::callback_codec::CallbackCodec;
use crate::handlers::{ConversationHandlers, OutboundAction};
use crate::router::{InboundUpdate, UpdateRouter};

// Re-export main entry points for use in main.rs
pub use shutdown::spawn_terminate_handler;
pub use transport::{dispatch_actions, ChatTransport, DispatchReport, TelegramTransport};
pub use update_handler::{inbound_from_telegram, update_handler};

/// Shared, immutable state of the running bot
#[derive(Debug, Clone)]
pub struct BotState {
    router: UpdateRouter,
    handlers: ConversationHandlers,
}

impl BotState {
    pub fn new(codec: CallbackCodec, bot_username: Option<String>) -> Self {
        Self {
            router: UpdateRouter::new(codec.clone(), bot_username),
            handlers: ConversationHandlers::new(codec),
        }
    }

    pub fn router(&self) -> &UpdateRouter {
        &self.router
    }

    /// Compute the actions for one update using the thread-local generator
    pub fn process(&self, update: &InboundUpdate) -> Vec<OutboundAction> {
        self.process_with(update, &mut rand::thread_rng())
    }

    /// Unroutable updates are logged and produce no actions
    pub fn process_with<R: Rng + ?Sized>(
        &self,
        update: &InboundUpdate,
        rng: &mut R,
    ) -> Vec<OutboundAction> {
        match self.router.route(update) {
            Ok(route) => self.handlers.handle(route, rng),
            Err(reason) => {
                warn!(reason = %reason, "Dropping unroutable update");
                Vec::new()
            }
        }
    }
}
