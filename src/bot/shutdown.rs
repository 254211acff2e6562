//! Stops the dispatcher on SIGTERM, the signal container runtimes and
//! process supervisors send. Ctrl-C is handled by teloxide itself.

use std::future::Future;
use std::io;

use teloxide::dispatching::ShutdownToken;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Register for SIGTERM; the returned future resolves on the first delivery
#[cfg(unix)]
pub fn terminate_signal() -> io::Result<impl Future<Output = ()> + Send> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    Ok(async move {
        sigterm.recv().await;
    })
}

/// No SIGTERM outside unix; never resolves
#[cfg(not(unix))]
pub fn terminate_signal() -> io::Result<impl Future<Output = ()> + Send> {
    Ok(std::future::pending())
}

/// Shut the dispatcher down gracefully once SIGTERM arrives.
///
/// The signal is registered before this returns, so a signal sent right
/// after the call is not lost.
pub fn spawn_terminate_handler(token: ShutdownToken) -> io::Result<JoinHandle<()>> {
    let terminated = terminate_signal()?;

    Ok(tokio::spawn(async move {
        terminated.await;
        info!("SIGTERM received, stopping the dispatcher");

        match token.shutdown() {
            Ok(stopped) => {
                stopped.await;
                info!("Dispatcher stopped after SIGTERM");
            }
            Err(e) => warn!(error = %e, "SIGTERM received while the dispatcher is idle"),
        }
    }))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Command;
    use std::sync::Arc;
    use std::time::Duration;

    use teloxide::prelude::*;

    use crate::bot::{update_handler, BotState, TelegramTransport};
    use crate::callback_codec::CallbackCodec;
    use crate::questions::QuestionBank;

    fn send_sigterm_to_self() {
        let status = Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());
    }

    /// The handler consumes SIGTERM and finishes instead of killing the process
    #[tokio::test]
    async fn test_sigterm_reaches_terminate_handler() {
        let bot = Bot::new("123:test");
        let codec = CallbackCodec::new(Arc::new(QuestionBank::default()));
        let state = Arc::new(BotState::new(codec.clone(), None));
        let transport = Arc::new(TelegramTransport::new(bot.clone(), codec));
        let dispatcher = Dispatcher::builder(bot, dptree::entry().endpoint(update_handler))
            .dependencies(dptree::deps![state, transport])
            .build();
        let handle = spawn_terminate_handler(dispatcher.shutdown_token()).unwrap();

        send_sigterm_to_self();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("terminate handler did not observe SIGTERM")
            .unwrap();
    }
}
