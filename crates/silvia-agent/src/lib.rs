// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake loop and message dispatch for the SilvIA bot.
//!
//! The [`AgentLoop`] receives messages from a [`ChannelAdapter`] one at a
//! time and hands each to the [`Dispatcher`] on its own tracked task, so a
//! slow or failing conversation never blocks the others.

pub mod dispatcher;
pub mod llm;
pub mod replies;
pub mod shutdown;
pub mod voice;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use silvia_core::{ChannelAdapter, SilviaError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

pub use dispatcher::{DispatchSettings, Dispatcher, DispatcherDeps};
pub use llm::LlmStrategy;
pub use replies::Locale;
pub use voice::VoicePipeline;

/// Runs `fut` with an upper bound, mapping expiry to [`SilviaError::Timeout`].
pub async fn bounded<T, F>(duration: Duration, fut: F) -> Result<T, SilviaError>
where
    F: Future<Output = Result<T, SilviaError>>,
{
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| SilviaError::Timeout { duration })?
}

/// First pause after a failed receive; doubles per consecutive failure.
const RECEIVE_BACKOFF_START: Duration = Duration::from_millis(100);
const RECEIVE_BACKOFF_MAX: Duration = Duration::from_secs(5);

/// The intake loop: receive, spawn, repeat until cancelled.
pub struct AgentLoop {
    channel: Arc<dyn ChannelAdapter>,
    dispatcher: Arc<Dispatcher>,
    tracker: TaskTracker,
    drain_timeout: Duration,
}

impl AgentLoop {
    /// `channel` must already be connected.
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        dispatcher: Arc<Dispatcher>,
        drain_timeout: Duration,
    ) -> Self {
        Self {
            channel,
            dispatcher,
            tracker: TaskTracker::new(),
            drain_timeout,
        }
    }

    /// Receives until `cancel` fires or the channel closes, then drains
    /// in-flight messages and shuts the channel down.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), SilviaError> {
        info!("agent loop running");

        let mut backoff = RECEIVE_BACKOFF_START;
        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => {
                            backoff = RECEIVE_BACKOFF_START;
                            self.spawn_dispatch(inbound);
                        }
                        Err(SilviaError::ChannelClosed(source)) => {
                            info!(
                                source = source.as_str(),
                                "inbound channel closed, stopping agent loop"
                            );
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, retry_in = ?backoff, "channel receive error");
                            tokio::select! {
                                _ = tokio::time::sleep(backoff) => {}
                                _ = cancel.cancelled() => {
                                    info!("shutdown signal received, stopping agent loop");
                                    break;
                                }
                            }
                            backoff = (backoff * 2).min(RECEIVE_BACKOFF_MAX);
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        shutdown::drain_tasks(&self.tracker, self.drain_timeout).await;

        if let Err(e) = self.channel.shutdown().await {
            error!(error = %e, "channel shutdown failed");
        }

        info!("agent loop stopped");
        Ok(())
    }

    fn spawn_dispatch(&self, inbound: silvia_core::types::InboundMessage) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let conversation_id = inbound.conversation_id.clone();
        debug!(
            conversation_id = conversation_id.as_str(),
            channel = inbound.channel.as_str(),
            "handling inbound message"
        );

        self.tracker.spawn(async move {
            let outcome = AssertUnwindSafe(dispatcher.dispatch(inbound))
                .catch_unwind()
                .await;
            if outcome.is_err() {
                error!(
                    conversation_id = conversation_id.as_str(),
                    "message handler panicked"
                );
            }
        });
    }
}
