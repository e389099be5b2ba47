//! Stock watching service
//!
//! Polls the product page on a fixed interval and sends a notification on
//! the out-of-stock → in-stock transition.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::checker::StockProbe;
use crate::models::StockState;
use crate::notifier::NotificationSink;

/// Stock watcher configuration
#[derive(Clone)]
pub struct StockWatchConfig {
    /// Time between the start of consecutive checks
    pub poll_interval: Duration,
    /// Message sent when the item comes back in stock
    pub message: String,
}

/// Periodic availability watcher
///
/// Owns the stock state; at most one fetch is in flight at a time, and a
/// failed tick is skipped rather than retried.
pub struct StockWatcher {
    probe: Arc<dyn StockProbe>,
    sink: Arc<dyn NotificationSink>,
    config: StockWatchConfig,
    state: StockState,
}

impl StockWatcher {
    /// Create a new stock watcher
    pub fn new(
        probe: Arc<dyn StockProbe>,
        sink: Arc<dyn NotificationSink>,
        config: StockWatchConfig,
    ) -> Self {
        Self {
            probe,
            sink,
            config,
            state: StockState::default(),
        }
    }

    /// Run the stock watcher (call in a spawned task)
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Starting stock watcher with {}s interval",
            self.config.poll_interval.as_secs()
        );

        // Tick zero: check once before the timer starts counting
        self.tick().await;

        let mut poll = interval(self.config.poll_interval);
        // A fetch that overruns the period drops missed ticks instead of
        // bursting to catch up
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        poll.tick().await; // Skip immediate tick

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    self.tick().await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Stock watcher shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Perform one check and apply its outcome.
    ///
    /// A failed check leaves the state untouched; a failed notification is
    /// logged and never stops the loop.
    async fn tick(&mut self) {
        let availability = match self.probe.check().await {
            Ok(availability) => availability,
            Err(e) => {
                error!("Availability check failed: {}", e);
                return;
            }
        };

        if self.state.observe(availability) {
            info!("Restock detected, sending notification");
            if let Err(e) = self.sink.notify(&self.config.message).await {
                error!("Failed to send notification: {}", e);
            }
        }
    }
}

/// Handle for managing the stock watcher lifecycle
pub struct StockWatcherHandle {
    shutdown_tx: watch::Sender<bool>,
}

impl StockWatcherHandle {
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { shutdown_tx: tx }, rx)
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Default for StockWatcherHandle {
    fn default() -> Self {
        Self::new().0
    }
}
