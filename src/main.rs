//! Restock Watcher - Entry Point
//!
//! Wires the proxy pool, availability checker, and notifier into the
//! polling service, with graceful shutdown support.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod checker;
mod config;
mod error;
mod models;
mod notifier;
mod proxy;
mod services;

use checker::AvailabilityChecker;
use config::{Config, LogConfig};
use notifier::Notifier;
use proxy::ProxyPool;
use services::{StockWatchConfig, StockWatcher, StockWatcherHandle};

#[tokio::main]
async fn main() -> error::Result<()> {
    // Load .env outside production, matching the deployment convention
    if env::var("ENV").as_deref() != Ok("production") {
        let _ = dotenvy::dotenv();
    }

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log);

    info!("Starting Restock watcher");
    info!("Watching {}", config.watch.product_url);

    // Load the proxy pool; running with zero proxies is a startup error
    let pool = Arc::new(ProxyPool::from_file(&config.watch.proxy_file)?);
    info!("Loaded {} proxies", pool.len());

    let checker = Arc::new(AvailabilityChecker::new(&config.watch, pool));
    let notifier = Arc::new(Notifier::new(config.notify.clone()));

    let message = format!(
        "🚨 Item is now IN STOCK! 🚨\n{}",
        config.watch.product_url
    );
    let mut stock_watcher = StockWatcher::new(
        checker,
        notifier,
        StockWatchConfig {
            poll_interval: Duration::from_secs(config.watch.poll_interval),
            message,
        },
    );

    // Start the watcher
    let (watcher_handle, watcher_shutdown) = StockWatcherHandle::new();
    let watcher_task = tokio::spawn(async move {
        stock_watcher.run(watcher_shutdown).await;
    });

    // Wait for shutdown signal
    shutdown_signal().await;
    info!("Shutdown signal received");

    watcher_handle.shutdown();
    let _ = watcher_task.await;

    info!("Restock watcher stopped");
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("restock={}", log.level)));
    let timer = ChronoLocal::new("[%Y-%m-%d %H:%M:%S]".to_string());

    if log.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_timer(timer))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_timer(timer))
            .init();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
