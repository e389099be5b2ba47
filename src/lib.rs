//! Restock - Product Availability Watcher
//!
//! Polls a single product page on a fixed interval, through a rotating pool
//! of authenticated proxies, and posts a Discord webhook notification when
//! the item transitions from out-of-stock to in-stock.
//!
//! ## Features
//!
//! - Round-robin proxy rotation from a `host:port:user:pass` list file
//! - Cache-busting fetches with per-request timeouts
//! - `og:availability` metadata extraction and classification
//! - Discord webhook notifications on restock transitions
//! - Graceful shutdown on Ctrl+C or SIGTERM

pub mod checker;
pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod proxy;
pub mod services;

pub use config::Config;
pub use error::{RestockError, Result};
