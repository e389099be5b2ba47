//! Availability checking
//!
//! Fetches the product page through the next proxy in the pool and
//! classifies the `og:availability` metadata value.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::config::WatchConfig;
use crate::error::{RestockError, Result};
use crate::models::Availability;
use crate::proxy::ProxyPool;

/// Source of availability observations, one per tick
#[async_trait]
pub trait StockProbe: Send + Sync {
    async fn check(&self) -> Result<Availability>;
}

/// Checks product availability by scraping the page's metadata
pub struct AvailabilityChecker {
    product_url: Url,
    pool: Arc<ProxyPool>,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl AvailabilityChecker {
    pub fn new(config: &WatchConfig, pool: Arc<ProxyPool>) -> Self {
        Self {
            product_url: config.product_url.clone(),
            pool,
            request_timeout: Duration::from_secs(config.request_timeout),
            connect_timeout: Duration::from_secs(config.connect_timeout),
        }
    }
}

#[async_trait]
impl StockProbe for AvailabilityChecker {
    /// Perform one fetch and classify the result.
    ///
    /// A missing metadata element is an error, not an observation; the
    /// caller skips the tick and keeps its previous state.
    async fn check(&self) -> Result<Availability> {
        let proxy = self.pool.next();
        debug!("Fetching {} via proxy {}", self.product_url, proxy);

        // reqwest binds the proxy at client build time, so each tick gets
        // its own client.
        let client = Client::builder()
            .proxy(reqwest::Proxy::all(proxy.url())?)
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;

        let url = cache_busted(&self.product_url, Utc::now().timestamp());
        let response = client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;

        let value = extract_availability(&body).ok_or(RestockError::AvailabilityMissing)?;
        let availability = Availability::from_meta(&value);

        match availability {
            Availability::OutOfStock => {
                info!("OUT OF STOCK. Availability: {}", value);
            }
            Availability::InStock => {
                info!("In stock. Availability: {}", value);
            }
        }

        Ok(availability)
    }
}

/// Pull the `og:availability` content out of a page, if present
fn extract_availability(body: &str) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="og:availability"]"#).unwrap();
    let document = Html::parse_document(body);
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.to_string())
}

/// Append a fresh `limit=<unix timestamp>` so repeated fetches bypass caches
fn cache_busted(url: &Url, timestamp: i64) -> Url {
    let mut url = url.clone();
    url.query_pairs_mut()
        .append_pair("limit", &timestamp.to_string());
    url
}
