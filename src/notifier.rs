//! Discord webhook notifications

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::info;

use crate::config::NotifyConfig;
use crate::error::{RestockError, Result};

/// Destination for restock notifications
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, message: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct WebhookPayload {
    content: String,
}

/// Posts restock messages to a Discord webhook, mentioning the
/// configured user
pub struct Notifier {
    client: Client,
    config: NotifyConfig,
}

impl Notifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl NotificationSink for Notifier {
    /// Deliver one message. Discord acknowledges webhook posts with
    /// 204 No Content; anything else is a rejection.
    async fn notify(&self, message: &str) -> Result<()> {
        let payload = WebhookPayload {
            content: mention(&self.config.user_id, message),
        };

        let response = self
            .client
            .post(self.config.webhook_url.clone())
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                info!("Notification delivered");
                Ok(())
            }
            status => Err(RestockError::WebhookRejected {
                status: status.as_u16(),
            }),
        }
    }
}

/// Prefix a message with a Discord user mention
fn mention(user_id: &str, message: &str) -> String {
    format!("<@{}> {}", user_id, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_format() {
        assert_eq!(mention("1234", "restocked"), "<@1234> restocked");
    }

    #[test]
    fn test_payload_serialization() {
        let payload = WebhookPayload {
            content: mention("1234", "Item is back"),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "content": "<@1234> Item is back" }));
    }
}
