use thiserror::Error;

/// Unified error type for the Restock watcher
#[derive(Error, Debug)]
pub enum RestockError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Proxy errors
    #[error("No valid proxies available")]
    NoProxiesAvailable,

    #[error("Invalid proxy entry: {0}")]
    InvalidProxyEntry(String),

    // Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("availability metadata not found in page")]
    AvailabilityMissing,

    // Notification errors
    #[error("webhook rejected notification with status {status}")]
    WebhookRejected { status: u16 },

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // URL errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias for Restock operations
pub type Result<T> = std::result::Result<T, RestockError>;

impl RestockError {
    /// Check if this error should abort startup rather than skip a tick
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RestockError::InvalidConfig(_)
                | RestockError::MissingEnvVar(_)
                | RestockError::NoProxiesAvailable
        )
    }
}
