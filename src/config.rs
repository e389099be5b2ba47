use crate::error::{RestockError, Result};
use std::env;
use std::path::PathBuf;
use url::Url;

/// Product page watched when PRODUCT_URL is not set
const DEFAULT_PRODUCT_URL: &str =
    "https://www.eleven11prints.com/product-page/the-eleven-11-4-watch-ruck-case/";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Page watching configuration
    pub watch: WatchConfig,
    /// Webhook notification configuration
    pub notify: NotifyConfig,
    /// Logging configuration
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Product page to poll
    pub product_url: Url,
    /// Path to the proxy list file (default: proxies.txt)
    pub proxy_file: PathBuf,
    /// Seconds between the start of consecutive checks (default: 30)
    pub poll_interval: u64,
    /// Per-fetch request timeout in seconds
    pub request_timeout: u64,
    /// Connection timeout in seconds
    pub connect_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Discord webhook destination
    pub webhook_url: Url,
    /// Discord user mentioned in the notification text
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let product_url = get_env_or("PRODUCT_URL", DEFAULT_PRODUCT_URL);
        let product_url = Url::parse(&product_url).map_err(|e| {
            RestockError::InvalidConfig(format!("PRODUCT_URL must be a valid URL: {}", e))
        })?;

        let webhook_url = get_env_required("DISCORD_WEBHOOK_URL")?;
        let webhook_url = Url::parse(&webhook_url).map_err(|e| {
            RestockError::InvalidConfig(format!("DISCORD_WEBHOOK_URL must be a valid URL: {}", e))
        })?;

        let poll_interval: u64 = get_env_or("POLL_INTERVAL_SECS", "30").parse().map_err(|_| {
            RestockError::InvalidConfig("POLL_INTERVAL_SECS must be a valid number".into())
        })?;
        if poll_interval == 0 {
            return Err(RestockError::InvalidConfig(
                "POLL_INTERVAL_SECS must be at least 1".into(),
            ));
        }

        Ok(Config {
            watch: WatchConfig {
                product_url,
                proxy_file: PathBuf::from(get_env_or("PROXY_FILE", "proxies.txt")),
                poll_interval,
                request_timeout: get_env_or("REQUEST_TIMEOUT_SECS", "30").parse().unwrap_or(30),
                connect_timeout: get_env_or("CONNECT_TIMEOUT_SECS", "10").parse().unwrap_or(10),
            },
            notify: NotifyConfig {
                webhook_url,
                user_id: get_env_required("DISCORD_USER_ID")?,
            },
            log: LogConfig {
                level: get_env_or("LOG_LEVEL", "info"),
                format: get_env_or("LOG_FORMAT", "pretty"),
            },
        })
    }
}

/// Get environment variable with a default value
fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable, rejecting blank values
fn get_env_required(key: &str) -> Result<String> {
    let value = env::var(key).unwrap_or_default();
    let value = value.trim();
    if value.is_empty() {
        return Err(RestockError::MissingEnvVar(key.to_string()));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const CONFIG_ENV_KEYS: &[&str] = &[
        "PRODUCT_URL",
        "PROXY_FILE",
        "POLL_INTERVAL_SECS",
        "REQUEST_TIMEOUT_SECS",
        "CONNECT_TIMEOUT_SECS",
        "DISCORD_WEBHOOK_URL",
        "DISCORD_USER_ID",
        "LOG_LEVEL",
        "LOG_FORMAT",
    ];

    struct EnvGuard {
        saved: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new(keys: &[&str]) -> Self {
            let saved = keys
                .iter()
                .map(|&key| {
                    let old = env::var(key).ok();
                    env::remove_var(key);
                    (key.to_string(), old)
                })
                .collect();

            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain(..) {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    fn set_required() {
        env::set_var(
            "DISCORD_WEBHOOK_URL",
            "https://discord.com/api/webhooks/1/abc",
        );
        env::set_var("DISCORD_USER_ID", "123456789");
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);
        set_required();

        let config = Config::from_env().unwrap();

        assert_eq!(config.watch.product_url.as_str(), DEFAULT_PRODUCT_URL);
        assert_eq!(config.watch.proxy_file, PathBuf::from("proxies.txt"));
        assert_eq!(config.watch.poll_interval, 30);
        assert_eq!(config.watch.request_timeout, 30);
        assert_eq!(config.watch.connect_timeout, 10);
        assert_eq!(config.notify.user_id, "123456789");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, "pretty");
    }

    #[test]
    fn test_config_from_env_overrides() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);
        set_required();

        env::set_var("PRODUCT_URL", "https://shop.example/item/42");
        env::set_var("PROXY_FILE", "/etc/restock/proxies.txt");
        env::set_var("POLL_INTERVAL_SECS", "60");
        env::set_var("LOG_FORMAT", "json");

        let config = Config::from_env().unwrap();

        assert_eq!(config.watch.product_url.as_str(), "https://shop.example/item/42");
        assert_eq!(config.watch.proxy_file, PathBuf::from("/etc/restock/proxies.txt"));
        assert_eq!(config.watch.poll_interval, 60);
        assert_eq!(config.log.format, "json");
    }

    #[test]
    fn test_config_missing_webhook_url() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);
        env::set_var("DISCORD_USER_ID", "123456789");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, RestockError::MissingEnvVar(_)));
    }

    #[test]
    fn test_config_blank_user_id() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);
        env::set_var(
            "DISCORD_WEBHOOK_URL",
            "https://discord.com/api/webhooks/1/abc",
        );
        env::set_var("DISCORD_USER_ID", "   ");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, RestockError::MissingEnvVar(_)));
    }

    #[test]
    fn test_config_invalid_webhook_url() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);
        env::set_var("DISCORD_WEBHOOK_URL", "not a url");
        env::set_var("DISCORD_USER_ID", "123456789");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, RestockError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_invalid_poll_interval() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);
        set_required();
        env::set_var("POLL_INTERVAL_SECS", "soon");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, RestockError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_zero_poll_interval() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);
        set_required();
        env::set_var("POLL_INTERVAL_SECS", "0");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, RestockError::InvalidConfig(_)));
    }
}
