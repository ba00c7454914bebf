//! Feed connection configuration

use std::env;

use ticker_core::{TickerError, TickerResult};
use url::Url;

/// Default streamer endpoint
pub const DEFAULT_FEED_URL: &str = "wss://streamer.cryptocompare.com/v2";

/// Query parameter the streamer reads the credential from
const API_KEY_PARAM: &str = "api_key";

/// Configuration for the streaming connection
#[derive(Clone)]
pub struct FeedConfig {
    /// Streamer endpoint without credentials
    pub endpoint: String,
    /// Static API key embedded in the connect URL
    pub api_key: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_FEED_URL.to_string(),
            api_key: None,
        }
    }
}

impl FeedConfig {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Reads:
    /// - TICKER_FEED_URL: streamer endpoint (defaults to [`DEFAULT_FEED_URL`])
    /// - TICKER_FEED_API_KEY: API key (optional)
    pub fn from_env() -> TickerResult<Self> {
        let endpoint = env::var("TICKER_FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string());
        let api_key = env::var("TICKER_FEED_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let config = Self { endpoint, api_key };
        config.connect_url()?;
        Ok(config)
    }

    /// Endpoint with the API key appended as a query parameter
    pub fn connect_url(&self) -> TickerResult<Url> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| TickerError::config(format!("invalid feed URL '{}': {}", self.endpoint, e)))?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(TickerError::config(format!(
                    "feed URL must use ws or wss, got '{}'",
                    other
                )))
            }
        }

        if let Some(ref key) = self.api_key {
            url.query_pairs_mut().append_pair(API_KEY_PARAM, key);
        }

        Ok(url)
    }
}

impl std::fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let url = FeedConfig::default().connect_url().unwrap();
        assert_eq!(url.as_str(), "wss://streamer.cryptocompare.com/v2");
    }

    #[test]
    fn test_api_key_appended() {
        let config = FeedConfig::new(DEFAULT_FEED_URL, Some("abc123".to_string()));
        let url = config.connect_url().unwrap();
        assert_eq!(url.as_str(), "wss://streamer.cryptocompare.com/v2?api_key=abc123");
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let config = FeedConfig::new("not a url", None);
        assert!(matches!(config.connect_url(), Err(TickerError::Config(_))));
    }

    #[test]
    fn test_http_scheme_rejected() {
        let config = FeedConfig::new("https://streamer.cryptocompare.com/v2", None);
        assert!(matches!(config.connect_url(), Err(TickerError::Config(_))));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = FeedConfig::new(DEFAULT_FEED_URL, Some("secret".to_string()));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
    }
}
