//! Client configuration.
//!
//! The base URL and time zone are opaque startup parameters; nothing in the
//! client interprets them beyond attaching them to requests.

use std::env;
use std::time::Duration;

const DEFAULT_TIME_ZONE: &str = "UTC";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`HttpDialogueService`](crate::transport::HttpDialogueService).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the web service including the protocol version path,
    /// e.g. `https://example.com/dialogue-service/v1`
    pub base_url: String,
    /// IANA time zone of the host environment, attached to dialogue
    /// lifecycle and variable calls (e.g. "Europe/Lisbon")
    pub time_zone: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the given base URL with "UTC" as the
    /// time zone and a 10 second request timeout. A trailing slash on the
    /// base URL is trimmed.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// `CONVO_BASE_URL` is required; `CONVO_TIME_ZONE` is optional and
    /// defaults to "UTC".
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("CONVO_BASE_URL")
            .map_err(|_| "CONVO_BASE_URL environment variable is not set".to_string())?;
        let mut config = Self::new(base_url);
        if let Ok(time_zone) = env::var("CONVO_TIME_ZONE") {
            config.time_zone = time_zone;
        }
        Ok(config)
    }

    /// Overrides the time zone after construction.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Overrides the request timeout after construction.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
