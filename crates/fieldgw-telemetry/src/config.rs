use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Adafruit IO API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://io.adafruit.com";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Telemetry service settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// API root; [`DEFAULT_BASE_URL`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Account the feeds belong to.
    pub user_name: String,
    pub api_key: String,
    /// Feed group readings are published into. Lower-cased before use.
    pub group_name: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl TelemetryConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// API key with everything but the last four characters masked.
    pub fn redacted_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{visible}", "*".repeat(chars.len() - 4))
    }
}

impl fmt::Debug for TelemetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryConfig")
            .field("base_url", &self.base_url())
            .field("user_name", &self.user_name)
            .field("api_key", &self.redacted_api_key())
            .field("group_name", &self.group_name)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
