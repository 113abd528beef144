use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which fetch backend produces raw pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Plain HTTP GET against the source
    Direct,
    /// JS-rendering HTTP gateway that needs an API key
    #[default]
    Gateway,
    /// Local headless Chrome
    Browser,
}

/// Settings shared by every fetch backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Backend used for page fetches (default: gateway)
    pub backend: Backend,

    /// Request timeout in seconds (default: 60)
    pub timeout_secs: u64,

    /// User agent sent by the direct and browser backends
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            timeout_secs: 60,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Rendering gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway endpoint; the target URL is passed as the `url` parameter
    pub endpoint: String,

    /// Environment variable holding the gateway API key
    pub api_key_env: String,

    /// Extra query parameters forwarded to the gateway
    pub params: BTreeMap<String, String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.zenrows.com/v1/".to_string(),
            api_key_env: "ZENROWS_API_KEY".to_string(),
            params: BTreeMap::from([
                ("js_render".to_string(), "true".to_string()),
                ("premium_proxy".to_string(), "true".to_string()),
                ("proxy_country".to_string(), "tw".to_string()),
            ]),
        }
    }
}

impl GatewayConfig {
    /// API key from the configured environment variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Headless browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Run Chrome without a window (default: true)
    pub headless: bool,

    /// Wait after navigation for lazy content in milliseconds (default: 2000)
    pub settle_ms: u64,

    /// Scroll to the bottom before reading the page (default: true)
    pub scroll_to_bottom: bool,

    /// Selector to wait for before reading the page
    pub wait_selector: Option<String>,

    /// Give up waiting for `wait_selector` after this many milliseconds (default: 15000)
    pub wait_timeout_ms: u64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            headless: true,
            settle_ms: 2000,
            scroll_to_bottom: true,
            wait_selector: Some(".listArea".to_string()),
            wait_timeout_ms: 15_000,
        }
    }
}

impl HeadlessConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            backend: Backend,
        }
        let parsed: Wrapper = toml::from_str("backend = \"browser\"").unwrap();
        assert_eq!(parsed.backend, Backend::Browser);
        let parsed: Wrapper = toml::from_str("backend = \"direct\"").unwrap();
        assert_eq!(parsed.backend, Backend::Direct);
        assert!(toml::from_str::<Wrapper>("backend = \"carrier-pigeon\"").is_err());
    }

    #[test]
    fn test_gateway_key_from_env() {
        let config = GatewayConfig {
            api_key_env: "SHELFSCAN_TEST_GATEWAY_KEY_SET".into(),
            ..Default::default()
        };
        std::env::set_var("SHELFSCAN_TEST_GATEWAY_KEY_SET", " secret ");
        assert_eq!(config.api_key().as_deref(), Some("secret"));
    }

    #[test]
    fn test_gateway_key_missing_or_blank() {
        let config = GatewayConfig {
            api_key_env: "SHELFSCAN_TEST_GATEWAY_KEY_BLANK".into(),
            ..Default::default()
        };
        assert_eq!(config.api_key(), None);
        std::env::set_var("SHELFSCAN_TEST_GATEWAY_KEY_BLANK", "   ");
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_durations() {
        assert_eq!(FetchConfig::default().timeout(), Duration::from_secs(60));
        assert_eq!(HeadlessConfig::default().settle(), Duration::from_millis(2000));
    }
}
