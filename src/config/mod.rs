//! Configuration management for shelfscan.
//!
//! Configuration is read from `~/.config/shelfscan/config.toml` (or a path
//! given on the command line). If the default file doesn't exist, a default
//! configuration with comments is created.

pub mod fetch;
pub mod source;

pub use fetch::{Backend, FetchConfig, GatewayConfig, HeadlessConfig};
pub use source::SourceConfig;

use crate::extractor::LocatorConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
    pub gateway: GatewayConfig,
    pub browser: HeadlessConfig,
    pub locator: LocatorConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/shelfscan/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("shelfscan").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# shelfscan configuration

[source]
base_url = "https://www.momoshop.com.tw"
search_path = "/search/searchShop.jsp"
keyword_param = "keyword"
page_param = "curPage"
detail_path = "/goods/GoodsDetail.jsp"
item_code_param = "i_code"

# Products per result page on the source; bounds how many pages a run fetches
page_size = 30

# Pause between page fetches (milliseconds)
page_delay_ms = 1000

# Result cap when a request doesn't name one
default_max_results = 30

[source.search_params]
searchType = "1"

[fetch]
# One of: gateway, direct, browser
backend = "gateway"
timeout_secs = 60

[gateway]
endpoint = "https://api.zenrows.com/v1/"
# The API key itself is read from this environment variable
api_key_env = "ZENROWS_API_KEY"

[gateway.params]
js_render = "true"
premium_proxy = "true"
proxy_country = "tw"

[browser]
headless = true
settle_ms = 2000
scroll_to_bottom = true
wait_selector = ".listArea"
wait_timeout_ms = 15000

[locator]
# Field regions tried in order inside each product card
name_selectors = [".prdName", "h3", ".goodsName"]
price_selectors = [".price .money", ".price b", ".prdPrice", ".money, b"]
title_link_selector = "a[title]"

# Card-locating hypotheses, most specific first. The first one that yields
# at least one complete product wins the page.
[[locator.hypotheses]]
name = "list-area"
container = ".listArea li"

[[locator.hypotheses]]
name = "goods-list"
container = ".goodsUl li, li.goodsItem"

[[locator.hypotheses]]
name = "product-list"
container = ".prdListArea li, .searchPrdListArea li"

[[locator.hypotheses]]
name = "item-code-anchor"
container = "li"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");
        let defaults = Config::default();

        assert_eq!(config.source.base_url, defaults.source.base_url);
        assert_eq!(config.source.search_params, defaults.source.search_params);
        assert_eq!(config.source.page_size, 30);
        assert_eq!(config.fetch.backend, Backend::Gateway);
        assert_eq!(config.gateway.params, defaults.gateway.params);
        assert_eq!(config.browser.wait_selector, defaults.browser.wait_selector);
        assert_eq!(config.browser.wait_timeout_ms, defaults.browser.wait_timeout_ms);
        assert_eq!(config.locator.hypotheses, defaults.locator.hypotheses);
        assert_eq!(config.locator.name_selectors, defaults.locator.name_selectors);
        assert_eq!(config.locator.price_selectors, defaults.locator.price_selectors);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[source]
page_delay_ms = 250

[fetch]
backend = "direct"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.source.page_delay_ms, 250);
        assert_eq!(config.fetch.backend, Backend::Direct);
        // Default values
        assert_eq!(config.source.page_size, 30);
        assert_eq!(config.gateway.api_key_env, "ZENROWS_API_KEY");
        assert_eq!(config.locator.hypotheses.len(), 4);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.source.default_max_results, 30);
        assert_eq!(config.fetch.backend, Backend::Gateway);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[source]\npage_size = 20\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.source.page_size, 20);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[source\npage_size = ").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_create_default_config_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::create_default_config(&path).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.locator.hypotheses[0].name, "list-area");
    }
}
