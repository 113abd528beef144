pub mod browser;
pub mod gateway;
pub mod http_fetcher;

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::app::Result;
use crate::config::{Backend, Config};
use crate::domain::RawPage;

pub use browser::BrowserFetcher;
pub use gateway::GatewayFetcher;
pub use http_fetcher::HttpFetcher;

/// Producer of raw result-page markup.
#[async_trait]
pub trait Fetcher {
    /// Check that the backend can run at all (credentials present etc.)
    /// without touching the network.
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Fetch one listing page. Non-success responses are errors.
    async fn fetch(&self, url: &Url, page: u32) -> Result<RawPage>;
}

/// Build the backend selected in the configuration.
pub fn from_config(config: &Config) -> Result<Arc<dyn Fetcher + Send + Sync>> {
    let fetcher: Arc<dyn Fetcher + Send + Sync> = match config.fetch.backend {
        Backend::Direct => Arc::new(HttpFetcher::new(&config.fetch)?),
        Backend::Gateway => Arc::new(GatewayFetcher::new(
            &config.fetch,
            &config.gateway,
            config.gateway.api_key(),
        )?),
        Backend::Browser => Arc::new(BrowserFetcher::new(&config.fetch, &config.browser)),
    };
    Ok(fetcher)
}
