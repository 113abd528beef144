use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::app::{Result, ShelfscanError};
use crate::config::{FetchConfig, GatewayConfig};
use crate::domain::RawPage;
use crate::fetcher::http_fetcher::{build_client, get_page};
use crate::fetcher::Fetcher;

/// Fetches pages through a JS-rendering HTTP gateway.
///
/// The target URL travels as the `url` query parameter and the key as
/// `apikey`, followed by the configured extra parameters.
pub struct GatewayFetcher {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    api_key_env: String,
    params: BTreeMap<String, String>,
}

impl GatewayFetcher {
    pub fn new(fetch: &FetchConfig, gateway: &GatewayConfig, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(fetch)?,
            endpoint: Url::parse(&gateway.endpoint)?,
            api_key,
            api_key_env: gateway.api_key_env.clone(),
            params: gateway.params.clone(),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            ShelfscanError::Config(format!(
                "missing gateway API key; set the {} environment variable",
                self.api_key_env
            ))
        })
    }

    /// Gateway request URL wrapping a target page URL.
    pub fn gateway_url(&self, target: &Url) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("apikey", self.api_key()?);
            query.append_pair("url", target.as_str());
            for (key, value) in &self.params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl Fetcher for GatewayFetcher {
    fn ensure_ready(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    async fn fetch(&self, url: &Url, page: u32) -> Result<RawPage> {
        let gateway_url = self.gateway_url(url)?;
        debug!("Page {}: fetching {} via gateway", page, url);
        get_page(&self.client, gateway_url.as_str(), page).await
    }
}
