use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::app::Result;
use crate::config::FetchConfig;
use crate::domain::RawPage;
use crate::fetcher::Fetcher;

/// Plain HTTP GET against the listing source.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

pub(crate) fn build_client(config: &FetchConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// GET a URL and return the body of a successful response as a page.
pub(crate) async fn get_page(client: &Client, url: &str, page: u32) -> Result<RawPage> {
    let response = client.get(url).send().await?;
    response.error_for_status_ref()?;

    let markup = response.text().await?;
    debug!("Page {}: received {} bytes", page, markup.len());

    Ok(RawPage::new(page, markup))
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, page: u32) -> Result<RawPage> {
        get_page(&self.client, url.as_str(), page).await
    }
}
