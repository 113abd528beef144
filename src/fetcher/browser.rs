use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::app::{Result, ShelfscanError};
use crate::config::{FetchConfig, HeadlessConfig};
use crate::domain::RawPage;
use crate::fetcher::Fetcher;

const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Renders listing pages in a local headless Chrome.
///
/// The browser is launched on the first fetch and reused for the rest of
/// the process.
pub struct BrowserFetcher {
    browser: OnceCell<Browser>,
    settings: HeadlessConfig,
    user_agent: String,
}

impl BrowserFetcher {
    pub fn new(fetch: &FetchConfig, settings: &HeadlessConfig) -> Self {
        Self {
            browser: OnceCell::new(),
            settings: settings.clone(),
            user_agent: fetch.user_agent.clone(),
        }
    }

    async fn browser(&self) -> Result<&Browser> {
        self.browser
            .get_or_try_init(|| launch(&self.settings))
            .await
    }
}

async fn launch(settings: &HeadlessConfig) -> Result<Browser> {
    let mut builder = BrowserConfig::builder()
        .arg("--no-sandbox")
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage");

    if !settings.headless {
        builder = builder.with_head();
    }

    let config = builder
        .build()
        .map_err(|e| ShelfscanError::Browser(format!("Failed to build browser config: {}", e)))?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        ShelfscanError::Browser(format!(
            "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
            e
        ))
    })?;

    tokio::spawn(async move {
        while let Some(_event) = handler.next().await {}
    });

    info!("Headless browser launched");
    Ok(browser)
}

/// Call `probe` until it reports success or `timeout` has elapsed.
///
/// The probe always runs at least once and once more at the deadline.
async fn poll_until<F, Fut>(mut probe: F, timeout: Duration, interval: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe().await {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

impl BrowserFetcher {
    /// Everything between opening the tab and closing it.
    async fn render(&self, page: &Page, url: &Url, page_number: u32) -> Result<String> {
        // Set before navigating so the listing request itself carries it
        page.set_user_agent(self.user_agent.as_str())
            .await
            .map_err(|e| ShelfscanError::Browser(format!("Failed to set user agent: {}", e)))?;

        page.goto(url.as_str())
            .await
            .map_err(|e| ShelfscanError::Browser(format!("Failed to open page: {}", e)))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| ShelfscanError::Browser(format!("Navigation failed: {}", e)))?;

        if let Some(ref selector) = self.settings.wait_selector {
            let found = poll_until(
                move || async move { page.find_element(selector.as_str()).await.is_ok() },
                self.settings.wait_timeout(),
                SELECTOR_POLL_INTERVAL,
            )
            .await;
            if !found {
                warn!(
                    "Page {}: '{}' not present after {} ms",
                    page_number, selector, self.settings.wait_timeout_ms
                );
            }
        }

        if self.settings.scroll_to_bottom {
            page.evaluate(SCROLL_SCRIPT)
                .await
                .map_err(|e| ShelfscanError::Browser(format!("Scroll failed: {}", e)))?;
        }

        // Lazy prices and images load after scrolling
        tokio::time::sleep(self.settings.settle()).await;

        page.content()
            .await
            .map_err(|e| ShelfscanError::Browser(format!("Failed to read page: {}", e)))
    }
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &Url, page_number: u32) -> Result<RawPage> {
        let browser = self.browser().await?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ShelfscanError::Browser(format!("Failed to open tab: {}", e)))?;

        let rendered = self.render(&page, url, page_number).await;

        if let Err(e) = page.close().await {
            debug!("Page {}: failed to close tab: {}", page_number, e);
        }

        let markup = rendered?;
        debug!("Page {}: rendered {} bytes", page_number, markup.len());
        Ok(RawPage::new(page_number, markup))
    }
}
