use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::extractor::ListingParser;
use crate::fetcher::{self, Fetcher};
use crate::pagination::PaginationController;

/// Process-wide wiring: configuration, fetch backend, parser and the
/// pagination controller built from them. Read-only once constructed.
pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub parser: Arc<ListingParser>,
    pub controller: PaginationController,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = fetcher::from_config(&config)?;
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        let parser = Arc::new(ListingParser::from_config(&config.source, &config.locator)?);
        let controller =
            PaginationController::new(fetcher.clone(), parser.clone(), config.source.clone());

        Ok(Self {
            config,
            fetcher,
            parser,
            controller,
        })
    }
}
