//! Sequential fetch-and-extract loop over result pages.
//!
//! One [`PaginationRun`] owns all run-scoped state: the seen-identifier set,
//! the accumulated records and the page cursor. Pages are fetched strictly
//! one after another; callers that want to stop early simply stop calling
//! [`PaginationRun::next_page`] and take the partial outcome with
//! [`PaginationRun::finish`].

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::app::Result;
use crate::config::SourceConfig;
use crate::dedup::SeenIds;
use crate::domain::{ExtractionRequest, ProductRecord};
use crate::extractor::ListingParser;
use crate::fetcher::Fetcher;

/// Why a run stopped fetching pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of records was reached
    CapReached,
    /// A page produced no new records
    PageExhausted { page: u32 },
    /// Every page implied by the cap and page size was fetched
    PageLimitReached { max_pages: u32 },
    /// A page after the first could not be fetched
    TransportFailure { page: u32, message: String },
    /// The caller stopped before the run finished on its own
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapReached => write!(f, "result cap reached"),
            Self::PageExhausted { page } => write!(f, "page {} had no new products", page),
            Self::PageLimitReached { max_pages } => write!(f, "page limit {} reached", max_pages),
            Self::TransportFailure { page, message } => {
                write!(f, "page {} failed: {}", page, message)
            }
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of one finished run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub records: Vec<ProductRecord>,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// What one call to [`PaginationRun::next_page`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStep {
    /// A page was fetched and processed
    Fetched {
        page: u32,
        accepted: usize,
        hypothesis: Option<String>,
    },
    /// Nothing was fetched; the run is over
    Done(StopReason),
}

/// Drives runs against one source with one fetch backend.
pub struct PaginationController {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parser: Arc<ListingParser>,
    source: SourceConfig,
}

impl PaginationController {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        parser: Arc<ListingParser>,
        source: SourceConfig,
    ) -> Self {
        Self {
            fetcher,
            parser,
            source,
        }
    }

    /// Start a run without fetching anything yet.
    pub fn begin(&self, request: ExtractionRequest) -> PaginationRun<'_> {
        let max_pages = self.source.max_pages(request.max_results);
        info!(
            "Will fetch up to {} pages to get {} products for '{}'",
            max_pages, request.max_results, request.search_term
        );

        PaginationRun {
            controller: self,
            request,
            max_pages,
            seen: SeenIds::new(),
            records: Vec::new(),
            pages_fetched: 0,
            stop_reason: None,
            started_at: Utc::now(),
        }
    }

    /// Run until a stop condition holds.
    ///
    /// Input and configuration problems, and a failure to fetch the very
    /// first page, are errors. Everything later degrades to a partial result.
    pub async fn run(&self, search_term: &str, max_results: usize) -> Result<RunOutcome> {
        let request = ExtractionRequest::first(search_term, max_results)?;
        self.fetcher.ensure_ready()?;

        let mut run = self.begin(request);
        while let PageStep::Fetched { .. } = run.next_page().await? {}

        let outcome = run.finish();
        info!(
            "Scraped {} products across {} pages ({})",
            outcome.records.len(),
            outcome.pages_fetched,
            outcome.stop_reason
        );
        Ok(outcome)
    }
}

/// State of one run in progress.
pub struct PaginationRun<'a> {
    controller: &'a PaginationController,
    request: ExtractionRequest,
    max_pages: u32,
    seen: SeenIds,
    records: Vec<ProductRecord>,
    pages_fetched: u32,
    stop_reason: Option<StopReason>,
    started_at: DateTime<Utc>,
}

impl PaginationRun<'_> {
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Page the next call would fetch.
    pub fn current_page(&self) -> u32 {
        self.request.page
    }

    fn pending_stop(&self) -> Option<StopReason> {
        if let Some(ref reason) = self.stop_reason {
            return Some(reason.clone());
        }
        if self.records.len() >= self.request.max_results {
            return Some(StopReason::CapReached);
        }
        if self.request.page > self.max_pages {
            return Some(StopReason::PageLimitReached {
                max_pages: self.max_pages,
            });
        }
        None
    }

    /// Fetch and process the next page, or report why the run is over.
    pub async fn next_page(&mut self) -> Result<PageStep> {
        if let Some(reason) = self.pending_stop() {
            self.stop_reason = Some(reason.clone());
            return Ok(PageStep::Done(reason));
        }

        let controller = self.controller;
        let page = self.request.page;

        if self.pages_fetched > 0 && controller.source.page_delay_ms > 0 {
            tokio::time::sleep(controller.source.page_delay()).await;
        }

        let url = controller
            .source
            .search_url(&self.request.search_term, page)?;
        info!("Fetching page {}", page);

        let raw = match controller.fetcher.fetch(&url, page).await {
            Ok(raw) => raw,
            Err(e) if self.pages_fetched == 0 => return Err(e),
            Err(e) => {
                warn!("Page {} failed, keeping {} products: {}", page, self.records.len(), e);
                let reason = StopReason::TransportFailure {
                    page,
                    message: e.to_string(),
                };
                self.stop_reason = Some(reason.clone());
                return Ok(PageStep::Done(reason));
            }
        };

        self.pages_fetched += 1;
        debug!("Page {} - received markup, length {}", page, raw.len());

        let extraction = controller.parser.parse(raw);
        let hypothesis = extraction.hypothesis.clone();
        let accepted = self.accept(extraction.into_accepted());

        info!(
            "Page {} - extracted {} products (total {})",
            page,
            accepted,
            self.records.len()
        );

        if accepted == 0 {
            info!("No new products on page {}, stopping", page);
            self.stop_reason = Some(StopReason::PageExhausted { page });
        }

        self.request = self.request.for_page(page + 1);

        Ok(PageStep::Fetched {
            page,
            accepted,
            hypothesis,
        })
    }

    /// Append unseen records up to the cap; returns how many were added.
    fn accept(&mut self, candidates: Vec<ProductRecord>) -> usize {
        let mut accepted = 0;
        for record in candidates {
            if self.records.len() >= self.request.max_results {
                break;
            }
            if !self.seen.should_accept(&record.product_id) {
                debug!("Skipping duplicate product {}", record.product_id);
                continue;
            }
            self.records.push(record);
            accepted += 1;
        }
        accepted
    }

    /// End the run and hand over what was collected.
    pub fn finish(self) -> RunOutcome {
        RunOutcome {
            records: self.records,
            pages_fetched: self.pages_fetched,
            stop_reason: self.stop_reason.unwrap_or(StopReason::Cancelled),
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
