//! # Shelfscan
//!
//! Extracts product listings from a shop's paginated search results.
//!
//! ## Architecture
//!
//! Each result page flows through a fixed pipeline:
//!
//! ```text
//! Fetcher → Locator → Extractor → Normalizer → Dedup → Pagination
//! ```
//!
//! - [`fetcher`]: Retrieves rendered page markup (direct, gateway or headless browser)
//! - [`extractor`]: Finds product cards with ordered hypotheses and pulls fields out of them
//! - [`normalizer`]: Turns raw price and title text into clean values
//! - [`dedup`]: Drops repeated product identifiers within a run
//! - [`pagination`]: Walks result pages until the cap or the listing runs out
//!
//! ## Quick Start
//!
//! ```bash
//! export ZENROWS_API_KEY=...
//!
//! # Search and print a table
//! shelfscan search 吹風機 -n 50
//!
//! # Write the results to CSV
//! shelfscan search 吹風機 -o search_results.csv
//!
//! # Serve a JSON request
//! echo '{"searchTerm": "吹風機", "maxResults": 30}' | shelfscan request
//!
//! # Debug the locator against a saved page
//! shelfscan parse page.html
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// fetch backend, parser and pagination controller.
pub mod app;

/// Request and response shapes for serving one search as JSON.
pub mod api;

/// Command-line interface using clap.
///
/// - `search <term>` - Run a search and print or export the results
/// - `request [file]` - Serve a JSON request
/// - `parse <file>` - Run extraction on a saved page
/// - `config` - Show the active configuration
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/shelfscan/config.toml`, covering the source site,
/// fetch backend, gateway, browser and locator hypotheses.
pub mod config;

/// Per-run identifier tracking.
pub mod dedup;

/// Core domain models.
///
/// - [`ProductRecord`](domain::ProductRecord): One extracted product
/// - [`ExtractionRequest`](domain::ExtractionRequest): A validated search request
/// - [`RawPage`](domain::RawPage): Markup of one fetched result page
pub mod domain;

/// CSV export of extracted products.
pub mod export;

/// Card location and field extraction.
///
/// - [`ElementLocator`](extractor::ElementLocator): Ordered hypotheses over page structure
/// - [`ProductExtractor`](extractor::ProductExtractor): Fields from one product card
/// - [`ListingParser`](extractor::ListingParser): Both, applied to a raw page
pub mod extractor;

/// Page fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page retrieval
/// - [`HttpFetcher`](fetcher::HttpFetcher): Plain reqwest client
/// - [`GatewayFetcher`](fetcher::GatewayFetcher): Rendering proxy service
/// - [`BrowserFetcher`](fetcher::BrowserFetcher): Headless Chrome via chromiumoxide
pub mod fetcher;

/// Price, brand and model normalization.
pub mod normalizer;

/// Page-by-page extraction runs.
pub mod pagination;
