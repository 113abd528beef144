use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::Result;

/// Description of the listing source: where search pages live, how pages
/// are numbered and how detail links are formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Scheme and host of the source (default: `https://www.momoshop.com.tw`)
    pub base_url: String,

    /// Path of the search results page
    pub search_path: String,

    /// Query parameter carrying the search term
    pub keyword_param: String,

    /// Query parameter carrying the 1-based page number
    pub page_param: String,

    /// Fixed extra query parameters for every search page
    pub search_params: BTreeMap<String, String>,

    /// Path of the product detail page
    pub detail_path: String,

    /// Query parameter holding the numeric item code in detail links
    pub item_code_param: String,

    /// Native number of products per result page (default: 30)
    pub page_size: usize,

    /// Pause between page fetches in milliseconds (default: 1000)
    pub page_delay_ms: u64,

    /// Result cap used when a request does not name one (default: 30)
    pub default_max_results: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.momoshop.com.tw".to_string(),
            search_path: "/search/searchShop.jsp".to_string(),
            keyword_param: "keyword".to_string(),
            page_param: "curPage".to_string(),
            search_params: BTreeMap::from([("searchType".to_string(), "1".to_string())]),
            detail_path: "/goods/GoodsDetail.jsp".to_string(),
            item_code_param: "i_code".to_string(),
            page_size: 30,
            page_delay_ms: 1000,
            default_max_results: 30,
        }
    }
}

impl SourceConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Number of pages needed to cover `max_results` at the native page size.
    pub fn max_pages(&self, max_results: usize) -> u32 {
        let page_size = self.page_size.max(1);
        let pages = max_results.div_ceil(page_size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Listing URL for one page of a search.
    pub fn search_url(&self, search_term: &str, page: u32) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?.join(&self.search_path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(&self.keyword_param, search_term);
            for (key, value) in &self.search_params {
                query.append_pair(key, value);
            }
            query.append_pair(&self.page_param, &page.to_string());
        }
        Ok(url)
    }

    /// Absolute detail page URL without a query; canonical product links
    /// append `item_code_param` to it.
    pub fn detail_base(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?.join(&self.detail_path)?)
    }
}
