//! Turning result-page markup into product records.
//!
//! # Architecture
//!
//! ```text
//! RawPage → Html → ElementLocator (hypotheses) → ProductExtractor → PageExtraction
//! ```
//!
//! The [`ElementLocator`] owns an ordered list of [`Hypothesis`] values.
//! Each one finds candidate cards and carries the field sub-rules the
//! [`ProductExtractor`] applies inside those cards. The first hypothesis
//! producing at least one accepted record wins the page.

mod config;
mod hypothesis;
mod locator;
mod product;

pub use config::{HypothesisConfig, LocatorConfig};
pub use hypothesis::{FieldRules, Hypothesis};
pub use locator::{ElementLocator, PageExtraction};
pub use product::{Extraction, ProductExtractor, Rejection};

use scraper::Html;
use tracing::debug;

use crate::app::Result;
use crate::config::SourceConfig;
use crate::domain::RawPage;

/// Locator and extractor bundled for whole-page use.
#[derive(Debug, Clone)]
pub struct ListingParser {
    locator: ElementLocator,
    extractor: ProductExtractor,
}

impl ListingParser {
    pub fn new(locator: ElementLocator, extractor: ProductExtractor) -> Self {
        Self { locator, extractor }
    }

    pub fn from_config(source: &SourceConfig, locator: &LocatorConfig) -> Result<Self> {
        Ok(Self::new(
            ElementLocator::from_config(locator)?,
            ProductExtractor::new(source)?,
        ))
    }

    /// Parse one page. The parsed document does not outlive this call.
    pub fn parse(&self, page: RawPage) -> PageExtraction {
        if page.is_empty() {
            debug!("Page {}: blank markup", page.page);
            return PageExtraction::default();
        }

        let document = Html::parse_document(&page.markup);
        let extraction = self.locator.extract_page(&document, &self.extractor);

        for rejection in extraction.rejections() {
            debug!("Page {}: dropped card: {}", page.page, rejection);
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_page() {
        let parser =
            ListingParser::from_config(&SourceConfig::default(), &LocatorConfig::default()).unwrap();
        let page = RawPage::new(
            1,
            r#"<div class="listArea"><ul>
                <li><a href="/goods/GoodsDetail.jsp?i_code=42"><p class="prdName">【Dyson】Supersonic HD15</p></a>
                    <p class="price"><b>$15,900</b></p></li>
            </ul></div>"#,
        );

        let records = parser.parse(page).into_accepted();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].brand_name, "Dyson");
        assert_eq!(records[0].product_model, "HD15");
        assert_eq!(records[0].price, 15900);
    }

    #[test]
    fn test_empty_markup_yields_nothing() {
        let parser =
            ListingParser::from_config(&SourceConfig::default(), &LocatorConfig::default()).unwrap();
        assert!(parser.parse(RawPage::new(1, "")).is_empty());

        let blank = parser.parse(RawPage::new(2, "  \n\t "));
        assert!(blank.is_empty());
        assert!(blank.tried.is_empty());
    }
}
