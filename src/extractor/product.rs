use std::fmt;

use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

use crate::app::{Result, ShelfscanError};
use crate::config::SourceConfig;
use crate::domain::ProductRecord;
use crate::extractor::hypothesis::FieldRules;
use crate::normalizer::{clean_text, parse_brand, parse_model, parse_price};

/// Why a candidate card did not become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingName,
    MissingItemCode,
    NonPositivePrice { raw: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "no product name"),
            Self::MissingItemCode => write!(f, "no link carrying an item code"),
            Self::NonPositivePrice { raw } if raw.is_empty() => write!(f, "no price"),
            Self::NonPositivePrice { raw } => write!(f, "price '{}' is not positive", raw),
        }
    }
}

/// Outcome of extracting one candidate card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Accepted(ProductRecord),
    Rejected(Rejection),
}

impl Extraction {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn record(&self) -> Option<&ProductRecord> {
        match self {
            Self::Accepted(record) => Some(record),
            Self::Rejected(_) => None,
        }
    }
}

/// Turns one candidate card into a [`ProductRecord`] or a [`Rejection`].
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    item_code: Regex,
    item_code_param: String,
    detail_base: Url,
}

impl ProductExtractor {
    pub fn new(source: &SourceConfig) -> Result<Self> {
        let pattern = format!(r"[?&]{}=(\d+)", regex::escape(&source.item_code_param));
        let item_code = Regex::new(&pattern)
            .map_err(|e| ShelfscanError::Config(format!("item code pattern: {}", e)))?;
        let detail_base = source.detail_base()?;

        Ok(Self {
            item_code,
            item_code_param: source.item_code_param.clone(),
            detail_base,
        })
    }

    /// Extract one card. Fields are resolved in order name, item code,
    /// price; the first missing one decides the rejection.
    pub fn extract(&self, card: ElementRef<'_>, rules: &FieldRules) -> Extraction {
        let Some(name) = self.extract_name(card, rules) else {
            return Extraction::Rejected(Rejection::MissingName);
        };

        let Some(product_id) = self.extract_item_code(card, &rules.link) else {
            return Extraction::Rejected(Rejection::MissingItemCode);
        };

        let raw_price = first_text(card, &rules.price).unwrap_or_default();
        let price = parse_price(&raw_price);
        if price == 0 {
            return Extraction::Rejected(Rejection::NonPositivePrice { raw: raw_price });
        }

        let link = self.detail_link(&product_id);

        Extraction::Accepted(ProductRecord {
            brand_name: parse_brand(&name),
            product_model: parse_model(&name),
            product_id,
            product_name: name,
            price,
            link,
        })
    }

    fn extract_name(&self, card: ElementRef<'_>, rules: &FieldRules) -> Option<String> {
        first_text(card, &rules.name).or_else(|| {
            let selector = rules.title_link.as_ref()?;
            card.select(selector)
                .filter_map(|link| link.value().attr("title"))
                .map(clean_text)
                .find(|title| !title.is_empty())
        })
    }

    /// Numeric code from the first descendant link that carries one.
    fn extract_item_code(&self, card: ElementRef<'_>, links: &Selector) -> Option<String> {
        card.select(links)
            .filter_map(|link| link.value().attr("href"))
            .filter(|href| href.contains(self.item_code_param.as_str()))
            .find_map(|href| {
                self.item_code
                    .captures(href)
                    .and_then(|caps| caps.get(1))
                    .map(|code| code.as_str().to_string())
            })
    }

    fn detail_link(&self, item_code: &str) -> String {
        let mut url = self.detail_base.clone();
        url.query_pairs_mut()
            .append_pair(&self.item_code_param, item_code);
        url.to_string()
    }
}

/// Cleaned text of the first element matched by the first selector that
/// yields non-empty text.
fn first_text(card: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        card.select(selector)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    })
}
