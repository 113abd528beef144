use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::app::{Result, ShelfscanError};
use crate::extractor::config::{HypothesisConfig, LocatorConfig};

/// Per-field sub-rules applied inside one candidate card.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub name: Vec<Selector>,
    pub title_link: Option<Selector>,
    pub price: Vec<Selector>,
    pub link: Selector,
}

/// A named strategy for finding repeated product cards in a document.
#[derive(Debug, Clone)]
pub struct Hypothesis {
    pub name: String,
    container: Selector,
    pub fields: FieldRules,
}

impl Hypothesis {
    pub fn compile(config: &HypothesisConfig, defaults: &LocatorConfig) -> Result<Self> {
        let container = Selector::parse(&config.container).map_err(|e| {
            ShelfscanError::Selector(format!(
                "hypothesis '{}' container '{}': {}",
                config.name, config.container, e
            ))
        })?;

        let name_selectors = config
            .name_selectors
            .as_deref()
            .unwrap_or(&defaults.name_selectors);
        let price_selectors = config
            .price_selectors
            .as_deref()
            .unwrap_or(&defaults.price_selectors);

        let title_link = match Selector::parse(&defaults.title_link_selector) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!(
                    "Ignoring title link selector '{}': {}",
                    defaults.title_link_selector, e
                );
                None
            }
        };

        let fields = FieldRules {
            name: compile_selectors(&config.name, "name", name_selectors)?,
            title_link,
            price: compile_selectors(&config.name, "price", price_selectors)?,
            link: parse_selector("a[href]")?,
        };

        Ok(Self {
            name: config.name.clone(),
            container,
            fields,
        })
    }

    /// Every node in the document matching this hypothesis' card shape,
    /// in document order.
    pub fn candidates<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&self.container).collect()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ShelfscanError::Selector(format!("'{}': {}", selector, e)))
}

/// Compile a selector list, skipping entries that do not parse.
///
/// At least one selector of each list has to survive.
fn compile_selectors(hypothesis: &str, field: &str, selectors: &[String]) -> Result<Vec<Selector>> {
    let mut compiled = Vec::with_capacity(selectors.len());
    let mut errors = Vec::new();

    for selector in selectors {
        match Selector::parse(selector) {
            Ok(s) => compiled.push(s),
            Err(e) => {
                warn!(
                    "Hypothesis '{}': skipping {} selector '{}': {}",
                    hypothesis, field, selector, e
                );
                errors.push(format!("'{}': {}", selector, e));
            }
        }
    }

    if compiled.is_empty() {
        return Err(ShelfscanError::Selector(format!(
            "hypothesis '{}' has no usable {} selector ({})",
            hypothesis,
            field,
            errors.join(", ")
        )));
    }

    if !errors.is_empty() {
        debug!("Hypothesis '{}' kept {} {} selectors", hypothesis, compiled.len(), field);
    }

    Ok(compiled)
}
