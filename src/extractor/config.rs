use serde::{Deserialize, Serialize};

/// Selector configuration for locating product cards and their fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Card-locating hypotheses, most specific first
    pub hypotheses: Vec<HypothesisConfig>,

    /// Name regions tried in order inside a card
    pub name_selectors: Vec<String>,

    /// Price regions tried in order inside a card
    pub price_selectors: Vec<String>,

    /// Links whose `title` attribute is the last resort for the name
    pub title_link_selector: String,
}

/// One named hypothesis. Field selectors fall back to the locator-wide
/// lists when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisConfig {
    pub name: String,
    pub container: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_selectors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_selectors: Option<Vec<String>>,
}

impl HypothesisConfig {
    pub fn new(name: &str, container: &str) -> Self {
        Self {
            name: name.to_string(),
            container: container.to_string(),
            name_selectors: None,
            price_selectors: None,
        }
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            hypotheses: vec![
                HypothesisConfig::new("list-area", ".listArea li"),
                HypothesisConfig::new("goods-list", ".goodsUl li, li.goodsItem"),
                HypothesisConfig::new("product-list", ".prdListArea li, .searchPrdListArea li"),
                // Last resort: any list item; cards without an item-code link are rejected
                HypothesisConfig::new("item-code-anchor", "li"),
            ],
            name_selectors: vec![
                ".prdName".to_string(),
                "h3".to_string(),
                ".goodsName".to_string(),
            ],
            price_selectors: vec![
                ".price .money".to_string(),
                ".price b".to_string(),
                ".prdPrice".to_string(),
                ".money, b".to_string(),
            ],
            title_link_selector: "a[title]".to_string(),
        }
    }
}
