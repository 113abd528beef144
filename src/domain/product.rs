use serde::{Deserialize, Serialize};

/// Brand used when the product name carries no bracketed brand segment.
pub const GENERIC_BRAND: &str = "General";

/// Model used when no model-like token appears in the product name.
pub const NO_MODEL: &str = "N/A";

/// One normalized product listing.
///
/// Built only once every required field has passed validation and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_id: String,
    pub brand_name: String,
    pub product_name: String,
    pub product_model: String,
    pub price: u64,
    pub link: String,
}
