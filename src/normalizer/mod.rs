//! Field normalization for raw listing text.
//!
//! Every function here is total: it returns a best-effort value or a
//! documented default and never fails. Accepting or rejecting a record is
//! left to the product extractor.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::product::{GENERIC_BRAND, NO_MODEL};

static BRAND_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"【([^】]+)】").expect("brand pattern is valid"));

static MODEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z0-9]+-[A-Za-z0-9]+|[A-Z]{2,}[0-9]{2,}[A-Z0-9]*)")
        .expect("model pattern is valid")
});

/// Parse a price by dropping every non-digit character.
///
/// No digits at all gives `0`, as does a digit run too long for `u64`.
/// Ranges such as `1,299~2,599` concatenate their digits; that mirrors the
/// source listing behaviour and is rejected downstream only when it
/// overflows.
pub fn parse_price(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(0)
}

/// Brand from the first `【…】` segment of a product name.
pub fn parse_brand(name: &str) -> String {
    BRAND_PATTERN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| GENERIC_BRAND.to_string())
}

/// First model-like token of a product name.
///
/// Either `alnum-alnum` (e.g. `XJ-200`) or uppercase letters followed by
/// digits (e.g. `HD15`, `EHNA0J`).
pub fn parse_model(name: &str) -> String {
    MODEL_PATTERN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NO_MODEL.to_string())
}

/// Collapse whitespace runs (newlines, tabs, NBSP) to single spaces and trim.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_strips_currency_and_separators() {
        assert_eq!(parse_price("$1,290"), 1290);
        assert_eq!(parse_price("NT$ 12,990 元"), 12990);
        assert_eq!(parse_price(" 499 "), 499);
    }

    #[test]
    fn test_price_without_digits_is_zero() {
        assert_eq!(parse_price("洽詢"), 0);
        assert_eq!(parse_price(""), 0);
        assert_eq!(parse_price("$ -"), 0);
    }

    #[test]
    fn test_price_range_concatenates_digits() {
        assert_eq!(parse_price("1,299~2,599"), 12992599);
    }

    #[test]
    fn test_price_overflow_is_zero() {
        assert_eq!(parse_price(&"9".repeat(40)), 0);
    }

    #[test]
    fn test_price_ignores_non_ascii_digits() {
        assert_eq!(parse_price("１２３"), 0);
    }

    #[test]
    fn test_brand_from_brackets() {
        assert_eq!(parse_brand("【ABC】XJ-200 吹風機"), "ABC");
        assert_eq!(parse_brand("限時【Panasonic 國際牌】負離子吹風機"), "Panasonic 國際牌");
    }

    #[test]
    fn test_brand_first_segment_wins() {
        assert_eq!(parse_brand("【Dyson】【官方旗艦】HD15"), "Dyson");
    }

    #[test]
    fn test_brand_defaults_to_generic() {
        assert_eq!(parse_brand("吹風機 大風量"), GENERIC_BRAND);
        assert_eq!(parse_brand("【】空白"), GENERIC_BRAND);
        assert_eq!(parse_brand("[ABC] square brackets"), GENERIC_BRAND);
    }

    #[test]
    fn test_model_hyphenated_token() {
        assert_eq!(parse_model("【ABC】XJ-200 吹風機"), "XJ-200");
        assert_eq!(parse_model("Panasonic EH-NA0J 奈米水離子"), "EH-NA0J");
    }

    #[test]
    fn test_model_letters_then_digits() {
        assert_eq!(parse_model("Dyson Supersonic HD15 吹風機"), "HD15");
        assert_eq!(parse_model("SONY WH1000XM5 耳機"), "WH1000XM5");
    }

    #[test]
    fn test_model_leftmost_match_wins() {
        assert_eq!(parse_model("TX90 與 AB-12 組合"), "TX90");
    }

    #[test]
    fn test_model_defaults_to_not_applicable() {
        assert_eq!(parse_model("負離子吹風機"), NO_MODEL);
        assert_eq!(parse_model("Hair dryer A1"), NO_MODEL);
    }

    #[test]
    fn test_normalizers_are_deterministic() {
        let name = "【ABC】XJ-200 吹風機 $1,290";
        assert_eq!(parse_price(name), parse_price(name));
        assert_eq!(parse_brand(name), parse_brand(name));
        assert_eq!(parse_model(name), parse_model(name));
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("\n  【ABC】\t XJ-200\n吹風機  "), "【ABC】 XJ-200 吹風機");
        assert_eq!(clean_text("   "), "");
    }
}
