//! Price detection
//!
//! A currency symbol (`$ € £ ¥ ₹`) directly before or after an amount with an
//! optional two-digit fraction (`.` or `,` separated). Lines matching this are
//! item boundaries; the same pattern extracts the price from assembled items.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::lines::Line;

static PRICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[$€£¥₹]\s*[0-9]+(?:[.,][0-9]{2})?|[0-9]+(?:[.,][0-9]{2})?\s*[$€£¥₹]")
        .expect("price pattern is valid")
});

/// Whether `text` contains a price anywhere
pub fn contains_price(text: &str) -> bool {
    PRICE_PATTERN.is_match(text)
}

/// First price in `text`, trimmed
pub fn extract_price(text: &str) -> Option<String> {
    PRICE_PATTERN
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}

/// Indices of lines whose space-joined text contains a price
pub fn detect_prices(lines: &[Line]) -> BTreeSet<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| contains_price(&line.text()))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::lines::{group_into_lines, DEFAULT_LINE_THRESHOLD};
    use crate::ocr::fragment;

    #[test]
    fn test_symbol_before_amount() {
        assert_eq!(extract_price("Pollo asado $12.00"), Some("$12.00".to_string()));
        assert_eq!(extract_price("£7"), Some("£7".to_string()));
        assert_eq!(extract_price("Thali ₹ 250"), Some("₹ 250".to_string()));
    }

    #[test]
    fn test_symbol_after_amount() {
        assert_eq!(extract_price("Crema catalana 12,50€"), Some("12,50€".to_string()));
        assert_eq!(extract_price("Ramen 980 ¥"), Some("980 ¥".to_string()));
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract_price("Small $4\nLarge $6"), Some("$4".to_string()));
    }

    #[test]
    fn test_fraction_needs_two_digits() {
        // The single fraction digit is not part of the match
        assert_eq!(extract_price("$3.5"), Some("$3".to_string()));
    }

    #[test]
    fn test_no_price() {
        assert!(!contains_price("Served with rice and beans"));
        assert!(!contains_price("12.00"));
        assert!(!contains_price("$"));
        assert_eq!(extract_price("Daily special"), None);
    }

    #[test]
    fn test_detect_prices_by_line() {
        let fragments = vec![
            fragment("Pollo", 10.0, 10.0, 0.9),
            fragment("asado", 60.0, 12.0, 0.9),
            fragment("$12.00", 10.0, 40.0, 0.9),
            fragment("Flan", 10.0, 80.0, 0.9),
            fragment("5", 200.0, 120.0, 0.9),
            fragment("€", 215.0, 121.0, 0.9),
        ];
        let lines = group_into_lines(&fragments, DEFAULT_LINE_THRESHOLD);

        let prices = detect_prices(&lines);
        assert_eq!(prices.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_detect_prices_empty() {
        assert!(detect_prices(&[]).is_empty());
    }
}
