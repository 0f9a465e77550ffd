//! Currency detection.

use crate::models::Currency;

/// Keyword table, consulted in declaration order.
pub const CURRENCY_KEYWORDS: [(Currency, &[&str]); 4] = [
    (Currency::Ngn, &["ngn", "naira", "₦", "nigeria naira"]),
    (Currency::Usd, &["usd", "dollar", "$", "us dollar"]),
    (Currency::Gbp, &["gbp", "pound", "£", "british pound"]),
    (Currency::Eur, &["eur", "euro", "€"]),
];

/// First currency in table order whose keyword occurs in `content`
/// (case-insensitive substring match).
pub fn detect_currency(content: &str) -> Option<Currency> {
    let lowered = content.to_lowercase();
    CURRENCY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(currency, _)| *currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_currency() {
        assert_eq!(detect_currency("Amount: NGN 1,000"), Some(Currency::Ngn));
        assert_eq!(detect_currency("You received USD 250"), Some(Currency::Usd));
        assert_eq!(detect_currency("Total £40"), Some(Currency::Gbp));
        assert_eq!(detect_currency("Paid 30 EURO"), Some(Currency::Eur));
        assert_eq!(detect_currency("nothing here"), None);
    }

    #[test]
    fn test_table_order_wins() {
        // Both naira and dollar appear; NGN is declared first.
        assert_eq!(detect_currency("$5 fee on ₦5,000"), Some(Currency::Ngn));
    }
}
