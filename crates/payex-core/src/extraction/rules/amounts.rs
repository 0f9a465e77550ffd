//! Amount parsing and pattern-driven amount extraction.

use regex::Regex;

use super::patterns::{
    CURRENCY_AMOUNT, HTML_CURRENCY_AMOUNT, HTML_LABELED_AMOUNT, LABELED_AMOUNT,
    TRAILING_CURRENCY_AMOUNT,
};
use super::{ExtractionMatch, FieldExtractor};

/// Smallest amount accepted as a payment. Anything below is taken to be an
/// incidental number (a date part, a reference code) near a currency marker.
pub const MIN_AMOUNT: f64 = 10.0;

/// Parse a captured amount literal such as `1,000.50`.
///
/// Commas are grouping separators and are dropped; `.` is the only decimal
/// point. Returns `None` for unparsable literals and for values below
/// [`MIN_AMOUNT`].
pub fn parse_amount(literal: &str) -> Option<f64> {
    let cleaned: String = literal.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let amount: f64 = cleaned.parse().ok()?;
    (amount.is_finite() && amount >= MIN_AMOUNT).then_some(amount)
}

/// Tries an ordered list of patterns; each pattern's first capture group is
/// the amount literal.
///
/// Matches come out pattern by pattern, each pattern in text order. A
/// literal that fails [`parse_amount`] is skipped, not fatal.
pub struct AmountExtractor {
    patterns: Vec<&'static Regex>,
    confidence: f32,
}

impl AmountExtractor {
    pub fn new(patterns: Vec<&'static Regex>, confidence: f32) -> Self {
        Self {
            patterns,
            confidence,
        }
    }

    /// Keyword + currency, then bare currency, over raw markup.
    pub fn html_text(confidence: f32) -> Self {
        Self::new(vec![&HTML_LABELED_AMOUNT, &HTML_CURRENCY_AMOUNT], confidence)
    }

    /// Keyword + currency, bare currency, then trailing currency word.
    pub fn plain_text(confidence: f32) -> Self {
        Self::new(
            vec![&LABELED_AMOUNT, &CURRENCY_AMOUNT, &TRAILING_CURRENCY_AMOUNT],
            confidence,
        )
    }

    /// Currency marker and amount only, for single table cells.
    pub fn currency_only(confidence: f32) -> Self {
        Self::new(vec![&CURRENCY_AMOUNT], confidence)
    }

    fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = ExtractionMatch<f64>> + 'a {
        self.patterns
            .iter()
            .flat_map(move |pattern| pattern.captures_iter(text))
            .filter_map(move |caps| {
                let literal = caps.get(1)?;
                let amount = parse_amount(literal.as_str())?;
                let full_match = caps.get(0)?;
                Some(ExtractionMatch::new(amount, self.confidence, full_match.as_str()))
            })
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<f64>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.matches(text).next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.matches(text).collect()
    }
}
