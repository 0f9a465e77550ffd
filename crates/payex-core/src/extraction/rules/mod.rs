//! Rule-based field extractors for bank payment notifications.

pub mod patterns;
pub mod amounts;
pub mod currency;
pub mod direction;
pub mod sender;
pub mod account;

pub use amounts::{parse_amount, AmountExtractor, MIN_AMOUNT};
pub use currency::{detect_currency, CURRENCY_KEYWORDS};
pub use direction::detect_direction;
pub use sender::{extract_sender_name, SenderExtractor};
pub use account::extract_account_number;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// First match in priority order.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Every match, in the same order `extract` considers them.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched value together with where it came from.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            source: source.into(),
        }
    }
}
