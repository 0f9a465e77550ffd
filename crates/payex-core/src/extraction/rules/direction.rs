//! Credit/debit detection.

use crate::models::Direction;

use super::patterns::{CREDIT_WORDS, DEBIT_WORDS};

/// Classify a notification as credit or debit.
///
/// Credit wording is checked first, so an alert mentioning both reads as a
/// credit; with neither present the default is credit.
pub fn detect_direction(content: &str) -> Direction {
    if CREDIT_WORDS.is_match(content) {
        Direction::Credit
    } else if DEBIT_WORDS.is_match(content) {
        Direction::Debit
    } else {
        Direction::Credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_direction() {
        assert_eq!(detect_direction("Your account was credited"), Direction::Credit);
        assert_eq!(detect_direction("Debit alert: NGN 500"), Direction::Debit);
        assert_eq!(detect_direction("Money sent to JANE"), Direction::Debit);
        assert_eq!(detect_direction("Transaction notification"), Direction::Credit);
    }

    #[test]
    fn test_whole_words_only() {
        // "consent" and "present" must not read as "sent".
        assert_eq!(detect_direction("By your consent, present"), Direction::Credit);
        assert_eq!(detect_direction("Withdrawal of consent"), Direction::Debit);
    }
}
