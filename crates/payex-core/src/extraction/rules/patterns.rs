//! Common regex patterns for bank notification extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Cell label keywords for the table strategy
    pub static ref TABLE_AMOUNT_LABEL: Regex = Regex::new(
        r"(?i)amount|sum|value|total|paid|payment"
    ).unwrap();

    // Currency marker followed by an amount literal (cell text, plain text)
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"(?i)(?:ngn|naira|₦)\s*([0-9,]+\.?[0-9]*)"
    ).unwrap();

    // Keyword, currency marker, amount
    pub static ref LABELED_AMOUNT: Regex = Regex::new(
        r"(?i)(?:amount|sum|value|total|paid|payment|deposit|transfer|credit)[\s:]+(?:ngn|naira|₦)\s*([0-9,]+\.?[0-9]*)"
    ).unwrap();

    // Amount followed by a currency word ("1,000 naira")
    pub static ref TRAILING_CURRENCY_AMOUNT: Regex = Regex::new(
        r"(?i)([0-9,]+\.?[0-9]*)\s*(?:naira|ngn)"
    ).unwrap();

    // Raw-markup variants: non-breaking space entities count as whitespace
    pub static ref HTML_LABELED_AMOUNT: Regex = Regex::new(
        r"(?i)(?:amount|sum|value|total|paid|payment|deposit|transfer|credit)(?:[\s:]|&nbsp;|&#160;)+(?:ngn|naira|₦|&#8358;)(?:\s|&nbsp;|&#160;)*([0-9,]+\.?[0-9]*)"
    ).unwrap();

    pub static ref HTML_CURRENCY_AMOUNT: Regex = Regex::new(
        r"(?i)(?:ngn|naira|₦|&#8358;)(?:\s|&nbsp;|&#160;)*([0-9,]+\.?[0-9]*)"
    ).unwrap();

    // Sender narration: FROM JOHN DOE TO ...
    pub static ref FROM_NAME_TO: Regex = Regex::new(
        r"\b(?i:from)\s+([A-Z][A-Z\s]+?)\s+(?i:to)\b"
    ).unwrap();

    pub static ref DESCRIPTION_LABEL: Regex = Regex::new(
        r"(?i)^(?:description|remarks)\s*:?$"
    ).unwrap();

    // NUBAN account numbers are ten digits
    pub static ref ACCOUNT_LABEL: Regex = Regex::new(
        r"(?i)^account(?:\s*(?:number|no\.?))?\s*:?$"
    ).unwrap();

    pub static ref ACCOUNT_NUMBER: Regex = Regex::new(
        r"\b([0-9]{10})\b"
    ).unwrap();

    pub static ref LABELED_ACCOUNT_NUMBER: Regex = Regex::new(
        r"(?i)\baccount(?:\s*(?:number|no\.?))?[\s:]+([0-9]{10})\b"
    ).unwrap();

    // Transaction direction indicators
    pub static ref CREDIT_WORDS: Regex = Regex::new(
        r"(?i)\b(?:credit|credited|deposit|received)\b"
    ).unwrap();

    pub static ref DEBIT_WORDS: Regex = Regex::new(
        r"(?i)\b(?:debit|debited|withdrawal|sent)\b"
    ).unwrap();
}
