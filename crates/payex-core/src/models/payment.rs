//! Payment extraction result models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Currencies the extractor can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Nigerian naira.
    #[default]
    Ngn,
    /// US dollar.
    Usd,
    /// British pound.
    Gbp,
    /// Euro.
    Eur,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ngn => "NGN",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Eur => "EUR",
        }
    }

    /// Parse from an ISO code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "NGN" => Some(Self::Ngn),
            "USD" => Some(Self::Usd),
            "GBP" => Some(Self::Gbp),
            "EUR" => Some(Self::Eur),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether money arrived in or left the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Credit,
    Debit,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credit => write!(f, "credit"),
            Self::Debit => write!(f, "debit"),
        }
    }
}

/// Which strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Structured `<td>` cells in the HTML body.
    HtmlTable,
    /// Regex over the raw HTML markup.
    HtmlText,
    /// Regex over the declared plain-text body.
    TextBody,
    /// Regex over text rendered from the HTML body.
    HtmlRenderedText,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HtmlTable => "html_table",
            Self::HtmlText => "html_text",
            Self::TextBody => "text_body",
            Self::HtmlRenderedText => "html_rendered_text",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the one strategy that matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    /// Extracted amount, never below the plausibility floor.
    pub amount: f64,

    /// Currency code (default: NGN).
    #[serde(default)]
    pub currency: Currency,

    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,

    /// Strategy that produced the match.
    pub source: SourceTag,
}

impl StrategyResult {
    pub fn new(amount: f64, confidence: f32, source: SourceTag) -> Self {
        Self {
            amount,
            currency: Currency::default(),
            confidence,
            source,
        }
    }
}

/// A complete extracted payment: the winning match plus enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(flatten)]
    pub result: StrategyResult,

    /// Credit or debit.
    #[serde(default)]
    pub direction: Direction,

    /// Lower-cased sender name from a "FROM NAME TO" narration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,

    /// Ten-digit account number, when the notification names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
}

/// Trace of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Steps attempted, in order.
    pub steps: Vec<String>,

    /// Failures recorded along the way.
    pub errors: Vec<String>,

    /// Length of the text body in characters.
    pub text_length: usize,

    /// Length of the HTML body in characters.
    pub html_length: usize,
}

impl Diagnostics {
    pub fn new(text_length: usize, html_length: usize) -> Self {
        Self {
            text_length,
            html_length,
            ..Self::default()
        }
    }

    pub fn step(&mut self, message: impl Into<String>) {
        self.steps.push(message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Prefix of errors raised by faults rather than by a strategy finding nothing.
pub const EXCEPTION_PREFIX: &str = "Extraction exception:";

/// Final answer of an extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ResponseEnvelope", try_from = "ResponseEnvelope")]
pub enum ExtractionResponse {
    Success {
        record: PaymentRecord,
        diagnostics: Diagnostics,
    },
    Failure {
        errors: Vec<String>,
        diagnostics: Diagnostics,
    },
}

impl ExtractionResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn record(&self) -> Option<&PaymentRecord> {
        match self {
            Self::Success { record, .. } => Some(record),
            Self::Failure { .. } => None,
        }
    }

    /// Errors surfaced to the caller (empty on success).
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { errors, .. } => errors,
        }
    }

    /// Whether the failure came from a fault (bad input, panic) instead of
    /// an ordinary no-match.
    pub fn is_exception(&self) -> bool {
        self.errors().iter().any(|e| e.starts_with(EXCEPTION_PREFIX))
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            Self::Success { diagnostics, .. } | Self::Failure { diagnostics, .. } => diagnostics,
        }
    }
}

/// Flat wire shape: `success` flag, then `data` or `errors`, always `diagnostics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<PaymentRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    #[serde(default)]
    diagnostics: Diagnostics,
}

impl From<ExtractionResponse> for ResponseEnvelope {
    fn from(response: ExtractionResponse) -> Self {
        match response {
            ExtractionResponse::Success {
                record,
                diagnostics,
            } => Self {
                success: true,
                data: Some(record),
                errors: Vec::new(),
                diagnostics,
            },
            ExtractionResponse::Failure {
                errors,
                diagnostics,
            } => Self {
                success: false,
                data: None,
                errors,
                diagnostics,
            },
        }
    }
}

impl TryFrom<ResponseEnvelope> for ExtractionResponse {
    type Error = String;

    fn try_from(envelope: ResponseEnvelope) -> Result<Self, Self::Error> {
        match (envelope.success, envelope.data) {
            (true, Some(record)) => Ok(Self::Success {
                record,
                diagnostics: envelope.diagnostics,
            }),
            (true, None) => Err("successful response without data".to_string()),
            (false, _) => Ok(Self::Failure {
                errors: envelope.errors,
                diagnostics: envelope.diagnostics,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_record() -> PaymentRecord {
        PaymentRecord {
            result: StrategyResult::new(1000.0, 0.95, SourceTag::HtmlTable),
            direction: Direction::Credit,
            sender_name: Some("john doe".to_string()),
            account_number: None,
        }
    }

    #[test]
    fn test_success_wire_shape() {
        let response = ExtractionResponse::Success {
            record: sample_record(),
            diagnostics: Diagnostics::new(0, 42),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["amount"], 1000.0);
        assert_eq!(json["data"]["currency"], "NGN");
        assert_eq!(json["data"]["direction"], "credit");
        assert_eq!(json["data"]["source"], "html_table");
        assert_eq!(json["data"]["sender_name"], "john doe");
        assert!(json["data"].get("account_number").is_none());
        assert!(json.get("errors").is_none());
        assert_eq!(json["diagnostics"]["html_length"], 42);
    }

    #[test]
    fn test_failure_wire_shape() {
        let mut diagnostics = Diagnostics::new(19, 0);
        diagnostics.error("All extraction strategies failed");
        let response = ExtractionResponse::Failure {
            errors: vec!["All extraction strategies failed".to_string()],
            diagnostics,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["errors"][0], "All extraction strategies failed");
        assert_eq!(json["diagnostics"]["text_length"], 19);
        assert!(!response.is_exception());
    }

    #[test]
    fn test_success_without_data_is_rejected() {
        let json = r#"{"success": true, "diagnostics": {"steps": [], "errors": [], "text_length": 0, "html_length": 0}}"#;
        assert!(serde_json::from_str::<ExtractionResponse>(json).is_err());
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::Usd));
        assert_eq!(Currency::from_code(" Eur "), Some(Currency::Eur));
        assert_eq!(Currency::from_code("PLN"), None);
        assert_eq!(Currency::default().to_string(), "NGN");
    }
}
