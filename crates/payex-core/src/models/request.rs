//! Extraction request models.

use serde::{Deserialize, Serialize};

use crate::error::{PayexError, Result};

/// An email handed over by the transport layer.
///
/// Only the sender and the two bodies drive extraction; the rest is carried
/// for the caller's bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Opaque caller identifier, passed through untouched.
    #[serde(default, alias = "emailId")]
    pub email_id: serde_json::Value,

    #[serde(default)]
    pub subject: String,

    #[serde(default, alias = "fromEmail")]
    pub from_email: String,

    #[serde(default, alias = "textBody", skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,

    #[serde(default, alias = "htmlBody", skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,

    #[serde(default, alias = "emailDate", skip_serializing_if = "Option::is_none")]
    pub email_date: Option<String>,
}

impl ExtractionRequest {
    /// Parse a request from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Build a request from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let request: Self = serde_json::from_value(value)?;
        if !request.email_id.is_null()
            && !request.email_id.is_number()
            && !request.email_id.is_string()
        {
            return Err(PayexError::Request(
                "email_id must be a number or a string".to_string(),
            ));
        }
        Ok(request)
    }

    /// The part of the request the cascade looks at.
    pub fn input(&self) -> ExtractionInput {
        ExtractionInput::new(
            self.text_body.clone(),
            self.html_body.clone(),
            &self.from_email,
        )
    }
}

/// Email content fed to the cascade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionInput {
    pub text_body: Option<String>,
    pub html_body: Option<String>,
    /// Sender address, lower-cased.
    pub from_address: String,
}

impl ExtractionInput {
    pub fn new(
        text_body: Option<String>,
        html_body: Option<String>,
        from_address: impl AsRef<str>,
    ) -> Self {
        Self {
            text_body,
            html_body,
            from_address: from_address.as_ref().trim().to_lowercase(),
        }
    }

    /// Input with only an HTML body.
    pub fn html(html: impl Into<String>) -> Self {
        Self::new(None, Some(html.into()), "")
    }

    /// Input with only a plain-text body.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Some(text.into()), None, "")
    }

    /// The text body, treating an empty string as absent.
    pub fn text_body(&self) -> Option<&str> {
        self.text_body.as_deref().filter(|s| !s.is_empty())
    }

    /// The HTML body, treating an empty string as absent.
    pub fn html_body(&self) -> Option<&str> {
        self.html_body.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snake_case_request() {
        let json = r#"{
            "email_id": 42,
            "subject": "Transaction Notification",
            "from_email": "GeNS@GTBank.com",
            "html_body": "<p>hi</p>",
            "email_date": "2026-01-20"
        }"#;

        let request = ExtractionRequest::from_json(json).unwrap();
        assert_eq!(request.email_id, serde_json::json!(42));
        assert_eq!(request.text_body, None);

        let input = request.input();
        assert_eq!(input.from_address, "gens@gtbank.com");
        assert_eq!(input.html_body(), Some("<p>hi</p>"));
    }

    #[test]
    fn test_parse_camel_case_request() {
        let json = r#"{"emailId": "abc", "fromEmail": "a@b.c", "textBody": "NGN 100"}"#;

        let request = ExtractionRequest::from_json(json).unwrap();
        assert_eq!(request.email_id, serde_json::json!("abc"));
        assert_eq!(request.text_body.as_deref(), Some("NGN 100"));
    }

    #[test]
    fn test_reject_structured_email_id() {
        let json = r#"{"email_id": {"nested": true}, "from_email": "a@b.c"}"#;
        assert!(matches!(
            ExtractionRequest::from_json(json),
            Err(PayexError::Request(_))
        ));
    }

    #[test]
    fn test_empty_bodies_are_absent() {
        let input = ExtractionInput::new(Some(String::new()), Some(String::new()), "x");
        assert_eq!(input.text_body(), None);
        assert_eq!(input.html_body(), None);
    }
}
