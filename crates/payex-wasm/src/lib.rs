//! WASM bindings for bank payment extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use payex_core::{ExtractionInput, ExtractionResponse, PayexConfig, PaymentExtractor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract a payment from a request object
/// (`{ email_id, from_email, text_body?, html_body?, ... }`).
///
/// Always resolves to a response object; `success: false` carries the errors.
#[wasm_bindgen]
pub fn extract_payment(request: JsValue) -> Result<JsValue, JsValue> {
    PaymentExtractorJs::new().extract(request)
}

/// Extract a payment from raw email parts.
#[wasm_bindgen]
pub fn extract_from_parts(
    text_body: Option<String>,
    html_body: Option<String>,
    from_email: &str,
) -> Result<JsValue, JsValue> {
    PaymentExtractorJs::new().extract_from_parts(text_body, html_body, from_email)
}

/// Render HTML to plain text.
#[wasm_bindgen]
pub fn strip_html(html: &str) -> String {
    payex_core::strip_html(html)
}

/// Parse an amount literal such as "1,000.50"; undefined below 10.
#[wasm_bindgen]
pub fn parse_amount(literal: &str) -> Option<f64> {
    payex_core::parse_amount(literal)
}

/// Payment extractor class for browser use.
#[wasm_bindgen]
pub struct PaymentExtractorJs {
    extractor: PaymentExtractor,
    verbose: bool,
}

#[wasm_bindgen]
impl PaymentExtractorJs {
    /// Create an extractor with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: PaymentExtractor::new(),
            verbose: false,
        }
    }

    /// Create an extractor from a configuration object; missing sections
    /// take their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<PaymentExtractorJs, JsValue> {
        let config: PayexConfig = serde_wasm_bindgen::from_value(config)?;
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            extractor: PaymentExtractor::with_config(config),
            verbose: false,
        })
    }

    /// Log diagnostics of every extraction to the browser console.
    #[wasm_bindgen]
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Extract from a request object.
    #[wasm_bindgen]
    pub fn extract(&self, request: JsValue) -> Result<JsValue, JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(request)?;
        let response = self.extractor.extract_value(value);
        self.finish(&response)
    }

    /// Extract from raw email parts.
    #[wasm_bindgen]
    pub fn extract_from_parts(
        &self,
        text_body: Option<String>,
        html_body: Option<String>,
        from_email: &str,
    ) -> Result<JsValue, JsValue> {
        let input = ExtractionInput::new(text_body, html_body, from_email);
        let response = self.extractor.extract(&input);
        self.finish(&response)
    }

    /// Current configuration as an object.
    #[wasm_bindgen]
    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_js(self.extractor.config())
    }

    fn finish(&self, response: &ExtractionResponse) -> Result<JsValue, JsValue> {
        if self.verbose {
            let diagnostics = response.diagnostics();
            for step in &diagnostics.steps {
                web_sys::console::log_1(&JsValue::from_str(step));
            }
            for error in &diagnostics.errors {
                web_sys::console::warn_1(&JsValue::from_str(error));
            }
        }

        to_js(response)
    }
}

impl Default for PaymentExtractorJs {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize to plain JS objects rather than `Map`s.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn to_json(value: JsValue) -> serde_json::Value {
        serde_wasm_bindgen::from_value(value).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("5"), None);
    }

    #[wasm_bindgen_test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Amount:&nbsp;<b>NGN 500</b></p>"), "Amount: NGN 500");
    }

    #[wasm_bindgen_test]
    fn test_extract_from_parts() {
        let response = extract_from_parts(
            None,
            Some("<table><tr><td>Amount</td><td>NGN 1,000.00</td></tr></table>".to_string()),
            "alerts@gtbank.com",
        )
        .unwrap();

        let json = to_json(response);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["amount"], 1000.0);
        assert_eq!(json["data"]["source"], "html_table");
    }

    #[wasm_bindgen_test]
    fn test_extract_payment_request() {
        let request = serde_json::json!({
            "emailId": "abc",
            "fromEmail": "someone@example.com",
            "textBody": "Hello, how are you?"
        });
        let request = to_js(&request).unwrap();

        let json = to_json(extract_payment(request).unwrap());
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0], "All extraction strategies failed");
    }
}
