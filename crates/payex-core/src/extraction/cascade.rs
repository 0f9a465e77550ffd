//! Cascade driver and response assembly.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::html::decode_entities;
use crate::models::{
    Diagnostics, ExtractionInput, ExtractionRequest, ExtractionResponse, PayexConfig,
    PaymentRecord, StrategyResult, EXCEPTION_PREFIX,
};

use super::rules::{detect_currency, detect_direction, extract_account_number, extract_sender_name};
use super::strategies::{default_strategies, ExtractionStrategy, PreparedInput};

/// Error reported when no strategy finds an amount.
pub const ALL_STRATEGIES_FAILED: &str = "All extraction strategies failed";

/// Runs the strategies in order and assembles the response.
///
/// Stateless between calls; one instance can serve many threads.
pub struct PaymentExtractor {
    config: PayexConfig,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl PaymentExtractor {
    /// Create an extractor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PayexConfig::default())
    }

    /// Create an extractor with the given configuration.
    pub fn with_config(config: PayexConfig) -> Self {
        Self {
            config,
            strategies: default_strategies(),
        }
    }

    /// Replace the strategy list.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn config(&self) -> &PayexConfig {
        &self.config
    }

    /// Extract a payment from one email.
    ///
    /// Never panics and never returns an error: faults, including panics
    /// inside a strategy, come back as a failure carrying
    /// `Extraction exception: <message>`.
    pub fn extract(&self, input: &ExtractionInput) -> ExtractionResponse {
        let mut diagnostics = Diagnostics::new(
            input.text_body().map_or(0, |t| t.chars().count()),
            input.html_body().map_or(0, |h| h.chars().count()),
        );

        info!(
            "Extracting payment ({} text chars, {} html chars)",
            diagnostics.text_length, diagnostics.html_length
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_cascade(input, &mut diagnostics)
        }));

        match outcome {
            Ok(Ok(Some(record))) => ExtractionResponse::Success {
                record,
                diagnostics,
            },
            Ok(Ok(None)) => {
                info!("No strategy found an amount");
                diagnostics.error(ALL_STRATEGIES_FAILED);
                ExtractionResponse::Failure {
                    errors: vec![ALL_STRATEGIES_FAILED.to_string()],
                    diagnostics,
                }
            }
            Ok(Err(e)) => exception(e.to_string(), diagnostics),
            Err(payload) => {
                let fault = ExtractionError::Internal(panic_message(payload.as_ref()));
                exception(fault.to_string(), diagnostics)
            }
        }
    }

    /// Extract from a parsed request.
    pub fn extract_request(&self, request: &ExtractionRequest) -> ExtractionResponse {
        self.extract(&request.input())
    }

    /// Extract from a request in JSON form. Invalid JSON is reported as an
    /// exception-class failure.
    pub fn extract_json(&self, json: &str) -> ExtractionResponse {
        match ExtractionRequest::from_json(json) {
            Ok(request) => self.extract_request(&request),
            Err(e) => exception(e.to_string(), Diagnostics::default()),
        }
    }

    /// Extract from a request already parsed into a JSON value.
    pub fn extract_value(&self, value: serde_json::Value) -> ExtractionResponse {
        match ExtractionRequest::from_value(value) {
            Ok(request) => self.extract_request(&request),
            Err(e) => exception(e.to_string(), Diagnostics::default()),
        }
    }

    fn run_cascade(
        &self,
        input: &ExtractionInput,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<PaymentRecord>, ExtractionError> {
        self.check_size("text_body", input.text_body())?;
        self.check_size("html_body", input.html_body())?;

        match self.config.banks.find(&input.from_address) {
            Some(template) => diagnostics.step(format!("Template found: {}", template.name)),
            None => diagnostics.step("No matching bank template found"),
        }

        let prepared = PreparedInput::new(input, self.config.extraction.decode_quoted_printable);

        for strategy in &self.strategies {
            if !strategy.applies(&prepared) {
                debug!("Skipping {} extraction: no input", strategy.label());
                continue;
            }

            diagnostics.step(format!("Attempting {} extraction", strategy.label()));
            debug!("Attempting {} extraction", strategy.label());

            match strategy.attempt(&prepared) {
                Some(result) => {
                    diagnostics.step(format!(
                        "Extraction successful: {} (confidence: {:.2})",
                        result.source, result.confidence
                    ));
                    info!(
                        "Extracted {} via {} (confidence {:.2})",
                        result.amount, result.source, result.confidence
                    );
                    return Ok(Some(self.enrich(result, &prepared)));
                }
                None => {
                    debug!("{} extraction found nothing", strategy.label());
                    diagnostics.error(failure_message(strategy.label()));
                }
            }
        }

        Ok(None)
    }

    fn check_size(&self, field: &'static str, body: Option<&str>) -> Result<(), ExtractionError> {
        let limit = self.config.extraction.max_body_bytes;
        match body {
            Some(body) if body.len() > limit => Err(ExtractionError::InputTooLarge {
                field,
                len: body.len(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// Merge currency, direction, sender and account number into the winner.
    fn enrich(&self, mut result: StrategyResult, input: &PreparedInput<'_>) -> PaymentRecord {
        let settings = &self.config.extraction;
        let text = input.text().unwrap_or_default();
        let html = input.html().unwrap_or_default();

        let raw = format!("{} {}", text, decode_entities(html));
        result.currency = detect_currency(&raw).unwrap_or(settings.default_currency);

        let rendered = format!("{} {}", input.rendered(), text);
        let direction = detect_direction(&rendered);

        let sender_name = settings
            .extract_sender
            .then(|| extract_sender_name(input.cells(), &format!("{} {}", html, text)))
            .flatten();

        let account_number = settings
            .extract_account_number
            .then(|| extract_account_number(input.cells(), &rendered))
            .flatten();

        PaymentRecord {
            result,
            direction,
            sender_name,
            account_number,
        }
    }
}

impl Default for PaymentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn exception(message: String, mut diagnostics: Diagnostics) -> ExtractionResponse {
    let message = format!("{EXCEPTION_PREFIX} {message}");
    warn!("{}", message);
    diagnostics.error(message.clone());
    ExtractionResponse::Failure {
        errors: vec![message],
        diagnostics,
    }
}

/// `text body` becomes `Text body extraction failed`.
fn failure_message(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => format!("{}{} extraction failed", first.to_uppercase(), chars.as_str()),
        None => "extraction failed".to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "strategy panicked".to_string()
    }
}
