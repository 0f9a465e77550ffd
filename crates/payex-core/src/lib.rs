//! Core library for bank payment notification extraction.
//!
//! This crate provides:
//! - HTML normalization (markup stripping, entity and quoted-printable decoding)
//! - A strategy cascade locating the payment amount in HTML tables, markup or text
//! - Sender, currency, direction and account number extraction
//! - Request/response models and configuration

pub mod error;
pub mod extraction;
pub mod html;
pub mod models;

pub use error::{ExtractionError, PayexError, Result};
pub use extraction::{ExtractionStrategy, PaymentExtractor};
pub use extraction::rules::parse_amount;
pub use html::strip_html;
pub use models::{
    BankTemplate, Currency, Diagnostics, Direction, ExtractionInput, ExtractionRequest,
    ExtractionResponse, PayexConfig, PaymentRecord, SourceTag, StrategyResult,
};
