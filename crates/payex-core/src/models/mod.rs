//! Data models: requests, results, configuration.

pub mod config;
pub mod payment;
pub mod request;

pub use config::{BankConfig, BankTemplate, ExtractionConfig, PayexConfig, DEFAULT_MAX_BODY_BYTES};
pub use payment::{
    Currency, Diagnostics, Direction, ExtractionResponse, PaymentRecord, SourceTag,
    StrategyResult, EXCEPTION_PREFIX,
};
pub use request::{ExtractionInput, ExtractionRequest};
