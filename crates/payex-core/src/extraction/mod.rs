//! Payment extraction: a cascade of strategies from most to least reliable.
//!
//! Each strategy looks for a currency amount in one view of the email (table
//! cells, raw markup, text body, rendered markup). The first plausible amount
//! wins and is enriched with currency, direction, sender and account number.

mod cascade;
pub mod rules;
pub mod strategies;

pub use cascade::{PaymentExtractor, ALL_STRATEGIES_FAILED};
pub use strategies::{
    default_strategies, ExtractionStrategy, HtmlTableStrategy, HtmlTextStrategy, PreparedInput,
    RenderedTextStrategy, TextBodyStrategy,
};
