//! Core error types for the lot accounting and valuation engine.
//!
//! This module defines storage-agnostic error types. Storage- and
//! provider-specific errors are converted to these types by the
//! implementations of the collaborator traits.

use chrono::NaiveDate;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the valuation engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),
}

/// Errors surfaced by price lookup implementations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("No price data found for {0}")]
    NotFound(String),
}

/// Errors surfaced by trading calendar collaborators.
///
/// `NonAdvancing` is a contract violation: `next_trading_day` must return a
/// date strictly after its input. The snapshot builder aborts on it rather
/// than looping.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Calendar for exchange '{exchange}' did not advance past {date}")]
    NonAdvancing { exchange: String, date: NaiveDate },
}

// Add From implementation for serde_json::Error
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

// Add From implementation for rust_decimal::Error
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}
