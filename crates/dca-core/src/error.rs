//! Error types for the DCA simulator.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level simulator error.
#[derive(Error, Debug)]
pub enum DcaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration errors, detected before any fetch and never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid asset pair '{0}': expected BASE-QUOTE, e.g. BTC-USD")]
    InvalidPair(String),

    #[error("start date {date} is before the earliest supported date {min}")]
    StartTooEarly { date: NaiveDate, min: NaiveDate },

    #[error("start date {0} is in the future")]
    StartInFuture(NaiveDate),

    #[error("investment amount {0} is outside the allowed range 1..=1000000")]
    InvalidAmount(f64),

    #[error("empty date range: start {start} is after end {end}")]
    EmptyDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Data-availability and fetch errors.
///
/// These surface as a failed simulation; the engine never retries or
/// substitutes on its own.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("no price data available for {pair} in the requested range")]
    NoDataAvailable { pair: String },

    #[error("no price resolvable for purchase date {date}")]
    NoPriceForDate { date: NaiveDate },

    #[error("unknown asset: {0}")]
    UnknownAsset(String),

    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("parse error: {0}")]
    ParseError(String),
}

/// Cache-internal errors.
///
/// These never escape the cache store's public API; `set` degrades to
/// `false` and `get` to `None`. The variants exist for the storage
/// backends to report what went wrong.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("quota exceeded: write of {needed} bytes over quota of {quota} bytes")]
    QuotaExceeded { needed: u64, quota: u64 },
}

/// Result type alias for simulator operations.
pub type DcaResult<T> = Result<T, DcaError>;
