//! Core business logic abstractions

pub mod aggregate;
pub mod config;
pub mod history;
pub mod log;
pub mod rates;
pub mod request;

// Re-export main types for cleaner imports
pub use aggregate::RateAggregator;
pub use history::{ExecutionLogger, FileSink, LogSink, MemorySink};
pub use rates::{CurrencyQuote, DailyRates, DateKey, ExchangeRateProvider, RatePayload, ResultSet};
pub use request::{RatesRequest, RequestError};
