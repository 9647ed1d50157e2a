pub mod app;
pub mod config;
pub mod core;
pub mod market;
pub mod models;
pub mod storage;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("transport failure from {provider}: {reason}")]
    Transport { provider: String, reason: String },

    #[error("malformed response from {provider}: {reason}")]
    MalformedResponse { provider: String, reason: String },

    #[error("{provider} returned {have} candles, need {need}")]
    InsufficientHistory {
        provider: String,
        have: usize,
        need: usize,
    },

    #[error("all market data sources exhausted for {symbol}")]
    AllSourcesExhausted { symbol: String },
}

pub type Result<T> = std::result::Result<T, Error>;
