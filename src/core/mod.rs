pub mod engine;
pub mod indicators;

use crate::market::fetch::MultiSourceFetcher;
use crate::market::Transport;
use crate::models::Signal;
use crate::Result;

#[derive(Clone, Debug)]
pub struct EvaluateOptions {
    pub interval: String,
    pub limit: usize,
}

pub struct SignalEngine<T: Transport> {
    fetcher: MultiSourceFetcher<T>,
}

impl<T: Transport> SignalEngine<T> {
    pub fn new(fetcher: MultiSourceFetcher<T>) -> Self {
        Self { fetcher }
    }

    pub fn evaluate(&self, symbol: &str, options: &EvaluateOptions) -> Result<Option<Signal>> {
        let candles = self.fetcher.fetch(symbol, &options.interval, options.limit)?;
        Ok(engine::decide(symbol, &candles))
    }
}
