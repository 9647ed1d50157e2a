use crate::models::Candle;
use crate::{Error, Result};
use rand::seq::SliceRandom;
use tracing::debug;

use super::normalize::normalize;
use super::provider::Provider;
use super::Transport;

pub const MIN_CANDLES: usize = 30;

pub struct MultiSourceFetcher<T: Transport> {
    providers: Vec<Provider>,
    transport: T,
}

impl<T: Transport> MultiSourceFetcher<T> {
    pub fn new(providers: Vec<Provider>, transport: T) -> Self {
        Self {
            providers,
            transport,
        }
    }

    pub fn fetch(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        // uniform shuffle per call so no provider is preferred across calls
        let mut order: Vec<usize> = (0..self.providers.len()).collect();
        order.shuffle(&mut rand::thread_rng());

        for index in order {
            let provider = &self.providers[index];
            match self.attempt(provider, symbol, interval, limit) {
                Ok(candles) => {
                    debug!(
                        provider = provider.name,
                        count = candles.len(),
                        "candles accepted"
                    );
                    return Ok(candles);
                }
                Err(err) => {
                    debug!(provider = provider.name, error = %err, "provider skipped");
                }
            }
        }

        Err(Error::AllSourcesExhausted {
            symbol: symbol.to_string(),
        })
    }

    fn attempt(
        &self,
        provider: &Provider,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let request = provider.build_request(symbol, interval, limit)?;
        let payload = self.transport.get(&request)?;
        let mut candles = normalize(provider.name, provider.shape, &payload)?;
        if candles.len() < MIN_CANDLES {
            return Err(Error::InsufficientHistory {
                provider: provider.name.to_string(),
                have: candles.len(),
                need: MIN_CANDLES,
            });
        }
        if candles.len() > limit {
            let excess = candles.len() - limit;
            candles.drain(..excess);
        }
        Ok(candles)
    }
}
