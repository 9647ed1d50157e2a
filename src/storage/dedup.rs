use crate::models::Side;
use std::collections::HashMap;

pub const RESEND_WINDOW_MS: i64 = 60 * 60 * 1000;
pub const PRUNE_AFTER_MS: i64 = 24 * 60 * 60 * 1000;

pub trait SignalLedger {
    fn was_recently_sent(&self, symbol: &str, side: Side, now_ms: i64) -> bool;
    fn record_sent(&mut self, symbol: &str, side: Side, now_ms: i64);
    fn prune_older_than(&mut self, cutoff_ms: i64);
}

#[derive(Default)]
pub struct MemoryLedger {
    sent: HashMap<(String, Side), i64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

impl SignalLedger for MemoryLedger {
    fn was_recently_sent(&self, symbol: &str, side: Side, now_ms: i64) -> bool {
        self.sent
            .get(&(symbol.to_string(), side))
            .map(|sent_ms| now_ms - sent_ms < RESEND_WINDOW_MS)
            .unwrap_or(false)
    }

    fn record_sent(&mut self, symbol: &str, side: Side, now_ms: i64) {
        self.sent.insert((symbol.to_string(), side), now_ms);
    }

    fn prune_older_than(&mut self, cutoff_ms: i64) {
        self.sent.retain(|_, sent_ms| *sent_ms >= cutoff_ms);
    }
}
