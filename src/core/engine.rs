use crate::models::{Candle, Diagnostics, Side, Signal};

use super::indicators;

pub const MIN_DECIDE_CANDLES: usize = 40;

const RSI_PERIOD: usize = 14;
const ATR_PERIOD: usize = 14;
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_WIDTH: f64 = 2.0;
const STOP_ATR_MULT: f64 = 1.5;
const TAKE_ATR_MULT: f64 = 3.0;

pub fn decide(symbol: &str, candles: &[Candle]) -> Option<Signal> {
    if candles.len() < MIN_DECIDE_CANDLES {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|candle| candle.close).collect();
    let last = closes.len() - 1;

    let rsi = indicators::rsi(&closes, RSI_PERIOD)[last]?;
    let middle = indicators::sma(&closes, BOLLINGER_PERIOD)[last]?;
    let stddev = indicators::rolling_stddev(&closes, BOLLINGER_PERIOD)[last]?;
    let acceleration = indicators::acceleration(&indicators::velocity(&closes))[last]?;
    let atr = indicators::atr(candles, ATR_PERIOD)[last]?;
    let close = closes[last];

    let upper = middle + BOLLINGER_WIDTH * stddev;
    let lower = middle - BOLLINGER_WIDTH * stddev;

    if !rsi.is_finite()
        || !upper.is_finite()
        || !lower.is_finite()
        || !acceleration.is_finite()
        || !atr.is_finite()
        || !close.is_finite()
    {
        return None;
    }

    // the two rules are exclusive by construction; LONG is checked first
    let side = if rsi < 30.0 && close < lower && acceleration > 0.0 {
        Side::Long
    } else if rsi > 70.0 && close > upper && acceleration < 0.0 {
        Side::Short
    } else {
        return None;
    };

    let entry = close;
    let (stop_loss, take_profit) = price_levels(side, entry, atr);

    Some(Signal {
        symbol: symbol.to_string(),
        side,
        entry,
        take_profit,
        stop_loss,
        risk_reward: risk_reward(entry, stop_loss, take_profit),
        confidence: confidence(side, rsi, acceleration, atr, entry),
        diagnostics: Diagnostics {
            rsi,
            bollinger_lower: lower,
            bollinger_upper: upper,
            acceleration,
            atr,
            close,
        },
    })
}

pub fn price_levels(side: Side, entry: f64, atr: f64) -> (f64, f64) {
    match side {
        Side::Long => (entry - STOP_ATR_MULT * atr, entry + TAKE_ATR_MULT * atr),
        Side::Short => (entry + STOP_ATR_MULT * atr, entry - TAKE_ATR_MULT * atr),
    }
}

pub fn risk_reward(entry: f64, stop_loss: f64, take_profit: f64) -> Option<f64> {
    let risk = (entry - stop_loss).abs();
    if risk == 0.0 {
        return None;
    }
    Some((take_profit - entry).abs() / risk)
}

pub fn confidence(side: Side, rsi: f64, acceleration: f64, atr: f64, entry: f64) -> u8 {
    let mut score = 70.0;
    score += match side {
        Side::Long => (30.0 - rsi).min(15.0),
        Side::Short => (rsi - 70.0).min(15.0),
    };
    score += (acceleration.abs() / entry * 1000.0).min(10.0);
    if atr / entry < 0.005 {
        score += 5.0;
    }
    score.round().clamp(30.0, 95.0) as u8
}
