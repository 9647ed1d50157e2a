use crate::models::Candle;

// Rolling simple moving average. Indices before the window fills stay None; a
// partial window is never averaged.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        out[i] = Some(window.iter().sum::<f64>() / period as f64);
    }
    out
}

// Population standard deviation (divide by period, not period - 1) over the
// same trailing window as sma.
pub fn rolling_stddev(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        out[i] = Some(variance.sqrt());
    }
    out
}

// Wilder RSI: seed is the simple mean of the first `period` gains/losses,
// every later value uses avg = (avg * (period - 1) + new) / period.
// Zero average loss saturates at 100.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..closes.len() {
        avg_gain = (avg_gain * (period as f64 - 1.0) + gains[i - 1]) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + losses[i - 1]) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}

// Wilder ATR over true ranges. With fewer than `period` true ranges, the
// simple mean of whatever exists is broadcast to every index.
pub fn atr(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let n = candles.len();
    let mut out = vec![None; n];
    if period == 0 || n < 2 {
        return out;
    }

    let mut true_ranges = Vec::with_capacity(n - 1);
    for i in 1..n {
        let high_low = candles[i].high - candles[i].low;
        let high_close = (candles[i].high - candles[i - 1].close).abs();
        let low_close = (candles[i].low - candles[i - 1].close).abs();
        true_ranges.push(high_low.max(high_close).max(low_close));
    }

    if true_ranges.len() < period {
        let mean = true_ranges.iter().sum::<f64>() / true_ranges.len() as f64;
        return vec![Some(mean); n];
    }

    let mut value = true_ranges[..period].iter().sum::<f64>() / period as f64;
    out[period] = Some(value);
    for i in (period + 1)..n {
        value = (value * (period as f64 - 1.0) + true_ranges[i - 1]) / period as f64;
        out[i] = Some(value);
    }

    out
}

// Per-step price change smoothed by SMA(3). The change at index 0 is defined
// as 0, which feeds the first SMA window.
pub fn velocity(closes: &[f64]) -> Vec<Option<f64>> {
    if closes.is_empty() {
        return Vec::new();
    }
    let mut changes = Vec::with_capacity(closes.len());
    changes.push(0.0);
    for i in 1..closes.len() {
        changes.push(closes[i] - closes[i - 1]);
    }
    sma(&changes, 3)
}

// First difference of velocity; index 0 is defined as 0.
pub fn acceleration(velocity: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = vec![None; velocity.len()];
    if velocity.is_empty() {
        return out;
    }
    out[0] = Some(0.0);
    for i in 1..velocity.len() {
        if let (Some(current), Some(previous)) = (velocity[i], velocity[i - 1]) {
            out[i] = Some(current - previous);
        }
    }
    out
}
