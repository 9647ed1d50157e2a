use approx::assert_relative_eq;
use vigil::core::engine::{confidence, decide, price_levels, risk_reward, MIN_DECIDE_CANDLES};
use vigil::models::{Candle, Side};

fn candle(index: usize, close: f64) -> Candle {
    Candle {
        time_ms: 1_704_067_200_000 + index as i64 * 3_600_000,
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume: 1.0,
    }
}

fn candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(index, close)| candle(index, *close))
        .collect()
}

// flat run, then a sharp drop whose final step decelerates: RSI pinned at 0,
// close under the lower band, velocity recovering
fn long_setup() -> Vec<Candle> {
    let mut closes = vec![100.0; 35];
    closes.extend([97.0, 94.0, 91.0, 88.0, 85.5]);
    candles(&closes)
}

fn short_setup() -> Vec<Candle> {
    let mut closes = vec![100.0; 35];
    closes.extend([103.0, 106.0, 109.0, 112.0, 114.5]);
    candles(&closes)
}

#[test]
fn below_forty_candles_yields_no_signal() {
    let bars = candles(&vec![100.0; MIN_DECIDE_CANDLES - 1]);
    assert!(decide("BTCUSDT", &bars).is_none());
}

#[test]
fn empty_series_yields_no_signal() {
    assert!(decide("BTCUSDT", &[]).is_none());
}

#[test]
fn flat_series_yields_no_signal() {
    let bars = candles(&vec![100.0; 60]);
    assert!(decide("BTCUSDT", &bars).is_none());
}

#[test]
fn oversold_crash_with_recovering_momentum_goes_long() {
    let signal = decide("BTCUSDT", &long_setup()).expect("signal");

    assert_eq!(signal.side, Side::Long);
    assert_eq!(signal.symbol, "BTCUSDT");
    assert_relative_eq!(signal.entry, 85.5);
    assert!(signal.diagnostics.rsi < 30.0);
    assert!(signal.diagnostics.close < signal.diagnostics.bollinger_lower);
    assert!(signal.diagnostics.acceleration > 0.0);
    assert!(signal.stop_loss < signal.entry);
    assert!(signal.take_profit > signal.entry);
    assert_relative_eq!(signal.risk_reward.unwrap(), 2.0, epsilon = 1e-12);
    assert!((30..=95).contains(&signal.confidence));
}

#[test]
fn overbought_spike_with_fading_momentum_goes_short() {
    let signal = decide("ETHUSDT", &short_setup()).expect("signal");

    assert_eq!(signal.side, Side::Short);
    assert_relative_eq!(signal.entry, 114.5);
    assert!(signal.diagnostics.rsi > 70.0);
    assert!(signal.diagnostics.close > signal.diagnostics.bollinger_upper);
    assert!(signal.diagnostics.acceleration < 0.0);
    assert!(signal.stop_loss > signal.entry);
    assert!(signal.take_profit < signal.entry);
    assert_relative_eq!(signal.risk_reward.unwrap(), 2.0, epsilon = 1e-12);
}

#[test]
fn decide_is_idempotent() {
    let bars = long_setup();
    let first = decide("BTCUSDT", &bars);
    let second = decide("BTCUSDT", &bars);
    assert_eq!(first, second);
}

#[test]
fn steady_decline_without_momentum_turn_yields_no_signal() {
    // every step keeps falling at the same pace, so acceleration never turns positive
    let mut closes = vec![100.0; 35];
    closes.extend([97.0, 94.0, 91.0, 88.0, 85.0]);
    let mut bars = candles(&closes);
    // extend the constant -3 decline; velocity is flat, acceleration 0
    for step in 0..3 {
        let close = 85.0 - 3.0 * (step + 1) as f64;
        bars.push(candle(40 + step, close));
    }
    assert!(decide("BTCUSDT", &bars).is_none());
}

#[test]
fn long_price_levels_from_entry_and_atr() {
    let (stop_loss, take_profit) = price_levels(Side::Long, 100.0, 2.0);
    assert_relative_eq!(stop_loss, 97.0);
    assert_relative_eq!(take_profit, 106.0);
    assert_relative_eq!(
        risk_reward(100.0, stop_loss, take_profit).unwrap(),
        2.0,
        epsilon = 1e-12
    );
}

#[test]
fn short_price_levels_from_entry_and_atr() {
    let (stop_loss, take_profit) = price_levels(Side::Short, 100.0, 2.0);
    assert_relative_eq!(stop_loss, 103.0);
    assert_relative_eq!(take_profit, 94.0);
    assert_relative_eq!(
        risk_reward(100.0, stop_loss, take_profit).unwrap(),
        2.0,
        epsilon = 1e-12
    );
}

#[test]
fn zero_risk_distance_leaves_risk_reward_undefined() {
    let (stop_loss, take_profit) = price_levels(Side::Long, 100.0, 0.0);
    assert_eq!(risk_reward(100.0, stop_loss, take_profit), None);
}

#[test]
fn confidence_rewards_rsi_extremity_up_to_fifteen() {
    // rsi 0 maxes the extremity bonus; no momentum, no volatility bonus
    assert_eq!(confidence(Side::Long, 0.0, 0.0, 100.0, 100.0), 85);
    assert_eq!(confidence(Side::Short, 100.0, 0.0, 100.0, 100.0), 85);
    // rsi 25 adds 5
    assert_eq!(confidence(Side::Long, 25.0, 0.0, 100.0, 100.0), 75);
}

#[test]
fn confidence_rewards_momentum_up_to_ten() {
    // |acceleration|/entry * 1000 = 4
    assert_eq!(confidence(Side::Long, 29.0, 0.4, 100.0, 100.0), 75);
    // enormous acceleration still caps at +10
    assert_eq!(confidence(Side::Long, 29.0, 1.0e12, 100.0, 100.0), 81);
}

#[test]
fn confidence_adds_low_volatility_bonus() {
    assert_eq!(confidence(Side::Long, 29.0, 0.0, 0.4, 100.0), 76);
    assert_eq!(confidence(Side::Long, 29.0, 0.0, 0.5, 100.0), 71);
}

#[test]
fn confidence_clamps_to_bounds_under_extreme_inputs() {
    // everything maxed: 70 + 15 + 10 + 5 = 100, clamped to 95
    assert_eq!(confidence(Side::Long, 0.0, 1.0e9, 0.0001, 100.0), 95);
    assert_eq!(confidence(Side::Short, 100.0, 1.0e9, 0.0001, 100.0), 95);
    // a wildly out-of-rule rsi drags the score below the floor, clamped to 30
    assert_eq!(confidence(Side::Long, 100.0, 0.0, 100.0, 100.0), 30);
    assert_eq!(confidence(Side::Short, 0.0, 0.0, 100.0, 100.0), 30);
}

#[test]
fn long_and_short_rules_cannot_both_hold() {
    for bars in [long_setup(), short_setup()] {
        if let Some(signal) = decide("BTCUSDT", &bars) {
            let d = &signal.diagnostics;
            let long_rule =
                d.rsi < 30.0 && d.close < d.bollinger_lower && d.acceleration > 0.0;
            let short_rule =
                d.rsi > 70.0 && d.close > d.bollinger_upper && d.acceleration < 0.0;
            assert!(long_rule != short_rule);
        }
    }
}
