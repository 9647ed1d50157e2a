use crate::models::Signal;
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct SignalReport {
    symbol: String,
    side: String,
    entry: f64,
    take_profit: f64,
    stop_loss: f64,
    risk_reward: Option<f64>,
    confidence: u8,
    rsi: f64,
    bollinger_lower: f64,
    bollinger_upper: f64,
    acceleration: f64,
    atr: f64,
}

pub fn write_output(path: &str, format: &str, signals: &[Signal]) -> Result<()> {
    match format {
        "json" => write_json(path, signals),
        "csv" => write_csv(path, signals),
        "none" => Ok(()),
        _ => Err(Error::Config(
            "output.format must be none, json, or csv".to_string(),
        )),
    }
}

fn write_json(path: &str, signals: &[Signal]) -> Result<()> {
    ensure_parent_dir(path)?;
    let rows: Vec<SignalReport> = signals.iter().map(to_report).collect();
    let payload = serde_json::to_string_pretty(&rows)
        .map_err(|err| Error::Config(format!("json serialization failed: {err}")))?;
    fs::write(path, payload).map_err(|err| Error::Config(format!("write failed: {err}")))?;
    Ok(())
}

fn write_csv(path: &str, signals: &[Signal]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)
        .map_err(|err| Error::Config(format!("csv open failed: {err}")))?;
    for signal in signals {
        writer
            .serialize(to_report(signal))
            .map_err(|err| Error::Config(format!("csv write failed: {err}")))?;
    }
    writer
        .flush()
        .map_err(|err| Error::Config(format!("csv flush failed: {err}")))?;
    Ok(())
}

fn to_report(signal: &Signal) -> SignalReport {
    SignalReport {
        symbol: signal.symbol.clone(),
        side: signal.side.label().to_string(),
        entry: signal.entry,
        take_profit: signal.take_profit,
        stop_loss: signal.stop_loss,
        risk_reward: signal.risk_reward,
        confidence: signal.confidence,
        rsi: signal.diagnostics.rsi,
        bollinger_lower: signal.diagnostics.bollinger_lower,
        bollinger_upper: signal.diagnostics.bollinger_upper,
        acceleration: signal.diagnostics.acceleration,
        atr: signal.diagnostics.atr,
    }
}

fn ensure_parent_dir(path: &str) -> Result<()> {
    let parent = Path::new(path).parent();
    if let Some(parent) = parent {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| Error::Config(format!("create dir failed: {err}")))?;
        }
    }
    Ok(())
}
