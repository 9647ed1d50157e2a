use crate::models::Candle;
use crate::{Error, Result};
use serde_json::Value;

use super::provider::ResponseShape;

pub fn normalize(provider: &str, shape: ResponseShape, payload: &str) -> Result<Vec<Candle>> {
    let root: Value = serde_json::from_str(payload).map_err(|err| Error::MalformedResponse {
        provider: provider.to_string(),
        reason: format!("json parse failed: {err}"),
    })?;

    let rows = match shape {
        ResponseShape::RowArrays | ResponseShape::ObjectRows => root.as_array(),
        ResponseShape::Enveloped { path } => descend(&root, path).and_then(Value::as_array),
    }
    .ok_or_else(|| Error::MalformedResponse {
        provider: provider.to_string(),
        reason: "candle list missing".to_string(),
    })?;

    let mut candles = Vec::with_capacity(rows.len());
    for row in rows {
        // a row with an uncoercible field drops that candle, not the series
        if let Some(candle) = candle_from_row(row) {
            candles.push(candle);
        }
    }

    if candles.len() >= 2 && candles[0].time_ms > candles[candles.len() - 1].time_ms {
        candles.reverse();
    }

    Ok(candles)
}

fn descend<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cursor = root;
    for key in path {
        cursor = cursor.get(key)?;
    }
    Some(cursor)
}

fn candle_from_row(row: &Value) -> Option<Candle> {
    if let Some(cells) = row.as_array() {
        if cells.len() < 6 {
            return None;
        }
        return Some(Candle {
            time_ms: timestamp_ms(&cells[0])?,
            open: finite(&cells[1])?,
            high: finite(&cells[2])?,
            low: finite(&cells[3])?,
            close: finite(&cells[4])?,
            volume: finite(&cells[5])?,
        });
    }

    if let Some(map) = row.as_object() {
        let time = map
            .get("time")
            .or_else(|| map.get("timestamp"))
            .or_else(|| map.get("t"))?;
        let volume = map
            .get("volume")
            .or_else(|| map.get("volumefrom"))
            .or_else(|| map.get("vol"))
            .or_else(|| map.get("v"))?;
        return Some(Candle {
            time_ms: timestamp_ms(time)?,
            open: finite(map.get("open").or_else(|| map.get("o"))?)?,
            high: finite(map.get("high").or_else(|| map.get("h"))?)?,
            low: finite(map.get("low").or_else(|| map.get("l"))?)?,
            close: finite(map.get("close").or_else(|| map.get("c"))?)?,
            volume: finite(volume)?,
        });
    }

    None
}

fn finite(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

// values below this are second-precision epochs (holds for any date up to 5138)
const MS_EPOCH_FLOOR: i64 = 100_000_000_000;

fn timestamp_ms(value: &Value) -> Option<i64> {
    let raw = finite(value)? as i64;
    if raw <= 0 {
        return None;
    }
    if raw < MS_EPOCH_FLOOR {
        Some(raw * 1000)
    } else {
        Some(raw)
    }
}
