use crate::config::ProvidersConfig;
use crate::market::RequestSpec;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseShape {
    RowArrays,
    ObjectRows,
    Enveloped { path: &'static [&'static str] },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Binance,
    Bybit,
    Okx,
    CryptoCompare,
}

#[derive(Clone, Debug)]
pub struct Provider {
    pub name: &'static str,
    pub kind: ProviderKind,
    pub base_url: String,
    pub shape: ResponseShape,
    pub category: String,
}

pub fn providers_from_config(config: &ProvidersConfig) -> Vec<Provider> {
    vec![
        Provider {
            name: "binance",
            kind: ProviderKind::Binance,
            base_url: config.binance_base_url.clone(),
            shape: ResponseShape::RowArrays,
            category: String::new(),
        },
        Provider {
            name: "bybit",
            kind: ProviderKind::Bybit,
            base_url: config.bybit_base_url.clone(),
            shape: ResponseShape::Enveloped {
                path: &["result", "list"],
            },
            category: config.bybit_category.clone(),
        },
        Provider {
            name: "okx",
            kind: ProviderKind::Okx,
            base_url: config.okx_base_url.clone(),
            shape: ResponseShape::Enveloped { path: &["data"] },
            category: String::new(),
        },
        Provider {
            name: "cryptocompare",
            kind: ProviderKind::CryptoCompare,
            base_url: config.cryptocompare_base_url.clone(),
            shape: ResponseShape::Enveloped {
                path: &["Data", "Data"],
            },
            category: String::new(),
        },
    ]
}

impl Provider {
    pub fn build_request(&self, symbol: &str, interval: &str, limit: usize) -> Result<RequestSpec> {
        match self.kind {
            ProviderKind::Binance => Ok(RequestSpec {
                provider: self.name,
                url: format!("{}/api/v3/klines", self.base_url),
                query: vec![
                    ("symbol".to_string(), symbol.to_string()),
                    ("interval".to_string(), interval.to_string()),
                    ("limit".to_string(), limit.min(1000).to_string()),
                ],
                headers: Vec::new(),
            }),
            ProviderKind::Bybit => {
                let interval = map_bybit_interval(interval)?;
                Ok(RequestSpec {
                    provider: self.name,
                    url: format!("{}/v5/market/kline", self.base_url),
                    query: vec![
                        ("category".to_string(), self.category.clone()),
                        ("symbol".to_string(), symbol.to_string()),
                        ("interval".to_string(), interval),
                        ("limit".to_string(), limit.min(1000).to_string()),
                    ],
                    headers: Vec::new(),
                })
            }
            ProviderKind::Okx => {
                let bar = map_okx_interval(interval)?;
                Ok(RequestSpec {
                    provider: self.name,
                    url: format!("{}/api/v5/market/candles", self.base_url),
                    query: vec![
                        ("instId".to_string(), okx_symbol(symbol)?),
                        ("bar".to_string(), bar),
                        ("limit".to_string(), limit.min(300).to_string()),
                    ],
                    headers: Vec::new(),
                })
            }
            ProviderKind::CryptoCompare => {
                let (base, quote) = split_symbol(symbol)?;
                let (path, aggregate) = map_cryptocompare_interval(interval)?;
                Ok(RequestSpec {
                    provider: self.name,
                    url: format!("{}{}", self.base_url, path),
                    query: vec![
                        ("fsym".to_string(), base),
                        ("tsym".to_string(), quote),
                        ("limit".to_string(), limit.min(2000).to_string()),
                        ("aggregate".to_string(), aggregate.to_string()),
                    ],
                    headers: vec![("Accept", "application/json".to_string())],
                })
            }
        }
    }
}

pub fn map_bybit_interval(interval: &str) -> Result<String> {
    let trimmed = interval.trim();
    if trimmed.is_empty() {
        return Err(Error::Config("bybit interval must be non-empty".to_string()));
    }

    if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return Ok(trimmed.to_string());
    }
    if matches!(trimmed, "D" | "W" | "M") {
        return Ok(trimmed.to_string());
    }
    if trimmed == "1M" {
        return Ok("M".to_string());
    }

    match trimmed.to_lowercase().as_str() {
        "1m" => Ok("1".to_string()),
        "3m" => Ok("3".to_string()),
        "5m" => Ok("5".to_string()),
        "15m" => Ok("15".to_string()),
        "30m" => Ok("30".to_string()),
        "1h" => Ok("60".to_string()),
        "2h" => Ok("120".to_string()),
        "4h" => Ok("240".to_string()),
        "6h" => Ok("360".to_string()),
        "12h" => Ok("720".to_string()),
        "1d" => Ok("D".to_string()),
        "1w" => Ok("W".to_string()),
        _ => Err(Error::Config("unsupported bybit interval".to_string())),
    }
}

pub fn map_okx_interval(interval: &str) -> Result<String> {
    let trimmed = interval.trim();
    if trimmed.is_empty() {
        return Err(Error::Config("okx interval must be non-empty".to_string()));
    }
    if trimmed == "1M" {
        return Ok("1M".to_string());
    }

    match trimmed.to_lowercase().as_str() {
        "1m" => Ok("1m".to_string()),
        "3m" => Ok("3m".to_string()),
        "5m" => Ok("5m".to_string()),
        "15m" => Ok("15m".to_string()),
        "30m" => Ok("30m".to_string()),
        "1h" => Ok("1H".to_string()),
        "2h" => Ok("2H".to_string()),
        "4h" => Ok("4H".to_string()),
        "6h" => Ok("6H".to_string()),
        "12h" => Ok("12H".to_string()),
        "1d" => Ok("1D".to_string()),
        "1w" => Ok("1W".to_string()),
        _ => Err(Error::Config("unsupported okx interval".to_string())),
    }
}

pub fn map_cryptocompare_interval(interval: &str) -> Result<(&'static str, u32)> {
    match interval.trim().to_lowercase().as_str() {
        "1m" => Ok(("/data/v2/histominute", 1)),
        "3m" => Ok(("/data/v2/histominute", 3)),
        "5m" => Ok(("/data/v2/histominute", 5)),
        "15m" => Ok(("/data/v2/histominute", 15)),
        "30m" => Ok(("/data/v2/histominute", 30)),
        "1h" => Ok(("/data/v2/histohour", 1)),
        "2h" => Ok(("/data/v2/histohour", 2)),
        "4h" => Ok(("/data/v2/histohour", 4)),
        "6h" => Ok(("/data/v2/histohour", 6)),
        "12h" => Ok(("/data/v2/histohour", 12)),
        "1d" => Ok(("/data/v2/histoday", 1)),
        _ => Err(Error::Config(
            "unsupported cryptocompare interval".to_string(),
        )),
    }
}

const QUOTE_ASSETS: [&str; 5] = ["USDT", "USDC", "USD", "BUSD", "EUR"];

pub fn split_symbol(symbol: &str) -> Result<(String, String)> {
    let trimmed = symbol.trim();
    if let Some((base, quote)) = trimmed.split_once('-') {
        if !base.is_empty() && !quote.is_empty() {
            return Ok((base.to_string(), quote.to_string()));
        }
    }
    for quote in QUOTE_ASSETS {
        if let Some(base) = trimmed.strip_suffix(quote) {
            if !base.is_empty() {
                return Ok((base.to_string(), quote.to_string()));
            }
        }
    }
    Err(Error::Config(format!(
        "cannot split symbol {trimmed} into base/quote"
    )))
}

fn okx_symbol(symbol: &str) -> Result<String> {
    if symbol.contains('-') {
        return Ok(symbol.to_string());
    }
    let (base, quote) = split_symbol(symbol)?;
    Ok(format!("{base}-{quote}"))
}
