use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;

#[derive(Clone, Debug)]
pub struct DataConfig {
    pub candle_interval: String,
    pub candle_limit: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ScanConfig {
    pub symbol_pause_ms: u64,
}

#[derive(Clone, Debug)]
pub struct ProvidersConfig {
    pub binance_base_url: String,
    pub bybit_base_url: String,
    pub bybit_category: String,
    pub okx_base_url: String,
    pub cryptocompare_base_url: String,
}

#[derive(Clone, Debug)]
pub struct OutputConfig {
    pub format: String,
    pub path: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub symbols: Vec<String>,
    pub data: DataConfig,
    pub scan: ScanConfig,
    pub providers: ProvidersConfig,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Deserialize)]
struct DataConfigFile {
    candle_interval: Option<String>,
    candle_limit: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
struct ScanConfigFile {
    symbol_pause_ms: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
struct ProvidersConfigFile {
    binance_base_url: Option<String>,
    bybit_base_url: Option<String>,
    bybit_category: Option<String>,
    okx_base_url: Option<String>,
    cryptocompare_base_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct OutputConfigFile {
    format: Option<String>,
    path: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct ConfigFile {
    symbols: Option<Vec<String>>,
    data: Option<DataConfigFile>,
    scan: Option<ScanConfigFile>,
    providers: Option<ProvidersConfigFile>,
    output: Option<OutputConfigFile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: vec![
                "BTCUSDT".to_string(),
                "ETHUSDT".to_string(),
                "SOLUSDT".to_string(),
            ],
            data: DataConfig {
                candle_interval: "1h".to_string(),
                candle_limit: 120,
                timeout_secs: 10,
            },
            scan: ScanConfig {
                symbol_pause_ms: 1500,
            },
            providers: ProvidersConfig {
                binance_base_url: "https://api.binance.com".to_string(),
                bybit_base_url: "https://api.bybit.com".to_string(),
                bybit_category: "spot".to_string(),
                okx_base_url: "https://www.okx.com".to_string(),
                cryptocompare_base_url: "https://min-api.cryptocompare.com".to_string(),
            },
            output: OutputConfig {
                format: "none".to_string(),
                path: "output/signals.json".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("failed to read config: {err}")))?;
        let file: ConfigFile = toml::from_str(&content)
            .map_err(|err| Error::Config(format!("failed to parse config: {err}")))?;
        let mut config = Config::from_file(file);
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(file: ConfigFile) -> Self {
        let mut config = Config::default();

        if let Some(symbols) = file.symbols {
            config.symbols = symbols;
        }

        if let Some(data) = file.data {
            if let Some(value) = data.candle_interval {
                config.data.candle_interval = value;
            }
            if let Some(value) = data.candle_limit {
                config.data.candle_limit = value;
            }
            if let Some(value) = data.timeout_secs {
                config.data.timeout_secs = value;
            }
        }

        if let Some(scan) = file.scan {
            if let Some(value) = scan.symbol_pause_ms {
                config.scan.symbol_pause_ms = value;
            }
        }

        if let Some(providers) = file.providers {
            if let Some(value) = providers.binance_base_url {
                config.providers.binance_base_url = value;
            }
            if let Some(value) = providers.bybit_base_url {
                config.providers.bybit_base_url = value;
            }
            if let Some(value) = providers.bybit_category {
                config.providers.bybit_category = value;
            }
            if let Some(value) = providers.okx_base_url {
                config.providers.okx_base_url = value;
            }
            if let Some(value) = providers.cryptocompare_base_url {
                config.providers.cryptocompare_base_url = value;
            }
        }

        if let Some(output) = file.output {
            if let Some(value) = output.format {
                config.output.format = value;
            }
            if let Some(value) = output.path {
                config.output.path = value;
            }
        }

        config
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = read_string_env("VIGIL_SYMBOLS")? {
            self.symbols = value
                .split(',')
                .map(|symbol| symbol.trim().to_string())
                .filter(|symbol| !symbol.is_empty())
                .collect();
        }

        if let Some(value) = read_string_env("VIGIL_CANDLE_INTERVAL")? {
            self.data.candle_interval = value;
        }
        if let Some(value) = read_u32_env("VIGIL_CANDLE_LIMIT")? {
            self.data.candle_limit = value;
        }
        if let Some(value) = read_u64_env("VIGIL_TIMEOUT_SECS")? {
            self.data.timeout_secs = value;
        }

        if let Some(value) = read_u64_env("VIGIL_SYMBOL_PAUSE_MS")? {
            self.scan.symbol_pause_ms = value;
        }

        if let Some(value) = read_string_env("VIGIL_BINANCE_BASE_URL")? {
            self.providers.binance_base_url = value;
        }
        if let Some(value) = read_string_env("VIGIL_BYBIT_BASE_URL")? {
            self.providers.bybit_base_url = value;
        }
        if let Some(value) = read_string_env("VIGIL_BYBIT_CATEGORY")? {
            self.providers.bybit_category = value;
        }
        if let Some(value) = read_string_env("VIGIL_OKX_BASE_URL")? {
            self.providers.okx_base_url = value;
        }
        if let Some(value) = read_string_env("VIGIL_CRYPTOCOMPARE_BASE_URL")? {
            self.providers.cryptocompare_base_url = value;
        }

        if let Some(value) = read_string_env("VIGIL_OUTPUT_FORMAT")? {
            self.output.format = value;
        }
        if let Some(value) = read_string_env("VIGIL_OUTPUT_PATH")? {
            self.output.path = value;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(Error::Config("symbols must not be empty".to_string()));
        }
        for symbol in &self.symbols {
            if symbol.trim().is_empty() {
                return Err(Error::Config("symbols must be non-blank".to_string()));
            }
        }

        if self.data.candle_interval.trim().is_empty() {
            return Err(Error::Config(
                "data.candle_interval must be set".to_string(),
            ));
        }
        if (self.data.candle_limit as usize) < crate::core::engine::MIN_DECIDE_CANDLES {
            return Err(Error::Config(format!(
                "data.candle_limit must be at least {}",
                crate::core::engine::MIN_DECIDE_CANDLES
            )));
        }
        if self.data.timeout_secs == 0 {
            return Err(Error::Config(
                "data.timeout_secs must be positive".to_string(),
            ));
        }

        for (name, value) in [
            ("providers.binance_base_url", &self.providers.binance_base_url),
            ("providers.bybit_base_url", &self.providers.bybit_base_url),
            ("providers.bybit_category", &self.providers.bybit_category),
            ("providers.okx_base_url", &self.providers.okx_base_url),
            (
                "providers.cryptocompare_base_url",
                &self.providers.cryptocompare_base_url,
            ),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{name} must be non-empty")));
            }
        }

        match self.output.format.as_str() {
            "none" | "json" | "csv" => {}
            _ => {
                return Err(Error::Config(
                    "output.format must be none, json, or csv".to_string(),
                ))
            }
        }
        if self.output.format != "none" && self.output.path.trim().is_empty() {
            return Err(Error::Config("output.path must be set".to_string()));
        }

        Ok(())
    }
}

fn read_string_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::Config(format!("failed to read {key}: {err}"))),
    }
}

fn read_u32_env(key: &str) -> Result<Option<u32>> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| Error::Config(format!("{key} must be u32: {err}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::Config(format!("failed to read {key}: {err}"))),
    }
}

fn read_u64_env(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| Error::Config(format!("{key} must be u64: {err}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::Config(format!("failed to read {key}: {err}"))),
    }
}
