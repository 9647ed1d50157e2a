use crate::app::report::write_output;
use crate::config::Config;
use crate::core::{EvaluateOptions, SignalEngine};
use crate::market::fetch::MultiSourceFetcher;
use crate::market::provider::providers_from_config;
use crate::market::HttpTransport;
use crate::models::Signal;
use crate::storage::dedup::{MemoryLedger, SignalLedger, PRUNE_AFTER_MS};
use crate::{Error, Result};
use std::env;
use std::thread::sleep;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

pub fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;

    if cli.show_help {
        print_usage();
        return Ok(());
    }

    let mut config = Config::load(&cli.config_path)?;
    if let Some(symbol) = cli.symbol_override {
        config.symbols = vec![symbol];
    }
    if let Some(interval) = cli.interval_override {
        config.data.candle_interval = interval;
    }
    if let Some(limit) = cli.limit_override {
        config.data.candle_limit = limit;
    }
    if let Some(format) = cli.output_format {
        config.output.format = format;
    }
    if let Some(path) = cli.output_path {
        config.output.path = path;
    }
    config.validate()?;

    let transport = HttpTransport::new(Duration::from_secs(config.data.timeout_secs))?;
    let providers = providers_from_config(&config.providers);
    let engine = SignalEngine::new(MultiSourceFetcher::new(providers, transport));
    let options = EvaluateOptions {
        interval: config.data.candle_interval.clone(),
        limit: config.data.candle_limit as usize,
    };

    let mut ledger = MemoryLedger::new();
    let mut accepted: Vec<Signal> = Vec::new();
    let mut skipped = 0usize;

    for (index, symbol) in config.symbols.iter().enumerate() {
        if index > 0 && config.scan.symbol_pause_ms > 0 {
            sleep(Duration::from_millis(config.scan.symbol_pause_ms));
        }
        let now = now_ms()?;
        match engine.evaluate(symbol, &options) {
            Ok(Some(signal)) => {
                if ledger.was_recently_sent(symbol, signal.side, now) {
                    info!(
                        symbol = %symbol,
                        side = signal.side.label(),
                        "signal suppressed, sent within the last hour"
                    );
                    continue;
                }
                info!(
                    symbol = %symbol,
                    side = signal.side.label(),
                    entry = signal.entry,
                    stop_loss = signal.stop_loss,
                    take_profit = signal.take_profit,
                    confidence = signal.confidence,
                    "signal"
                );
                ledger.record_sent(symbol, signal.side, now);
                accepted.push(signal);
            }
            Ok(None) => {
                info!(symbol = %symbol, "no signal");
            }
            Err(err @ Error::AllSourcesExhausted { .. }) => {
                warn!(symbol = %symbol, error = %err, "skipping symbol this cycle");
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    let now = now_ms()?;
    ledger.prune_older_than(now - PRUNE_AFTER_MS);

    println!("symbols_scanned: {}", config.symbols.len());
    println!("signals: {}", accepted.len());
    println!("symbols_skipped: {}", skipped);

    if config.output.format != "none" {
        write_output(&config.output.path, &config.output.format, &accepted)?;
        println!(
            "output_written: {} ({})",
            config.output.path, config.output.format
        );
    }

    Ok(())
}

struct CliArgs {
    config_path: String,
    symbol_override: Option<String>,
    interval_override: Option<String>,
    limit_override: Option<u32>,
    output_format: Option<String>,
    output_path: Option<String>,
    show_help: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut config_path = "config.toml".to_string();
    let mut symbol_override = None;
    let mut interval_override = None;
    let mut limit_override = None;
    let mut output_format = None;
    let mut output_path = None;
    let mut show_help = false;

    let mut index = 1;
    while index < args.len() {
        match args[index].as_str() {
            "--help" | "-h" => {
                show_help = true;
                index += 1;
            }
            "--config" | "-c" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::Config("missing value for --config".to_string()))?;
                config_path = value.to_string();
                index += 2;
            }
            "--symbol" | "-s" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::Config("missing value for --symbol".to_string()))?;
                symbol_override = Some(value.to_string());
                index += 2;
            }
            "--interval" | "-i" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::Config("missing value for --interval".to_string()))?;
                interval_override = Some(value.to_string());
                index += 2;
            }
            "--limit" | "-l" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::Config("missing value for --limit".to_string()))?;
                let parsed = value
                    .parse::<u32>()
                    .map_err(|_| Error::Config("invalid value for --limit".to_string()))?;
                limit_override = Some(parsed);
                index += 2;
            }
            "--output-format" | "-f" => {
                let value = args.get(index + 1).ok_or_else(|| {
                    Error::Config("missing value for --output-format".to_string())
                })?;
                output_format = Some(value.to_string());
                index += 2;
            }
            "--output-path" | "-o" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::Config("missing value for --output-path".to_string()))?;
                output_path = Some(value.to_string());
                index += 2;
            }
            unknown => {
                return Err(Error::Config(format!("unknown argument: {unknown}")));
            }
        }
    }

    Ok(CliArgs {
        config_path,
        symbol_override,
        interval_override,
        limit_override,
        output_format,
        output_path,
        show_help,
    })
}

fn print_usage() {
    println!("usage: vigil [--config <path>] [--symbol <SYMBOL>] [--interval <interval>] [--limit <n>] [--output-format <fmt>] [--output-path <path>]");
    println!("  -c, --config   Path to config.toml (default: config.toml)");
    println!("  -s, --symbol   Scan a single symbol instead of the configured list");
    println!("  -i, --interval Override candle interval from config");
    println!("  -l, --limit    Override candle limit from config");
    println!("  -f, --output-format   Override output format (none|json|csv)");
    println!("  -o, --output-path     Override output path");
    println!("  -h, --help     Show this help");
}

fn now_ms() -> Result<i64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::Config("system time before unix epoch".to_string()))?;
    Ok(now.as_millis() as i64)
}
