use vigil::config::Config;
use vigil::market::provider::{
    map_bybit_interval, map_cryptocompare_interval, map_okx_interval, providers_from_config,
    split_symbol, ProviderKind,
};

fn query_value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

#[test]
fn builds_all_default_providers() {
    let providers = providers_from_config(&Config::default().providers);
    let names: Vec<&str> = providers.iter().map(|provider| provider.name).collect();
    assert_eq!(names, vec!["binance", "bybit", "okx", "cryptocompare"]);
}

#[test]
fn binance_request_passes_interval_through() {
    let providers = providers_from_config(&Config::default().providers);
    let binance = providers
        .iter()
        .find(|provider| provider.kind == ProviderKind::Binance)
        .expect("binance");

    let request = binance.build_request("BTCUSDT", "1h", 120).expect("request");
    assert_eq!(request.url, "https://api.binance.com/api/v3/klines");
    assert_eq!(query_value(&request.query, "symbol"), Some("BTCUSDT"));
    assert_eq!(query_value(&request.query, "interval"), Some("1h"));
    assert_eq!(query_value(&request.query, "limit"), Some("120"));
}

#[test]
fn bybit_request_maps_interval_and_category() {
    let providers = providers_from_config(&Config::default().providers);
    let bybit = providers
        .iter()
        .find(|provider| provider.kind == ProviderKind::Bybit)
        .expect("bybit");

    let request = bybit.build_request("BTCUSDT", "1h", 120).expect("request");
    assert_eq!(request.url, "https://api.bybit.com/v5/market/kline");
    assert_eq!(query_value(&request.query, "interval"), Some("60"));
    assert_eq!(query_value(&request.query, "category"), Some("spot"));
}

#[test]
fn okx_request_uses_dashed_symbol_and_caps_limit() {
    let providers = providers_from_config(&Config::default().providers);
    let okx = providers
        .iter()
        .find(|provider| provider.kind == ProviderKind::Okx)
        .expect("okx");

    let request = okx.build_request("BTCUSDT", "1h", 500).expect("request");
    assert_eq!(query_value(&request.query, "instId"), Some("BTC-USDT"));
    assert_eq!(query_value(&request.query, "bar"), Some("1H"));
    assert_eq!(query_value(&request.query, "limit"), Some("300"));
}

#[test]
fn cryptocompare_request_splits_symbol_and_sets_header() {
    let providers = providers_from_config(&Config::default().providers);
    let cryptocompare = providers
        .iter()
        .find(|provider| provider.kind == ProviderKind::CryptoCompare)
        .expect("cryptocompare");

    let request = cryptocompare
        .build_request("ETHUSDT", "4h", 120)
        .expect("request");
    assert!(request.url.ends_with("/data/v2/histohour"));
    assert_eq!(query_value(&request.query, "fsym"), Some("ETH"));
    assert_eq!(query_value(&request.query, "tsym"), Some("USDT"));
    assert_eq!(query_value(&request.query, "aggregate"), Some("4"));
    assert!(request
        .headers
        .iter()
        .any(|(name, value)| *name == "Accept" && value == "application/json"));
}

#[test]
fn maps_bybit_intervals() {
    assert_eq!(map_bybit_interval("1m").expect("1m"), "1");
    assert_eq!(map_bybit_interval("1h").expect("1h"), "60");
    assert_eq!(map_bybit_interval("1D").expect("1D"), "D");
    assert_eq!(map_bybit_interval("1M").expect("1M"), "M");
    assert!(map_bybit_interval("7m").is_err());
}

#[test]
fn maps_okx_intervals() {
    assert_eq!(map_okx_interval("1m").expect("1m"), "1m");
    assert_eq!(map_okx_interval("1h").expect("1h"), "1H");
    assert_eq!(map_okx_interval("1D").expect("1D"), "1D");
    assert_eq!(map_okx_interval("1M").expect("1M"), "1M");
    assert!(map_okx_interval("7m").is_err());
}

#[test]
fn maps_cryptocompare_intervals() {
    assert_eq!(
        map_cryptocompare_interval("1m").expect("1m"),
        ("/data/v2/histominute", 1)
    );
    assert_eq!(
        map_cryptocompare_interval("1h").expect("1h"),
        ("/data/v2/histohour", 1)
    );
    assert_eq!(
        map_cryptocompare_interval("1d").expect("1d"),
        ("/data/v2/histoday", 1)
    );
    assert!(map_cryptocompare_interval("1w").is_err());
}

#[test]
fn splits_symbols_on_known_quote_assets() {
    assert_eq!(
        split_symbol("BTCUSDT").expect("split"),
        ("BTC".to_string(), "USDT".to_string())
    );
    assert_eq!(
        split_symbol("ETH-USDC").expect("split"),
        ("ETH".to_string(), "USDC".to_string())
    );
    assert!(split_symbol("MYSTERY").is_err());
}
