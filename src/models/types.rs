#[derive(Clone, Debug, PartialEq)]
pub struct Candle {
    pub time_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostics {
    pub rsi: f64,
    pub bollinger_lower: f64,
    pub bollinger_upper: f64,
    pub acceleration: f64,
    pub atr: f64,
    pub close: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    pub symbol: String,
    pub side: Side,
    pub entry: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub risk_reward: Option<f64>,
    pub confidence: u8,
    pub diagnostics: Diagnostics,
}
