pub mod types;

pub use types::{Candle, Diagnostics, Side, Signal};
