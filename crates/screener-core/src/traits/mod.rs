//! Core traits for the screener.

mod data_source;
mod indicator;
mod sink;

pub use data_source::{PriceSource, SymbolSource, TradingCalendar};
pub use indicator::{Indicator, SeriesIndicator};
pub use sink::FrameSink;
