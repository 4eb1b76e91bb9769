//! Core data types for the screener.

mod frame;
mod ohlcv;
mod signal;

pub use frame::{FrameOrder, FrameRow, IndicatorFrame};
pub use ohlcv::{Bar, Series};
pub use signal::Signal;
