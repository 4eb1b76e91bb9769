//! Technical indicators for the daily screener.
//!
//! This crate provides the numerical engines behind the screener:
//! - Exponential moving average with simple-average seeding
//! - KDJ stochastic oscillator over rolling high/low windows
//! - MACD (DIF, DEA and histogram)
//! - Day-over-day percentage returns
//!
//! Every engine returns one output per input bar, oldest first, using
//! `None` for bars where the value is not (yet) defined.

pub mod kdj;
pub mod macd;
pub mod moving_average;
pub mod returns;
mod rolling;

pub use kdj::{Kdj, KdjOutput};
pub use macd::{Macd, MacdOutput, MacdSpans};
pub use moving_average::Ema;
pub use returns::percent_returns;
