//! Signal evaluation for the screener.
//!
//! Classifies the newest bars of an indicator frame as Buy, Sell or Hold
//! using a fixed KDJ + MACD rule:
//! - MACD histogram positive (negative) and strictly rising (falling)
//! - %K above (below) %D on the latest bar
//! - %J crossing up through (down from) the larger of %K and %D

mod evaluator;

pub use evaluator::{RuleChecks, SignalEvaluator, SignalRule};
