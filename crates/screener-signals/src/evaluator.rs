//! KDJ + MACD signal evaluator.

use screener_core::error::IndicatorError;
use screener_core::types::{FrameRow, IndicatorFrame, Signal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunable parts of the signal rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRule {
    /// Number of most recent MACD values that must be strictly monotonic (2 or 3)
    pub macd_chain: usize,
}

impl Default for SignalRule {
    fn default() -> Self {
        Self { macd_chain: 3 }
    }
}

impl SignalRule {
    /// Validate the rule parameters.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if !(2..=3).contains(&self.macd_chain) {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD chain length must be 2 or 3, got {}",
                self.macd_chain
            )));
        }
        Ok(())
    }

    /// Number of newest bars the rule reads.
    pub fn lookback(&self) -> usize {
        self.macd_chain.max(2)
    }
}

/// Outcome of each condition for one side (Buy or Sell) of the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleChecks {
    /// MACD on the latest bar has the right sign
    pub macd_sign: bool,
    /// MACD strictly monotonic over the chain
    pub macd_trend: bool,
    /// K against D on the latest bar
    pub kd_order: bool,
    /// J on the previous bar against max(K, D)
    pub j_previous: bool,
    /// J on the latest bar against max(K, D)
    pub j_latest: bool,
}

impl RuleChecks {
    /// Whether every condition holds.
    pub fn all(&self) -> bool {
        self.macd_sign && self.macd_trend && self.kd_order && self.j_previous && self.j_latest
    }
}

/// The indicator values the rule reads, all defined.
#[derive(Debug, Clone)]
struct Snapshot {
    /// MACD by age, newest first
    macd: Vec<f64>,
    k: [f64; 2],
    d: [f64; 2],
    j: [f64; 2],
}

impl Snapshot {
    fn take(frame: &IndicatorFrame, rule: &SignalRule) -> Option<Self> {
        let kdj = |row: &FrameRow| Some((row.k?, row.d?, row.j?));
        let (k0, d0, j0) = kdj(frame.recent(0)?)?;
        let (k1, d1, j1) = kdj(frame.recent(1)?)?;

        let macd = (0..rule.macd_chain)
            .map(|age| frame.recent(age)?.macd)
            .collect::<Option<Vec<f64>>>()?;

        Some(Self {
            macd,
            k: [k0, k1],
            d: [d0, d1],
            j: [j0, j1],
        })
    }

    fn kd_max(&self, age: usize) -> f64 {
        self.k[age].max(self.d[age])
    }

    fn buy_checks(&self) -> RuleChecks {
        RuleChecks {
            macd_sign: self.macd[0] > 0.0,
            macd_trend: self.macd.windows(2).all(|w| w[0] > w[1]),
            kd_order: self.k[0] > self.d[0],
            j_previous: self.j[1] < self.kd_max(1),
            j_latest: self.j[0] > self.kd_max(0),
        }
    }

    fn sell_checks(&self) -> RuleChecks {
        RuleChecks {
            macd_sign: self.macd[0] < 0.0,
            macd_trend: self.macd.windows(2).all(|w| w[0] < w[1]),
            kd_order: self.k[0] < self.d[0],
            j_previous: self.j[1] > self.kd_max(1),
            j_latest: self.j[0] < self.kd_max(0),
        }
    }
}

/// Classifies an indicator frame as Buy, Sell or Hold.
///
/// Only the newest two bars (three with a 3-bar MACD chain) are read. Any
/// undefined value among them, or a frame too short to have them, yields
/// `Hold`.
#[derive(Debug, Clone, Default)]
pub struct SignalEvaluator {
    rule: SignalRule,
}

impl SignalEvaluator {
    /// Create an evaluator for the given rule.
    pub fn new(rule: SignalRule) -> Self {
        assert!(rule.validate().is_ok(), "Invalid signal rule: {:?}", rule);
        Self { rule }
    }

    /// The rule in use.
    pub fn rule(&self) -> &SignalRule {
        &self.rule
    }

    /// Buy-side and sell-side condition outcomes, or `None` if a value the
    /// rule reads is undefined.
    pub fn checks(&self, frame: &IndicatorFrame) -> Option<(RuleChecks, RuleChecks)> {
        let snapshot = Snapshot::take(frame, &self.rule)?;
        Some((snapshot.buy_checks(), snapshot.sell_checks()))
    }

    /// Classify the frame.
    pub fn evaluate(&self, frame: &IndicatorFrame) -> Signal {
        let Some((buy, sell)) = self.checks(frame) else {
            debug!(symbol = frame.symbol(), "indicator values undefined, holding");
            return Signal::Hold;
        };

        let signal = if buy.all() {
            Signal::Buy
        } else if sell.all() {
            Signal::Sell
        } else {
            Signal::Hold
        };

        debug!(
            symbol = frame.symbol(),
            ?buy,
            ?sell,
            %signal,
            "signal evaluated"
        );
        signal
    }
}
