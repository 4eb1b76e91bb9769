//! Batch report generation.

use chrono::{DateTime, NaiveDate, Utc};
use screener_core::types::Signal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A symbol the batch could not classify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// Last trading day considered
    pub as_of: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Symbols attempted, including failures
    pub assessed: usize,
    pub buy: Vec<String>,
    pub sell: Vec<String>,
    pub hold: Vec<String>,
    pub failed: Vec<FailedSymbol>,
}

impl BatchReport {
    /// Start an empty report.
    pub fn new(as_of: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            as_of,
            started_at: now,
            finished_at: now,
            assessed: 0,
            buy: Vec::new(),
            sell: Vec::new(),
            hold: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Record a classified symbol.
    pub fn record(&mut self, symbol: impl Into<String>, signal: Signal) {
        self.assessed += 1;
        let list = match signal {
            Signal::Buy => &mut self.buy,
            Signal::Sell => &mut self.sell,
            Signal::Hold => &mut self.hold,
        };
        list.push(symbol.into());
    }

    /// Record a symbol whose pipeline failed.
    pub fn record_failure(&mut self, symbol: impl Into<String>, reason: impl Into<String>) {
        self.assessed += 1;
        self.failed.push(FailedSymbol {
            symbol: symbol.into(),
            reason: reason.into(),
        });
    }

    /// Stamp the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// Symbols that produced a signal (any of Buy, Sell, Hold).
    pub fn classified(&self) -> usize {
        self.buy.len() + self.sell.len() + self.hold.len()
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                      SCREENER REPORT                       \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("RUN\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Run ID:              {}\n", self.run_id));
        s.push_str(&format!("  As Of:               {}\n", self.as_of));
        s.push_str(&format!(
            "  Duration:            {:.1}s\n",
            (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
        ));
        s.push_str(&format!("  Assessed:            {}\n", self.assessed));
        s.push_str(&format!("  Classified:          {}\n", self.classified()));
        s.push_str(&format!("  Failed:              {}\n", self.failed.len()));
        s.push('\n');

        s.push_str("SIGNALS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  BUY:  {}\n", format_list(&self.buy)));
        s.push_str(&format!("  SELL: {}\n", format_list(&self.sell)));
        s.push('\n');

        if !self.failed.is_empty() {
            s.push_str("FAILED\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            for failure in &self.failed {
                s.push_str(&format!("  {:<8} {}\n", failure.symbol, failure.reason));
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn format_list(symbols: &[String]) -> String {
    if symbols.is_empty() {
        "(none)".to_string()
    } else {
        symbols.join(", ")
    }
}
