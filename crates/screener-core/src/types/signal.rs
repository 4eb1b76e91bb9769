//! Trading signal classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete classification derived from an indicator frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    /// Whether the signal asks for any action.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Hold)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::Hold => "Hold",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_display_and_serde() {
        assert_eq!(Signal::Buy.to_string(), "Buy");
        assert_eq!(serde_json::to_string(&Signal::Sell).unwrap(), "\"sell\"");
        assert_eq!(Signal::default(), Signal::Hold);
        assert!(Signal::Buy.is_actionable());
        assert!(!Signal::Hold.is_actionable());
    }
}
