//! Indicator frame: a series with its derived indicator columns.

use serde::{Deserialize, Serialize};

use super::Bar;

/// Storage order of the rows in an [`IndicatorFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrder {
    /// Oldest bar first
    Chronological,
    /// Most recent bar first
    NewestFirst,
}

impl FrameOrder {
    /// The opposite ordering.
    pub fn reversed(self) -> Self {
        match self {
            FrameOrder::Chronological => FrameOrder::NewestFirst,
            FrameOrder::NewestFirst => FrameOrder::Chronological,
        }
    }
}

/// One bar together with its indicator values.
///
/// `None` means the value is undefined for this bar (warm-up, flat window).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRow {
    pub bar: Bar,
    /// Percentage change of close against the previous trading day
    pub returns: Option<f64>,
    pub k: Option<f64>,
    pub d: Option<f64>,
    pub j: Option<f64>,
    pub dif: Option<f64>,
    pub dea: Option<f64>,
    pub macd: Option<f64>,
}

impl FrameRow {
    /// A row with every indicator undefined.
    pub fn undefined(bar: Bar) -> Self {
        Self {
            bar,
            returns: None,
            k: None,
            d: None,
            j: None,
            dif: None,
            dea: None,
            macd: None,
        }
    }
}

/// A series augmented with aligned indicator columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    symbol: String,
    order: FrameOrder,
    rows: Vec<FrameRow>,
}

impl IndicatorFrame {
    /// Create a frame from rows stored in the given order.
    pub fn new(symbol: impl Into<String>, order: FrameOrder, rows: Vec<FrameRow>) -> Self {
        Self {
            symbol: symbol.into(),
            order,
            rows,
        }
    }

    /// Symbol identifier.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Storage order of the rows.
    pub fn order(&self) -> FrameOrder {
        self.order
    }

    /// Get the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the frame is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in storage order.
    pub fn rows(&self) -> &[FrameRow] {
        &self.rows
    }

    /// Get a row by storage index.
    pub fn get(&self, index: usize) -> Option<&FrameRow> {
        self.rows.get(index)
    }

    /// Get a row by age: 0 is the most recent bar, 1 the one before, and so on.
    pub fn recent(&self, age: usize) -> Option<&FrameRow> {
        match self.order {
            FrameOrder::NewestFirst => self.rows.get(age),
            FrameOrder::Chronological => self
                .rows
                .len()
                .checked_sub(age + 1)
                .and_then(|i| self.rows.get(i)),
        }
    }

    /// Extract one column in storage order.
    pub fn column(&self, pick: impl Fn(&FrameRow) -> Option<f64>) -> Vec<Option<f64>> {
        self.rows.iter().map(pick).collect()
    }

    /// A copy of this frame with the row order flipped.
    pub fn reversed(&self) -> Self {
        self.clone().into_reversed()
    }

    /// Flip the row order.
    pub fn into_reversed(mut self) -> Self {
        self.rows.reverse();
        self.order = self.order.reversed();
        self
    }

    /// Convert to newest-first order (no-op if already newest first).
    pub fn into_newest_first(self) -> Self {
        match self.order {
            FrameOrder::NewestFirst => self,
            FrameOrder::Chronological => self.into_reversed(),
        }
    }

    /// Convert to chronological order (no-op if already chronological).
    pub fn into_chronological(self) -> Self {
        match self.order {
            FrameOrder::Chronological => self,
            FrameOrder::NewestFirst => self.into_reversed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn frame(len: u32) -> IndicatorFrame {
        let rows = (1..=len)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
                let mut row = FrameRow::undefined(Bar::new(date, 1.0, 1.0, 1.0, d as f64, 0.0));
                row.k = Some(d as f64 * 10.0);
                row
            })
            .collect();
        IndicatorFrame::new("TEST", FrameOrder::Chronological, rows)
    }

    #[test]
    fn test_recent_is_independent_of_order() {
        let chronological = frame(5);
        let newest_first = chronological.reversed();

        for age in 0..5 {
            assert_eq!(chronological.recent(age), newest_first.recent(age));
        }
        assert_eq!(chronological.recent(0).unwrap().bar.close, 5.0);
        assert_eq!(newest_first.get(0).unwrap().bar.close, 5.0);
        assert!(chronological.recent(5).is_none());
        assert!(newest_first.recent(5).is_none());
    }

    #[test]
    fn test_reverse_round_trip() {
        let original = frame(7);
        let flipped = original.reversed();

        assert_eq!(flipped.order(), FrameOrder::NewestFirst);
        assert_ne!(flipped.rows(), original.rows());
        assert_eq!(flipped.reversed(), original);
    }

    #[test]
    fn test_order_conversions_are_idempotent() {
        let original = frame(3);
        let newest = original.clone().into_newest_first();
        assert_eq!(newest.clone().into_newest_first(), newest);
        assert_eq!(newest.into_chronological(), original);
    }

    #[test]
    fn test_column_and_serialization() {
        let frame = frame(2);
        assert_eq!(frame.column(|r| r.k), vec![Some(10.0), Some(20.0)]);
        assert_eq!(frame.column(|r| r.macd), vec![None, None]);

        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["order"], "chronological");
        assert!(json["rows"][0]["macd"].is_null());
    }
}
