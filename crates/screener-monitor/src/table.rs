//! Text table presentation of indicator frames.

use screener_core::traits::FrameSink;
use screener_core::types::{IndicatorFrame, Signal};

/// Prints a newest-first indicator table followed by the signal.
#[derive(Debug, Clone)]
pub struct TableSink {
    /// Rows shown per frame (0 = all)
    max_rows: usize,
}

impl TableSink {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    /// Render a frame as text.
    pub fn render(&self, frame: &IndicatorFrame, signal: Signal) -> String {
        let shown = match self.max_rows {
            0 => frame.len(),
            n => n.min(frame.len()),
        };

        let mut s = String::new();
        s.push_str(&format!("{}  [{}]\n", frame.symbol(), signal));
        s.push_str(&format!(
            "{:<10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>7} {:>7} {:>7} {:>8} {:>8} {:>8}\n",
            "Date", "Open", "High", "Low", "Close", "Ret%", "K", "D", "J", "DIF", "DEA", "MACD"
        ));
        s.push_str(&"─".repeat(113));
        s.push('\n');

        for row in (0..shown).filter_map(|age| frame.recent(age)) {
            let bar = &row.bar;
            s.push_str(&format!(
                "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8} {:>7} {:>7} {:>7} {:>8} {:>8} {:>8}\n",
                bar.date.to_string(),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                cell(row.returns, 2),
                cell(row.k, 2),
                cell(row.d, 2),
                cell(row.j, 2),
                cell(row.dif, 3),
                cell(row.dea, 3),
                cell(row.macd, 3),
            ));
        }

        if shown < frame.len() {
            s.push_str(&format!("... {} older rows\n", frame.len() - shown));
        }
        s
    }
}

impl Default for TableSink {
    fn default() -> Self {
        Self::new(10)
    }
}

fn cell(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

impl FrameSink for TableSink {
    fn present(&self, frame: &IndicatorFrame, signal: Signal) {
        println!("{}", self.render(frame, signal));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use screener_core::types::{Bar, FrameOrder, FrameRow};

    fn frame(len: usize) -> IndicatorFrame {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let rows = (0..len)
            .map(|i| {
                let mut row = FrameRow::undefined(Bar::new(
                    start + Duration::days(i as i64),
                    10.0,
                    11.0,
                    9.0,
                    10.0 + i as f64,
                    100.0,
                ));
                if i > 0 {
                    row.k = Some(55.5);
                    row.macd = Some(-0.1234);
                }
                row
            })
            .collect();
        IndicatorFrame::new("ACME", FrameOrder::Chronological, rows)
    }

    #[test]
    fn test_render_newest_first() {
        let text = TableSink::new(0).render(&frame(3), Signal::Buy);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ACME  [Buy]");
        assert!(lines[3].starts_with("2024-06-05"));
        assert!(lines[5].starts_with("2024-06-03"));
        assert!(lines[3].contains("55.50"));
        assert!(lines[3].contains("-0.123"));
        // Oldest row has nothing defined
        assert!(lines[5].trim_end().ends_with('-'));
    }

    #[test]
    fn test_render_truncates() {
        let text = TableSink::new(2).render(&frame(5), Signal::Hold);

        assert!(text.contains("2024-06-07"));
        assert!(text.contains("2024-06-06"));
        assert!(!text.contains("2024-06-05"));
        assert!(text.contains("... 3 older rows"));
    }
}
