//! Indicator trait definitions.

use crate::types::Series;

/// Trait for indicators over a single input column.
///
/// Output is aligned with the input: one value per input point, with
/// `None` marking points where the indicator is not yet defined.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically prices), oldest first
    ///
    /// # Returns
    /// A vector with exactly `data.len()` entries
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Output>>;

    /// Get the number of points consumed before the first defined value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Indicator that reads whole bars (high, low, close) rather than one column.
pub trait SeriesIndicator: Send + Sync {
    /// Per-bar output type.
    type Output;

    /// Calculate one output per bar of the series, in chronological order.
    fn calculate_series(&self, series: &Series) -> Vec<Self::Output>;

    /// Get the number of bars needed before the first defined value.
    fn warmup_period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RunningSum {
        period: usize,
    }

    impl Indicator for RunningSum {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
            (0..data.len())
                .map(|i| {
                    (i + 1 >= self.period).then(|| data[i + 1 - self.period..=i].iter().sum::<f64>())
                })
                .collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_indicator_output_is_aligned() {
        let indicator = RunningSum { period: 3 };
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = indicator.calculate(&data);

        assert_eq!(result.len(), data.len());
        assert_eq!(result[..2], [None, None]);
        assert_eq!(result[2], Some(6.0)); // 1+2+3
        assert_eq!(result[4], Some(12.0)); // 3+4+5
    }
}
