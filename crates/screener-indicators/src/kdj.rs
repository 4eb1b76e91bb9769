//! KDJ stochastic oscillator.
//!
//! RSV (raw stochastic value) places each close inside the trailing
//! high/low range of `window` bars. %K and %D are recursive 1/3 smoothings
//! of RSV and %K, and %J = 3K - 2D exaggerates their divergence.
//!
//! The recurrence starts at the first bar whose RSV is defined, with K and D
//! both set to the seed value (50 by convention, not derived from RSV). Bars
//! before that are undefined. A flat window (`high_max == low_min`) leaves RSV
//! undefined; once that happens after seeding, K, D and J stay undefined for
//! the rest of the series.

use screener_core::traits::SeriesIndicator;
use screener_core::types::Series;
use serde::{Deserialize, Serialize};

use crate::rolling::{rolling_max, rolling_min};

/// Default RSV lookback window.
pub const DEFAULT_WINDOW: usize = 9;
/// Default K/D starting value.
pub const DEFAULT_SEED: f64 = 50.0;

/// KDJ values for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KdjOutput {
    pub rsv: Option<f64>,
    pub k: Option<f64>,
    pub d: Option<f64>,
    pub j: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
enum KdjState {
    Unseeded,
    Running { k: f64, d: f64 },
    Broken,
}

/// KDJ indicator.
#[derive(Debug, Clone)]
pub struct Kdj {
    window: usize,
    seed: f64,
}

impl Kdj {
    /// Create a KDJ with the default 9-bar window and a seed of 50.
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    /// Create a KDJ with a custom RSV window.
    pub fn with_window(window: usize) -> Self {
        assert!(window > 0, "Window must be greater than 0");
        Self {
            window,
            seed: DEFAULT_SEED,
        }
    }

    /// Override the K/D starting value.
    pub fn with_seed(mut self, seed: f64) -> Self {
        self.seed = seed;
        self
    }

    /// RSV lookback window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Raw stochastic value per bar.
    pub fn rsv(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
        let len = high.len().min(low.len()).min(close.len());
        let highest = rolling_max(&high[..len], self.window);
        let lowest = rolling_min(&low[..len], self.window);

        close[..len]
            .iter()
            .zip(highest.iter().zip(lowest.iter()))
            .map(|(&close, (&high_max, &low_min))| {
                let (high_max, low_min) = (high_max?, low_min?);
                let range = high_max - low_min;
                (range != 0.0).then(|| (close - low_min) * 100.0 / range)
            })
            .collect()
    }

    /// Calculate KDJ from OHLC columns in chronological order.
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<KdjOutput> {
        let seed = self.seed;

        self.rsv(high, low, close)
            .into_iter()
            .scan(KdjState::Unseeded, |state, rsv| {
                let kd = match (*state, rsv) {
                    (KdjState::Unseeded, None) => None,
                    (KdjState::Unseeded, Some(_)) => Some((seed, seed)),
                    (KdjState::Running { k, d }, Some(rsv)) => {
                        let k = k * 2.0 / 3.0 + rsv / 3.0;
                        let d = d * 2.0 / 3.0 + k / 3.0;
                        Some((k, d))
                    }
                    (KdjState::Running { .. }, None) | (KdjState::Broken, _) => {
                        *state = KdjState::Broken;
                        None
                    }
                };

                if let Some((k, d)) = kd {
                    *state = KdjState::Running { k, d };
                }

                Some(KdjOutput {
                    rsv,
                    k: kd.map(|(k, _)| k),
                    d: kd.map(|(_, d)| d),
                    j: kd.map(|(k, d)| k * 3.0 - d * 2.0),
                })
            })
            .collect()
    }
}

impl Default for Kdj {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesIndicator for Kdj {
    type Output = KdjOutput;

    fn calculate_series(&self, series: &Series) -> Vec<KdjOutput> {
        self.calculate_ohlc(&series.highs(), &series.lows(), &series.closes())
    }

    fn warmup_period(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        "KDJ"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_shorter_than_window_is_undefined() {
        let kdj = Kdj::new();
        let high = vec![11.0; 8];
        let low = vec![9.0; 8];
        let close = vec![10.0; 8];

        let result = kdj.calculate_ohlc(&high, &low, &close);
        assert_eq!(result.len(), 8);
        assert!(result.iter().all(|o| *o == KdjOutput::default()));
    }

    #[test]
    fn test_seed_and_first_step() {
        let kdj = Kdj::with_window(3);
        let high = [10.0, 12.0, 14.0, 16.0];
        let low = [8.0, 9.0, 10.0, 11.0];
        let close = [9.0, 11.0, 13.0, 12.0];

        let result = kdj.calculate_ohlc(&high, &low, &close);

        assert_eq!(result[0], KdjOutput::default());
        assert_eq!(result[1], KdjOutput::default());

        // index 2: high_max 14, low_min 8 -> RSV = 5 * 100 / 6, seeded at 50
        assert!(approx(result[2].rsv, 500.0 / 6.0));
        assert_eq!(result[2].k, Some(50.0));
        assert_eq!(result[2].d, Some(50.0));
        assert_eq!(result[2].j, Some(50.0));

        // index 3: high_max 16, low_min 9 -> RSV = 3 * 100 / 7
        let rsv = 300.0 / 7.0;
        let k = 50.0 * 2.0 / 3.0 + rsv / 3.0;
        let d = 50.0 * 2.0 / 3.0 + k / 3.0;
        assert!(approx(result[3].rsv, rsv));
        assert!(approx(result[3].k, k));
        assert!(approx(result[3].d, d));
        assert!(approx(result[3].j, 3.0 * k - 2.0 * d));
    }

    #[test]
    fn test_flat_window_is_undefined_without_panicking() {
        let kdj = Kdj::with_window(3);
        let flat = vec![10.0; 6];

        let result = kdj.calculate_ohlc(&flat, &flat, &flat);
        assert!(result.iter().all(|o| o.rsv.is_none() && o.k.is_none()));
    }

    #[test]
    fn test_seed_waits_for_first_defined_rsv() {
        let kdj = Kdj::with_window(2);
        let high = [10.0, 10.0, 10.0, 12.0];
        let low = [10.0, 10.0, 10.0, 9.0];
        let close = [10.0, 10.0, 10.0, 11.0];

        let result = kdj.calculate_ohlc(&high, &low, &close);
        assert!(result[..3].iter().all(|o| o.k.is_none()));
        assert_eq!(result[3].k, Some(50.0));
    }

    #[test]
    fn test_flat_window_after_seed_stays_undefined() {
        let kdj = Kdj::with_window(2);
        let high = [12.0, 12.0, 12.0, 10.0, 10.0, 15.0];
        let low = [8.0, 9.0, 10.0, 10.0, 10.0, 5.0];
        let close = [10.0, 11.0, 11.0, 10.0, 10.0, 12.0];

        let result = kdj.calculate_ohlc(&high, &low, &close);
        assert_eq!(result[1].k, Some(50.0));
        assert!(result[2].k.is_some());
        assert!(result[3].k.is_some());
        // index 4: window [10, 10] is flat
        assert!(result[4].rsv.is_none());
        assert!(result[4].k.is_none());
        // RSV is defined again but the recurrence has no predecessor
        assert!(result[5].rsv.is_some());
        assert!(result[5].k.is_none() && result[5].d.is_none() && result[5].j.is_none());
    }

    #[test]
    fn test_constant_range_converges_to_fifty() {
        let kdj = Kdj::new();
        let high = vec![101.0; 99];
        let low = vec![99.0; 99];
        let close = vec![100.0; 99];

        let result = kdj.calculate_ohlc(&high, &low, &close);
        for output in &result[8..] {
            assert!(approx(output.rsv, 50.0));
            assert!(approx(output.k, 50.0));
            assert!(approx(output.d, 50.0));
            assert!(approx(output.j, 50.0));
        }
    }

    #[test]
    fn test_uptrend_raises_k_and_d() {
        let kdj = Kdj::new();
        let close: Vec<f64> = (0..99).map(|i| 100.0 + i as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();

        let result = kdj.calculate_ohlc(&high, &low, &close);
        let defined = &result[8..];

        // Close sits 9 points above a 10 point range floor: RSV = 90
        assert!(defined.iter().all(|o| approx(o.rsv, 90.0)));
        for pair in defined.windows(2) {
            assert!(pair[1].k.unwrap() >= pair[0].k.unwrap());
            assert!(pair[1].d.unwrap() >= pair[0].d.unwrap());
        }
        // K leads D on the way up and J overshoots K
        let early = &result[20];
        assert!(early.k.unwrap() > early.d.unwrap());
        assert!(early.j.unwrap() > early.k.unwrap());
    }

    #[test]
    fn test_custom_seed() {
        let kdj = Kdj::with_window(1).with_seed(20.0);
        let result = kdj.calculate_ohlc(&[2.0], &[0.0], &[1.0]);

        assert_eq!(result[0].k, Some(20.0));
        assert_eq!(kdj.window(), 1);
        assert_eq!(kdj.warmup_period(), 1);
    }
}
