//! Moving average indicators.

use screener_core::traits::Indicator;

/// Exponential Moving Average (EMA).
///
/// Smoothing factor is `2 / (span + 1)`. The first value is the simple
/// average of the first `span` inputs and appears on the `span`-th input;
/// after that `ema = prev + alpha * (value - prev)`.
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    alpha: f64,
}

#[derive(Debug, Clone, Copy)]
enum EmaState {
    Warming { count: usize, sum: f64 },
    Ready(f64),
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        let alpha = 2.0 / (span as f64 + 1.0);
        Self { span, alpha }
    }

    /// Smoothing factor.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Smooth a column that may contain undefined points.
    ///
    /// Undefined inputs produce undefined outputs and do not advance the
    /// average, so a column with a leading warm-up gap (such as DIF) is
    /// seeded from its first `span` defined values.
    pub fn smooth(&self, data: &[Option<f64>]) -> Vec<Option<f64>> {
        let span = self.span;
        let alpha = self.alpha;

        data.iter()
            .scan(EmaState::Warming { count: 0, sum: 0.0 }, |state, &value| {
                let Some(value) = value else {
                    return Some(None);
                };

                let out = match *state {
                    EmaState::Warming { count, sum } => {
                        let (count, sum) = (count + 1, sum + value);
                        if count == span {
                            let seed = sum / span as f64;
                            *state = EmaState::Ready(seed);
                            Some(seed)
                        } else {
                            *state = EmaState::Warming { count, sum };
                            None
                        }
                    }
                    EmaState::Ready(prev) => {
                        let ema = prev + alpha * (value - prev);
                        *state = EmaState::Ready(ema);
                        Some(ema)
                    }
                };
                Some(out)
            })
            .collect()
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let column: Vec<Option<f64>> = data.iter().copied().map(Some).collect();
        self.smooth(&column)
    }

    fn period(&self) -> usize {
        self.span
    }

    fn name(&self) -> &str {
        "EMA"
    }
}
