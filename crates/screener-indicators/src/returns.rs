//! Day-over-day returns.

/// Percentage change of each close against the previous one.
///
/// The first point has no predecessor and a zero previous close has no
/// defined change; both come back as `None`.
pub fn percent_returns(closes: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(closes.windows(2).map(|w| {
            let (prev, curr) = (w[0], w[1]);
            (prev != 0.0).then(|| (curr - prev) / prev * 100.0)
        }))
        .take(closes.len())
        .collect()
}
