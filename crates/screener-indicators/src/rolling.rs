//! Rolling window extrema using monotonic deques.

use std::collections::VecDeque;

/// Trailing maximum over `window` points, defined from index `window - 1`.
pub(crate) fn rolling_max(data: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_extreme(data, window, |kept, incoming| kept > incoming)
}

/// Trailing minimum over `window` points, defined from index `window - 1`.
pub(crate) fn rolling_min(data: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_extreme(data, window, |kept, incoming| kept < incoming)
}

// The deque holds indices whose values are strictly ordered by `dominates`,
// so the front is always the extreme of the current window.
fn rolling_extreme(
    data: &[f64],
    window: usize,
    dominates: impl Fn(f64, f64) -> bool,
) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; data.len()];
    }

    let mut deque: VecDeque<usize> = VecDeque::with_capacity(window);

    data.iter()
        .enumerate()
        .map(|(i, &value)| {
            while deque.back().is_some_and(|&j| !dominates(data[j], value)) {
                deque.pop_back();
            }
            deque.push_back(i);
            if deque.front().is_some_and(|&j| j + window <= i) {
                deque.pop_front();
            }
            (i + 1 >= window).then(|| data[deque[0]])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(data: &[f64], window: usize, max: bool) -> Vec<Option<f64>> {
        (0..data.len())
            .map(|i| {
                (i + 1 >= window).then(|| {
                    let slice = &data[i + 1 - window..=i];
                    if max {
                        slice.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
                    } else {
                        slice.iter().cloned().fold(f64::INFINITY, f64::min)
                    }
                })
            })
            .collect()
    }

    #[test]
    fn test_matches_naive_scan() {
        let data: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + (i % 4) as f64)
            .collect();

        for window in [1, 2, 3, 9, 20] {
            assert_eq!(rolling_max(&data, window), naive(&data, window, true));
            assert_eq!(rolling_min(&data, window), naive(&data, window, false));
        }
    }

    #[test]
    fn test_known_values() {
        let data = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];

        assert_eq!(
            rolling_max(&data, 3),
            vec![None, None, Some(4.0), Some(4.0), Some(5.0), Some(9.0), Some(9.0), Some(9.0)]
        );
        assert_eq!(
            rolling_min(&data, 3),
            vec![None, None, Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(2.0), Some(2.0)]
        );
    }

    #[test]
    fn test_window_longer_than_data() {
        assert_eq!(rolling_max(&[1.0, 2.0], 5), vec![None, None]);
        assert_eq!(rolling_min(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn test_plateaus() {
        let data = [2.0, 2.0, 2.0, 2.0];
        assert_eq!(rolling_max(&data, 2), vec![None, Some(2.0), Some(2.0), Some(2.0)]);
    }
}
