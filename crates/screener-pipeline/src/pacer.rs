//! Fixed-window call pacing for rate-limited providers.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct WindowState {
    started: Option<Instant>,
    calls: usize,
}

/// Allows at most `calls_per_window` calls in any window of `window`.
///
/// A call that would exceed the budget waits until the current window has
/// elapsed and then opens a new one. Callers are served in lock order, so
/// the pacer can be shared between concurrent pipelines.
#[derive(Debug)]
pub struct Pacer {
    calls_per_window: usize,
    window: Duration,
    state: Mutex<WindowState>,
}

impl Pacer {
    /// Create a pacer. A budget of zero calls disables pacing.
    pub fn new(calls_per_window: usize, window: Duration) -> Self {
        Self {
            calls_per_window,
            window,
            state: Mutex::new(WindowState::default()),
        }
    }

    /// A pacer that never waits.
    pub fn unlimited() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Calls allowed per window (0 = unlimited).
    pub fn calls_per_window(&self) -> usize {
        self.calls_per_window
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait until one more call fits in the budget, then claim it.
    pub async fn acquire(&self) {
        if self.calls_per_window == 0 {
            return;
        }

        let mut state = self.state.lock().await;
        let now = Instant::now();

        match state.started {
            Some(started) if now.duration_since(started) < self.window => {
                if state.calls >= self.calls_per_window {
                    let resume = started + self.window;
                    info!(
                        calls = state.calls,
                        wait_ms = resume.duration_since(now).as_millis() as u64,
                        "provider call budget spent, waiting for next window"
                    );
                    sleep_until(resume).await;
                    state.started = Some(Instant::now());
                    state.calls = 0;
                }
            }
            _ => {
                state.started = Some(now);
                state.calls = 0;
            }
        }

        state.calls += 1;
        debug!(calls = state.calls, budget = self.calls_per_window, "provider call admitted");
    }
}

impl Default for Pacer {
    /// Five calls per minute, the free Alpha Vantage tier.
    fn default() -> Self {
        Self::new(5, Duration::from_secs(60))
    }
}
