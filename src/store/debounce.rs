use crate::model::Connection;
use std::time::{Duration, Instant};

/// Window inside which a repeated request for the same edge is treated as a double-fire.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Remembers the most recent connection request of one store.
#[derive(Debug, Clone)]
pub struct ConnectionDebounce {
    window: Duration,
    last: Option<(Connection, Instant)>,
}

impl Default for ConnectionDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}

impl ConnectionDebounce {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` when `request` repeats the previous request within the window.
    ///
    /// A repeat does not move the window forward, so a burst of duplicates is
    /// measured from the first request of the burst.
    pub fn is_repeat(&mut self, request: &Connection, now: Instant) -> bool {
        if let Some((previous, at)) = &self.last {
            if previous == request && now.saturating_duration_since(*at) < self.window {
                return true;
            }
        }
        self.last = Some((request.clone(), now));
        false
    }
}
