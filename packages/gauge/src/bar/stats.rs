use std::time::{Duration, Instant};

use crate::bar::State;

/// Point-in-time view of a bar, passed to decorators and returned by
/// [`Bar::statistics`](crate::Bar::statistics).
///
/// A new snapshot is made for every query and render, it is never updated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub id: usize,
    pub completed: bool,
    pub aborted: bool,
    pub total: i64,
    pub current: i64,
    /// Time of the first increment
    pub start_time: Option<Instant>,
    /// Time between the first and the latest increment
    pub time_elapsed: Duration,
    /// Moving average of the time spent on one item
    pub time_per_item: Duration,
}

impl Statistics {
    /// Estimated time remaining, `(total - current) * time_per_item`.
    ///
    /// Zero when nothing remains or the total is unknown.
    pub fn eta(&self) -> Duration {
        let remaining = self.total.saturating_sub(self.current);
        if remaining <= 0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.time_per_item.as_secs_f64() * remaining as f64)
            .unwrap_or(Duration::MAX)
    }
}

impl From<&State> for Statistics {
    fn from(s: &State) -> Self {
        Self {
            id: s.id,
            completed: s.completed,
            aborted: s.aborted,
            total: s.total,
            current: s.current,
            start_time: s.start_time,
            time_elapsed: s.time_elapsed,
            time_per_item: s.eta.time_per_item(),
        }
    }
}
