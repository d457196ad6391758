use std::time::{Duration, Instant};

/// Default smoothing factor of the estimater
pub const DEFAULT_ETA_ALPHA: f64 = 0.25;

/// Estimate the time per item with an exponential-weighted moving average.
///
/// Every increment closes a "block" of work that started at the previous
/// increment (or at the first one). The per-item time of that block is blended
/// into the running estimate:
///
/// ```text
/// time_per_item = alpha * (block_time / amount) + (1 - alpha) * time_per_item
/// ```
///
/// The estimate is zero before any increment, and a long idle gap before an
/// increment skews it upward until later blocks smooth it out.
#[derive(Debug, Clone)]
pub struct Estimater {
    /// Smoothing factor, in `(0, 1]`
    alpha: f64,
    /// Start of the current block, `None` before the first increment
    block_start: Option<Instant>,
    /// Current estimate
    time_per_item: Duration,
}

impl Default for Estimater {
    fn default() -> Self {
        Self::new(DEFAULT_ETA_ALPHA)
    }
}

impl Estimater {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            block_start: None,
            time_per_item: Duration::ZERO,
        }
    }

    /// Mark the start of a new block of work
    #[inline(always)]
    pub fn start_block(&mut self, now: Instant) {
        self.block_start = Some(now);
    }

    /// Blend the block ending at `now`, which processed `amount` items
    pub fn update(&mut self, now: Instant, amount: i64) {
        if amount < 1 {
            return;
        }
        let block_time = match self.block_start {
            Some(start) => now.saturating_duration_since(start),
            None => Duration::ZERO,
        };
        let last_item_estimate = block_time.as_secs_f64() / amount as f64;
        let estimate = self.alpha * last_item_estimate
            + (1.0 - self.alpha) * self.time_per_item.as_secs_f64();
        self.time_per_item = Duration::try_from_secs_f64(estimate).unwrap_or(Duration::MAX);
    }

    #[inline(always)]
    pub fn time_per_item(&self) -> Duration {
        self.time_per_item
    }

    #[inline(always)]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let eta = Estimater::default();
        assert_eq!(eta.time_per_item(), Duration::ZERO);
        assert_eq!(eta.alpha(), DEFAULT_ETA_ALPHA);
    }

    #[test]
    fn test_ewma() {
        let start = Instant::now();
        let mut eta = Estimater::new(0.5);
        eta.start_block(start);
        // 4 items in 400ms -> 100ms/item, blended with 0
        eta.update(start + Duration::from_millis(400), 4);
        assert_millis(&eta, 50.0);
        eta.start_block(start + Duration::from_millis(400));
        // 1 item in 250ms -> 0.5 * 250 + 0.5 * 50
        eta.update(start + Duration::from_millis(650), 1);
        assert_millis(&eta, 150.0);
    }

    fn assert_millis(eta: &Estimater, expected: f64) {
        let actual = eta.time_per_item().as_secs_f64() * 1000.0;
        assert!((actual - expected).abs() < 1e-3, "{actual} != {expected}");
    }

    #[test]
    fn test_ignores_empty_batch() {
        let start = Instant::now();
        let mut eta = Estimater::default();
        eta.start_block(start);
        eta.update(start + Duration::from_secs(1), 0);
        assert_eq!(eta.time_per_item(), Duration::ZERO);
    }
}
