//! Interval timing statistics for profiling repeated operations.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static TIMING_ENABLED: AtomicBool = AtomicBool::new(true);

/// Accumulates min/max/mean/total microseconds over repeated
/// `start()`/`stop()` intervals.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    name: String,
    started: Option<Instant>,
    last_us: u64,
    total_us: u64,
    count: u64,
    min_us: u64,
    max_us: u64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::named("")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: None,
            last_us: 0,
            total_us: 0,
            count: 0,
            min_us: u64::MAX,
            max_us: 0,
        }
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the current interval and fold it into the statistics.
    /// Returns the interval length in microseconds.
    pub fn stop(&mut self) -> u64 {
        let Some(started) = self.started.take() else {
            tracing::warn!(name = %self.name, "stopwatch stopped without a matching start");
            return 0;
        };
        let us = started.elapsed().as_micros() as u64;
        self.last_us = us;
        self.total_us += us;
        self.count += 1;
        self.min_us = self.min_us.min(us);
        self.max_us = self.max_us.max(us);
        us
    }

    pub fn reset(&mut self) {
        let name = std::mem::take(&mut self.name);
        *self = Self::named(name);
    }

    /// Length of the most recent interval, in microseconds.
    pub fn last(&self) -> u64 {
        self.last_us
    }

    pub fn total(&self) -> u64 {
        self.total_us
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.min_us
        }
    }

    pub fn max(&self) -> u64 {
        self.max_us
    }

    pub fn average(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.total_us / self.count
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn report(&self) -> String {
        if !Self::enabled() {
            return "timing disabled".to_string();
        }
        format!(
            "[time(us) total:{} avg:{} min:{} max:{} count:{} {}]",
            self.total(),
            self.average(),
            self.min(),
            self.max(),
            self.count(),
            self.name
        )
    }

    /// Process-wide switch; `report()` collapses to a stub once disabled.
    pub fn disable() {
        TIMING_ENABLED.store(false, Ordering::Relaxed);
    }

    pub fn enable() {
        TIMING_ENABLED.store(true, Ordering::Relaxed);
    }

    pub fn enabled() -> bool {
        TIMING_ENABLED.load(Ordering::Relaxed)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Stopwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_accumulates_intervals() {
        let mut sw = Stopwatch::named("warp");
        for _ in 0..3 {
            sw.start();
            std::thread::sleep(Duration::from_millis(2));
            sw.stop();
        }
        assert_eq!(sw.count(), 3);
        assert!(sw.min() >= 1_000, "min = {}", sw.min());
        assert!(sw.max() >= sw.min());
        assert!(sw.total() >= 3 * sw.min());
        assert!(sw.average() >= sw.min() && sw.average() <= sw.max());
    }

    #[test]
    fn test_stop_without_start_is_zero() {
        let mut sw = Stopwatch::new();
        assert_eq!(sw.stop(), 0);
        assert_eq!(sw.count(), 0);
    }

    #[test]
    fn test_empty_stats() {
        let sw = Stopwatch::named("idle");
        assert_eq!(sw.min(), 0);
        assert_eq!(sw.max(), 0);
        assert_eq!(sw.average(), 0);
    }

    #[test]
    fn test_reset_keeps_name() {
        let mut sw = Stopwatch::named("crop");
        sw.start();
        sw.stop();
        sw.reset();
        assert_eq!(sw.count(), 0);
        assert_eq!(sw.name(), "crop");
    }

    #[test]
    fn test_report_contains_name() {
        let sw = Stopwatch::named("resize");
        assert!(sw.report().contains("resize"));
    }
}
