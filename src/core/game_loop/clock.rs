//=========================================================================
// Frame Clock
//=========================================================================
//
// Time sources and the loop's frame timer.
//
// The timer clamps long stalls (debugger, suspend, slow frame) to a
// maximum step so collisions and animations never jump, and reports
// sub-threshold gaps as "skip this frame" so the time carries over into
// the next one.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

//=== Clock ===============================================================

/// Monotonic time source read by the loop thread.
pub trait Clock: Send {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

//=== MonotonicClock ======================================================

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

//=== ManualClock =========================================================

/// Clock that only moves when told to. Clones share the same time.
///
/// # Examples
///
/// ```
/// use spritestep::core::game_loop::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let remote = clock.clone();
/// remote.advance(Duration::from_millis(16));
/// assert_eq!(clock.now(), Duration::from_millis(16));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(saturating_nanos(by), Ordering::SeqCst);
    }

    pub fn set(&self, to: Duration) {
        self.nanos.store(saturating_nanos(to), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

//=== FrameTimer ==========================================================

/// Longest step a single frame may simulate.
pub const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(50);

/// Gaps shorter than this skip the frame.
pub const DEFAULT_MIN_FRAME_DELTA: Duration = Duration::from_millis(1);

pub(crate) struct FrameTimer {
    clock: Box<dyn Clock>,
    last: Duration,
    max_delta: Duration,
    min_delta: Duration,
}

impl FrameTimer {
    pub(crate) fn new(clock: Box<dyn Clock>, min_delta: Duration, max_delta: Duration) -> Self {
        debug_assert!(min_delta <= max_delta);
        let last = clock.now();
        Self {
            clock,
            last,
            max_delta,
            min_delta,
        }
    }

    /// Elapsed seconds since the previous accepted tick, clamped to the
    /// maximum step, or `None` when too little time has passed.
    ///
    /// A skipped tick keeps the old baseline so no time is lost.
    pub(crate) fn tick(&mut self) -> Option<f32> {
        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.last);
        if elapsed < self.min_delta {
            return None;
        }
        self.last = now;
        Some(elapsed.min(self.max_delta).as_secs_f32())
    }

    /// Restarts timing from the current instant.
    pub(crate) fn rebase(&mut self) {
        self.last = self.clock.now();
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(clock: &ManualClock) -> FrameTimer {
        FrameTimer::new(
            Box::new(clock.clone()),
            DEFAULT_MIN_FRAME_DELTA,
            DEFAULT_MAX_FRAME_DELTA,
        )
    }

    #[test]
    fn regular_frame_reports_elapsed() {
        let clock = ManualClock::new();
        let mut timer = timer(&clock);

        clock.advance(Duration::from_millis(16));
        let delta = timer.tick().expect("16 ms is a full frame");
        assert!((delta - 0.016).abs() < 1e-6);
    }

    #[test]
    fn long_gap_is_clamped() {
        let clock = ManualClock::new();
        let mut timer = timer(&clock);

        clock.advance(Duration::from_millis(200));
        let delta = timer.tick().expect("gap produces a frame");
        assert!((delta - 0.050).abs() < 1e-6, "got {}", delta);
    }

    #[test]
    fn short_gap_skips_and_carries_over() {
        let clock = ManualClock::new();
        let mut timer = timer(&clock);

        clock.advance(Duration::from_micros(600));
        assert_eq!(timer.tick(), None);

        clock.advance(Duration::from_micros(600));
        let delta = timer.tick().expect("accumulated 1.2 ms");
        assert!((delta - 0.0012).abs() < 1e-6);
    }

    #[test]
    fn rebase_discards_elapsed_time() {
        let clock = ManualClock::new();
        let mut timer = timer(&clock);

        clock.advance(Duration::from_secs(3));
        timer.rebase();
        clock.advance(Duration::from_millis(10));

        let delta = timer.tick().expect("10 ms since rebase");
        assert!((delta - 0.010).abs() < 1e-6);
    }

    #[test]
    fn monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        std::thread::sleep(Duration::from_millis(2));
        assert!(clock.now() > first);
    }
}
