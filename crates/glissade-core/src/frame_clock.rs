//! Minimal frame interval estimate
//!
//! Some platforms deliberately coarsen their time source (rounding to
//! ~100ms), which makes "time since the animation started" useless on the
//! very first frame. The host feeds the timestamps of the first frames it
//! services and the clock keeps the smallest positive gap it saw, seeded at
//! the standard 60Hz frame time. After [`CALIBRATION_FRAMES`] samples the
//! value is frozen.

use std::cell::Cell;
use std::time::Duration;

/// Normalization constant for friction, in milliseconds
pub const STANDARD_FRAME_MS: f64 = 1000.0 / 60.0;

/// Number of frames sampled before the estimate freezes
pub const CALIBRATION_FRAMES: u32 = 100;

#[derive(Debug)]
pub struct FrameClock {
    min_interval_ms: Cell<f64>,
    last_sample: Cell<Option<Duration>>,
    samples_left: Cell<u32>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            min_interval_ms: Cell::new(STANDARD_FRAME_MS),
            last_sample: Cell::new(None),
            samples_left: Cell::new(CALIBRATION_FRAMES),
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the timestamp of a serviced frame
    ///
    /// No-op once calibration is over.
    pub fn sample(&self, now: Duration) {
        let left = self.samples_left.get();
        if left == 0 {
            return;
        }
        self.samples_left.set(left - 1);

        if let Some(last) = self.last_sample.get() {
            if let Some(gap) = now.checked_sub(last) {
                let gap_ms = gap.as_secs_f64() * 1000.0;
                // identical timestamps from a coarse clock say nothing
                if gap_ms > 0.0 && gap_ms < self.min_interval_ms.get() {
                    self.min_interval_ms.set(gap_ms);
                }
            }
        }
        self.last_sample.set(Some(now));

        if left == 1 {
            tracing::debug!(
                "Frame clock calibrated: {:.3}ms minimal interval",
                self.min_interval_ms.get()
            );
        }
    }

    /// Fallback elapsed time for the first frame of an animation, in ms
    #[inline]
    pub fn fallback_interval_ms(&self) -> f64 {
        self.min_interval_ms.get()
    }

    pub fn is_calibrated(&self) -> bool {
        self.samples_left.get() == 0
    }
}
