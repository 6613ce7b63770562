//! Wheel events and gesture ownership
//!
//! A wheel gesture that started over some other part of the page keeps
//! delivering events for a while after the pointer crosses into a
//! scroller. [`WheelArbiter`] remembers when the last wheel event nobody
//! intercepted happened so a scroller can leave such continuing gestures
//! alone.

use std::cell::Cell;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A wheel event is treated as part of a foreign gesture when it arrives
/// within this window after the last unhandled wheel event.
pub const FOREIGN_GESTURE_WINDOW: Duration = Duration::from_millis(300);

/// Unit of a wheel event's deltas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Wheel-like input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Unique per event; used to recognise an event already handled
    pub id: u64,
    pub delta_x: f64,
    pub delta_y: f64,
    #[serde(default)]
    pub mode: DeltaMode,
}

impl WheelEvent {
    pub fn pixels(id: u64, delta_x: f64, delta_y: f64) -> Self {
        Self {
            id,
            delta_x,
            delta_y,
            mode: DeltaMode::Pixel,
        }
    }

    pub fn lines(id: u64, delta_x: f64, delta_y: f64) -> Self {
        Self {
            id,
            delta_x,
            delta_y,
            mode: DeltaMode::Line,
        }
    }
}

/// What a scroller did with a wheel event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    /// The scroller consumed it; the host must suppress native handling
    Intercepted,
    /// Left to native handling
    Ignored,
}

impl WheelOutcome {
    #[inline]
    pub fn is_intercepted(self) -> bool {
        self == WheelOutcome::Intercepted
    }
}

#[derive(Debug, Default)]
pub struct WheelArbiter {
    last_foreign: Cell<Option<Duration>>,
    handled: Cell<Option<u64>>,
}

impl WheelArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Global listener, called by the host for every wheel event after the
    /// scrollers under the pointer had their turn.
    pub fn observe(&self, event: &WheelEvent, now: Duration) {
        if self.handled.get() == Some(event.id) {
            return;
        }
        self.last_foreign.set(Some(now));
    }

    /// Whether a gesture not owned by any scroller is still going on
    pub fn foreign_gesture_active(&self, now: Duration) -> bool {
        match self.last_foreign.get() {
            Some(last) => now.saturating_sub(last) < FOREIGN_GESTURE_WINDOW,
            None => false,
        }
    }

    /// Exclude `event` from the foreign timestamp
    pub fn mark_handled(&self, event: &WheelEvent) {
        self.handled.set(Some(event.id));
    }

    pub fn last_foreign(&self) -> Option<Duration> {
        self.last_foreign.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_no_foreign_gesture_initially() {
        let arbiter = WheelArbiter::new();
        assert!(!arbiter.foreign_gesture_active(ms(0)));
    }

    #[test]
    fn test_foreign_window() {
        let arbiter = WheelArbiter::new();
        arbiter.observe(&WheelEvent::pixels(1, 0.0, 10.0), ms(1000));

        assert!(arbiter.foreign_gesture_active(ms(1000)));
        assert!(arbiter.foreign_gesture_active(ms(1299)));
        assert!(!arbiter.foreign_gesture_active(ms(1300)));
        assert!(!arbiter.foreign_gesture_active(ms(2000)));
    }

    #[test]
    fn test_handled_event_is_not_foreign() {
        let arbiter = WheelArbiter::new();
        let event = WheelEvent::pixels(7, 0.0, 10.0);
        arbiter.mark_handled(&event);
        arbiter.observe(&event, ms(500));
        assert_eq!(arbiter.last_foreign(), None);

        // a different event still counts
        arbiter.observe(&WheelEvent::pixels(8, 0.0, 10.0), ms(600));
        assert_eq!(arbiter.last_foreign(), Some(ms(600)));
    }
}
