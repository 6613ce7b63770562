use std::rc::Rc;
use std::time::Duration;

use crate::frame_clock::FrameClock;
use crate::wheel::{WheelArbiter, WheelEvent};

/// State shared by every scroller of one host
///
/// Create one per host (typically at startup) and hand a clone of the `Rc`
/// to each [`SmoothScroller`](crate::SmoothScroller).
#[derive(Debug, Default)]
pub struct ScrollContext {
    frame_clock: FrameClock,
    wheel: WheelArbiter,
}

impl ScrollContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    pub fn frame_clock(&self) -> &FrameClock {
        &self.frame_clock
    }

    pub fn wheel(&self) -> &WheelArbiter {
        &self.wheel
    }

    /// Host hook: a frame was serviced at `now`
    pub fn on_host_frame(&self, now: Duration) {
        self.frame_clock.sample(now);
    }

    /// Host hook: a wheel event finished dispatching at `now`
    pub fn on_host_wheel(&self, event: &WheelEvent, now: Duration) {
        self.wheel.observe(event, now);
    }
}
