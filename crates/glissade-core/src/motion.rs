//! Motion state and the per-frame physics step
//!
//! Two independent motions can be active at once and their displacements
//! add up:
//!
//! - *scrolling*: an impulse whose remaining distance decays exponentially
//!   toward zero (scroll_to / scroll_by)
//! - *gliding*: a constant velocity in pixels per second (glide)

use crate::frame_clock::STANDARD_FRAME_MS;
use crate::geometry::{clamp_axis, Position, ScrollLength, Vector};

/// An axis stops decaying once a frame would move it less than this
pub const SETTLE_EPSILON: f64 = 0.2;

/// A settling axis with less than this left covers it in its last step
pub const SNAP_DISTANCE: f64 = 1.0;

/// Decaying impulse motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrolling {
    /// Distance still to travel, in pixels
    pub velocity: Vector,
    /// Friction override for this motion only
    pub friction: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionState {
    scrolling: Option<Scrolling>,
    gliding: Option<Vector>,
}

/// Result of advancing the motion by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub position: Position,
    /// Whether any motion is left after this frame
    pub active: bool,
}

impl MotionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scrolling(&self) -> Option<&Scrolling> {
        self.scrolling.as_ref()
    }

    pub fn gliding(&self) -> Option<Vector> {
        self.gliding
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.scrolling.is_some() || self.gliding.is_some()
    }

    /// Distance the scrolling motion will still cover
    pub fn pending_scroll(&self) -> Vector {
        self.scrolling.map(|s| s.velocity).unwrap_or(Vector::ZERO)
    }

    /// Add `delta` onto the scrolling velocity
    ///
    /// A given friction replaces the friction of the current motion. A new
    /// motion without one falls back to the scroller's friction.
    pub fn push_scroll(&mut self, delta: Vector, friction: Option<f64>) {
        let scrolling = self.scrolling.get_or_insert(Scrolling {
            velocity: Vector::ZERO,
            friction: None,
        });
        scrolling.velocity.x = finite_sum(scrolling.velocity.x, delta.x);
        scrolling.velocity.y = finite_sum(scrolling.velocity.y, delta.y);
        if friction.is_some() {
            scrolling.friction = friction;
        }
    }

    /// Replace the gliding velocity on the supplied axes
    ///
    /// `Some(0.0)` stops that axis, `None` leaves it as it is.
    pub fn set_glide(&mut self, left: Option<f64>, top: Option<f64>) {
        let mut glide = self.gliding.unwrap_or(Vector::ZERO);
        if let Some(x) = left {
            glide.x = x;
        }
        if let Some(y) = top {
            glide.y = y;
        }
        self.gliding = if glide.is_zero() { None } else { Some(glide) };
    }

    pub fn clear(&mut self) {
        self.scrolling = None;
        self.gliding = None;
    }

    /// Advance both motions by `elapsed_ms` starting from `from`
    ///
    /// `default_friction` applies when the scrolling motion carries no
    /// override. The returned position is clamped into `length`.
    pub fn advance(
        &mut self,
        from: Position,
        length: ScrollLength,
        elapsed_ms: f64,
        default_friction: f64,
    ) -> Step {
        let mut delta = Vector::ZERO;

        if let Some(scrolling) = self.scrolling {
            let friction = scrolling.friction.unwrap_or(default_friction);
            let adjusted = (friction * elapsed_ms / STANDARD_FRAME_MS).clamp(0.0, 1.0);

            let (dx, vx) = decay_axis(scrolling.velocity.x, from.left, length.width, adjusted);
            let (dy, vy) = decay_axis(scrolling.velocity.y, from.top, length.height, adjusted);
            delta.x += dx;
            delta.y += dy;

            let velocity = Vector::new(vx, vy);
            self.scrolling = if velocity.is_zero() {
                tracing::trace!("Scrolling motion settled");
                None
            } else {
                Some(Scrolling {
                    velocity,
                    ..scrolling
                })
            };
        }

        if let Some(glide) = self.gliding {
            let seconds = elapsed_ms / 1000.0;
            delta.x += glide.x * seconds;
            delta.y += glide.y * seconds;
        }

        Step {
            position: Position::new(
                clamp_axis(from.left + delta.x, length.width),
                clamp_axis(from.top + delta.y, length.height),
            ),
            active: self.is_active(),
        }
    }
}

/// One axis of the scrolling decay: returns `(delta, next_velocity)`
fn decay_axis(velocity: f64, position: f64, length: f64, adjusted: f64) -> (f64, f64) {
    if velocity == 0.0 || velocity.is_nan() {
        return (0.0, 0.0);
    }
    // no time passed, or friction 0: hold the velocity
    if adjusted == 0.0 {
        return (0.0, velocity);
    }

    let delta = velocity * adjusted;
    let target = position + delta;
    if target < 0.0 || target > length {
        // hitting the edge ends the motion instead of bouncing against it
        return (delta, 0.0);
    }
    if delta.abs() < SETTLE_EPSILON {
        // a sub-pixel remainder is covered so the motion lands where it
        // was aimed; a larger one is dropped rather than jumped over
        if velocity.abs() < SNAP_DISTANCE {
            return (velocity, 0.0);
        }
        return (delta, 0.0);
    }
    (delta, velocity - delta)
}

/// `a + b` saturated to the finite range, NaN as zero
fn finite_sum(a: f64, b: f64) -> f64 {
    let sum = (a + b).clamp(-f64::MAX, f64::MAX);
    if sum.is_nan() {
        0.0
    } else {
        sum
    }
}
