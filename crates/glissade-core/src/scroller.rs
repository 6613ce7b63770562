//! The smooth scroller
//!
//! `SmoothScroller` owns one surface and animates it. Public operations
//! only mutate the [`MotionState`] and make sure a frame is requested; the
//! host later delivers that frame through [`SmoothScroller::on_frame`],
//! which advances the motion, writes the clamped position and requests
//! the next frame while anything is still moving.
//!
//! Requests compose with the motion already in flight: calling
//! `scroll_to` twice in a row ends at the second target, not somewhere in
//! between, because the second call only adds the difference between its
//! target and where the first motion would have ended.

use std::rc::Rc;
use std::time::Duration;

use crate::config::{clamp_friction, ScrollOptions};
use crate::context::ScrollContext;
use crate::geometry::{clamp_axis, Position, ScrollLength, Vector};
use crate::host::{Capabilities, EventKind, FrameToken, ScrollSurface, SubscriptionHandle};
use crate::motion::MotionState;
use crate::wheel::{DeltaMode, WheelEvent, WheelOutcome};

/// Arguments of `scroll_to` / `scroll_by`
///
/// Omitted axes are left alone. `f64::INFINITY` means "the end of the
/// axis", `f64::NEG_INFINITY` its start.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollRequest {
    pub left: Option<f64>,
    pub top: Option<f64>,
    /// Friction for this motion until it settles
    pub friction: Option<f64>,
}

impl ScrollRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    pub fn top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn friction(mut self, friction: f64) -> Self {
        self.friction = Some(friction);
        self
    }
}

/// Arguments of `glide`, in pixels per second
///
/// An axis given as `0.0` stops gliding on that axis; an omitted axis keeps
/// whatever it was doing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlideRequest {
    pub left: Option<f64>,
    pub top: Option<f64>,
}

impl GlideRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    pub fn top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

pub struct SmoothScroller<S: ScrollSurface> {
    surface: S,
    caps: Capabilities,
    context: Rc<ScrollContext>,
    options: ScrollOptions,
    motion: MotionState,
    /// Last committed position; base of every relative operation
    position: Position,
    pending_frame: Option<FrameToken>,
    last_frame: Option<Duration>,
    subscriptions: Vec<SubscriptionHandle>,
    disposed: bool,
}

impl<S: ScrollSurface> SmoothScroller<S> {
    pub fn new(
        surface: S,
        caps: Capabilities,
        context: Rc<ScrollContext>,
        options: ScrollOptions,
    ) -> Self {
        let options = options.sanitized();

        let mut subscriptions = vec![caps.events.subscribe(EventKind::Scroll)];
        if options.handle_wheel {
            subscriptions.push(caps.events.subscribe(EventKind::Wheel));
        }

        let position = surface.scroll_offset();
        tracing::debug!(
            "Smooth scroller created at ({:.1}, {:.1}), friction {}, wheel {}",
            position.left,
            position.top,
            options.friction,
            options.handle_wheel
        );

        Self {
            surface,
            caps,
            context,
            options,
            motion: MotionState::new(),
            position,
            pending_frame: None,
            last_frame: None,
            subscriptions,
            disposed: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for host-side changes (content, viewport)
    ///
    /// Offsets written here are picked up through [`Self::on_scroll`].
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn friction(&self) -> f64 {
        self.options.friction
    }

    pub fn set_friction(&mut self, friction: f64) {
        self.options.friction = clamp_friction(friction, self.options.friction);
    }

    pub fn flip_wheel(&self) -> bool {
        self.options.flip_wheel
    }

    pub fn set_flip_wheel(&mut self, flip: bool) {
        self.options.flip_wheel = flip;
    }

    pub fn wheel_friction(&self) -> f64 {
        self.options.wheel_friction
    }

    pub fn set_wheel_friction(&mut self, friction: f64) {
        self.options.wheel_friction = clamp_friction(friction, self.options.wheel_friction);
    }

    /// Last committed position
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn scroll_length(&self) -> ScrollLength {
        self.surface.scroll_length()
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// Whether a frame is requested and not yet delivered
    #[inline]
    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.motion.is_active()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Add `left`/`top` pixels onto the motion in flight
    pub fn scroll_by(&mut self, request: ScrollRequest) {
        let length = self.surface.scroll_length();
        let pending = self.motion.pending_scroll();
        let delta = Vector::new(
            resolve_delta(request.left, self.position.left + pending.x, length.width),
            resolve_delta(request.top, self.position.top + pending.y, length.height),
        );
        let friction = request
            .friction
            .map(|f| clamp_friction(f, self.options.friction));

        self.motion.push_scroll(delta, friction);
        self.request_frame();
    }

    /// Animate toward an absolute position, clamped to the scrollable range
    pub fn scroll_to(&mut self, request: ScrollRequest) {
        let length = self.surface.scroll_length();
        let pending = self.motion.pending_scroll();
        let to_target = |target: Option<f64>, settled_at: f64, length: f64| {
            target
                .filter(|t| !t.is_nan())
                .map(|t| resolve_target(t, length) - settled_at)
        };

        self.scroll_by(ScrollRequest {
            left: to_target(request.left, self.position.left + pending.x, length.width),
            top: to_target(request.top, self.position.top + pending.y, length.height),
            friction: request.friction,
        });
    }

    pub fn scroll_to_start(&mut self, axis: Axis) {
        self.scroll_to(axis_request(axis, 0.0));
    }

    pub fn scroll_to_end(&mut self, axis: Axis) {
        self.scroll_to(axis_request(axis, f64::INFINITY));
    }

    /// Replace the constant-velocity motion on the supplied axes
    pub fn glide(&mut self, request: GlideRequest) {
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        self.motion.set_glide(finite(request.left), finite(request.top));
        self.request_frame();
    }

    /// Cancel the pending frame and drop all motion
    pub fn stop(&mut self) {
        if let Some(token) = self.pending_frame.take() {
            self.caps.scheduler.cancel_frame(token);
        }
        self.motion.clear();
        self.last_frame = None;
    }

    /// Stop and never write to the surface again
    ///
    /// The motion operations stay callable afterwards and may still
    /// request a frame, but that frame writes nothing.
    pub fn dispose(&mut self) {
        self.stop();
        if self.disposed {
            return;
        }
        self.disposed = true;
        for handle in self.subscriptions.drain(..) {
            self.caps.events.unsubscribe(handle);
        }
        tracing::debug!(
            "Smooth scroller disposed at ({:.1}, {:.1})",
            self.position.left,
            self.position.top
        );
    }

    /// Host callback: the frame identified by `token` is due
    ///
    /// Stale or cancelled tokens are ignored.
    pub fn on_frame(&mut self, token: FrameToken) {
        if self.pending_frame != Some(token) {
            return;
        }
        self.pending_frame = None;
        self.render();
    }

    /// Host callback: the surface reported a scroll
    ///
    /// Scrolls made by someone else (keyboard, scrollbar, other code)
    /// become the new base position, unless a frame of ours is pending, in
    /// which case our own writes are authoritative.
    pub fn on_scroll(&mut self) {
        if !self.is_subscribed(EventKind::Scroll) || self.pending_frame.is_some() {
            return;
        }
        self.position = self.surface.scroll_offset();
    }

    /// Host callback: a wheel event arrived over the surface
    pub fn on_wheel(&mut self, event: &WheelEvent) -> WheelOutcome {
        if !self.is_subscribed(EventKind::Wheel) {
            return WheelOutcome::Ignored;
        }

        let now = self.caps.clock.now();
        let arbiter = self.context.wheel();
        if arbiter.foreign_gesture_active(now) {
            tracing::debug!("Wheel event {} belongs to a gesture elsewhere, ignoring", event.id);
            return WheelOutcome::Ignored;
        }
        arbiter.mark_handled(event);

        let (mut dx, mut dy) = self.wheel_pixels(event);
        if self.options.flip_wheel {
            std::mem::swap(&mut dx, &mut dy);
        }
        tracing::trace!("Wheel event {} intercepted: ({:.1}, {:.1})", event.id, dx, dy);

        self.scroll_by(ScrollRequest {
            left: Some(dx),
            top: Some(dy),
            friction: Some(self.options.wheel_friction),
        });
        WheelOutcome::Intercepted
    }

    fn wheel_pixels(&self, event: &WheelEvent) -> (f64, f64) {
        match event.mode {
            DeltaMode::Pixel => (event.delta_x, event.delta_y),
            DeltaMode::Line => (
                event.delta_x * self.options.line_height,
                event.delta_y * self.options.line_height,
            ),
            DeltaMode::Page => {
                let viewport = self.surface.viewport_size();
                (event.delta_x * viewport.width, event.delta_y * viewport.height)
            }
        }
    }

    fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscriptions.iter().any(|h| h.kind == kind)
    }

    fn request_frame(&mut self) {
        if self.pending_frame.is_none() {
            self.pending_frame = Some(self.caps.scheduler.request_frame());
        }
    }

    fn render(&mut self) {
        if self.disposed {
            return;
        }

        let now = self.caps.clock.now();
        let elapsed_ms = match self.last_frame {
            Some(last) => now.saturating_sub(last).as_secs_f64() * 1000.0,
            None => self.context.frame_clock().fallback_interval_ms(),
        };

        let length = self.surface.scroll_length();
        let step = self
            .motion
            .advance(self.position, length, elapsed_ms, self.options.friction);

        self.position = step.position;
        self.surface.set_scroll_offset(step.position);
        tracing::trace!(
            "Frame after {:.2}ms: ({:.2}, {:.2})",
            elapsed_ms,
            step.position.left,
            step.position.top
        );

        if step.active {
            self.last_frame = Some(now);
            self.request_frame();
        } else {
            self.last_frame = None;
        }
    }
}

impl<S: ScrollSurface> Drop for SmoothScroller<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Infinite targets aim this far past the edge so the final clamp lands
/// exactly on it.
const EDGE_OVERSHOOT: f64 = 1.0;

/// Absolute target for one axis; infinities mean the ends of the axis
fn resolve_target(target: f64, length: f64) -> f64 {
    if target == f64::INFINITY {
        length.max(0.0) + EDGE_OVERSHOOT
    } else if target == f64::NEG_INFINITY {
        -EDGE_OVERSHOOT
    } else {
        clamp_axis(target, length)
    }
}

/// Resolve one axis of a relative request into a finite pixel delta
///
/// `settled_at` is where the motion in flight would come to rest.
fn resolve_delta(value: Option<f64>, settled_at: f64, length: f64) -> f64 {
    match value {
        Some(v) if v.is_nan() => 0.0,
        Some(v) if v.is_infinite() => resolve_target(v, length) - settled_at,
        Some(v) => v,
        None => 0.0,
    }
}

fn axis_request(axis: Axis, target: f64) -> ScrollRequest {
    match axis {
        Axis::Horizontal => ScrollRequest::new().left(target),
        Axis::Vertical => ScrollRequest::new().top(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::headless::Stage;

    const EPS: f64 = 1e-3;

    fn stage() -> Stage {
        Stage::new(
            Size::new(2000.0, 5000.0),
            Size::new(800.0, 600.0),
            ScrollOptions::default(),
        )
    }

    fn wheel_stage() -> Stage {
        Stage::new(
            Size::new(2000.0, 5000.0),
            Size::new(800.0, 600.0),
            ScrollOptions {
                handle_wheel: true,
                ..Default::default()
            },
        )
    }

    fn assert_near(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_scroll_to_settles_on_target() {
        let mut stage = stage();
        stage.scroller_mut().scroll_to(ScrollRequest::new().top(1000.0));
        stage.run_until_idle(10_000);

        assert_near(stage.position().top, 1000.0);
        assert_eq!(stage.position().left, 0.0);
        assert!(!stage.scroller().is_animating());
        assert!(!stage.scroller().has_pending_frame());
    }

    #[test]
    fn test_first_frame_uses_fallback_interval() {
        let mut stage = stage();
        stage.scroller_mut().scroll_by(ScrollRequest::new().top(100.0));
        stage.advance_frame();
        // standard frame and friction 0.2: a fifth of the distance
        assert_near(stage.position().top, 20.0);
    }

    #[test]
    fn test_consecutive_scroll_to_compose() {
        let mut stage = stage();
        stage.scroller_mut().scroll_to(ScrollRequest::new().left(300.0));
        stage.scroller_mut().scroll_to(ScrollRequest::new().left(500.0));
        stage.run_until_idle(10_000);
        assert_near(stage.position().left, 500.0);
    }

    #[test]
    fn test_retarget_mid_flight() {
        let mut stage = stage();
        stage.scroller_mut().scroll_to(ScrollRequest::new().top(2000.0));
        stage.run_frames(5);
        let mid = stage.position().top;
        assert!(mid > 0.0 && mid < 2000.0);

        stage.scroller_mut().scroll_to(ScrollRequest::new().top(300.0));
        stage.run_until_idle(10_000);
        assert_near(stage.position().top, 300.0);
    }

    #[test]
    fn test_scroll_by_composes_with_pending_velocity() {
        let mut stage = stage();
        stage.scroller_mut().scroll_by(ScrollRequest::new().top(100.0));
        stage.scroller_mut().scroll_by(ScrollRequest::new().top(100.0));
        assert_near(stage.scroller().motion().pending_scroll().y, 200.0);
        stage.run_until_idle(10_000);
        assert_near(stage.position().top, 200.0);
    }

    #[test]
    fn test_infinity_scrolls_to_end() {
        let mut stage = stage();
        stage
            .scroller_mut()
            .scroll_to(ScrollRequest::new().left(f64::INFINITY).top(f64::INFINITY));
        stage.run_until_idle(10_000);
        assert_eq!(stage.position(), Position::new(1200.0, 4400.0));
    }

    #[test]
    fn test_overshoot_is_clamped_every_frame() {
        let mut stage = stage();
        stage.scroller_mut().scroll_by(ScrollRequest::new().top(1e6).left(-500.0));
        for record in stage.run_until_idle(10_000) {
            assert!(record.top >= 0.0 && record.top <= 4400.0);
            assert!(record.left >= 0.0 && record.left <= 1200.0);
        }
        assert_eq!(stage.position().top, 4400.0);
        assert_eq!(stage.position().left, 0.0);
    }

    #[test]
    fn test_scroll_to_start_and_end() {
        let mut stage = stage();
        stage.scroller_mut().scroll_to_end(Axis::Vertical);
        stage.run_until_idle(10_000);
        assert_eq!(stage.position().top, 4400.0);

        stage.scroller_mut().scroll_to_start(Axis::Vertical);
        stage.run_until_idle(10_000);
        assert_near(stage.position().top, 0.0);
    }

    #[test]
    fn test_friction_override_governs_motion() {
        let mut slow = stage();
        slow.scroller_mut()
            .scroll_by(ScrollRequest::new().top(1000.0).friction(0.05));
        let slow_frames = slow.run_until_idle(10_000).len();

        let mut fast = stage();
        fast.scroller_mut()
            .scroll_by(ScrollRequest::new().top(1000.0).friction(0.6));
        let fast_frames = fast.run_until_idle(10_000).len();

        assert!(slow_frames > fast_frames);
    }

    #[test]
    fn test_low_friction_has_no_final_jump() {
        let mut stage = stage();
        stage
            .scroller_mut()
            .scroll_by(ScrollRequest::new().top(1000.0).friction(0.01));
        let records = stage.run_until_idle(10_000);
        assert!(!stage.scroller().has_pending_frame());

        let tops: Vec<f64> = records.iter().map(|r| r.top).collect();
        let last_step = tops[tops.len() - 1] - tops[tops.len() - 2];
        assert!(last_step.abs() < 1.0, "final step {last_step}");
        assert!(stage.position().top <= 1000.0 + EPS);
        assert!(stage.position().top > 980.0);
    }

    #[test]
    fn test_overflowing_requests_stay_finite() {
        let mut stage = stage();
        stage.scroller_mut().scroll_by(ScrollRequest::new().top(f64::MAX));
        stage.scroller_mut().scroll_by(ScrollRequest::new().top(f64::MAX));
        assert!(stage.scroller().motion().pending_scroll().y.is_finite());

        stage.scroller_mut().scroll_to(ScrollRequest::new().top(0.0));
        for record in stage.run_until_idle(50) {
            assert!(record.top >= 0.0 && record.top <= 4400.0, "{record:?}");
        }
        assert_eq!(stage.position().top, 0.0);
        assert!(!stage.scroller().has_pending_frame());
    }

    #[test]
    fn test_elapsed_time_normalization() {
        // friction is scaled by the measured frame time
        let mut sixty = stage();
        sixty.scroller_mut().scroll_by(ScrollRequest::new().top(1000.0));
        sixty.advance_frame();
        sixty.advance_frame();
        sixty.advance_frame();

        let mut thirty = Stage::with_frame_interval(
            Size::new(2000.0, 5000.0),
            Size::new(800.0, 600.0),
            ScrollOptions::default(),
            Duration::from_secs_f64(2.0 / 60.0),
        );
        thirty.scroller_mut().scroll_by(ScrollRequest::new().top(1000.0));
        thirty.advance_frame();
        thirty.advance_frame();

        // first frame uses the fallback, then 2 frames at 60fps vs 1 frame at 30fps
        assert_near(sixty.position().top, 1000.0 - 1000.0 * 0.8_f64.powi(3));
        assert_near(thirty.position().top, 1000.0 - 1000.0 * 0.8 * 0.6);
    }

    #[test]
    fn test_glide_moves_at_constant_speed() {
        let mut stage = stage();
        stage.scroller_mut().glide(GlideRequest::new().top(600.0));
        stage.run_frames(61);
        // 60 measured frames of 1/60s after a fallback first frame
        assert_near(stage.position().top, 610.0);
        assert!(stage.scroller().is_animating());
    }

    #[test]
    fn test_glide_axis_stop_keeps_other_axis() {
        let mut stage = stage();
        stage.scroller_mut().scroll_to(ScrollRequest::new().top(2000.0).left(600.0));
        stage.run_until_idle(10_000);

        stage.scroller_mut().glide(GlideRequest::new().left(60.0));
        stage.scroller_mut().glide(GlideRequest::new().top(-50.0));
        stage.run_frames(10);
        stage.scroller_mut().glide(GlideRequest::new().top(0.0));

        let before = stage.position();
        stage.run_frames(30);
        let after = stage.position();
        assert_eq!(after.top, before.top);
        assert!(after.left > before.left);
        assert_eq!(stage.scroller().motion().gliding(), Some(Vector::new(60.0, 0.0)));
    }

    #[test]
    fn test_glide_persists_at_boundary() {
        let mut stage = stage();
        stage.scroller_mut().glide(GlideRequest::new().top(-100.0));
        stage.run_frames(50);
        assert_eq!(stage.position().top, 0.0);
        assert!(stage.scroller().has_pending_frame());
    }

    #[test]
    fn test_glide_ignores_non_finite() {
        let mut stage = stage();
        stage.scroller_mut().glide(GlideRequest::new().top(f64::NAN));
        assert_eq!(stage.scroller().motion().gliding(), None);
    }

    #[test]
    fn test_stop_freezes_position() {
        let mut stage = stage();
        stage.scroller_mut().scroll_to(ScrollRequest::new().top(3000.0));
        stage.scroller_mut().glide(GlideRequest::new().left(100.0));
        stage.run_frames(5);
        let frozen = stage.position();

        stage.scroller_mut().stop();
        assert!(!stage.scroller().has_pending_frame());
        assert_eq!(stage.pending_frames(), 0);

        let records = stage.run_frames(30);
        assert!(records.is_empty());
        assert_eq!(stage.position(), frozen);

        stage.scroller_mut().stop();
        assert_eq!(stage.position(), frozen);
    }

    #[test]
    fn test_single_flight_frame_requests() {
        let mut stage = stage();
        stage.scroller_mut().scroll_by(ScrollRequest::new().top(10.0));
        stage.scroller_mut().scroll_by(ScrollRequest::new().top(10.0));
        stage.scroller_mut().glide(GlideRequest::new().left(10.0));
        assert_eq!(stage.pending_frames(), 1);
    }

    #[test]
    fn test_dispose_blocks_writes() {
        let mut stage = stage();
        stage.scroller_mut().scroll_to(ScrollRequest::new().top(1000.0));
        stage.run_frames(3);
        let frozen = stage.position();

        stage.scroller_mut().dispose();
        assert!(stage.scroller().is_disposed());
        assert_eq!(stage.listener_count(), 0);

        stage.scroller_mut().scroll_by(ScrollRequest::new().top(500.0));
        stage.scroller_mut().glide(GlideRequest::new().top(100.0));
        stage.run_frames(30);
        assert_eq!(stage.position(), frozen);
        assert_eq!(stage.scroller().position(), frozen);
    }

    #[test]
    fn test_disposed_scroller_still_requests_frames() {
        let mut stage = stage();
        stage.scroller_mut().dispose();
        let writes = stage.surface_writes();

        stage.scroller_mut().scroll_by(ScrollRequest::new().top(500.0));
        assert!(stage.scroller().has_pending_frame());
        assert_eq!(stage.pending_frames(), 1);

        // the frame is delivered and writes nothing
        stage.advance_frame();
        assert!(!stage.scroller().has_pending_frame());
        assert_eq!(stage.surface_writes(), writes);
    }

    #[test]
    fn test_external_scroll_resyncs_when_idle() {
        let mut stage = stage();
        stage.scroll_externally(Position::new(0.0, 1500.0));
        assert_eq!(stage.scroller().position().top, 1500.0);

        stage.scroller_mut().scroll_by(ScrollRequest::new().top(100.0));
        stage.run_until_idle(10_000);
        assert_near(stage.position().top, 1600.0);
    }

    #[test]
    fn test_external_scroll_ignored_mid_animation() {
        let mut stage = stage();
        stage.scroller_mut().scroll_to(ScrollRequest::new().top(1000.0));
        stage.run_frames(2);
        stage.scroll_externally(Position::new(0.0, 4000.0));
        stage.run_until_idle(10_000);
        assert_near(stage.position().top, 1000.0);
    }

    #[test]
    fn test_resize_shrinks_range() {
        let mut stage = stage();
        stage.scroller_mut().scroll_to(ScrollRequest::new().top(4000.0));
        stage.run_frames(3);
        stage.resize(Size::new(2000.0, 1000.0), Size::new(800.0, 600.0));
        stage.run_until_idle(10_000);
        assert_eq!(stage.position().top, 400.0);
    }

    #[test]
    fn test_wheel_intercepted_without_foreign_gesture() {
        let mut stage = wheel_stage();
        let outcome = stage.wheel(WheelEvent::pixels(0, 0.0, 120.0));
        assert_eq!(outcome, WheelOutcome::Intercepted);

        let scrolling = *stage.scroller().motion().scrolling().unwrap();
        assert_eq!(scrolling.velocity, Vector::new(0.0, 120.0));
        assert_eq!(scrolling.friction, Some(0.25));

        stage.run_until_idle(10_000);
        assert_near(stage.position().top, 120.0);
    }

    #[test]
    fn test_wheel_ignored_during_foreign_gesture() {
        let mut stage = wheel_stage();
        stage.advance_time(Duration::from_secs(1));
        stage.foreign_wheel(0.0, 40.0);

        stage.advance_time(Duration::from_millis(100));
        let outcome = stage.wheel(WheelEvent::pixels(0, 0.0, 120.0));
        assert_eq!(outcome, WheelOutcome::Ignored);
        assert!(!stage.scroller().is_animating());

        // the ignored event itself keeps the foreign gesture alive
        stage.advance_time(Duration::from_millis(250));
        assert_eq!(
            stage.wheel(WheelEvent::pixels(0, 0.0, 120.0)),
            WheelOutcome::Ignored
        );

        stage.advance_time(Duration::from_millis(301));
        assert_eq!(
            stage.wheel(WheelEvent::pixels(0, 0.0, 120.0)),
            WheelOutcome::Intercepted
        );
    }

    #[test]
    fn test_intercepted_gesture_stays_owned() {
        let mut stage = wheel_stage();
        for _ in 0..5 {
            assert!(stage.wheel(WheelEvent::pixels(0, 0.0, 50.0)).is_intercepted());
            stage.advance_frame();
        }
        assert_eq!(stage.context().wheel().last_foreign(), None);
    }

    #[test]
    fn test_wheel_not_handled_unless_enabled() {
        let mut stage = stage();
        assert_eq!(
            stage.wheel(WheelEvent::pixels(0, 0.0, 120.0)),
            WheelOutcome::Ignored
        );
        assert!(!stage.scroller().is_animating());
    }

    #[test]
    fn test_flip_wheel_swaps_axes() {
        let mut stage = wheel_stage();
        stage.scroller_mut().set_flip_wheel(true);
        stage.wheel(WheelEvent::pixels(0, 0.0, 120.0));
        stage.run_until_idle(10_000);
        assert_near(stage.position().left, 120.0);
        assert_eq!(stage.position().top, 0.0);
    }

    #[test]
    fn test_line_and_page_deltas() {
        let mut stage = wheel_stage();
        stage.wheel(WheelEvent::lines(0, 0.0, 3.0));
        assert_near(stage.scroller().motion().pending_scroll().y, 48.0);

        stage.scroller_mut().stop();
        stage.wheel(WheelEvent {
            id: 0,
            delta_x: 0.0,
            delta_y: 1.0,
            mode: DeltaMode::Page,
        });
        assert_near(stage.scroller().motion().pending_scroll().y, 600.0);
    }

    #[test]
    fn test_wheel_friction_setter_clamps() {
        let mut stage = wheel_stage();
        stage.scroller_mut().set_wheel_friction(5.0);
        assert_eq!(stage.scroller().wheel_friction(), 1.0);
        stage.scroller_mut().set_friction(-1.0);
        assert_eq!(stage.scroller().friction(), 0.0);
    }
}
