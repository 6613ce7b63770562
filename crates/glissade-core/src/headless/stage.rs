use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;

use crate::config::ScrollOptions;
use crate::context::ScrollContext;
use crate::geometry::{Position, Size};
use crate::headless::VirtualSurface;
use crate::host::{
    Capabilities, Clock, EventKind, FrameQueue, ManualClock, ScrollSurface, SubscriptionRegistry,
};
use crate::scroller::SmoothScroller;
use crate::wheel::{WheelEvent, WheelOutcome};

/// 60Hz, rounded to whole nanoseconds
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_nanos(16_666_667);

/// Surface state after one delivered frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    /// Host frame counter
    pub frame: u64,
    pub time_ms: f64,
    pub left: f64,
    pub top: f64,
    pub scrolling: bool,
    pub gliding: bool,
}

/// One scroller on a virtual surface, driven frame by frame
pub struct Stage {
    clock: Rc<ManualClock>,
    frames: Rc<FrameQueue>,
    events: Rc<SubscriptionRegistry>,
    context: Rc<ScrollContext>,
    scroller: SmoothScroller<VirtualSurface>,
    frame_interval: Duration,
    frame_index: u64,
    next_event_id: u64,
}

impl Stage {
    pub fn new(content: Size, viewport: Size, options: ScrollOptions) -> Self {
        Self::with_frame_interval(content, viewport, options, DEFAULT_FRAME_INTERVAL)
    }

    pub fn with_frame_interval(
        content: Size,
        viewport: Size,
        options: ScrollOptions,
        frame_interval: Duration,
    ) -> Self {
        Self::with_context(ScrollContext::shared(), content, viewport, options, frame_interval)
    }

    /// Build a stage sharing `context` with other stages
    pub fn with_context(
        context: Rc<ScrollContext>,
        content: Size,
        viewport: Size,
        options: ScrollOptions,
        frame_interval: Duration,
    ) -> Self {
        let clock = Rc::new(ManualClock::new());
        let frames = Rc::new(FrameQueue::new());
        let events = Rc::new(SubscriptionRegistry::new());
        let caps = Capabilities::new(frames.clone(), events.clone(), clock.clone());
        let scroller = SmoothScroller::new(
            VirtualSurface::new(content, viewport),
            caps,
            context.clone(),
            options,
        );

        Self {
            clock,
            frames,
            events,
            context,
            scroller,
            frame_interval,
            frame_index: 0,
            next_event_id: 0,
        }
    }

    pub fn scroller(&self) -> &SmoothScroller<VirtualSurface> {
        &self.scroller
    }

    pub fn scroller_mut(&mut self) -> &mut SmoothScroller<VirtualSurface> {
        &mut self.scroller
    }

    pub fn context(&self) -> &ScrollContext {
        &self.context
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Offsets currently shown by the surface
    pub fn position(&self) -> Position {
        self.scroller.surface().scroll_offset()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.pending_count()
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    pub fn surface_writes(&self) -> usize {
        self.scroller.surface().writes()
    }

    /// Let time pass without servicing frames
    pub fn advance_time(&mut self, by: Duration) {
        self.clock.advance(by);
    }

    /// Advance one frame interval and deliver due frames
    ///
    /// Returns a record when the scroller had a frame to run.
    pub fn advance_frame(&mut self) -> Option<FrameRecord> {
        self.clock.advance(self.frame_interval);
        self.frame_index += 1;
        let now = self.clock.now();
        self.context.on_host_frame(now);

        let tokens = self.frames.drain();
        let delivered = !tokens.is_empty();
        for token in tokens {
            self.scroller.on_frame(token);
        }
        self.flush_scroll_notification();

        delivered.then(|| self.record(now))
    }

    /// Advance `count` frames, collecting the delivered ones
    pub fn run_frames(&mut self, count: u32) -> Vec<FrameRecord> {
        (0..count).filter_map(|_| self.advance_frame()).collect()
    }

    /// Advance until the scroller stops requesting frames, or `max_frames`
    pub fn run_until_idle(&mut self, max_frames: u32) -> Vec<FrameRecord> {
        let mut records = Vec::new();
        let mut frames = 0;
        while self.scroller.has_pending_frame() && frames < max_frames {
            records.extend(self.advance_frame());
            frames += 1;
        }
        if self.scroller.has_pending_frame() {
            tracing::warn!("Still animating after {} frames", max_frames);
        }
        records
    }

    /// Dispatch a wheel event over the surface
    ///
    /// The stage assigns the event id. The global arbiter sees the event
    /// after the scroller, like a bubbling listener would.
    pub fn wheel(&mut self, mut event: WheelEvent) -> WheelOutcome {
        event.id = self.next_event_id();
        let now = self.clock.now();
        let outcome = if self.events.has_listeners(EventKind::Wheel) {
            self.scroller.on_wheel(&event)
        } else {
            WheelOutcome::Ignored
        };
        self.context.on_host_wheel(&event, now);
        outcome
    }

    /// A wheel event over some other part of the page
    pub fn foreign_wheel(&mut self, delta_x: f64, delta_y: f64) {
        let event = WheelEvent::pixels(self.next_event_id(), delta_x, delta_y);
        self.context.on_host_wheel(&event, self.clock.now());
    }

    /// Someone else (keyboard, scrollbar, other code) scrolls the surface
    pub fn scroll_externally(&mut self, position: Position) {
        self.scroller.surface_mut().set_scroll_offset(position);
        self.flush_scroll_notification();
    }

    pub fn resize(&mut self, content: Size, viewport: Size) {
        self.scroller.surface_mut().resize(content, viewport);
        self.flush_scroll_notification();
    }

    fn flush_scroll_notification(&mut self) {
        if self.scroller.surface_mut().take_dirty() && self.events.has_listeners(EventKind::Scroll) {
            self.scroller.on_scroll();
        }
    }

    fn next_event_id(&mut self) -> u64 {
        self.next_event_id += 1;
        self.next_event_id
    }

    fn record(&self, now: Duration) -> FrameRecord {
        let position = self.position();
        let motion = self.scroller.motion();
        FrameRecord {
            frame: self.frame_index,
            time_ms: now.as_secs_f64() * 1000.0,
            left: position.left,
            top: position.top,
            scrolling: motion.scrolling().is_some(),
            gliding: motion.gliding().is_some(),
        }
    }
}
