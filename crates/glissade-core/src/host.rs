//! Capabilities the engine needs from its environment
//!
//! The engine never talks to a platform directly. A host hands it a
//! surface plus a [`Capabilities`] bundle (frame scheduling, event
//! subscription, a clock) and later delivers due frames and events by
//! calling back into the scroller.
//!
//! The simple implementations in this module (`FrameQueue`,
//! `SubscriptionRegistry`, `SystemClock`, `ManualClock`) are enough for
//! the terminal host and for headless runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::geometry::{Position, ScrollLength, Size};

/// A scrollable surface with readable/writable offsets
pub trait ScrollSurface {
    /// Current scroll offsets
    fn scroll_offset(&self) -> Position;

    /// Write new scroll offsets
    fn set_scroll_offset(&mut self, position: Position);

    /// Full size of the scrolled content
    fn content_size(&self) -> Size;

    /// Size of the visible area
    fn viewport_size(&self) -> Size;

    /// Maximum scrollable distance per axis
    fn scroll_length(&self) -> ScrollLength {
        ScrollLength::between(self.content_size(), self.viewport_size())
    }
}

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Per-frame callback scheduling
pub trait FrameScheduler {
    fn request_frame(&self) -> FrameToken;
    fn cancel_frame(&self, token: FrameToken);
}

/// Notifications a scroller can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Wheel-like input over the surface
    Wheel,
    /// The surface's offsets changed
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    pub id: u64,
    pub kind: EventKind,
}

/// Subscribe/unsubscribe mechanism for surface notifications
pub trait EventSource {
    fn subscribe(&self, kind: EventKind) -> SubscriptionHandle;
    fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// Monotonic (possibly coarse) time source
pub trait Clock {
    /// Time elapsed since a host-defined origin
    fn now(&self) -> Duration;
}

/// Everything a scroller needs besides its surface
#[derive(Clone)]
pub struct Capabilities {
    pub scheduler: Rc<dyn FrameScheduler>,
    pub events: Rc<dyn EventSource>,
    pub clock: Rc<dyn Clock>,
}

impl Capabilities {
    pub fn new(
        scheduler: Rc<dyn FrameScheduler>,
        events: Rc<dyn EventSource>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            scheduler,
            events,
            clock,
        }
    }
}

/// Frame scheduler whose requests are collected until the host drains them
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: Cell<u64>,
    pending: RefCell<Vec<FrameToken>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every frame requested so far
    pub fn drain(&self) -> Vec<FrameToken> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    /// Whether any frame is waiting to be delivered
    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&self) -> FrameToken {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let token = FrameToken(id);
        self.pending.borrow_mut().push(token);
        token
    }

    fn cancel_frame(&self, token: FrameToken) {
        self.pending.borrow_mut().retain(|t| *t != token);
    }
}

/// Event source that only records who is listening
///
/// The host asks [`SubscriptionRegistry::has_listeners`] before delivering
/// a notification.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    next_id: Cell<u64>,
    active: RefCell<Vec<SubscriptionHandle>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.active.borrow().iter().any(|h| h.kind == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.active.borrow().len()
    }
}

impl EventSource for SubscriptionRegistry {
    fn subscribe(&self, kind: EventKind) -> SubscriptionHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = SubscriptionHandle { id, kind };
        self.active.borrow_mut().push(handle);
        handle
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.active.borrow_mut().retain(|h| *h != handle);
    }
}

/// Wall clock measured from its creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_queue_cancel() {
        let queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_ne!(a, b);

        queue.cancel_frame(a);
        assert_eq!(queue.drain(), vec![b]);
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_registry_tracks_listeners() {
        let registry = SubscriptionRegistry::new();
        assert!(!registry.has_listeners(EventKind::Wheel));

        let wheel = registry.subscribe(EventKind::Wheel);
        let _scroll = registry.subscribe(EventKind::Scroll);
        assert!(registry.has_listeners(EventKind::Wheel));
        assert_eq!(registry.listener_count(), 2);

        registry.unsubscribe(wheel);
        assert!(!registry.has_listeners(EventKind::Wheel));
        assert!(registry.has_listeners(EventKind::Scroll));
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(4));
        assert_eq!(clock.now(), Duration::from_millis(20));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }
}
