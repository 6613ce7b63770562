use std::rc::Rc;

use glissade_core::host::{FrameQueue, SubscriptionRegistry, SystemClock};
use glissade_core::{
    AppConfig, Axis, Capabilities, Clock, EventKind, GlideRequest, Position, ScrollContext,
    ScrollRequest, ScrollSurface, SmoothScroller, WheelEvent, WheelOutcome,
};

use crate::input::Action;
use crate::pane::TextPane;
use crate::theme::Theme;

/// Pager state: one text pane scrolled by the engine
///
/// The app is the host. It owns the frame queue and subscription
/// registry the scroller talks to, and delivers due frames from the
/// terminal loop through [`App::tick`].
pub struct App {
    pub config: AppConfig,
    pub title: String,
    pub scroller: SmoothScroller<TextPane>,
    pub pending_key: Option<char>,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub theme: Theme,
    frames: Rc<FrameQueue>,
    events: Rc<SubscriptionRegistry>,
    clock: Rc<dyn Clock>,
    context: Rc<ScrollContext>,
    next_wheel_id: u64,
}

impl App {
    pub fn new(title: impl Into<String>, text: &str, config: AppConfig) -> Self {
        Self::with_clock(title, text, config, Rc::new(SystemClock::new()))
    }

    pub fn with_clock(
        title: impl Into<String>,
        text: &str,
        config: AppConfig,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let frames = Rc::new(FrameQueue::new());
        let events = Rc::new(SubscriptionRegistry::new());
        let context = ScrollContext::shared();

        let mut options = config.scroll;
        options.handle_wheel |= config.ui.capture_mouse;
        // one row is one unit of offset
        options.line_height = 1.0;

        let caps = Capabilities::new(frames.clone(), events.clone(), clock.clone());
        let scroller = SmoothScroller::new(TextPane::new(text), caps, context.clone(), options);

        Self {
            config,
            title: title.into(),
            scroller,
            pending_key: None,
            should_quit: false,
            status_message: None,
            theme: Theme::default(),
            frames,
            events,
            clock,
            context,
            next_wheel_id: 0,
        }
    }

    pub fn pane(&self) -> &TextPane {
        self.scroller.surface()
    }

    /// Whether a frame is waiting to be delivered
    pub fn needs_animation(&self) -> bool {
        self.frames.has_pending()
    }

    /// Deliver due frames, then any scroll notification they caused
    pub fn tick(&mut self) {
        if self.frames.has_pending() {
            self.context.on_host_frame(self.clock.now());
            for token in self.frames.drain() {
                self.scroller.on_frame(token);
            }
        }
        self.flush_scroll_notification();
    }

    /// Pane area changed size
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.scroller.surface_mut().set_viewport(width, height);
        self.flush_scroll_notification();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn apply(&mut self, action: Action) {
        let step = self.config.ui.scroll_step.max(1) as f64;
        let page = self.pane().viewport_size().height.max(1.0);

        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroller.scroll_by(ScrollRequest::new().top(step)),
            Action::ScrollUp => self.scroller.scroll_by(ScrollRequest::new().top(-step)),
            Action::ScrollLeft => self.scroller.scroll_by(ScrollRequest::new().left(-step)),
            Action::ScrollRight => self.scroller.scroll_by(ScrollRequest::new().left(step)),
            Action::HalfPageDown => self
                .scroller
                .scroll_by(ScrollRequest::new().top((page / 2.0).floor().max(1.0))),
            Action::HalfPageUp => self
                .scroller
                .scroll_by(ScrollRequest::new().top(-(page / 2.0).floor().max(1.0))),
            Action::PageDown => self.scroller.scroll_by(ScrollRequest::new().top(page)),
            Action::PageUp => self.scroller.scroll_by(ScrollRequest::new().top(-page)),
            Action::JumpToTop => self.scroller.scroll_to_start(Axis::Vertical),
            Action::JumpToBottom => self.scroller.scroll_to_end(Axis::Vertical),
            Action::GlideDown => self.toggle_glide(self.config.ui.glide_speed),
            Action::GlideUp => self.toggle_glide(-self.config.ui.glide_speed),
            Action::Stop => {
                self.scroller.stop();
                self.set_status("Stopped");
            }
            Action::JumpHome => self.jump_home(),
            Action::PendingG => {
                self.pending_key = Some('g');
                return;
            }
            Action::None => {}
        }
        self.pending_key = None;
    }

    /// One wheel notch over the pane
    ///
    /// Events the scroller does not intercept scroll the pane instantly,
    /// the way a terminal pager without smooth scrolling would.
    pub fn on_wheel(&mut self, dx: i8, dy: i8) -> WheelOutcome {
        self.next_wheel_id += 1;
        let step = self.config.ui.scroll_step.max(1) as f64;
        let event = WheelEvent::lines(self.next_wheel_id, dx as f64 * step, dy as f64 * step);
        let now = self.clock.now();

        let outcome = if self.events.has_listeners(EventKind::Wheel) {
            self.scroller.on_wheel(&event)
        } else {
            WheelOutcome::Ignored
        };

        if !outcome.is_intercepted() {
            let offset = self.pane().scroll_offset();
            self.scroller.surface_mut().set_scroll_offset(Position::new(
                offset.left + event.delta_x,
                offset.top + event.delta_y,
            ));
            self.flush_scroll_notification();
        }

        self.context.on_host_wheel(&event, now);
        outcome
    }

    /// Vertical position as a percentage of the scrollable range
    pub fn percent(&self) -> u16 {
        let length = self.pane().scroll_length().height;
        if length <= 0.0 {
            return 100;
        }
        ((self.pane().scroll_offset().top / length) * 100.0).round() as u16
    }

    pub fn motion_label(&self) -> &'static str {
        let motion = self.scroller.motion();
        match (motion.scrolling().is_some(), motion.gliding().is_some()) {
            (true, true) => "SCROLL+GLIDE",
            (true, false) => "SCROLL",
            (false, true) => "GLIDE",
            (false, false) => "IDLE",
        }
    }

    fn toggle_glide(&mut self, speed: f64) {
        let current = self.scroller.motion().gliding().map(|v| v.y);
        if current == Some(speed) {
            self.scroller.glide(GlideRequest::new().top(0.0));
            self.clear_status();
        } else {
            self.scroller.glide(GlideRequest::new().top(speed));
            self.set_status(format!("Gliding at {} rows/s", speed));
        }
    }

    /// Instant jump home, as any non-animated scroll would
    fn jump_home(&mut self) {
        self.scroller.stop();
        self.scroller.surface_mut().set_scroll_offset(Position::ORIGIN);
        self.flush_scroll_notification();
    }

    fn flush_scroll_notification(&mut self) {
        if self.scroller.surface_mut().take_dirty() && self.events.has_listeners(EventKind::Scroll) {
            self.scroller.on_scroll();
        }
    }
}
