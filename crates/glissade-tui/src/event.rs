use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};

/// Event handler for terminal events
///
/// Polls with a short timeout while an animation is running so frames
/// keep coming, and with the idle tick otherwise.
pub struct EventHandler {
    tick_rate: Duration,
    frame_interval: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64, frame_rate: u32) -> Self {
        let frame_rate = frame_rate.max(1);
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            frame_interval: Duration::from_secs_f64(1.0 / frame_rate as f64),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Poll for the next event
    ///
    /// `animating` selects the frame interval as poll timeout.
    pub fn next(&self, animating: bool) -> Result<Option<AppEvent>> {
        let timeout = if animating {
            self.frame_interval
        } else {
            self.tick_rate
        };

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(wheel_notch(mouse.kind)
                    .map(|(dx, dy)| AppEvent::Wheel { dx, dy })),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Direction of one wheel notch, in lines
fn wheel_notch(kind: MouseEventKind) -> Option<(i8, i8)> {
    match kind {
        MouseEventKind::ScrollDown => Some((0, 1)),
        MouseEventKind::ScrollUp => Some((0, -1)),
        MouseEventKind::ScrollRight => Some((1, 0)),
        MouseEventKind::ScrollLeft => Some((-1, 0)),
        _ => None,
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// One wheel notch over the terminal
    Wheel { dx: i8, dy: i8 },
    /// Terminal was resized
    Resize(u16, u16),
    /// Poll timed out
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseButton;

    #[test]
    fn test_wheel_notch() {
        assert_eq!(wheel_notch(MouseEventKind::ScrollDown), Some((0, 1)));
        assert_eq!(wheel_notch(MouseEventKind::ScrollLeft), Some((-1, 0)));
        assert_eq!(wheel_notch(MouseEventKind::Down(MouseButton::Left)), None);
    }

    #[test]
    fn test_frame_interval() {
        let handler = EventHandler::new(250, 50);
        assert_eq!(handler.frame_interval(), Duration::from_millis(20));
        // zero frame rate falls back to one frame per second
        assert_eq!(EventHandler::new(250, 0).frame_interval(), Duration::from_secs(1));
    }
}
