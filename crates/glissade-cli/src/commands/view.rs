use std::fs;
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use glissade_core::AppConfig;
use glissade_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    widgets::{PagerWidget, StatusBarWidget},
};

pub fn run(mut config: AppConfig, file: &Path, friction: Option<f64>, no_mouse: bool) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if let Some(friction) = friction {
        config.scroll.friction = friction;
    }
    if no_mouse {
        config.ui.capture_mouse = false;
    }

    let title = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    tracing::info!("Viewing {} ({} bytes)", file.display(), text.len());

    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);
    let event_handler = EventHandler::new(config.ui.idle_tick_ms, config.ui.frame_rate);
    let capture_mouse = config.ui.capture_mouse;

    // Setup terminal; the guard restores it on every exit path
    enable_raw_mode()?;
    let _restore = RestoreGuard::new(move || restore_terminal(capture_mouse));
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(format!("glissade - {}", title)))?;
    if capture_mouse {
        execute!(stdout, EnableMouseCapture)?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(title, &text, config);
    run_loop(&mut terminal, &mut app, &keymap, &event_handler)
}

/// Runs `restore` when dropped
struct RestoreGuard<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> RestoreGuard<F> {
    fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }
}

impl<F: FnOnce()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

fn restore_terminal(capture_mouse: bool) {
    let mut stdout = io::stdout();
    if let Err(e) = disable_raw_mode() {
        tracing::warn!("Failed to leave raw mode: {}", e);
    }
    if capture_mouse {
        let _ = execute!(stdout, DisableMouseCapture);
    }
    if let Err(e) = execute!(stdout, LeaveAlternateScreen, Show) {
        tracing::warn!("Failed to restore terminal screen: {}", e);
    }
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    keymap: &Keymap,
    event_handler: &EventHandler,
) -> Result<()> {
    let frame_interval = event_handler.frame_interval();
    let mut last_frame = Instant::now();

    loop {
        // Deliver animation frames at most once per frame interval
        if app.needs_animation() && last_frame.elapsed() >= frame_interval {
            app.tick();
            last_frame = Instant::now();
        }

        terminal.draw(|frame| draw(frame, app))?;

        if let Some(event) = event_handler.next(app.needs_animation())? {
            match event {
                AppEvent::Key(key) => {
                    app.clear_status();
                    let action = handle_key_event(key, app, keymap);
                    app.apply(action);
                }
                AppEvent::Wheel { dx, dy } => {
                    app.on_wheel(dx, dy);
                }
                // The next draw resizes the pane
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("Pager closed at row {}", app.pane().top_row());
    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    PagerWidget::render(frame, layout[0], app);
    StatusBarWidget::render(frame, layout[1], app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fails_after_setup(restored: &Cell<u32>) -> Result<()> {
        let _restore = RestoreGuard::new(|| restored.set(restored.get() + 1));
        anyhow::bail!("alternate screen unavailable")
    }

    #[test]
    fn test_restore_runs_on_early_error() {
        let restored = Cell::new(0);
        assert!(fails_after_setup(&restored).is_err());
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn test_restore_runs_once_on_success() {
        let restored = Cell::new(0);
        {
            let _restore = RestoreGuard::new(|| restored.set(restored.get() + 1));
        }
        assert_eq!(restored.get(), 1);
    }
}
