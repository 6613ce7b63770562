use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use glissade_core::ScrollSurface;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let label = app.motion_label();
        let label_color = match label {
            "IDLE" => theme.idle,
            "GLIDE" => theme.gliding,
            _ => theme.scrolling,
        };

        let offset = app.pane().scroll_offset();
        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " row {}/{} col {} | {}%",
                app.pane().top_row() + 1,
                app.pane().line_count(),
                offset.left.round() as i64,
                app.percent()
            )
        };

        let mode = format!(" {} ", label);
        let help_hint = " q:quit j/k:scroll J/K:glide <Space>:stop ";
        let used = mode.len() + status_text.len() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(mode, Style::default().fg(theme.bg0).bg(label_color)),
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
