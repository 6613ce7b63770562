use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub struct PagerWidget;

impl PagerWidget {
    /// Draw the visible slice of the pane
    ///
    /// The inner area becomes the pane viewport, so a resized terminal
    /// clamps the offset before anything is drawn.
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = app.theme.clone();
        let border_style = if app.needs_animation() {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.grey0)
        };

        let block = Block::default()
            .title(format!(" {} ", app.title))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));

        let inner_area = block.inner(area);
        frame.render_widget(block, area);
        app.set_viewport(inner_area.width, inner_area.height);

        let lines: Vec<Line> = app
            .pane()
            .visible_lines()
            .into_iter()
            .map(Line::from)
            .collect();

        let paragraph = Paragraph::new(Text::from(lines)).style(Style::default().fg(theme.fg0));
        frame.render_widget(paragraph, inner_area);
    }
}
