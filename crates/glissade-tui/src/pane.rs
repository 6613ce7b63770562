//! Text pane: the scroll surface of the pager
//!
//! One terminal cell is one unit of scroll offset. Offsets stay
//! fractional so the engine can move by less than a row per frame; the
//! view rounds them when drawing.

use glissade_core::{Position, ScrollSurface, Size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub struct TextPane {
    lines: Vec<String>,
    content_width: usize,
    offset: Position,
    viewport: Size,
    dirty: bool,
}

impl TextPane {
    pub fn new(text: &str) -> Self {
        // tabs would throw off column math
        let lines: Vec<String> = text.lines().map(|l| l.replace('\t', "    ")).collect();
        let content_width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        Self {
            lines,
            content_width,
            offset: Position::ORIGIN,
            viewport: Size::default(),
            dirty: false,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Update the visible area, clamping the offset into the new range
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        let viewport = Size::new(width as f64, height as f64);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        let clamped = self.offset.clamp_to(self.scroll_length());
        if clamped != self.offset {
            self.offset = clamped;
            self.dirty = true;
        }
    }

    /// Whether the offset changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// First visible row
    pub fn top_row(&self) -> usize {
        self.offset.top.round().max(0.0) as usize
    }

    /// First visible column
    pub fn left_column(&self) -> usize {
        self.offset.left.round().max(0.0) as usize
    }

    /// The lines currently in view, cut to the viewport columns
    pub fn visible_lines(&self) -> Vec<String> {
        let width = self.viewport.width as usize;
        let left = self.left_column();
        self.lines
            .iter()
            .skip(self.top_row())
            .take(self.viewport.height as usize)
            .map(|line| slice_columns(line, left, width))
            .collect()
    }
}

impl ScrollSurface for TextPane {
    fn scroll_offset(&self) -> Position {
        self.offset
    }

    fn set_scroll_offset(&mut self, position: Position) {
        let clamped = position.clamp_to(self.scroll_length());
        if clamped != self.offset {
            self.offset = clamped;
            self.dirty = true;
        }
    }

    fn content_size(&self) -> Size {
        Size::new(self.content_width as f64, self.lines.len() as f64)
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }
}

/// Cut `line` to the display columns `[start, start + width)`
///
/// Wide characters straddling either edge are dropped.
fn slice_columns(line: &str, start: usize, width: usize) -> String {
    let mut out = String::new();
    let mut column = 0;
    let end = start + width;
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if column >= start && column + w <= end {
            out.push(c);
        }
        column += w;
        if column >= end {
            break;
        }
    }
    out
}
