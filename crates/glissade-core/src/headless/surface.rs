use crate::geometry::{Position, Size};
use crate::host::ScrollSurface;

/// In-memory scroll surface
///
/// Offsets are clamped on write like a real scroll container does.
#[derive(Debug, Clone)]
pub struct VirtualSurface {
    offset: Position,
    content: Size,
    viewport: Size,
    writes: usize,
    dirty: bool,
}

impl VirtualSurface {
    pub fn new(content: Size, viewport: Size) -> Self {
        Self {
            offset: Position::ORIGIN,
            content,
            viewport,
            writes: 0,
            dirty: false,
        }
    }

    /// Change content and viewport sizes, clamping the offset to the new range
    pub fn resize(&mut self, content: Size, viewport: Size) {
        self.content = content;
        self.viewport = viewport;
        let clamped = self.offset.clamp_to(self.scroll_length());
        if clamped != self.offset {
            self.offset = clamped;
            self.dirty = true;
        }
    }

    /// Number of offset writes so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Whether the offset changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl ScrollSurface for VirtualSurface {
    fn scroll_offset(&self) -> Position {
        self.offset
    }

    fn set_scroll_offset(&mut self, position: Position) {
        self.writes += 1;
        let clamped = position.clamp_to(self.scroll_length());
        if clamped != self.offset {
            self.offset = clamped;
            self.dirty = true;
        }
    }

    fn content_size(&self) -> Size {
        self.content
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }
}
