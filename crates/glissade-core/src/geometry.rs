//! Plain value types shared by the engine and its hosts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Scroll offset of a surface, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { left: 0.0, top: 0.0 };

    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Clamp both axes into `[0, length]`
    pub fn clamp_to(self, length: ScrollLength) -> Self {
        Self {
            left: clamp_axis(self.left, length.width),
            top: clamp_axis(self.top, length.height),
        }
    }
}

/// Width and height of a content box or viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl FromStr for Size {
    type Err = Error;

    /// Parse `WIDTHxHEIGHT`, e.g. `800x600`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::InvalidSize(s.to_string()))?;
        let width: f64 = w.trim().parse().map_err(|_| Error::InvalidSize(s.to_string()))?;
        let height: f64 = h.trim().parse().map_err(|_| Error::InvalidSize(s.to_string()))?;
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(Error::InvalidSize(s.to_string()));
        }
        Ok(Self { width, height })
    }
}

/// Maximum scrollable distance per axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollLength {
    pub width: f64,
    pub height: f64,
}

impl ScrollLength {
    /// Scrollable distance of `content` shown through `viewport`; never negative
    pub fn between(content: Size, viewport: Size) -> Self {
        Self {
            width: (content.width - viewport.width).max(0.0),
            height: (content.height - viewport.height).max(0.0),
        }
    }
}

/// Two-axis velocity: pixels for scrolling, pixels per second for gliding
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Clamp a single axis into `[0, length]`
#[inline]
pub fn clamp_axis(value: f64, length: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, length.max(0.0))
}
