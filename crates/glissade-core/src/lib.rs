pub mod config;
pub mod context;
pub mod error;
pub mod frame_clock;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod motion;
pub mod scroller;
pub mod wheel;

pub use config::{AppConfig, KeymapConfig, ScrollOptions, UiConfig};
pub use context::ScrollContext;
pub use error::{Error, Result};
pub use geometry::{Position, ScrollLength, Size, Vector};
pub use host::{Capabilities, Clock, EventKind, EventSource, FrameScheduler, FrameToken, ScrollSurface};
pub use scroller::{Axis, GlideRequest, ScrollRequest, SmoothScroller};
pub use wheel::{DeltaMode, WheelEvent, WheelOutcome};
