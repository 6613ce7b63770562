//! Deterministic, display-less host
//!
//! [`Stage`] wires a [`SmoothScroller`](crate::SmoothScroller) to an
//! in-memory surface, a manual clock, a frame queue and a subscription
//! registry. Time only moves when the stage is told to, which makes frame
//! by frame behavior reproducible in tests and in `glissade simulate`.

mod scenario;
mod stage;
mod surface;

pub use scenario::{Scenario, ScenarioStep};
pub use stage::{FrameRecord, Stage, DEFAULT_FRAME_INTERVAL};
pub use surface::VirtualSurface;
