//! Scripted scroller sessions
//!
//! A scenario is a list of steps, one per line or command-line argument:
//!
//! ```text
//! scroll-to:top=500,friction=0.1
//! wait:10
//! scroll-to:top=inf
//! settle
//! wheel:dy=3,mode=line
//! glide:left=120
//! wait:30
//! glide:left=0
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::str::FromStr;
use std::time::Duration;

use crate::geometry::{Position, Size};
use crate::headless::{FrameRecord, Stage};
use crate::scroller::{GlideRequest, ScrollRequest};
use crate::wheel::{DeltaMode, WheelEvent};
use crate::{Error, Result};

/// Upper bound on frames for a `settle` step without explicit limit
const DEFAULT_SETTLE_FRAMES: u32 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioStep {
    ScrollTo(ScrollRequest),
    ScrollBy(ScrollRequest),
    Glide(GlideRequest),
    /// Advance this many frames
    Wait(u32),
    /// Advance until idle, at most this many frames
    Settle(u32),
    /// Let time pass without frames
    Pause(Duration),
    Wheel(WheelEvent),
    ForeignWheel { delta_x: f64, delta_y: f64 },
    /// Native scroll by someone else; omitted axes keep their offset
    External { left: Option<f64>, top: Option<f64> },
    Resize { content: Size, viewport: Size },
    Stop,
    Dispose,
}

impl ScenarioStep {
    /// Apply the step, returning the frames it delivered
    pub fn apply(&self, stage: &mut Stage) -> Vec<FrameRecord> {
        match self {
            ScenarioStep::ScrollTo(request) => stage.scroller_mut().scroll_to(*request),
            ScenarioStep::ScrollBy(request) => stage.scroller_mut().scroll_by(*request),
            ScenarioStep::Glide(request) => stage.scroller_mut().glide(*request),
            ScenarioStep::Wait(frames) => return stage.run_frames(*frames),
            ScenarioStep::Settle(max) => return stage.run_until_idle(*max),
            ScenarioStep::Pause(by) => stage.advance_time(*by),
            ScenarioStep::Wheel(event) => {
                let outcome = stage.wheel(*event);
                tracing::debug!("Scenario wheel event: {:?}", outcome);
            }
            ScenarioStep::ForeignWheel { delta_x, delta_y } => {
                stage.foreign_wheel(*delta_x, *delta_y)
            }
            ScenarioStep::External { left, top } => {
                let current = stage.position();
                stage.scroll_externally(Position::new(
                    left.unwrap_or(current.left),
                    top.unwrap_or(current.top),
                ));
            }
            ScenarioStep::Resize { content, viewport } => stage.resize(*content, *viewport),
            ScenarioStep::Stop => stage.scroller_mut().stop(),
            ScenarioStep::Dispose => stage.scroller_mut().dispose(),
        }
        Vec::new()
    }
}

impl FromStr for ScenarioStep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, args) = match s.split_once(':') {
            Some((name, args)) => (name.trim(), args.trim()),
            None => (s, ""),
        };
        let fail = |reason: &str| Error::Scenario {
            step: s.to_string(),
            reason: reason.to_string(),
        };
        let args = Args::parse(args).map_err(|reason| fail(&reason))?;

        let step = match name {
            "scroll-to" | "scroll-by" => {
                args.only(&["left", "top", "friction"]).map_err(|r| fail(&r))?;
                let request = ScrollRequest {
                    left: args.number("left").map_err(|r| fail(&r))?,
                    top: args.number("top").map_err(|r| fail(&r))?,
                    friction: args.number("friction").map_err(|r| fail(&r))?,
                };
                if name == "scroll-to" {
                    ScenarioStep::ScrollTo(request)
                } else {
                    ScenarioStep::ScrollBy(request)
                }
            }
            "glide" => {
                args.only(&["left", "top"]).map_err(|r| fail(&r))?;
                ScenarioStep::Glide(GlideRequest {
                    left: args.number("left").map_err(|r| fail(&r))?,
                    top: args.number("top").map_err(|r| fail(&r))?,
                })
            }
            "wait" => ScenarioStep::Wait(args.count().map_err(|r| fail(&r))?.unwrap_or(1)),
            "settle" => ScenarioStep::Settle(
                args.count()
                    .map_err(|r| fail(&r))?
                    .unwrap_or(DEFAULT_SETTLE_FRAMES),
            ),
            "pause" => {
                let ms = args
                    .count()
                    .map_err(|r| fail(&r))?
                    .ok_or_else(|| fail("expected milliseconds, e.g. pause:300"))?;
                ScenarioStep::Pause(Duration::from_millis(ms as u64))
            }
            "wheel" => {
                args.only(&["dx", "dy", "mode"]).map_err(|r| fail(&r))?;
                let mode = match args.get("mode") {
                    None | Some("pixel") => DeltaMode::Pixel,
                    Some("line") => DeltaMode::Line,
                    Some("page") => DeltaMode::Page,
                    Some(other) => return Err(fail(&format!("unknown delta mode '{}'", other))),
                };
                ScenarioStep::Wheel(WheelEvent {
                    id: 0,
                    delta_x: args.number("dx").map_err(|r| fail(&r))?.unwrap_or(0.0),
                    delta_y: args.number("dy").map_err(|r| fail(&r))?.unwrap_or(0.0),
                    mode,
                })
            }
            "foreign-wheel" => {
                args.only(&["dx", "dy"]).map_err(|r| fail(&r))?;
                ScenarioStep::ForeignWheel {
                    delta_x: args.number("dx").map_err(|r| fail(&r))?.unwrap_or(0.0),
                    delta_y: args.number("dy").map_err(|r| fail(&r))?.unwrap_or(0.0),
                }
            }
            "external" => {
                args.only(&["left", "top"]).map_err(|r| fail(&r))?;
                ScenarioStep::External {
                    left: args.number("left").map_err(|r| fail(&r))?,
                    top: args.number("top").map_err(|r| fail(&r))?,
                }
            }
            "resize" => {
                args.only(&["content", "viewport"]).map_err(|r| fail(&r))?;
                let size = |key: &str| -> Result<Size> {
                    args.get(key)
                        .ok_or_else(|| fail(&format!("missing '{}'", key)))?
                        .parse()
                };
                ScenarioStep::Resize {
                    content: size("content")?,
                    viewport: size("viewport")?,
                }
            }
            "stop" => ScenarioStep::Stop,
            "dispose" => ScenarioStep::Dispose,
            other => return Err(fail(&format!("unknown step '{}'", other))),
        };
        Ok(step)
    }
}

/// `key=value` pairs, or a single bare value, after the step name
struct Args<'a> {
    pairs: Vec<(&'a str, &'a str)>,
    bare: Option<&'a str>,
}

impl<'a> Args<'a> {
    fn parse(args: &'a str) -> std::result::Result<Self, String> {
        let mut pairs = Vec::new();
        let mut bare = None;
        for part in args.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((key, value)) => pairs.push((key.trim(), value.trim())),
                None if bare.is_none() && pairs.is_empty() => bare = Some(part),
                None => return Err(format!("unexpected argument '{}'", part)),
            }
        }
        Ok(Self { pairs, bare })
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn only(&self, allowed: &[&str]) -> std::result::Result<(), String> {
        if let Some(bare) = self.bare {
            return Err(format!("unexpected argument '{}'", bare));
        }
        match self.pairs.iter().find(|(k, _)| !allowed.contains(k)) {
            Some((key, _)) => Err(format!("unknown key '{}'", key)),
            None => Ok(()),
        }
    }

    /// Numbers accept `inf` / `-inf`
    fn number(&self, key: &str) -> std::result::Result<Option<f64>, String> {
        self.get(key)
            .map(|v| {
                v.parse::<f64>()
                    .map_err(|_| format!("'{}' is not a number", v))
            })
            .transpose()
    }

    fn count(&self) -> std::result::Result<Option<u32>, String> {
        if !self.pairs.is_empty() {
            return Err("expected a single count".to_string());
        }
        self.bare
            .map(|v| v.parse::<u32>().map_err(|_| format!("'{}' is not a count", v)))
            .transpose()
    }
}

/// A parsed list of steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_steps<I, S>(steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let steps = steps
            .into_iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    /// Parse a script with one step per line
    pub fn from_script(script: &str) -> Result<Self> {
        Self::from_steps(
            script
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    /// Run every step, then settle whatever motion remains unless the
    /// scenario ends gliding.
    pub fn run(&self, stage: &mut Stage) -> Vec<FrameRecord> {
        let mut records = Vec::new();
        for step in &self.steps {
            tracing::trace!("Scenario step: {:?}", step);
            records.extend(step.apply(stage));
        }
        if stage.scroller().motion().gliding().is_none() {
            records.extend(stage.run_until_idle(DEFAULT_SETTLE_FRAMES));
        }
        records
    }
}
