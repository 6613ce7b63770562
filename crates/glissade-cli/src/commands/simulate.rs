use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use glissade_core::headless::{FrameRecord, Scenario, Stage, DEFAULT_FRAME_INTERVAL};
use glissade_core::{AppConfig, Position, ScrollOptions, Size};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Content size, WIDTHxHEIGHT
    #[arg(long, default_value = "2000x5000")]
    content: Size,
    /// Viewport size, WIDTHxHEIGHT
    #[arg(long, default_value = "800x600")]
    viewport: Size,
    /// Frame interval in milliseconds (default 60Hz)
    #[arg(long)]
    frame_ms: Option<f64>,
    /// Override the configured friction
    #[arg(long)]
    friction: Option<f64>,
    /// Override the configured wheel friction
    #[arg(long)]
    wheel_friction: Option<f64>,
    /// Intercept wheel steps
    #[arg(long)]
    handle_wheel: bool,
    /// Swap wheel axes
    #[arg(long)]
    flip_wheel: bool,
    /// Read steps from a file, one per line
    #[arg(short, long)]
    script: Option<PathBuf>,
    /// Print the trace as JSON
    #[arg(long)]
    json: bool,
    /// Steps to run after the script, e.g. `scroll-to:top=500 wait:10 settle`
    steps: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    content: Size,
    viewport: Size,
    options: ScrollOptions,
    frames: &'a [FrameRecord],
    final_position: Position,
}

pub fn run(config: &AppConfig, args: SimulateArgs) -> Result<()> {
    let scenario = load_scenario(&args)?;
    if scenario.steps.is_empty() {
        bail!("No steps given. Pass steps as arguments or with --script");
    }

    let options = options_from(config, &args);
    let interval = frame_interval(args.frame_ms)?;
    tracing::debug!(
        "Simulating {} steps at {:.3}ms per frame",
        scenario.steps.len(),
        interval.as_secs_f64() * 1000.0
    );

    let mut stage = Stage::with_frame_interval(args.content, args.viewport, options, interval);
    let frames = scenario.run(&mut stage);
    let final_position = stage.position();

    if args.json {
        let report = Report {
            content: args.content,
            viewport: args.viewport,
            options: *stage.scroller().options(),
            frames: &frames,
            final_position,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_table(&frames));
        println!(
            "\n{} frames, final position ({:.2}, {:.2})",
            frames.len(),
            final_position.left,
            final_position.top
        );
    }
    Ok(())
}

fn load_scenario(args: &SimulateArgs) -> Result<Scenario> {
    let mut scenario = match &args.script {
        Some(path) => {
            let script = fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            Scenario::from_script(&script)
                .with_context(|| format!("Invalid script {}", path.display()))?
        }
        None => Scenario::default(),
    };
    let extra = Scenario::from_steps(&args.steps)?;
    scenario.steps.extend(extra.steps);
    Ok(scenario)
}

fn options_from(config: &AppConfig, args: &SimulateArgs) -> ScrollOptions {
    let mut options = config.scroll;
    if let Some(friction) = args.friction {
        options.friction = friction;
    }
    if let Some(friction) = args.wheel_friction {
        options.wheel_friction = friction;
    }
    options.handle_wheel |= args.handle_wheel;
    options.flip_wheel |= args.flip_wheel;
    options
}

fn frame_interval(frame_ms: Option<f64>) -> Result<Duration> {
    match frame_ms {
        None => Ok(DEFAULT_FRAME_INTERVAL),
        Some(ms) if ms > 0.0 => Duration::try_from_secs_f64(ms / 1000.0)
            .with_context(|| format!("Frame interval out of range: {}ms", ms)),
        Some(ms) => bail!("Frame interval must be a positive number of milliseconds, got {}", ms),
    }
}

fn render_table(frames: &[FrameRecord]) -> String {
    let mut out = format!(
        "{:>6} {:>10} {:>10} {:>10}  {}\n",
        "frame", "time_ms", "left", "top", "motion"
    );
    for record in frames {
        let motion = match (record.scrolling, record.gliding) {
            (true, true) => "scroll+glide",
            (true, false) => "scroll",
            (false, true) => "glide",
            (false, false) => "-",
        };
        // writing to a String cannot fail
        let _ = writeln!(
            out,
            "{:>6} {:>10.2} {:>10.2} {:>10.2}  {}",
            record.frame, record.time_ms, record.left, record.top, motion
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SimulateArgs,
    }

    fn parse(argv: &[&str]) -> SimulateArgs {
        let mut full = vec!["simulate"];
        full.extend_from_slice(argv);
        TestCli::parse_from(full).args
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["settle"]);
        assert_eq!(args.content, Size::new(2000.0, 5000.0));
        assert_eq!(args.viewport, Size::new(800.0, 600.0));
        assert_eq!(args.steps, vec!["settle".to_string()]);
    }

    #[test]
    fn test_options_override_config() {
        let args = parse(&["--friction", "0.5", "--handle-wheel", "wait:1"]);
        let options = options_from(&AppConfig::default(), &args);
        assert_eq!(options.friction, 0.5);
        assert!(options.handle_wheel);
        assert!(!options.flip_wheel);
        assert_eq!(options.wheel_friction, 0.25);
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(None).unwrap(), DEFAULT_FRAME_INTERVAL);
        assert_eq!(frame_interval(Some(100.0)).unwrap(), Duration::from_millis(100));
        assert!(frame_interval(Some(0.0)).is_err());
        assert!(frame_interval(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_scenario_runs_to_target() {
        let args = parse(&["scroll-to:top=500"]);
        let scenario = load_scenario(&args).unwrap();
        let mut stage = Stage::new(args.content, args.viewport, options_from(&AppConfig::default(), &args));
        let frames = scenario.run(&mut stage);

        assert!(!frames.is_empty());
        assert!((stage.position().top - 500.0).abs() < 1e-3);
        let table = render_table(&frames);
        assert!(table.starts_with(" frame"));
        assert_eq!(table.lines().count(), frames.len() + 1);
    }

    #[test]
    fn test_bad_step_is_an_error() {
        let args = parse(&["launch:top=1"]);
        assert!(load_scenario(&args).is_err());
    }
}
