use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use scrollease_core::sim::{SimElement, SimViewport};
use scrollease_core::{
    AppConfig, EasingType, Edge, HostEnvironment, ManualClock, ScrollConfig, ScrollOptions,
    Scroller,
};

/// Upper bound on simulated frames, in case of absurd durations
const MAX_FRAMES: usize = 100_000;

/// Shortest realtime frame period; tokio intervals reject a zero period
const MIN_FRAME_PERIOD: Duration = Duration::from_micros(1);

#[derive(Args, Debug, Clone, Default)]
pub struct SimulateArgs {
    /// Destination x offset (defaults to the current x when only --to-y is given)
    #[arg(long)]
    pub to_x: Option<f64>,
    /// Destination y offset (defaults to the current y when only --to-x is given)
    #[arg(long)]
    pub to_y: Option<f64>,
    /// Scroll to an edge instead: top, bottom, left or right
    #[arg(long, conflicts_with_all = ["to_x", "to_y"])]
    pub edge: Option<String>,
    /// Starting x offset
    #[arg(long)]
    pub from_x: Option<f64>,
    /// Starting y offset
    #[arg(long)]
    pub from_y: Option<f64>,
    /// Duration in milliseconds
    #[arg(short, long)]
    pub duration: Option<f64>,
    /// Easing curve: linear, cubic-in, cubic-out, cubic-in-out
    #[arg(short, long)]
    pub easing: Option<String>,
    /// Simulated refresh rate
    #[arg(long)]
    pub fps: Option<u32>,
    /// Animate an element of the given heights instead of the window
    #[arg(long, value_name = "SCROLLxCLIENT")]
    pub element: Option<String>,
    /// Print frames as JSON
    #[arg(long)]
    pub json: bool,
    /// Pace frames in real time instead of as fast as possible
    #[arg(long)]
    pub realtime: bool,
}

/// Offsets observed right after one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub timestamp_ms: f64,
    pub x: f64,
    pub y: f64,
    pub wheel_blocked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub surface: &'static str,
    pub easing: EasingType,
    pub duration_ms: f64,
    pub frames: Vec<FrameRecord>,
    /// Timestamp of the frame that fired the completion callback
    pub completed_at_ms: Option<f64>,
}

enum Surface {
    Window(Rc<SimViewport>),
    Element(Rc<SimElement>),
}

impl Surface {
    fn name(&self) -> &'static str {
        match self {
            Surface::Window(_) => "window",
            Surface::Element(_) => "element",
        }
    }

    fn offset(&self) -> (f64, f64) {
        match self {
            Surface::Window(viewport) => viewport.offset(),
            Surface::Element(element) => element.offset(),
        }
    }

    fn is_wheel_blocked(&self) -> bool {
        match self {
            Surface::Window(viewport) => viewport.is_wheel_blocked(),
            Surface::Element(element) => element.is_wheel_blocked(),
        }
    }
}

/// Parse `SCROLLxCLIENT`, e.g. `1000x400`
fn parse_element_size(spec: &str) -> Result<(f64, f64)> {
    let (scroll, client) = spec
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("element size must look like SCROLLxCLIENT, got {spec}"))?;
    let scroll: f64 = scroll.trim().parse().context("invalid element scroll height")?;
    let client: f64 = client.trim().parse().context("invalid element client height")?;
    Ok((scroll, client))
}

/// One animation wired to a manual clock
pub struct Simulation {
    clock: Rc<ManualClock>,
    surface: Surface,
    defaults: ScrollConfig,
    interval_ms: f64,
    completed_at: Rc<Cell<Option<f64>>>,
}

impl Simulation {
    /// Build the surface and start the animation described by `args`
    pub fn start(config: &AppConfig, args: &SimulateArgs) -> Result<Self> {
        let mut sim = config.simulation.clone();
        if let Some(fps) = args.fps {
            sim.fps = fps;
        }
        let mut defaults = config.scroll;
        if let Some(duration) = args.duration {
            defaults.duration_ms = duration;
        }
        if let Some(easing) = args.easing.as_deref() {
            defaults.easing = easing.parse()?;
        }

        let clock = Rc::new(ManualClock::new());
        let viewport = Rc::new(SimViewport::new(
            (sim.viewport_width, sim.viewport_height),
            (sim.document_width, sim.document_height),
        ));
        let surface = match args.element.as_deref() {
            Some(spec) => {
                let (scroll, client) = parse_element_size(spec)?;
                let element = Rc::new(SimElement::new(
                    (sim.viewport_width, scroll),
                    (sim.viewport_width, client),
                ));
                element.set_offset(args.from_x.unwrap_or_default(), args.from_y.unwrap_or_default());
                Surface::Element(element)
            }
            None => {
                viewport.set_offset(args.from_x.unwrap_or_default(), args.from_y.unwrap_or_default());
                Surface::Window(viewport.clone())
            }
        };

        let scroller = Scroller::new(clock.clone(), viewport, HostEnvironment::default())
            .with_defaults(defaults);
        let completed_at = Rc::new(Cell::new(None));
        let options = {
            let completed_at = completed_at.clone();
            let clock = clock.clone();
            ScrollOptions::new().on_complete(move || completed_at.set(clock.last_timestamp()))
        };

        let edge = args.edge.as_deref().map(str::parse::<Edge>).transpose()?;
        match (&surface, edge) {
            (Surface::Window(_), Some(edge)) => scroller.scroll_to_edge(edge, options)?,
            (Surface::Element(element), Some(edge)) => {
                scroller.element_scroll_to_edge(element.clone(), edge, options)?
            }
            (Surface::Window(_), None) => match (args.to_x, args.to_y) {
                (Some(x), None) => scroller.scroll_x_to(x, options)?,
                (None, Some(y)) => scroller.scroll_y_to(y, options)?,
                (x, y) => scroller.scroll_to(x.unwrap_or_default(), y.unwrap_or_default(), options)?,
            },
            (Surface::Element(element), None) => match (args.to_x, args.to_y) {
                (Some(x), None) => scroller.element_scroll_x_to(element.clone(), x, options)?,
                (None, Some(y)) => scroller.element_scroll_y_to(element.clone(), y, options)?,
                (x, y) => scroller.element_scroll_to(
                    element.clone(),
                    x.unwrap_or_default(),
                    y.unwrap_or_default(),
                    options,
                )?,
            },
        }

        info!(
            surface = surface.name(),
            easing = %defaults.easing,
            duration_ms = defaults.duration_ms,
            fps = sim.fps,
            "Simulation started"
        );
        Ok(Self {
            clock,
            surface,
            defaults,
            interval_ms: sim.frame_interval_ms(),
            completed_at,
        })
    }

    fn record(&self, timestamp_ms: f64) -> FrameRecord {
        let (x, y) = self.surface.offset();
        FrameRecord {
            timestamp_ms,
            x,
            y,
            wheel_blocked: self.surface.is_wheel_blocked(),
        }
    }

    fn report(&self, frames: Vec<FrameRecord>) -> Report {
        Report {
            surface: self.surface.name(),
            easing: self.defaults.easing,
            duration_ms: self.defaults.duration_ms,
            frames,
            completed_at_ms: self.completed_at.get(),
        }
    }

    /// Deliver frames on exact multiples of the frame interval
    pub fn run_to_completion(&self) -> Report {
        let mut frames = Vec::new();
        let mut timestamp = 0.0;
        while self.clock.pending() > 0 && frames.len() < MAX_FRAMES {
            self.clock.tick(timestamp);
            frames.push(self.record(timestamp));
            timestamp += self.interval_ms;
        }
        debug!(frames = frames.len(), "Simulation finished");
        self.report(frames)
    }

    /// Deliver frames paced by a tokio interval, stamped with elapsed time
    pub async fn run_realtime(&self) -> Report {
        let period = Duration::from_secs_f64(self.interval_ms / 1000.0).max(MIN_FRAME_PERIOD);
        let mut interval = tokio::time::interval(period);
        let origin = tokio::time::Instant::now();
        let mut frames = Vec::new();
        while self.clock.pending() > 0 && frames.len() < MAX_FRAMES {
            interval.tick().await;
            let timestamp = origin.elapsed().as_secs_f64() * 1000.0;
            self.clock.tick(timestamp);
            frames.push(self.record(timestamp));
        }
        debug!(frames = frames.len(), "Realtime simulation finished");
        self.report(frames)
    }
}

fn print_table(report: &Report) {
    println!(
        "{} animation, {} over {}ms ({} frames)\n",
        report.surface,
        report.easing,
        report.duration_ms,
        report.frames.len()
    );
    println!("{:>10}  {:>10}  {:>10}  {}", "t (ms)", "x", "y", "wheel");
    for frame in &report.frames {
        println!(
            "{:>10.1}  {:>10.2}  {:>10.2}  {}",
            frame.timestamp_ms,
            frame.x,
            frame.y,
            if frame.wheel_blocked { "blocked" } else { "free" }
        );
    }
    match report.completed_at_ms {
        Some(t) => println!("\nCompleted at {:.1}ms", t),
        None => println!("\nDid not complete"),
    }
}

pub async fn run(config: &AppConfig, args: SimulateArgs) -> Result<()> {
    let simulation = Simulation::start(config, &args)?;
    let report = if args.realtime {
        simulation.run_realtime().await
    } else {
        simulation.run_to_completion()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    Ok(())
}
