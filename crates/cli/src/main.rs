#![deny(unsafe_code)]
//! CLI binary for the particle swarm.
//!
//! Subcommands:
//! - `render`: run a mode (plus an optional input timeline) for N ticks, write a PNG
//! - `run`: drive the swarm in real time at the configured tick rate
//! - `shape`: rasterize a glyph and write its alpha mask as a PNG
//! - `list`: print modes, shapes, and palettes

mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use error::CliError;
use log::{info, trace, warn};
use swarm_core::{Mode, Palette, Shape, Srgb, SwarmConfig, SwarmError, Viewport};
use swarm_host::pixel::MAX_FRAME_SIDE;
use swarm_host::{snapshot, Event, Session, Timeline, TimelineEntry};
use swarm_sim::HapticSink;

#[derive(Parser)]
#[command(name = "swarm", about = "Mode-driven particle swarm")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand that builds a swarm.
#[derive(clap::Args)]
struct SwarmArgs {
    /// Mode to switch to before the first tick (idle, listening, speaking, question).
    #[arg(short, long, default_value = "idle")]
    mode: String,

    /// JSON config file; command-line options override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport width in logical units (one unit per output pixel).
    #[arg(short = 'W', long)]
    width: Option<f64>,

    /// Viewport height in logical units.
    #[arg(short = 'H', long)]
    height: Option<f64>,

    /// Number of particles.
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// PRNG seed for deterministic output.
    #[arg(long)]
    seed: Option<u64>,

    /// Palette: "muted" or comma-separated hex colors.
    #[arg(short, long)]
    palette: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the swarm for N ticks and write a PNG snapshot.
    Render {
        #[command(flatten)]
        swarm: SwarmArgs,

        /// Number of simulation ticks.
        #[arg(short, long, default_value_t = 600)]
        ticks: u64,

        /// JSON timeline of mode, drag, release, and resize events.
        #[arg(long)]
        timeline: Option<PathBuf>,

        /// Background color as hex.
        #[arg(long, default_value = "#000000")]
        background: String,

        /// Output file path.
        #[arg(short, long, default_value = "swarm.png")]
        output: PathBuf,

        /// Also write the final draw points as JSON.
        #[arg(long)]
        points: Option<PathBuf>,
    },
    /// Tick the swarm in real time and report scheduler statistics.
    Run {
        #[command(flatten)]
        swarm: SwarmArgs,

        /// Wall-clock duration in seconds.
        #[arg(short, long, default_value_t = 2.0)]
        seconds: f64,

        /// Write the final frame as a PNG.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rasterize a glyph and write its alpha mask as a grayscale PNG.
    Shape {
        /// Symbol name (circle.fill, questionmark).
        symbol: String,

        /// Edge length of the square mask.
        #[arg(short, long, default_value_t = 360)]
        size: usize,

        /// Alpha threshold used for the opaque pixel count.
        #[arg(long, default_value_t = swarm_core::mask::DEFAULT_ALPHA_THRESHOLD)]
        threshold: u8,

        /// Output file path.
        #[arg(short, long, default_value = "shape.png")]
        output: PathBuf,
    },
    /// List modes, shapes, and palettes.
    List,
}

/// Haptic sink for a headless host: pulses only show up in trace logs.
#[derive(Default)]
struct LogHaptics {
    pulses: u64,
}

impl HapticSink for LogHaptics {
    fn impact(&mut self) {
        self.pulses += 1;
        trace!("haptic impact #{}", self.pulses);
    }
}

fn io_error(path: &Path, e: std::io::Error) -> CliError {
    CliError::Io(format!("{}: {e}", path.display()))
}

fn read_text(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| io_error(path, e))
}

fn build_config(args: &SwarmArgs) -> Result<SwarmConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => SwarmConfig::from_json(&read_text(path)?)?,
        None => SwarmConfig::default(),
    };
    if let Some(w) = args.width {
        config.viewport.width = w;
    }
    if let Some(h) = args.height {
        config.viewport.height = h;
    }
    if let Some(n) = args.count {
        config.particle_count = n;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(palette) = &args.palette {
        config.palette = palette.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Output image size for a viewport: one pixel per logical unit, at most
/// `MAX_FRAME_SIDE` per side.
fn frame_size(viewport: Viewport) -> Result<(usize, usize), CliError> {
    let side = |v: f64| {
        let px = v.ceil();
        if px.is_finite() && px >= 1.0 && px <= MAX_FRAME_SIDE as f64 {
            Ok(px as usize)
        } else {
            Err(CliError::from(SwarmError::InvalidDimensions))
        }
    };
    Ok((side(viewport.width)?, side(viewport.height)?))
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let palettes = Palette::list_names();
            if cli.json {
                let modes: Vec<_> = Mode::ALL
                    .iter()
                    .map(|m| serde_json::json!({"name": m.name(), "shape": m.shape().symbol()}))
                    .collect();
                let shapes: Vec<_> = Shape::ALL.iter().map(|s| s.symbol()).collect();
                print_json(&serde_json::json!({
                    "modes": modes,
                    "shapes": shapes,
                    "palettes": palettes,
                }))?;
            } else {
                println!("Modes:");
                for mode in Mode::ALL {
                    println!("  {:<10} {}", mode.name(), mode.shape().symbol());
                }
                println!("Shapes:");
                for shape in Shape::ALL {
                    println!("  {shape}");
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Shape {
            symbol,
            size,
            threshold,
            output,
        } => {
            let shape = Shape::from_symbol(&symbol)?;
            if size > MAX_FRAME_SIDE {
                return Err(SwarmError::InvalidDimensions.into());
            }
            let mask = shape.rasterize(size)?;
            let opaque = mask.opaque_count(threshold);
            snapshot::write_mask_png(&mask, &output)?;

            if cli.json {
                print_json(&serde_json::json!({
                    "shape": shape.symbol(),
                    "size": size,
                    "threshold": threshold,
                    "opaque_pixels": opaque,
                    "output": output.display().to_string(),
                }))?;
            } else {
                eprintln!(
                    "rasterized {shape} ({size}x{size}, {opaque} pixels >= {threshold}) -> {}",
                    output.display()
                );
            }
        }
        Command::Render {
            swarm,
            ticks,
            timeline,
            background,
            output,
            points,
        } => {
            let mode: Mode = swarm.mode.parse()?;
            let background = Srgb::from_hex(&background)?;
            let config = build_config(&swarm)?;

            let mut entries = vec![TimelineEntry {
                tick: 0,
                event: Event::Mode(mode),
            }];
            if let Some(path) = &timeline {
                entries.extend(Timeline::from_json(&read_text(path)?)?.entries().iter().cloned());
            }
            let timeline = Timeline::new(entries);

            let mut session = Session::new(&config, Box::<LogHaptics>::default())?;
            let report = session.play(&timeline, ticks)?;

            let frame = session.snapshot();
            let (width, height) = frame_size(session.viewport())?;
            snapshot::write_png(
                &frame,
                &config.palette(),
                width,
                height,
                background,
                &output,
            )?;
            if let Some(path) = &points {
                fs::write(path, serde_json::to_string(&frame)?).map_err(|e| io_error(path, e))?;
            }

            if cli.json {
                print_json(&serde_json::json!({
                    "mode": session.mode().name(),
                    "particles": frame.len(),
                    "width": width,
                    "height": height,
                    "seed": config.seed,
                    "playback": report,
                    "output": output.display().to_string(),
                }))?;
            } else {
                eprintln!(
                    "rendered {} ({} particles, {width}x{height}, {} ticks) -> {}",
                    session.mode(),
                    frame.len(),
                    report.ticks,
                    output.display()
                );
                if report.sampling_failures > 0 {
                    eprintln!(
                        "warning: {} mode change(s) kept the previous particles",
                        report.sampling_failures
                    );
                }
            }
        }
        Command::Run {
            swarm,
            seconds,
            output,
        } => {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(CliError::Input(format!(
                    "--seconds must be non-negative, got {seconds}"
                )));
            }
            let mode: Mode = swarm.mode.parse()?;
            let config = build_config(&swarm)?;
            let mut session = Session::new(&config, Box::<LogHaptics>::default())?;
            if let Err(e) = session.select_mode(mode) {
                warn!("{e}");
            }

            info!("running {mode} for {seconds}s at {} Hz", config.tick_hz);
            let started = Instant::now();
            let budget = session.run_realtime(Duration::from_secs_f64(seconds));
            let elapsed = started.elapsed().as_secs_f64();

            if let Some(path) = &output {
                let (width, height) = frame_size(session.viewport())?;
                snapshot::write_png(
                    &session.snapshot(),
                    &config.palette(),
                    width,
                    height,
                    Srgb::new(0.0, 0.0, 0.0),
                    path,
                )?;
            }

            let rate = if elapsed > 0.0 {
                budget.run as f64 / elapsed
            } else {
                0.0
            };
            if cli.json {
                print_json(&serde_json::json!({
                    "mode": mode.name(),
                    "ticks": budget.run,
                    "dropped": budget.dropped,
                    "elapsed_secs": elapsed,
                    "ticks_per_sec": rate,
                }))?;
            } else {
                eprintln!(
                    "{mode}: {} ticks, {} dropped in {elapsed:.2}s ({rate:.1} ticks/s)",
                    budget.run, budget.dropped
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
