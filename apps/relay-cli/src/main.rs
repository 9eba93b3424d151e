use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relay_common::PointId;
use relay_input::parse_scenario;
use relay_kernel::{SimulationState, Snapshot, StepResult};
use relay_playback::{IntervalTimer, PlaybackConfig, Scheduler, TickSource, VirtualTimer, drive};
use relay_render::{AsciiRenderer, Renderer, TextRenderer, status_line};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relay-cli", about = "Play back token relay runs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Play a run through the scheduler, printing status after each executed tick
    Run {
        /// Input file; reads stdin when omitted or `-`
        input: Option<PathBuf>,
        /// Speed dial, 0..=100 (overrides the config file)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
        speed: Option<u8>,
        /// Milliseconds between ticks (overrides the config file)
        #[arg(long)]
        frame_ms: Option<u64>,
        /// JSON playback config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Advance simulated time instead of sleeping between ticks
        #[arg(long)]
        no_wait: bool,
        /// Draw an ASCII plot after each executed tick
        #[arg(long)]
        ascii: bool,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run to termination without timing and list every throw
    Trace {
        /// Input file; reads stdin when omitted or `-`
        input: Option<PathBuf>,
        /// Print the trace as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("relay-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", relay_common::crate_info());
            println!("playback: {}", relay_playback::crate_info());
            println!("render: {}", relay_render::crate_info());
        }
        Commands::Run {
            input,
            speed,
            frame_ms,
            config,
            no_wait,
            ascii,
            json,
        } => {
            let mut playback = match &config {
                Some(path) => PlaybackConfig::from_json_file(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => PlaybackConfig::default(),
            };
            if let Some(speed) = speed {
                playback.speed = speed;
            }
            if let Some(frame_ms) = frame_ms {
                playback.frame_interval_ms = frame_ms;
            }
            playback.validate().context("invalid playback settings")?;

            let state = load_state(input.as_deref(), playback.history_capacity)?;
            run(state, &playback, no_wait, ascii, json)?;
        }
        Commands::Trace { input, json } => {
            let state = load_state(input.as_deref(), relay_kernel::DEFAULT_HISTORY_CAPACITY)?;
            trace(state, json)?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("reading input {}", p.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading input from stdin")?;
            Ok(text)
        }
    }
}

fn load_state(path: Option<&Path>, history_capacity: usize) -> Result<SimulationState> {
    let text = read_input(path)?;
    let scenario = parse_scenario(&text).context("parsing input")?;
    if scenario.truncated {
        tracing::warn!(
            declared = scenario.declared,
            read = scenario.points.len(),
            "input point list was truncated"
        );
    }
    scenario
        .into_state_with_capacity(history_capacity)
        .context("building initial state")
}

fn run(
    state: SimulationState,
    config: &PlaybackConfig,
    no_wait: bool,
    ascii: bool,
    json: bool,
) -> Result<()> {
    let mut scheduler = Scheduler::from_config(config);
    scheduler.load(state);

    let mut source: Box<dyn TickSource> = if no_wait {
        Box::new(VirtualTimer::new(config.frame_interval_ms))
    } else {
        Box::new(IntervalTimer::new(Duration::from_millis(config.frame_interval_ms)))
    };
    let plot = AsciiRenderer::default();

    let outcome = drive(&mut scheduler, source.as_mut(), |sched, report| {
        if !report.executed() {
            return;
        }
        if let Some(snapshot) = sched.snapshot() {
            if ascii {
                print!("{}", plot.render(&snapshot));
            }
            if !json {
                println!("{}", status_line(&snapshot));
            }
        }
    });

    let stats = scheduler.stats();
    tracing::info!(
        ticks = stats.ticks,
        executed = stats.executed_ticks,
        steps = stats.steps,
        "playback finished"
    );

    let snapshot = scheduler
        .snapshot()
        .context("scheduler lost its run state")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", TextRenderer::new().render(&snapshot));
    }
    if outcome.is_none() {
        anyhow::bail!("playback stopped before the run terminated");
    }
    Ok(())
}

#[derive(Serialize)]
struct TraceEntry {
    throw: usize,
    from: PointId,
    to: PointId,
}

#[derive(Serialize)]
struct TraceReport {
    throws: Vec<TraceEntry>,
    final_snapshot: Snapshot,
}

fn trace(mut state: SimulationState, json: bool) -> Result<()> {
    let mut throws = Vec::new();
    while let StepResult::Continued(t) = state.step() {
        let entry = TraceEntry {
            throw: throws.len() + 1,
            from: PointId::from_index(t.from),
            to: PointId::from_index(t.to),
        };
        if !json {
            println!("{:>6}: {} -> {}", entry.throw, entry.from, entry.to);
        }
        throws.push(entry);
    }

    let final_snapshot = Snapshot::capture(&state);
    if json {
        let report = TraceReport {
            throws,
            final_snapshot,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", status_line(&final_snapshot));
    }
    Ok(())
}
