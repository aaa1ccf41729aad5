// GestureWatch - Host Tools
//
//   capture: save the raw-capture serial stream as a training CSV
//   replay:  run a recording through the device pipeline, one row per poll

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gesturewatch::config::*;
use gesturewatch::recording::{capture, load_recording};
use gesturewatch::trigger::TriggerDetector;
use gesturewatch::window::CollectorState;
use gesturewatch::{Pipeline, ReplaySource};

#[cfg(feature = "raw-capture")]
use gesturewatch::RawEmitter;
#[cfg(not(feature = "raw-capture"))]
use gesturewatch::{ClassificationEmitter, DefaultEngine, TensorArena};

#[derive(Parser)]
#[command(name = "gesturewatch")]
#[command(version)]
#[command(about = "Gesture capture tools for the GestureWatch firmware", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the raw-capture serial stream as a training CSV
    Capture {
        /// Serial stream to read (stdin if omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// CSV file to write
        #[arg(long, short, default_value = "output.csv")]
        output: PathBuf,
    },

    /// Run a recording through the capture pipeline
    Replay {
        /// Recording in raw-capture CSV format
        path: PathBuf,
    },
}

pub fn main() -> Result<()> {
    // Logs on stderr; stdout carries the pipeline output only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "gesturewatch=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Capture { input, output } => cmd_capture(input, output),
        Commands::Replay { path } => cmd_replay(path),
    }
}

fn cmd_capture(input: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let reader: Box<dyn Read> = match &input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Cannot open {:?}", path))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let writer = BufWriter::new(
        File::create(&output).with_context(|| format!("Cannot create {:?}", output))?,
    );

    log::info!(
        "Starting data collection, {} samples per gesture (Ctrl+D to stop)",
        WINDOW_LEN
    );
    let summary = capture(reader, writer, WINDOW_LEN)?;

    println!("Data saved to {:?}", output);
    println!("Total gestures captured: {}", summary.gestures);
    println!("Total samples saved: {}", summary.samples);
    if summary.rejected > 0 {
        println!("Rejected lines: {}", summary.rejected);
    }
    Ok(())
}

fn cmd_replay(path: PathBuf) -> Result<()> {
    let file = File::open(&path).with_context(|| format!("Cannot open {:?}", path))?;
    let recording = load_recording(BufReader::new(file))?;
    log::info!(
        "Replaying {} samples from {:?} ({} rows skipped)",
        recording.samples.len(),
        path,
        recording.skipped
    );

    let source = ReplaySource::new(recording.samples);
    let mut pipeline: Pipeline<_, _> = Pipeline::new(
        source,
        build_emitter()?,
        TriggerDetector::new(TRIGGER_THRESHOLD_G),
    );
    pipeline.start()?;

    while !pipeline.source().is_exhausted() {
        if let Err(e) = pipeline.step() {
            println!("{}", e);
            return Err(e).context("Pipeline halted");
        }
    }

    log::info!("Replay finished: {} gestures", pipeline.gestures());
    if let CollectorState::Filling { count } = pipeline.collector_state() {
        log::warn!(
            "Recording ended mid-gesture ({}/{} samples, not emitted)",
            count,
            WINDOW_LEN
        );
    }
    Ok(())
}

#[cfg(feature = "raw-capture")]
fn build_emitter() -> Result<RawEmitter<Stdout>> {
    Ok(RawEmitter::new(io::stdout()))
}

#[cfg(not(feature = "raw-capture"))]
fn build_emitter() -> Result<ClassificationEmitter<DefaultEngine, Stdout>> {
    let arena: &'static mut [u8] = Box::leak(vec![0u8; TENSOR_ARENA_SIZE].into_boxed_slice());
    let engine = DefaultEngine::new(TensorArena::new(arena))?;
    Ok(ClassificationEmitter::new(engine, io::stdout()))
}
