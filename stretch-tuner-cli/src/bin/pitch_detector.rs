use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use stretch_tuner_cli::{format_reading, init_logging};
use stretch_tuner_core::audio::AudioCapture;
use stretch_tuner_core::session::{FrameSource, run_session};
use stretch_tuner_core::{DetectorConfig, FrequencyTable};

/// Live monophonic pitch detector against a custom frequency table
#[derive(Parser, Debug)]
#[command(name = "pitch-detector")]
#[command(about = "Detect the pitch of the microphone input and match it to a frequency table", long_about = None)]
struct Args {
    /// Frequency table produced by gen-freq-table
    #[arg(default_value = "output_freqs.txt")]
    table: PathBuf,

    /// Detector settings (JSON); built-in defaults are used when omitted
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Stop after this many detection cycles (default: run until interrupted)
    #[arg(short = 'n', long = "frames")]
    frames: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config = match &args.config {
        Some(path) => DetectorConfig::load(path)
            .with_context(|| format!("Failed to load detector config {}", path.display()))?,
        None => DetectorConfig::default(),
    };

    let table = FrequencyTable::load(&args.table)
        .with_context(|| format!("Failed to load frequency table {}", args.table.display()))?;
    if table.is_empty() {
        log::warn!("[MAIN] Frequency table {} has no entries", args.table.display());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))
        .context("Failed to install the Ctrl+C handler")?;

    let mut capture = AudioCapture::start(&config).context("Failed to start audio capture")?;
    log::info!(
        "[MAIN] Capturing {} samples per frame at {} Hz",
        capture.frame_len(),
        capture.sample_rate()
    );

    println!(
        "Starting pitch detector using '{}'... (press Ctrl+C to stop)\n",
        args.table.display()
    );

    let mut remaining = args.frames;
    run_session(
        &mut capture,
        &table,
        &config,
        |result| println!("{}", format_reading(result)),
        || match &mut remaining {
            _ if stop.load(Ordering::SeqCst) => false,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
            None => true,
        },
    )?;

    println!("\nExiting.");
    Ok(())
}
