use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stretch_tuner_cli::{init_logging, parse_frequency};
use stretch_tuner_core::{build_frequency_table, loader::load_cent_file};

/// Generates a stretch-tuned frequency table from G-1 to C8
#[derive(Parser, Debug)]
#[command(name = "gen-freq-table")]
#[command(about = "Generate a custom-tuned note frequency table", long_about = None)]
struct Args {
    /// Reference frequency of A4 in Hz
    #[arg(default_value_t = 440.0, value_parser = parse_frequency)]
    a4_freq: f64,

    /// Stretch file: nine values in cents for A0, C1 ... C8
    #[arg(long, default_value = "stretch_cex.txt")]
    stretch: PathBuf,

    /// Temperament file: twelve values in cents for C ... H
    #[arg(long, default_value = "temper_cex.txt")]
    temper: PathBuf,

    /// Output table (tab-separated; JSON if the extension is .json)
    #[arg(short, long, default_value = "output_freqs.txt")]
    output: PathBuf,

    /// Also write a JSON copy of the table next to the output
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let stretch_ratios = load_cent_file(&args.stretch)
        .with_context(|| format!("Failed to load stretch curve from {}", args.stretch.display()))?;
    let temper_ratios = load_cent_file(&args.temper)
        .with_context(|| format!("Failed to load temperament from {}", args.temper.display()))?;

    let table = build_frequency_table(args.a4_freq, &stretch_ratios, &temper_ratios)
        .context("Failed to build the frequency table")?;

    table
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if args.json {
        let json_path = args.output.with_extension("json");
        table
            .save(&json_path)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        println!("Ready: {}", json_path.display());
    }

    println!("Ready: {}", args.output.display());
    Ok(())
}
