//! Shared plumbing for the command-line front ends: logger setup, argument
//! value parsers and the console line for a detection reading.

use stretch_tuner_core::AnalysisResult;

/// Installs the stderr logger. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

/// Value parser for frequencies given on the command line.
pub fn parse_frequency(arg: &str) -> Result<f64, String> {
    let value: f64 = arg
        .trim()
        .parse()
        .map_err(|_| format!("frequency format error: {arg:?} is not a number (example: 435.0)"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("frequency must be a positive number of Hz, got {value}"));
    }
    Ok(value)
}

/// Formats one detection cycle for the console.
pub fn format_reading(result: &AnalysisResult) -> String {
    match (result.detected_frequency, &result.note_match) {
        (None, _) => "No usable sound detected.".to_string(),
        (Some(_), None) => "No matching note found in frequency table.".to_string(),
        (Some(freq), Some(m)) => format!(
            "{} ({:.2} Hz) | detected: {:.2} Hz | deviation: {:+.1} cent",
            m.note, m.table_frequency, freq, m.cents
        ),
    }
}
