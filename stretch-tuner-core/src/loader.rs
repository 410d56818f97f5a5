//! # Cent File Loader
//!
//! Stretch and temperament inputs are plain text files holding one value in
//! cents per line. Blank lines are ignored; every other line must be a number.

use std::path::Path;

use crate::error::ConfigurationError;
use crate::tuning::cent_to_ratio;

/// Parses cent values from text and converts each to a ratio.
pub fn parse_cent_lines(text: &str, origin: &Path) -> Result<Vec<f64>, ConfigurationError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(index, line)| {
            line.parse::<f64>()
                .ok()
                .filter(|cents| cents.is_finite())
                .map(cent_to_ratio)
                .ok_or_else(|| ConfigurationError::Parse {
                    path: origin.to_path_buf(),
                    line: index + 1,
                    text: line.to_string(),
                })
        })
        .collect()
}

/// Reads a cent file and returns its values as ratios.
pub fn load_cent_file(path: impl AsRef<Path>) -> Result<Vec<f64>, ConfigurationError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ConfigurationError::io(path, e))?;
    let ratios = parse_cent_lines(&text, path)?;
    log::info!("[LOADER] Read {} values from {}", ratios.len(), path.display());
    Ok(ratios)
}
