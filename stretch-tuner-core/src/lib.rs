// stretch-tuner-core/src/lib.rs

//! The core logic for the stretch-tuned pitch detector.
//! This crate is responsible for building custom-tuned frequency tables,
//! estimating the pitch of captured audio frames, and matching those
//! estimates against a table. It is completely headless and contains no
//! argument parsing or console output.

pub mod audio;
pub mod builder;
pub mod config;
pub mod error;
pub mod fft;
pub mod loader;
pub mod matcher;
pub mod pitch;
pub mod session;
pub mod stretch;
pub mod table;
pub mod tuning;

pub use builder::build_frequency_table;
pub use config::DetectorConfig;
pub use error::ConfigurationError;
pub use matcher::{NoteMatch, find_closest_note};
pub use pitch::{PitchConfig, detect_pitch};
pub use stretch::StretchCurve;
pub use table::FrequencyTable;
pub use tuning::{NoteName, TemperamentTable, cent_to_ratio};

/// Represents the result of a single audio analysis frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// The detected fundamental frequency in Hz, if any.
    pub detected_frequency: Option<f64>,
    /// The nearest table note and the deviation from it, if any.
    pub note_match: Option<NoteMatch>,
}

/// Runs the pitch estimator on one frame and matches the estimate.
pub fn analyze_frame(
    frame: &[f64],
    sample_rate: u32,
    config: &PitchConfig,
    table: &FrequencyTable,
) -> AnalysisResult {
    let detected_frequency = detect_pitch(frame, sample_rate, config);
    let note_match = find_closest_note(detected_frequency, table);
    if let (Some(freq), Some(m)) = (detected_frequency, &note_match) {
        log::debug!("[PITCH] {:.2} Hz -> {} {:+.1} cent", freq, m.note, m.cents);
    }
    AnalysisResult {
        detected_frequency,
        note_match,
    }
}
