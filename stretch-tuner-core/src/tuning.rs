//! # Musical Tuning Module
//!
//! Note naming, cent arithmetic and the per-pitch-class temperament used by
//! the frequency table builder.
//!
//! ## Conventions
//! - MIDI 69 is A4, the reference pitch
//! - Octave numbers change at C (`octave = m / 12 - 1`), so MIDI 7 is G-1
//! - Pitch classes are labelled `C C# D D# E F F# G G# A Bb H`
//! - Positive cents are sharp, negative cents are flat

use std::fmt;

use crate::error::ConfigurationError;

/// Pitch-class labels, indexed by `midi % 12`.
pub const PITCH_CLASS_LABELS: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "Bb", "H",
];

/// MIDI number of the reference note A4.
pub const REFERENCE_MIDI: u8 = 69;

/// Lowest note of a generated table (G-1).
pub const LOWEST_TABLE_MIDI: u8 = 7;

/// Highest note of a generated table (C8).
pub const HIGHEST_TABLE_MIDI: u8 = 108;

/// A pitch class paired with an octave, derived from a MIDI note number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteName {
    midi: u8,
}

impl NoteName {
    pub fn from_midi(midi: u8) -> Self {
        NoteName { midi }
    }

    /// Index into [`PITCH_CLASS_LABELS`] (0 = C, 11 = H).
    pub fn pitch_class(&self) -> usize {
        (self.midi % 12) as usize
    }

    pub fn octave(&self) -> i32 {
        (self.midi / 12) as i32 - 1
    }

    /// The table label, e.g. `"A4"`, `"Bb2"` or `"G-1"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PITCH_CLASS_LABELS[self.pitch_class()], self.octave())
    }
}

/// Converts a tuning offset in cents into a frequency ratio.
///
/// 1200 cents is one octave, so `cent_to_ratio(1200.0) == 2.0`. The result is
/// positive for every finite input.
pub fn cent_to_ratio(cents: f64) -> f64 {
    2.0_f64.powf(cents / 1200.0)
}

/// Inverse of [`cent_to_ratio`].
pub fn ratio_to_cents(ratio: f64) -> f64 {
    1200.0 * ratio.log2()
}

/// Calculates the deviation of `freq` from `target_freq` in cents.
///
/// # Returns
/// * Cent deviation (positive = sharp, negative = flat)
pub fn cents_between(freq: f64, target_freq: f64) -> f64 {
    ratio_to_cents(freq / target_freq)
}

/// Equal-tempered frequency of `midi` relative to A4 = `a_ref_freq`.
pub fn equal_tempered_frequency(a_ref_freq: f64, midi: f64) -> f64 {
    a_ref_freq * 2.0_f64.powf((midi - REFERENCE_MIDI as f64) / 12.0)
}

/// Twelve multiplicative offsets from equal temperament, one per pitch class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperamentTable {
    ratios: [f64; 12],
}

impl TemperamentTable {
    /// Builds a temperament from exactly twelve positive ratios (C first).
    pub fn from_ratios(ratios: &[f64]) -> Result<Self, ConfigurationError> {
        let ratios: [f64; 12] = ratios
            .try_into()
            .map_err(|_| ConfigurationError::TemperamentCount(ratios.len()))?;
        if let Some((index, &value)) = ratios
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_finite() || **r <= 0.0)
        {
            return Err(ConfigurationError::InvalidRatio { index, value });
        }
        Ok(TemperamentTable { ratios })
    }

    /// Plain equal temperament: every ratio is 1.
    pub fn equal() -> Self {
        TemperamentTable { ratios: [1.0; 12] }
    }

    pub fn ratio(&self, pitch_class: usize) -> f64 {
        self.ratios[pitch_class % 12]
    }
}
