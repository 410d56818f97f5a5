//! # Table Builder Module
//!
//! Generates the tuned frequency table from a reference pitch, the octave
//! stretch ratios and the temperament. Every note from G-1 (MIDI 7) to C8
//! (MIDI 108) gets
//!
//! `a_ref * 2^((m - 69) / 12) * stretch(m) * temperament[m % 12]`

use crate::error::ConfigurationError;
use crate::stretch::StretchCurve;
use crate::table::FrequencyTable;
use crate::tuning::{
    HIGHEST_TABLE_MIDI, LOWEST_TABLE_MIDI, NoteName, TemperamentTable, equal_tempered_frequency,
};

/// Builds the table from raw ratio lists.
///
/// All inputs are validated before anything is computed: nine stretch ratios,
/// twelve temperament ratios, and a finite positive reference frequency.
pub fn build_frequency_table(
    a_ref_freq: f64,
    stretch_ratios: &[f64],
    temper_ratios: &[f64],
) -> Result<FrequencyTable, ConfigurationError> {
    let stretch = StretchCurve::from_octave_ratios(stretch_ratios)?;
    let temperament = TemperamentTable::from_ratios(temper_ratios)?;
    build_with(a_ref_freq, &stretch, &temperament)
}

/// Builds the table from an already constructed curve and temperament.
pub fn build_with(
    a_ref_freq: f64,
    stretch: &StretchCurve,
    temperament: &TemperamentTable,
) -> Result<FrequencyTable, ConfigurationError> {
    if !a_ref_freq.is_finite() || a_ref_freq <= 0.0 {
        return Err(ConfigurationError::InvalidReference(a_ref_freq));
    }

    let table = FrequencyTable::from_entries((LOWEST_TABLE_MIDI..=HIGHEST_TABLE_MIDI).map(|midi| {
        let note = NoteName::from_midi(midi);
        let base = equal_tempered_frequency(a_ref_freq, midi as f64);
        let frequency = base * stretch.evaluate(midi as f64) * temperament.ratio(note.pitch_class());
        (note.label(), frequency)
    }));

    log::debug!(
        "[TABLE] Built {} notes for A4 = {} Hz (G-1 = {:.6} Hz, C8 = {:.6} Hz)",
        table.len(),
        a_ref_freq,
        table.get("G-1").unwrap_or(f64::NAN),
        table.get("C8").unwrap_or(f64::NAN),
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::cent_to_ratio;

    #[test]
    fn identity_inputs_give_equal_temperament() {
        let table = build_frequency_table(440.0, &[1.0; 9], &[1.0; 12]).unwrap();
        assert_eq!(table.len(), 102);
        assert_eq!(table.iter().next().unwrap().note, "G-1");
        assert_eq!(table.iter().last().unwrap().note, "C8");
        assert_eq!(table.get("A4"), Some(440.0));
        assert!((table.get("C4").unwrap() - 261.625565).abs() < 1e-6);
        assert!((table.get("A5").unwrap() - 880.0).abs() < 1e-9);
    }

    #[test]
    fn entries_ascend_in_pitch() {
        let stretch: Vec<f64> = [-12.0, -8.0, -4.0, -1.0, 0.0, 1.0, 4.0, 9.0, 16.0]
            .iter()
            .map(|&c| cent_to_ratio(c))
            .collect();
        let table = build_frequency_table(442.0, &stretch, &[1.0; 12]).unwrap();
        let frequencies: Vec<f64> = table.iter().map(|e| e.frequency).collect();
        assert!(frequencies.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn temperament_applies_per_pitch_class() {
        let mut temper = [1.0; 12];
        temper[0] = cent_to_ratio(10.0);
        let table = build_frequency_table(440.0, &[1.0; 9], &temper).unwrap();
        let c4 = table.get("C4").unwrap();
        assert!((c4 / 261.6255653005986 - cent_to_ratio(10.0)).abs() < 1e-12);
        assert_eq!(table.get("A4"), Some(440.0));
    }

    #[test]
    fn stretch_applies_at_anchor_notes() {
        let mut stretch = [1.0; 9];
        stretch[8] = cent_to_ratio(20.0);
        let table = build_frequency_table(440.0, &stretch, &[1.0; 12]).unwrap();
        let c8 = table.get("C8").unwrap();
        assert!((c8 / 4186.009044809578 - cent_to_ratio(20.0)).abs() < 1e-12);
    }

    #[test]
    fn wrong_counts_abort_the_build() {
        for count in [8, 10] {
            assert!(matches!(
                build_frequency_table(440.0, &vec![1.0; count], &[1.0; 12]),
                Err(ConfigurationError::StretchCount { .. })
            ));
        }
        for count in [11, 13] {
            assert!(matches!(
                build_frequency_table(440.0, &[1.0; 9], &vec![1.0; count]),
                Err(ConfigurationError::TemperamentCount(_))
            ));
        }
        assert!(matches!(
            build_frequency_table(0.0, &[1.0; 9], &[1.0; 12]),
            Err(ConfigurationError::InvalidReference(_))
        ));
    }
}
