//! # Note Matcher
//!
//! Maps a detected frequency to the table entry that is closest in cents.
//!
//! Ties (two entries exactly equally far away in cents) go to the entry with
//! the lower frequency; if those frequencies are also equal, the entry that
//! comes first in the table wins.

use serde::{Deserialize, Serialize};

use crate::table::FrequencyTable;
use crate::tuning::cents_between;

/// The nearest table entry and the signed deviation from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteMatch {
    /// Note label from the table
    pub note: String,
    /// Target frequency of that note in Hz
    pub table_frequency: f64,
    /// Deviation of the input from the target (positive = sharp, negative = flat)
    pub cents: f64,
}

/// Finds the closest note in `table` to `freq`.
///
/// # Returns
/// * `Some(NoteMatch)` - Closest entry with the signed cent deviation
/// * `None` - `freq` is absent, non-positive or non-finite, or the table has
///   no entry with a finite positive frequency
pub fn find_closest_note(freq: Option<f64>, table: &FrequencyTable) -> Option<NoteMatch> {
    let freq = freq.filter(|f| f.is_finite() && *f > 0.0)?;

    let mut best: Option<(&str, f64, f64)> = None;
    for entry in table.iter() {
        if !entry.frequency.is_finite() || entry.frequency <= 0.0 {
            continue;
        }
        let cents = cents_between(freq, entry.frequency);
        let better = match best {
            None => true,
            Some((_, best_freq, best_cents)) => {
                cents.abs() < best_cents.abs()
                    || (cents.abs() == best_cents.abs() && entry.frequency < best_freq)
            }
        };
        if better {
            best = Some((entry.note.as_str(), entry.frequency, cents));
        }
    }

    best.map(|(note, table_frequency, cents)| NoteMatch {
        note: note.to_string(),
        table_frequency,
        cents,
    })
}
