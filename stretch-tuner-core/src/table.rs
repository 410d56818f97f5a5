//! # Frequency Table Module
//!
//! The shared data model between the table builder and the note matcher: an
//! ordered list of `(note label, frequency)` pairs. Generated tables are in
//! ascending MIDI order; loaded tables keep the order of the file.
//!
//! ## Persistence
//! - Text: one `<label>\t<frequency>` line per note, six decimals
//! - JSON: the same entries serialised with serde, as an alternative export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// A single note of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Note label (e.g. "A4", "C#3", "G-1")
    pub note: String,
    /// Frequency in Hz
    pub frequency: f64,
}

/// Ordered note label to frequency mapping. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    entries: Vec<TableEntry>,
}

impl FrequencyTable {
    /// Builds a table from `(label, frequency)` pairs.
    ///
    /// A repeated label keeps the position of its first occurrence and takes
    /// the value of its last one.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = FrequencyTable::default();
        for (note, frequency) in entries {
            table.insert(note.into(), frequency);
        }
        table
    }

    fn insert(&mut self, note: String, frequency: f64) {
        match self.entries.iter_mut().find(|e| e.note == note) {
            Some(existing) => existing.frequency = frequency,
            None => self.entries.push(TableEntry { note, frequency }),
        }
    }

    pub fn get(&self, note: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.note == note)
            .map(|e| e.frequency)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the tab-separated text form.
    pub fn write_text<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{}\t{:.6}", entry.note, entry.frequency)?;
        }
        writer.flush()
    }

    /// Parses the text form.
    ///
    /// Lines that do not split into exactly two whitespace-separated fields are
    /// skipped. A second field that is not a number fails the whole parse.
    pub fn parse_text(text: &str, origin: &Path) -> Result<Self, ConfigurationError> {
        let mut table = FrequencyTable::default();
        for (line_index, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let &[note, frequency] = fields.as_slice() else {
                if !line.trim().is_empty() {
                    log::warn!(
                        "[TABLE] Skipping malformed line {} in {}: {:?}",
                        line_index + 1,
                        origin.display(),
                        line
                    );
                }
                continue;
            };
            let frequency: f64 = frequency.parse().map_err(|_| ConfigurationError::Parse {
                path: origin.to_path_buf(),
                line: line_index + 1,
                text: frequency.to_string(),
            })?;
            table.insert(note.to_string(), frequency);
        }
        Ok(table)
    }

    /// Saves the table, choosing JSON for a `.json` extension and text otherwise.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigurationError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ConfigurationError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        if is_json(path) {
            serde_json::to_writer_pretty(&mut writer, self).map_err(|source| {
                ConfigurationError::Json {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            writer.flush().map_err(|e| ConfigurationError::io(path, e))?;
        } else {
            self.write_text(writer)
                .map_err(|e| ConfigurationError::io(path, e))?;
        }
        log::info!("[TABLE] Saved {} notes to {}", self.len(), path.display());
        Ok(())
    }

    /// Loads a table saved by [`FrequencyTable::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| ConfigurationError::io(path, e))?;
        let table = if is_json(path) {
            serde_json::from_str(&data).map_err(|source| ConfigurationError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::parse_text(&data, path)?
        };
        log::info!("[TABLE] Loaded {} notes from {}", table.len(), path.display());
        Ok(table)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
