//! # Configuration Errors
//!
//! Everything that can go wrong before a table or a detector exists. These
//! errors are fatal for the operation that raised it: no partial table is ever
//! produced. A frame without a usable pitch, or a frequency without a matching
//! note, is not an error and is reported as `None` instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("expected {expected} stretch ratios, got {actual}")]
    StretchCount { expected: usize, actual: usize },

    #[error("expected 12 temperament ratios, got {0}")]
    TemperamentCount(usize),

    #[error("ratio #{index} is {value}; ratios must be finite and positive")]
    InvalidRatio { index: usize, value: f64 },

    #[error("reference frequency {0} Hz must be finite and positive")]
    InvalidReference(f64),

    #[error("stretch anchors must be strictly increasing and match the ratio count")]
    InvalidAnchors,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: cannot parse {text:?} as a number")]
    Parse {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid detector setting: {0}")]
    InvalidSetting(String),
}

impl ConfigurationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConfigurationError::Io {
            path: path.into(),
            source,
        }
    }
}
