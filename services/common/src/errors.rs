//! Common error types for the analysis services

use crate::types::LinkId;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the statistics services
#[derive(Debug, Error)]
pub enum StatsError {
    /// A component was used in an invalid state or with invalid settings
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A tracked link has no entry in an observation source
    #[error("no {kind} observation for link {link}")]
    MissingObservation {
        /// Which source was missing the entry
        kind: &'static str,
        /// The link without an entry
        link: LinkId,
    },

    /// Averages requested before any iteration was aggregated
    #[error("no iterations aggregated yet, averages are undefined")]
    NoIterations,

    /// Reading or writing a file failed
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A file did not parse as the expected document
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

impl StatsError {
    /// Wrap an i/o error with the path it occurred on
    #[must_use]
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
