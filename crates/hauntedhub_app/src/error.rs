// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hub errors.

use hauntedhub_sequencer::SequencerError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the hub and its collaborators
#[derive(Debug, Error)]
pub enum HubError {
    /// File system error
    #[error("IO error reading {path:?}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Settings file could not be parsed
    #[error("Settings parse error: {0}")]
    Settings(#[from] ron::error::SpannedError),

    /// Sequencer rejected its inputs
    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    /// Audio engine or decode failure
    #[error("Audio error: {0}")]
    Audio(String),

    /// The async runtime could not be built
    #[error("Runtime error: {0}")]
    Runtime(#[source] std::io::Error),

    /// Asset content is not usable
    #[error("Invalid asset {path:?}: {reason}")]
    InvalidAsset {
        /// Asset path
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },
}

/// Result type for hub operations
pub type Result<T> = std::result::Result<T, HubError>;
