// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer errors.

use thiserror::Error;

/// Errors raised while building sequencer inputs
#[derive(Debug, Error)]
pub enum SequencerError {
    /// A phase duration was zero, negative or not finite
    #[error("Invalid {phase} duration: {value}s (must be positive and finite)")]
    InvalidDuration {
        /// Phase the duration belongs to
        phase: &'static str,
        /// Offending value in seconds
        value: f32,
    },

    /// The mini-game registry has no entries
    #[error("Mini-game registry is empty")]
    EmptyRegistry,

    /// Two registry entries share an id
    #[error("Duplicate mini-game id: {0}")]
    DuplicateGame(String),

    /// RON parse error
    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

/// Result type for sequencer operations
pub type Result<T> = std::result::Result<T, SequencerError>;
