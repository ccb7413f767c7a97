//! Error types for ISiS conversion and synthesis
//!
//! A single error enum covers the whole pipeline: event flattening, score
//! extraction, score file I/O and running the ISiS executable.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for everything in this crate
#[derive(Debug, Error)]
pub enum IsisError {
    /// Event shape ISiS can't render (e.g. simultaneous voices)
    #[error("Unsupported event: {0}")]
    UnsupportedEvent(String),

    /// Nothing to render
    #[error("Event contains no simple events to convert")]
    EmptyEvent,

    /// Consonant or vowel outside the XSAMPA set understood by ISiS
    #[error("Unsupported phoneme '{phoneme}' in event {event_index}")]
    UnsupportedPhoneme { phoneme: String, event_index: usize },

    /// Converter settings out of range
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Score file text couldn't be interpreted
    #[error("Malformed score file: {0}")]
    MalformedScore(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured ISiS executable doesn't exist
    #[error("ISiS executable not found: {}", .0.display())]
    ExecutableNotFound(PathBuf),

    #[error("Failed to spawn {}: {source}", .executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ISiS ran but exited unsuccessfully
    #[error("ISiS failed (exit code {code:?}): {stderr}")]
    SynthesisFailed { code: Option<i32>, stderr: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Event input file couldn't be read or decoded
    #[error("Invalid event input: {0}")]
    Input(String),
}

impl IsisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IsisError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IsisError>;
