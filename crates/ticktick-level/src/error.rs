//! Errors raised while reading, validating and storing levels.

use std::path::PathBuf;

use thiserror::Error;

/// Which of the unique level markers a cardinality check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Player,
    Goal,
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Marker::Player => write!(f, "player start ('1')"),
            Marker::Goal => write!(f, "goal ('X')"),
        }
    }
}

/// A level document or grid that cannot become the active level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level needs at least 3 lines (description, timer, grid), found {found}")]
    TooFewLines { found: usize },

    #[error("timer line {0:?} is not a non-negative integer")]
    InvalidTimer(String),

    #[error("level must contain exactly one {marker}, found {found}")]
    MarkerCount { marker: Marker, found: usize },
}

/// Errors from the level file library.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid level name {0:?}")]
    InvalidName(String),

    #[error("level {path} is invalid: {source}")]
    Level {
        path: PathBuf,
        #[source]
        source: LevelError,
    },
}
