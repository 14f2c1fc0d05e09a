use std::path::PathBuf;
use thiserror::Error;

use crate::models::SeasonId;

/// All errors produced by the Scorebook crates.
#[derive(Error, Debug)]
pub enum StatsError {
    /// A caller supplied a value outside its contract (negative count,
    /// wickets above ten, `top_n` of zero, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An overs figure could not be read as `overs.balls` notation.
    #[error("Invalid argument: malformed overs {overs}: {reason}")]
    MalformedOvers { overs: String, reason: String },

    /// A season filter named a season the provider does not know about.
    #[error("Season not found: {0}")]
    SeasonNotFound(SeasonId),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scorecard or reference file did not match the expected shape.
    #[error("Failed to parse {path}: {source}")]
    ScorecardParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The expected data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed or written.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failures raised by a score provider, propagated unchanged.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StatsError {
    /// Shorthand for [`StatsError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether this error reports malformed caller input rather than a
    /// failure to fetch data.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::MalformedOvers { .. }
        )
    }
}

/// Convenience alias used throughout the Scorebook crates.
pub type Result<T> = std::result::Result<T, StatsError>;
