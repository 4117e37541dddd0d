use std::path::PathBuf;
use thiserror::Error;

/// Error type for adapter operations.
///
/// Routing signals ("no opinion", "mark external") are never errors; they
/// travel as `Ok(None)` and [`OnResolveResult::external`](crate::OnResolveResult::external).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid filter pattern {pattern:?}: {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by a managed resolution context, passed through as-is.
    #[error(transparent)]
    Api(Box<dyn std::error::Error + Send + Sync>),

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Wrap an error raised by a managed resolution context.
    pub fn api(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Api(err.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
