//! Error types for document persistence, configuration and sessions.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type.
///
/// Capacity overflow and backspace-on-empty are deliberately *not* errors:
/// the editing operations absorb them silently.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to a stream failed.
    #[error("stream I/O error: {0}")]
    Stream(#[from] std::io::Error),

    /// The config file could not be parsed or serialized.
    #[error("config serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The config holds values the engine cannot work with.
    #[error("invalid config: {0}")]
    Config(String),

    /// A loaded document does not fit in the configured capacity.
    #[error("document has {len} characters, capacity is {max}")]
    DocumentTooLarge {
        /// Length of the rejected document in characters.
        len: usize,
        /// Configured maximum text length.
        max: usize,
    },

    /// Loaded bytes were not valid UTF-8.
    #[error("document is not valid UTF-8")]
    InvalidEncoding,

    /// A session transition was requested from the wrong state.
    #[error("cannot {action} while {state}")]
    InvalidState {
        /// The attempted transition.
        action: &'static str,
        /// The state the session was in.
        state: &'static str,
    },

    /// A worker thread went away while the loop still needed it.
    #[error("{0} channel disconnected")]
    Disconnected(&'static str),
}

impl Error {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } | Self::Stream(source)
                if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
