//! Error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// A song could not start playing.
///
/// Never fatal: the songs screen marks the track paused and carries on.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio asset not found: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("could not start `{program}`: {source}")]
    Spawn { program: String, source: io::Error },
}
