//! Typed errors for storage, channel records and generation

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing one of the JSON stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create data directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {path:?}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A channel record that cannot be stored as given
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("channel number must be a valid number, got {0:?}")]
    InvalidNumber(String),

    #[error("channel number {0} already exists")]
    DuplicateNumber(String),

    #[error("channel {0} not found")]
    NotFound(String),

    #[error("adding {adding} playlists to {current} would exceed the limit of {limit}")]
    PlaylistLimit {
        current: usize,
        adding: usize,
        limit: usize,
    },
}

/// Failure of a channel list update: either the edit was rejected or saving failed
#[derive(Debug, Error)]
pub enum ChannelUpdateError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure that aborts a generation run
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("channel {0} not found")]
    ChannelNotFound(String),

    #[error("failed to open the video database")]
    OpenSource(#[source] anyhow::Error),

    #[error("failed to log skipped files")]
    SkipLog(#[source] StoreError),

    #[error("failed to create playlist file at {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
