//! Collaborator traits for the generation core

use crate::model::RawEpisode;
use anyhow::Result;

/// Media library lookup - allows swapping the Kodi database for test fixtures
pub trait EpisodeLibrary {
    /// All episodes of the show with exactly this title.
    ///
    /// An unknown show yields an empty list, not an error.
    fn episodes_for_show(&self, show_title: &str) -> Result<Vec<RawEpisode>>;
}

/// Playback duration lookup keyed by file path
pub trait DurationLookup {
    /// Duration in seconds, `Ok(None)` when the path is unknown.
    ///
    /// `Err` is reserved for failures of the lookup itself.
    fn lookup_duration(&self, file_path: &str) -> Result<Option<u32>>;
}

/// Factory for per-run media sessions.
///
/// Each generation run opens its own session, so runs on different
/// threads never share a database connection.
pub trait MediaSource: Sync {
    type Session: EpisodeLibrary + DurationLookup;

    fn open(&self) -> Result<Self::Session>;
}
