//! Kodi profile integration
//!
//! Reads smart playlists (`.xsp`) from the profile's playlist folders and
//! episode metadata and stream durations from the video database, and
//! turns a playlist reference into a resolved episode list.

mod database;
mod paths;
mod playlists;
mod resolver;

pub use database::{KodiVideoDb, KodiVideoSource};
pub use paths::{display_name, KodiPaths, PLAYLIST_EXTENSION};
pub use playlists::{
    parse_smart_playlist, parse_smart_playlist_str, MatchMode, PlaylistRule, SmartPlaylist,
};
pub use resolver::SmartPlaylistResolver;
