//! Data model for channel generation
//!
//! These structures are shared between the Kodi-facing collaborators,
//! the scheduling core and the JSON stores.

mod channel;
mod episode;
mod settings;
mod skip;

pub use channel::{
    check_channel_number, compare_numbers, next_channel_number, playlist_file_name, sort_channels,
    Channel, ChannelRules, EMPTY_CHANNEL_NAME,
};
pub use episode::{Episode, RawEpisode, ResolvedPlaylist, SortOrder};
pub use settings::{MatchSemantics, Settings, DEFAULT_PLAYLIST_UPPER_LIMIT, DEFAULT_SHUFFLE_SEED};
pub use skip::{SkipReason, SkipRecord};
