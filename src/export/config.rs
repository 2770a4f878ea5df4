//! Generation configuration

use crate::channel::ScheduleConfig;
use crate::model::{MatchSemantics, Settings, DEFAULT_PLAYLIST_UPPER_LIMIT, DEFAULT_SHUFFLE_SEED};

/// Settings that apply to every channel generated in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Maximum entries per channel playlist
    pub entry_cap: usize,

    /// Base seed for round shuffles and random-order playlists
    pub base_seed: u64,

    /// How `match=all` playlists combine their show rules
    pub match_semantics: MatchSemantics,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            entry_cap: DEFAULT_PLAYLIST_UPPER_LIMIT,
            base_seed: DEFAULT_SHUFFLE_SEED,
            match_semantics: MatchSemantics::default(),
        }
    }
}

impl GenerationConfig {
    /// Take generation settings from settings.json
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            entry_cap: settings.playlist_upper_limit,
            base_seed: settings.shuffle_seed,
            match_semantics: settings.match_semantics,
        }
    }

    /// Scheduler parameters for a channel
    pub fn schedule_config(&self, randomize_shows: bool) -> ScheduleConfig {
        ScheduleConfig::new(self.entry_cap, randomize_shows).with_seed(self.base_seed)
    }
}
