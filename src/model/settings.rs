use serde::{Deserialize, Serialize};

/// Default cap on generated playlist entries
pub const DEFAULT_PLAYLIST_UPPER_LIMIT: usize = 50;

/// Default base seed for per-round show shuffling
pub const DEFAULT_SHUFFLE_SEED: u64 = 42;

/// How `<match>all</match>` is applied across a smart playlist's show rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSemantics {
    /// Union the episodes of every rule, whatever the playlist declares
    #[default]
    Union,

    /// Union for `match=one`, intersection for `match=all`
    AsDeclared,
}

/// Contents of settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum number of entries written to a channel playlist
    pub playlist_upper_limit: usize,

    /// Base seed; round N is shuffled with `shuffle_seed + entries emitted so far`
    pub shuffle_seed: u64,

    pub match_semantics: MatchSemantics,

    /// Keys written by other tools, preserved on save
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playlist_upper_limit: DEFAULT_PLAYLIST_UPPER_LIMIT,
            shuffle_seed: DEFAULT_SHUFFLE_SEED,
            match_semantics: MatchSemantics::default(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Settings {
    /// Replace values no run can work with by their defaults.
    ///
    /// Returns true if anything was changed.
    pub fn sanitize(&mut self) -> bool {
        if self.playlist_upper_limit == 0 {
            log::warn!(
                "playlist_upper_limit of 0 in settings.json is not usable, using {}",
                DEFAULT_PLAYLIST_UPPER_LIMIT
            );
            self.playlist_upper_limit = DEFAULT_PLAYLIST_UPPER_LIMIT;
            return true;
        }
        false
    }
}
