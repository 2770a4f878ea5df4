use serde::{Deserialize, Serialize};

/// Ordering requested by a smart playlist's `<order>` element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Season/episode order (the default)
    #[default]
    Episode,

    /// Shuffle episodes once when they are grouped
    Random,
}

impl SortOrder {
    /// Interpret the text of an `<order>` element
    pub fn from_order_text(text: &str) -> Self {
        if text.trim() == "random" {
            SortOrder::Random
        } else {
            SortOrder::Episode
        }
    }
}

/// Episode as returned by the media library, before its duration is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEpisode {
    /// Title of the show this episode belongs to (grouping key)
    pub show_title: String,

    /// Season number
    pub season: u32,

    /// Episode number within the season
    pub episode_number: u32,

    /// Episode title
    pub title: String,

    /// Playable location, passed through verbatim to the playlist
    pub file_path: String,
}

impl RawEpisode {
    /// Attach a resolved duration, producing a schedulable episode
    pub fn with_duration(self, duration_seconds: u32) -> Episode {
        Episode {
            show_title: self.show_title,
            season: self.season,
            episode_number: self.episode_number,
            title: self.title,
            file_path: self.file_path,
            duration_seconds,
        }
    }
}

/// Episode with a usable (non-zero) duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub show_title: String,
    pub season: u32,
    pub episode_number: u32,
    pub title: String,
    pub file_path: String,

    /// Playback duration in seconds
    pub duration_seconds: u32,
}

/// Output of resolving one playlist reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPlaylist {
    pub sort_order: SortOrder,
    pub episodes: Vec<RawEpisode>,
}

impl ResolvedPlaylist {
    /// A playlist that contributes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_from_text() {
        assert_eq!(SortOrder::from_order_text("random"), SortOrder::Random);
        assert_eq!(SortOrder::from_order_text(" random "), SortOrder::Random);
        assert_eq!(SortOrder::from_order_text("episode"), SortOrder::Episode);
        assert_eq!(SortOrder::from_order_text("title"), SortOrder::Episode);
    }

    #[test]
    fn test_with_duration_keeps_metadata() {
        let raw = RawEpisode {
            show_title: "Show".to_string(),
            season: 2,
            episode_number: 7,
            title: "Pilot".to_string(),
            file_path: "/tv/show/s02e07.mkv".to_string(),
        };

        let episode = raw.with_duration(1320);
        assert_eq!(episode.show_title, "Show");
        assert_eq!(episode.season, 2);
        assert_eq!(episode.episode_number, 7);
        assert_eq!(episode.duration_seconds, 1320);
    }
}
