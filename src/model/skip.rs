use super::RawEpisode;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Why an episode was left out of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No duration, or a duration of zero, in the video database
    ZeroDuration,

    /// The duration query itself failed
    LookupError,
}

/// Entry appended to skipped_files.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub channel: String,
    pub file_path: String,
    pub show_title: String,
    pub season: u32,
    pub episode: u32,
    pub title: String,
    pub reason: SkipReason,

    /// Local time, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,
}

impl SkipRecord {
    /// Record an excluded episode, stamped with the current local time
    pub fn new(channel: &str, episode: &RawEpisode, reason: SkipReason) -> Self {
        Self {
            channel: channel.to_string(),
            file_path: episode.file_path.clone(),
            show_title: episode.show_title.clone(),
            season: episode.season,
            episode: episode.episode_number,
            title: episode.title.clone(),
            reason,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
