use crate::error::ChannelError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Name given to channels created without one
pub const EMPTY_CHANNEL_NAME: &str = "Empty Channel";

/// Advanced per-channel rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRules {
    /// Reshuffle the show order every round instead of sorting by title
    #[serde(default)]
    pub randomize_shows: bool,
}

/// A virtual TV channel as persisted in channels.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel number (digit string, unique key)
    pub number: String,

    /// Display name
    pub name: String,

    /// Smart playlist references, in the order they were added
    #[serde(default)]
    pub playlists: Vec<String>,

    #[serde(default)]
    pub rules: ChannelRules,

    /// Older records kept `randomize_shows` at the top level
    #[serde(default, rename = "randomize_shows", skip_serializing)]
    legacy_randomize_shows: Option<bool>,
}

impl Channel {
    /// Create a new channel with default rules
    pub fn new(number: String, name: String, playlists: Vec<String>) -> Self {
        Self {
            number,
            name,
            playlists,
            rules: ChannelRules::default(),
            legacy_randomize_shows: None,
        }
    }

    /// Fold a legacy top-level `randomize_shows` key into `rules`.
    ///
    /// Returns true if the record carried the legacy key.
    pub fn migrate_legacy_rules(&mut self) -> bool {
        match self.legacy_randomize_shows.take() {
            Some(randomize) => {
                if randomize && !self.rules.randomize_shows {
                    self.rules.randomize_shows = true;
                }
                true
            }
            None => false,
        }
    }

    /// Whether `number` is a plain digit string
    pub fn is_valid_number(number: &str) -> bool {
        !number.is_empty() && number.chars().all(|c| c.is_ascii_digit())
    }

    /// Path of the playlist file name for this channel
    pub fn playlist_file_name(&self) -> String {
        playlist_file_name(&self.number)
    }

    /// One-line summary used by the channel list views
    pub fn summary(&self) -> String {
        format!(
            "Channel {}: {} ({} playlists)",
            self.number,
            self.name,
            self.playlists.len()
        )
    }
}

/// File name of the generated playlist for a channel number
pub fn playlist_file_name(number: &str) -> String {
    format!("channel_{}.m3u", number)
}

/// Order channels numerically; non-numeric numbers sort last, keeping their relative order
pub fn compare_numbers(a: &str, b: &str) -> Ordering {
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn numeric_value(number: &str) -> Option<u128> {
    if Channel::is_valid_number(number) {
        number.parse().ok()
    } else {
        None
    }
}

/// Sort a channel list in store order
pub fn sort_channels(channels: &mut [Channel]) {
    channels.sort_by(|a, b| compare_numbers(&a.number, &b.number));
}

/// Next free channel number: one past the highest numeric channel
pub fn next_channel_number(channels: &[Channel]) -> String {
    let highest = channels
        .iter()
        .filter_map(|ch| numeric_value(&ch.number))
        .max()
        .unwrap_or(0);
    highest.saturating_add(1).to_string()
}

/// Check that `number` is a digit string not used by another channel.
///
/// `exclude` names the channel being renumbered, which may keep its own number.
pub fn check_channel_number(
    number: &str,
    channels: &[Channel],
    exclude: Option<&str>,
) -> Result<(), ChannelError> {
    if !Channel::is_valid_number(number) {
        return Err(ChannelError::InvalidNumber(number.to_string()));
    }
    let taken = channels
        .iter()
        .any(|ch| ch.number == number && Some(ch.number.as_str()) != exclude);
    if taken {
        return Err(ChannelError::DuplicateNumber(number.to_string()));
    }
    Ok(())
}
