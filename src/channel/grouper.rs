//! Show grouping: partitions resolved episodes into per-show buckets

use super::source::DurationLookup;
use crate::model::{Episode, RawEpisode, ResolvedPlaylist, SkipReason, SkipRecord, SortOrder};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Episodes of one show, in playback order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowBucket {
    pub show_title: String,
    pub episodes: Vec<Episode>,
}

impl ShowBucket {
    fn new(show_title: String) -> Self {
        Self {
            show_title,
            episodes: Vec::new(),
        }
    }

    /// Build a bucket directly from already-resolved episodes
    pub fn from_episodes(show_title: impl Into<String>, episodes: Vec<Episode>) -> Self {
        Self {
            show_title: show_title.into(),
            episodes,
        }
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Result of grouping: buckets in first-encounter order plus the skip side channel
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub buckets: Vec<ShowBucket>,
    pub skipped: Vec<SkipRecord>,
}

impl Grouping {
    /// Total schedulable episodes across all buckets
    pub fn episode_count(&self) -> usize {
        self.buckets.iter().map(ShowBucket::len).sum()
    }

    pub fn show_titles(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.show_title.as_str()).collect()
    }
}

/// Group resolved playlists into show buckets.
///
/// Every episode's duration is looked up by file path. Episodes whose
/// duration is absent, zero, or whose lookup fails are excluded and
/// reported as skip records; the rest keep resolver order. A `random`
/// playlist's episodes are shuffled before they are added, so only that
/// playlist's contribution to a bucket is reordered.
///
/// A file selected by more than one playlist is grouped (or skipped)
/// only on its first appearance.
pub fn group_episodes<D, R>(
    channel_number: &str,
    playlists: Vec<ResolvedPlaylist>,
    lookup: &D,
    rng: &mut R,
) -> Grouping
where
    D: DurationLookup + ?Sized,
    R: Rng + ?Sized,
{
    let mut grouping = Grouping::default();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = 0;

    for playlist in playlists {
        let mut episodes = playlist.episodes;
        if playlist.sort_order == SortOrder::Random {
            episodes.shuffle(rng);
            log::debug!("Shuffled {} episodes of a random playlist", episodes.len());
        }

        for raw in episodes {
            if !seen.insert(raw.file_path.clone()) {
                log::debug!("Ignoring repeated episode {}", raw.file_path);
                duplicates += 1;
                continue;
            }

            let slot = *index.entry(raw.show_title.clone()).or_insert_with(|| {
                grouping.buckets.push(ShowBucket::new(raw.show_title.clone()));
                grouping.buckets.len() - 1
            });

            match resolve_duration(channel_number, raw, lookup) {
                Ok(episode) => grouping.buckets[slot].episodes.push(episode),
                Err(record) => grouping.skipped.push(record),
            }
        }
    }

    if duplicates > 0 {
        log::info!(
            "Ignored {} episodes selected by more than one playlist of channel {}",
            duplicates,
            channel_number
        );
    }

    log::info!(
        "Grouped {} episodes into {} shows for channel {} ({} skipped): {:?}",
        grouping.episode_count(),
        grouping.buckets.len(),
        channel_number,
        grouping.skipped.len(),
        grouping.show_titles()
    );

    grouping
}

fn resolve_duration<D>(
    channel_number: &str,
    raw: RawEpisode,
    lookup: &D,
) -> Result<Episode, SkipRecord>
where
    D: DurationLookup + ?Sized,
{
    match lookup.lookup_duration(&raw.file_path) {
        Ok(Some(seconds)) if seconds > 0 => {
            log::debug!("Found duration {}s for {}", seconds, raw.file_path);
            Ok(raw.with_duration(seconds))
        }
        Ok(_) => {
            log::warn!(
                "No duration found for {}, skipping due to zero duration",
                raw.file_path
            );
            Err(SkipRecord::new(channel_number, &raw, SkipReason::ZeroDuration))
        }
        Err(e) => {
            log::error!("Error querying duration for {}: {:#}", raw.file_path, e);
            Err(SkipRecord::new(channel_number, &raw, SkipReason::LookupError))
        }
    }
}
