//! Main channel generation pipeline

use super::config::GenerationConfig;
use crate::channel::{encode_playlist, group_episodes, MediaSource, RoundRobinScheduler};
use crate::error::GenerateError;
use crate::kodi::{KodiPaths, SmartPlaylistResolver, PLAYLIST_EXTENSION};
use crate::model::ResolvedPlaylist;
use crate::store::Storage;
use crate::ui::{percent, LogProgress, Progress};
use crate::validation::{validate_schedule, OrderMismatch};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::PathBuf;

/// Summary of a written channel playlist
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub channel: String,
    pub path: PathBuf,
    pub entries: usize,
    pub skipped: usize,
    pub mismatches: Vec<OrderMismatch>,
}

/// How a generation run ended when nothing went wrong
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// The playlist file was written
    Written(GenerationReport),

    /// The channel has no playlists
    NoPlaylists,

    /// The playlists resolved to no shows
    NoEpisodes,

    /// Shows were found but none had a playable episode
    NoEntries,
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Written(_))
    }

    /// Message shown to the user at the end of a run
    pub fn message(&self, number: &str) -> String {
        match self {
            GenerationOutcome::Written(_) => format!("Channel {} Creation Success", number),
            GenerationOutcome::NoPlaylists => format!("No playlists for Channel {}.", number),
            GenerationOutcome::NoEpisodes => "No episodes found in selected playlists.".to_string(),
            GenerationOutcome::NoEntries => "No entries added to M3U file.".to_string(),
        }
    }
}

/// Builds channel playlists from their smart playlists
pub struct ChannelGenerator<'a, S: MediaSource> {
    kodi: &'a KodiPaths,
    storage: &'a Storage,
    source: S,
}

impl<'a, S: MediaSource> ChannelGenerator<'a, S> {
    pub fn new(kodi: &'a KodiPaths, storage: &'a Storage, source: S) -> Self {
        Self {
            kodi,
            storage,
            source,
        }
    }

    /// Regenerate one channel's playlist
    pub fn generate(
        &self,
        number: &str,
        progress: &mut dyn Progress,
    ) -> Result<GenerationOutcome, GenerateError> {
        let config = GenerationConfig::from_settings(&self.storage.load_settings());
        log::info!("Generating channel {} with entry cap {}", number, config.entry_cap);

        let channel = self
            .storage
            .find_channel(number)
            .ok_or_else(|| GenerateError::ChannelNotFound(number.to_string()))?;
        log::info!("Rules for channel {}: {:?}", number, channel.rules);

        if channel.playlists.is_empty() {
            log::info!("No playlists for channel {}, skipping M3U generation", number);
            return Ok(GenerationOutcome::NoPlaylists);
        }

        let session = self.source.open().map_err(GenerateError::OpenSource)?;
        let resolver = SmartPlaylistResolver::new(self.kodi, &session, config.match_semantics);

        let total = channel.playlists.len();
        let mut resolved: Vec<ResolvedPlaylist> = Vec::with_capacity(total);
        for (i, reference) in channel.playlists.iter().enumerate() {
            progress.update(
                percent(i, total) / 2,
                &format!("Processing playlist {}/{}...", i + 1, total),
            );
            if !is_smart_playlist_reference(reference) {
                log::warn!("Skipping non-smart playlist {}", reference);
                continue;
            }
            resolved.push(resolver.resolve(reference));
        }

        let mut rng = StdRng::seed_from_u64(config.base_seed);
        let grouping = group_episodes(number, resolved, &session, &mut rng);
        drop(session);

        self.storage
            .append_skipped(&grouping.skipped)
            .map_err(GenerateError::SkipLog)?;

        if grouping.buckets.is_empty() {
            log::warn!("No episodes found for channel {}", number);
            return Ok(GenerationOutcome::NoEpisodes);
        }

        progress.update(50, "Building M3U...");
        let schedule = RoundRobinScheduler::new(&grouping.buckets)
            .run(&config.schedule_config(channel.rules.randomize_shows));
        let scheduled = schedule.len();
        for (i, entry) in schedule.entries.iter().enumerate() {
            log::debug!(
                "Entry {}: {} S{:02}E{:02} ({})",
                i + 1,
                entry.show_title,
                entry.episode.season,
                entry.episode.episode_number,
                entry.episode.file_path
            );
            progress.update(
                50 + percent(i + 1, scheduled) * 2 / 5,
                &format!("Adding episode {}/{}...", i + 1, scheduled),
            );
        }
        let encoded = encode_playlist(&schedule.entries);
        let mismatches = validate_schedule(&schedule, &encoded);

        if schedule.is_empty() {
            log::warn!("No entries added to M3U for channel {}", number);
            return Ok(GenerationOutcome::NoEntries);
        }

        progress.update(90, "Writing M3U...");
        let organizer = self.storage.organizer();
        let path = organizer
            .write_playlist(number, &encoded)
            .map_err(|source| GenerateError::Write {
                path: organizer.playlist_path(number),
                source,
            })?;
        progress.update(100, "Done");

        log::info!(
            "Channel {}: wrote {} entries to {:?}",
            number,
            schedule.len(),
            path
        );
        Ok(GenerationOutcome::Written(GenerationReport {
            channel: number.to_string(),
            path,
            entries: schedule.len(),
            skipped: grouping.skipped.len(),
            mismatches,
        }))
    }

    /// Regenerate several channels in parallel, each run with its own media session
    pub fn generate_all(
        &self,
        numbers: &[String],
    ) -> Vec<(String, Result<GenerationOutcome, GenerateError>)> {
        numbers
            .par_iter()
            .map(|number| {
                let mut progress = LogProgress::new(format!("channel {}", number));
                (number.clone(), self.generate(number, &mut progress))
            })
            .collect()
    }
}

fn is_smart_playlist_reference(reference: &str) -> bool {
    reference.ends_with(PLAYLIST_EXTENSION) || reference.starts_with("multipath://")
}
