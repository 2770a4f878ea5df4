//! Resolution of playlist references into episode lists

use super::paths::{KodiPaths, PLAYLIST_EXTENSION};
use super::playlists::{parse_smart_playlist, MatchMode, SmartPlaylist};
use crate::channel::EpisodeLibrary;
use crate::model::{MatchSemantics, RawEpisode, ResolvedPlaylist, SortOrder};
use anyhow::Result;
use std::collections::HashSet;

/// Resolves smart playlist references against an episode library.
///
/// Resolution never fails: missing files, playlists of the wrong kind
/// and library errors are logged and yield an empty playlist.
pub struct SmartPlaylistResolver<'a, L: EpisodeLibrary + ?Sized> {
    paths: &'a KodiPaths,
    library: &'a L,
    semantics: MatchSemantics,
}

impl<'a, L: EpisodeLibrary + ?Sized> SmartPlaylistResolver<'a, L> {
    pub fn new(paths: &'a KodiPaths, library: &'a L, semantics: MatchSemantics) -> Self {
        Self {
            paths,
            library,
            semantics,
        }
    }

    pub fn resolve(&self, reference: &str) -> ResolvedPlaylist {
        match self.try_resolve(reference) {
            Ok(resolved) => resolved,
            Err(e) => {
                log::error!("Error querying playlist {}: {:#}", reference, e);
                ResolvedPlaylist::empty()
            }
        }
    }

    fn try_resolve(&self, reference: &str) -> Result<ResolvedPlaylist> {
        let Some(normalized) = self.paths.normalize_reference(reference) else {
            return Ok(ResolvedPlaylist::empty());
        };

        let fs_path = self.paths.translate(&normalized);
        log::debug!("Processing playlist: {:?}", fs_path);
        if !fs_path.exists() {
            log::error!("Playlist {:?} does not exist", fs_path);
            return Ok(ResolvedPlaylist::empty());
        }
        if !normalized.ends_with(PLAYLIST_EXTENSION) {
            log::warn!("Playlist {} is not a smart playlist", normalized);
            return Ok(ResolvedPlaylist::empty());
        }

        let playlist = parse_smart_playlist(&fs_path)?;
        if !playlist.is_episode_playlist() {
            log::warn!(
                "Playlist {} is not an episode playlist (type={:?})",
                normalized,
                playlist.playlist_type
            );
            return Ok(ResolvedPlaylist::empty());
        }

        let mut episodes = self.select_episodes(&playlist)?;
        if episodes.is_empty() {
            log::warn!("No episodes found in {}", normalized);
        } else {
            log::info!("Total episodes found in {}: {}", normalized, episodes.len());
        }

        if playlist.order == SortOrder::Episode {
            episodes.sort_by(|a, b| {
                (&a.show_title, a.season, a.episode_number).cmp(&(
                    &b.show_title,
                    b.season,
                    b.episode_number,
                ))
            });
        }

        Ok(ResolvedPlaylist {
            sort_order: playlist.order,
            episodes,
        })
    }

    /// Episodes selected by the playlist's `tvshow is` rules
    fn select_episodes(&self, playlist: &SmartPlaylist) -> Result<Vec<RawEpisode>> {
        for rule in playlist.rules.iter().filter(|r| !r.is_show_selector()) {
            log::debug!(
                "Ignoring rule field={} operator={}",
                rule.field,
                rule.operator
            );
        }

        let mut per_rule: Vec<Vec<RawEpisode>> = Vec::new();
        for rule in playlist.show_rules() {
            let mut matched = Vec::new();
            for show in &rule.values {
                let found = self.library.episodes_for_show(show)?;
                if found.is_empty() {
                    log::warn!("No episodes found for TV show {}", show);
                } else {
                    log::info!("Found {} episodes for show {}", found.len(), show);
                }
                matched.extend(found);
            }
            per_rule.push(matched);
        }

        let intersect = match (self.semantics, playlist.match_mode) {
            (MatchSemantics::AsDeclared, MatchMode::All) => true,
            (MatchSemantics::Union, MatchMode::All) => {
                if per_rule.len() > 1 {
                    log::warn!(
                        "Playlist declares match=all across {} show rules; combining them as a union",
                        per_rule.len()
                    );
                }
                false
            }
            (_, MatchMode::One) => false,
        };

        Ok(if intersect {
            intersect_rules(per_rule)
        } else {
            union_rules(per_rule)
        })
    }
}

/// Episodes matched by any rule, first occurrence wins
fn union_rules(per_rule: Vec<Vec<RawEpisode>>) -> Vec<RawEpisode> {
    let mut seen = HashSet::new();
    per_rule
        .into_iter()
        .flatten()
        .filter(|ep| seen.insert(ep.file_path.clone()))
        .collect()
}

/// Episodes matched by every rule, in first-rule order
fn intersect_rules(per_rule: Vec<Vec<RawEpisode>>) -> Vec<RawEpisode> {
    let mut rules = per_rule.into_iter();
    let Some(first) = rules.next() else {
        return Vec::new();
    };

    let others: Vec<HashSet<String>> = rules
        .map(|eps| eps.into_iter().map(|ep| ep.file_path).collect())
        .collect();

    union_rules(vec![first])
        .into_iter()
        .filter(|ep| others.iter().all(|set| set.contains(&ep.file_path)))
        .collect()
}
