#![allow(dead_code)]

use anyhow::Result;
use smart_channels::channel::{DurationLookup, EpisodeLibrary, MediaSource};
use smart_channels::error::StoreError;
use smart_channels::export::DataDirOrganizer;
use smart_channels::kodi::KodiPaths;
use smart_channels::model::{Channel, RawEpisode};
use smart_channels::Storage;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// In-memory episode library with per-file durations
#[derive(Debug, Clone, Default)]
pub struct FakeSource {
    episodes: Vec<RawEpisode>,
    durations: HashMap<String, u32>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episode(
        mut self,
        show: &str,
        season: u32,
        episode: u32,
        title: &str,
        duration: u32,
    ) -> Self {
        let file_path = format!("/tv/{}/S{:02}E{:02}.mkv", show, season, episode);
        self.durations.insert(file_path.clone(), duration);
        self.episodes.push(RawEpisode {
            show_title: show.to_string(),
            season,
            episode_number: episode,
            title: title.to_string(),
            file_path,
        });
        self
    }
}

impl EpisodeLibrary for FakeSource {
    fn episodes_for_show(&self, show_title: &str) -> Result<Vec<RawEpisode>> {
        let mut found: Vec<RawEpisode> = self
            .episodes
            .iter()
            .filter(|e| e.show_title == show_title)
            .cloned()
            .collect();
        found.sort_by_key(|e| (e.season, e.episode_number));
        Ok(found)
    }
}

impl DurationLookup for FakeSource {
    fn lookup_duration(&self, file_path: &str) -> Result<Option<u32>> {
        Ok(self.durations.get(file_path).copied())
    }
}

impl MediaSource for FakeSource {
    type Session = FakeSource;

    fn open(&self) -> Result<FakeSource> {
        Ok(self.clone())
    }
}

/// Temporary Kodi profile plus add-on data directory
pub struct Workspace {
    pub temp: TempDir,
    pub kodi: KodiPaths,
    pub storage: Storage,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("userdata");
        fs::create_dir_all(&home).unwrap();
        let storage = Storage::new(DataDirOrganizer::new(temp.path().join("data")));
        Self {
            kodi: KodiPaths::new(home),
            storage,
            temp,
        }
    }

    pub fn home(&self) -> &Path {
        self.kodi.home()
    }

    /// Write `playlists/video/<file>` selecting the given shows; returns its reference
    pub fn add_playlist(&self, file: &str, shows: &[&str], order: &str) -> String {
        let dir = self.home().join("playlists").join("video");
        fs::create_dir_all(&dir).unwrap();

        let values: String = shows
            .iter()
            .map(|show| format!("        <value>{}</value>\n", show))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>
<smartplaylist type="episodes">
    <name>{}</name>
    <match>all</match>
    <rule field="tvshow" operator="is">
{}    </rule>
    <order direction="ascending">{}</order>
</smartplaylist>
"#,
            file, values, order
        );
        fs::write(dir.join(file), xml).unwrap();
        format!("special://profile/playlists/video/{}", file)
    }

    pub fn add_channel(&self, number: &str, name: &str, playlists: Vec<String>) {
        let channel = Channel::new(number.to_string(), name.to_string(), playlists);
        self.storage
            .update_channels(|channels| {
                channels.push(channel);
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    pub fn set_upper_limit(&self, limit: usize) {
        self.storage
            .update_settings(|s| s.playlist_upper_limit = limit)
            .unwrap();
    }

    pub fn read_playlist(&self, number: &str) -> String {
        fs::read_to_string(self.storage.organizer().playlist_path(number)).unwrap()
    }
}

/// Two short shows used throughout: Alpha has two episodes, Bravo one
pub fn alpha_bravo() -> FakeSource {
    FakeSource::new()
        .episode("Alpha", 1, 1, "Pilot", 1300)
        .episode("Alpha", 1, 2, "Second", 1310)
        .episode("Bravo", 1, 1, "Start", 600)
}
