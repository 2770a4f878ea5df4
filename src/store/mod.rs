//! JSON-backed channel, settings and skip-log stores
//!
//! Every store file is read whole, modified in memory and rewritten
//! whole. All of that happens under one lock, so two writers in the
//! same process never clobber each other's updates.

use crate::error::StoreError;
use crate::export::DataDirOrganizer;
use crate::model::{sort_channels, Channel, Settings, SkipRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Access to the add-on's data directory
pub struct Storage {
    organizer: DataDirOrganizer,
    lock: Mutex<()>,
}

impl Storage {
    pub fn new(organizer: DataDirOrganizer) -> Self {
        Self {
            organizer,
            lock: Mutex::new(()),
        }
    }

    pub fn organizer(&self) -> &DataDirOrganizer {
        &self.organizer
    }

    /// Snapshot of all channels, sorted by number. Read failures yield an empty list.
    pub fn load_channels(&self) -> Vec<Channel> {
        let _guard = self.guard();
        self.read_channels()
    }

    /// Find one channel by number
    pub fn find_channel(&self, number: &str) -> Option<Channel> {
        self.load_channels().into_iter().find(|ch| ch.number == number)
    }

    /// Read-modify-write of the channel list.
    ///
    /// `f` runs under the store lock. If it fails nothing is written;
    /// otherwise the list is sorted and saved.
    pub fn update_channels<T, E>(
        &self,
        f: impl FnOnce(&mut Vec<Channel>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.guard();
        let mut channels = self.read_channels();
        let out = f(&mut channels)?;
        sort_channels(&mut channels);
        write_json(&self.organizer, &self.organizer.channels_path(), &channels)?;
        log::info!(
            "Saved {} channels to {:?}",
            channels.len(),
            self.organizer.channels_path()
        );
        Ok(out)
    }

    /// Current settings, defaults when missing or unreadable
    pub fn load_settings(&self) -> Settings {
        let _guard = self.guard();
        self.read_settings()
    }

    /// Read-modify-write of settings.json
    pub fn update_settings(&self, f: impl FnOnce(&mut Settings)) -> Result<Settings, StoreError> {
        let _guard = self.guard();
        let mut settings = self.read_settings();
        f(&mut settings);
        write_json(&self.organizer, &self.organizer.settings_path(), &settings)?;
        log::info!("Saved settings to {:?}", self.organizer.settings_path());
        Ok(settings)
    }

    /// Append skip records to skipped_files.json.
    ///
    /// Existing entries are kept as raw JSON, whatever shape they have.
    pub fn append_skipped(&self, records: &[SkipRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let _guard = self.guard();
        let path = self.organizer.skipped_path();
        let mut existing: Vec<Value> = read_json(&path);
        for record in records {
            let value = serde_json::to_value(record).map_err(|source| StoreError::Serialize {
                path: path.clone(),
                source,
            })?;
            existing.push(value);
        }
        write_json(&self.organizer, &path, &existing)?;
        log::info!("Logged {} skipped files to {:?}", records.len(), path);
        Ok(())
    }

    fn read_channels(&self) -> Vec<Channel> {
        let mut channels: Vec<Channel> = read_json(&self.organizer.channels_path());
        for channel in &mut channels {
            if channel.migrate_legacy_rules() {
                log::info!(
                    "Migrated legacy randomize_shows key for channel {}",
                    channel.number
                );
            }
        }
        sort_channels(&mut channels);
        channels
    }

    fn read_settings(&self) -> Settings {
        let mut settings: Settings = read_json(&self.organizer.settings_path());
        settings.sanitize();
        settings
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }

    let parsed = fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|text| serde_json::from_str(&text).map_err(anyhow::Error::from));
    match parsed {
        Ok(value) => value,
        Err(e) => {
            log::error!("Failed to load {:?}: {}", path, e);
            T::default()
        }
    }
}

fn write_json<T: Serialize + ?Sized>(
    organizer: &DataDirOrganizer,
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    organizer.init()?;
    let text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
