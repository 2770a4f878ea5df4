//! Data directory layout and playlist artifact writing

use crate::error::StoreError;
use crate::model::playlist_file_name;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const CHANNELS_FILE: &str = "channels.json";
const SETTINGS_FILE: &str = "settings.json";
const SKIPPED_FILE: &str = "skipped_files.json";

/// Knows where every store file and channel playlist lives
#[derive(Debug, Clone)]
pub struct DataDirOrganizer {
    root: PathBuf,
}

impl DataDirOrganizer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the data directory if needed
    pub fn init(&self) -> Result<(), StoreError> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|source| StoreError::CreateDir {
                path: self.root.clone(),
                source,
            })?;
            log::info!("Created data folder: {:?}", self.root);
        }
        Ok(())
    }

    pub fn channels_path(&self) -> PathBuf {
        self.root.join(CHANNELS_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn skipped_path(&self) -> PathBuf {
        self.root.join(SKIPPED_FILE)
    }

    /// Path of the generated playlist for a channel
    pub fn playlist_path(&self, number: &str) -> PathBuf {
        self.root.join(playlist_file_name(number))
    }

    /// Replace a channel's playlist with `content`.
    ///
    /// The existing file is deleted first. The new one is written to a
    /// temporary file and renamed into place; if that fails the file is
    /// written directly. The result is verified by checking it exists.
    pub fn write_playlist(&self, number: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.playlist_path(number);
        log::info!("Attempting to write M3U file to {:?}", path);

        fs::create_dir_all(&self.root)?;
        if path.exists() {
            fs::remove_file(&path)?;
            log::info!("Deleted existing M3U file {:?}", path);
        }

        match write_via_rename(&path, content) {
            Ok(()) => log::info!("Wrote M3U file {:?}", path),
            Err(e) => {
                log::error!("Primary write failed for {:?}: {}", path, e);
                fs::write(&path, content)?;
                log::info!("Wrote M3U file {:?} with direct I/O", path);
            }
        }

        if !path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("M3U file not found at {:?} after writing", path),
            ));
        }
        log::info!("Confirmed M3U file exists at {:?}", path);
        Ok(path)
    }

    /// Delete a channel's playlist. Returns whether a file was removed.
    pub fn remove_playlist(&self, number: &str) -> bool {
        let path = self.playlist_path(number);
        if !path.exists() {
            return false;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Deleted M3U file {:?}", path);
                true
            }
            Err(e) => {
                log::error!("Failed to delete M3U file {:?}: {}", path, e);
                false
            }
        }
    }

    /// Move a playlist to follow a renumbered channel
    pub fn rename_playlist(&self, old_number: &str, new_number: &str) -> io::Result<()> {
        let from = self.playlist_path(old_number);
        if old_number == new_number || !from.exists() {
            return Ok(());
        }
        let to = self.playlist_path(new_number);
        fs::rename(&from, &to)?;
        log::info!("Moved M3U file {:?} to {:?}", from, to);
        Ok(())
    }
}

fn write_via_rename(path: &Path, content: &str) -> io::Result<()> {
    let tmp = path.with_extension("m3u.tmp");
    let written = write_and_rename(&tmp, path, content);

    if written.is_err() && tmp.exists() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_and_rename(tmp: &Path, path: &Path, content: &str) -> io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)
}
