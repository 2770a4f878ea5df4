//! Process-wide paths, resolved once and passed by reference

use crate::export::DataDirOrganizer;
use crate::kodi::KodiPaths;
use crate::store::Storage;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Add-on id, used as the data directory name under `addon_data`
pub const ADDON_ID: &str = "script.smart.channels";

/// Video database file name of current Kodi releases
pub const VIDEO_DB_NAME: &str = "MyVideos131.db";

/// Resolved locations of the Kodi profile, the data directory and the video database
#[derive(Debug, Clone)]
pub struct AppContext {
    pub kodi: KodiPaths,
    pub data_dir: PathBuf,
    pub video_db: PathBuf,
}

impl AppContext {
    /// Build a context from an explicit Kodi home, with the remaining paths defaulted beneath it
    pub fn new(kodi_home: PathBuf) -> Self {
        let data_dir = kodi_home.join("addon_data").join(ADDON_ID);
        let video_db = kodi_home.join("Database").join(VIDEO_DB_NAME);
        Self {
            kodi: KodiPaths::new(kodi_home),
            data_dir,
            video_db,
        }
    }

    /// Resolve paths from optional overrides. `~` is expanded in every override.
    pub fn resolve(
        kodi_home: Option<&str>,
        data_dir: Option<&str>,
        video_db: Option<&str>,
    ) -> Result<Self> {
        let home = match kodi_home {
            Some(path) => expand(path),
            None => default_kodi_home()?,
        };

        let mut context = Self::new(home);
        if let Some(path) = data_dir {
            context.data_dir = expand(path);
        }
        if let Some(path) = video_db {
            context.video_db = expand(path);
        }

        log::debug!(
            "Kodi home {:?}, data dir {:?}, video db {:?}",
            context.kodi.home(),
            context.data_dir,
            context.video_db
        );
        Ok(context)
    }

    pub fn kodi_home(&self) -> &Path {
        self.kodi.home()
    }

    /// Channel, settings and skip-log storage in the data directory
    pub fn storage(&self) -> Storage {
        Storage::new(DataDirOrganizer::new(self.data_dir.clone()))
    }
}

/// `~/.kodi/userdata`
pub fn default_kodi_home() -> Result<PathBuf> {
    let home = dirs::home_dir().context("unable to resolve home directory")?;
    Ok(home.join(".kodi").join("userdata"))
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_default_under_kodi_home() {
        let context = AppContext::new(PathBuf::from("/srv/kodi"));

        assert_eq!(context.kodi_home(), Path::new("/srv/kodi"));
        assert_eq!(
            context.data_dir,
            PathBuf::from("/srv/kodi/addon_data/script.smart.channels")
        );
        assert_eq!(
            context.video_db,
            PathBuf::from("/srv/kodi/Database/MyVideos131.db")
        );
    }

    #[test]
    fn test_overrides() {
        let context =
            AppContext::resolve(Some("/srv/kodi"), Some("/tmp/channels"), Some("/db/v.db")).unwrap();

        assert_eq!(context.kodi_home(), Path::new("/srv/kodi"));
        assert_eq!(context.data_dir, PathBuf::from("/tmp/channels"));
        assert_eq!(context.video_db, PathBuf::from("/db/v.db"));
    }
}
