//! `special://` path translation and playlist discovery

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of Kodi smart playlists
pub const PLAYLIST_EXTENSION: &str = ".xsp";

const SPECIAL_PROFILE: &str = "special://profile/";
const SPECIAL_DATABASE: &str = "special://database/";
const MULTIPATH: &str = "multipath://";

/// Folders searched for smart playlists, in priority order
const PLAYLIST_DIRS: [&str; 2] = [
    "special://profile/playlists/video/",
    "special://profile/playlists/mixed/",
];

/// Location of a Kodi profile (the `userdata` directory)
#[derive(Debug, Clone)]
pub struct KodiPaths {
    home: PathBuf,
}

impl KodiPaths {
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Map a `special://` URL onto the filesystem; other paths pass through
    pub fn translate(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix(SPECIAL_PROFILE) {
            self.home.join(rest)
        } else if let Some(rest) = path.strip_prefix(SPECIAL_DATABASE) {
            self.home.join("Database").join(rest)
        } else {
            PathBuf::from(path)
        }
    }

    /// Turn a stored playlist reference into a single `.xsp` reference.
    ///
    /// `multipath://` sources are decoded and their first `.xsp` member is
    /// taken. Bare names are looked up in the video, then mixed, playlist
    /// folders. Returns `None` when a multipath holds no smart playlist.
    pub fn normalize_reference(&self, reference: &str) -> Option<String> {
        if let Some(encoded) = reference.strip_prefix(MULTIPATH) {
            let decoded = match urlencoding::decode(encoded) {
                Ok(decoded) => decoded.into_owned(),
                Err(e) => {
                    log::error!("Cannot decode multipath {}: {}", reference, e);
                    return None;
                }
            };
            let found = decoded
                .split('/')
                .find(|part| part.ends_with(PLAYLIST_EXTENSION))
                .map(str::to_string);
            if found.is_none() {
                log::error!("No valid .xsp path in multipath {}", reference);
            }
            return found.and_then(|name| self.normalize_reference(&name));
        }

        if reference.starts_with("special://") {
            return Some(reference.to_string());
        }

        for base in PLAYLIST_DIRS {
            let candidate = format!("{}{}", base, reference);
            if self.translate(&candidate).exists() {
                return Some(candidate);
            }
        }
        Some(reference.to_string())
    }

    /// All smart playlists in the playlist folders, as `special://` references
    pub fn discover_playlists(&self) -> Vec<String> {
        let mut playlists = Vec::new();

        for base in PLAYLIST_DIRS {
            let dir = self.translate(base);
            if !dir.is_dir() {
                continue;
            }

            let mut found: Vec<String> = WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
                .filter(|name| name.ends_with(PLAYLIST_EXTENSION))
                .map(|name| format!("{}{}", base, name))
                .collect();
            found.sort();
            playlists.extend(found);
        }

        if playlists.is_empty() {
            log::warn!("No .xsp playlists found in {:?}", PLAYLIST_DIRS);
        }
        playlists
    }
}

/// Last path segment of a playlist reference, for display
pub fn display_name(reference: &str) -> &str {
    reference
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_translate() {
        let paths = KodiPaths::new(PathBuf::from("/home/me/.kodi/userdata"));
        assert_eq!(
            paths.translate("special://profile/playlists/video/a.xsp"),
            PathBuf::from("/home/me/.kodi/userdata/playlists/video/a.xsp")
        );
        assert_eq!(
            paths.translate("special://database/MyVideos131.db"),
            PathBuf::from("/home/me/.kodi/userdata/Database/MyVideos131.db")
        );
        assert_eq!(paths.translate("/abs/x.xsp"), PathBuf::from("/abs/x.xsp"));
    }

    #[test]
    fn test_normalize_multipath() {
        let paths = KodiPaths::new(PathBuf::from("/k"));
        let reference = "multipath://special%3a%2f%2fprofile%2fplaylists%2fvideo%2fcartoons.xsp/";
        assert_eq!(
            paths.normalize_reference(reference).as_deref(),
            Some("cartoons.xsp")
        );
        assert_eq!(paths.normalize_reference("multipath://%2ftv%2f"), None);
    }

    #[test]
    fn test_normalize_bare_name_prefers_video_folder() {
        let temp = TempDir::new().unwrap();
        let video = temp.path().join("playlists/video");
        let mixed = temp.path().join("playlists/mixed");
        fs::create_dir_all(&video).unwrap();
        fs::create_dir_all(&mixed).unwrap();
        fs::write(mixed.join("only_mixed.xsp"), "<smartplaylist/>").unwrap();
        fs::write(video.join("both.xsp"), "<smartplaylist/>").unwrap();
        fs::write(mixed.join("both.xsp"), "<smartplaylist/>").unwrap();

        let paths = KodiPaths::new(temp.path().to_path_buf());
        assert_eq!(
            paths.normalize_reference("both.xsp").as_deref(),
            Some("special://profile/playlists/video/both.xsp")
        );
        assert_eq!(
            paths.normalize_reference("only_mixed.xsp").as_deref(),
            Some("special://profile/playlists/mixed/only_mixed.xsp")
        );
        assert_eq!(
            paths.normalize_reference("missing.xsp").as_deref(),
            Some("missing.xsp")
        );
    }

    #[test]
    fn test_discover_playlists() {
        let temp = TempDir::new().unwrap();
        let video = temp.path().join("playlists/video");
        fs::create_dir_all(&video).unwrap();
        fs::write(video.join("b.xsp"), "").unwrap();
        fs::write(video.join("a.xsp"), "").unwrap();
        fs::write(video.join("notes.txt"), "").unwrap();

        let paths = KodiPaths::new(temp.path().to_path_buf());
        assert_eq!(
            paths.discover_playlists(),
            vec![
                "special://profile/playlists/video/a.xsp",
                "special://profile/playlists/video/b.xsp",
            ]
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("special://profile/playlists/video/a.xsp"), "a.xsp");
        assert_eq!(display_name("a.xsp"), "a.xsp");
    }
}
