//! Kodi video database (MyVideosNNN.db) access

use crate::channel::{DurationLookup, EpisodeLibrary, MediaSource};
use crate::model::RawEpisode;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};

const EPISODES_FOR_SHOW: &str = r#"
    SELECT strTitle, CAST(c12 AS INTEGER), CAST(c13 AS INTEGER), c00, strPath, strFileName
    FROM episode_view
    WHERE strTitle = ?1
    ORDER BY CAST(c12 AS INTEGER), CAST(c13 AS INTEGER)
"#;

const VIDEO_DURATION: &str = r#"
    SELECT sd.iVideoDuration
    FROM streamdetails sd
    JOIN files f ON f.idFile = sd.idFile
    JOIN path p ON p.idPath = f.idPath
    WHERE f.strFileName = ?1 AND p.strPath = ?2 AND sd.iStreamType = 0
    LIMIT 1
"#;

/// Read-only handle on a Kodi video database
pub struct KodiVideoDb {
    conn: Connection,
}

impl KodiVideoDb {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("video database not found at {}", path.display());
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open video database at {}", path.display()))?;
        Ok(Self { conn })
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl EpisodeLibrary for KodiVideoDb {
    fn episodes_for_show(&self, show_title: &str) -> Result<Vec<RawEpisode>> {
        let mut stmt = self.conn.prepare(EPISODES_FOR_SHOW)?;
        let rows = stmt.query_map(params![show_title], |row| {
            let path: Option<String> = row.get(4)?;
            let file_name: Option<String> = row.get(5)?;
            Ok(RawEpisode {
                show_title: row
                    .get::<_, Option<String>>(0)?
                    .unwrap_or_else(|| "Unknown".to_string()),
                season: to_u32(row.get(1)?),
                episode_number: to_u32(row.get(2)?),
                title: row
                    .get::<_, Option<String>>(3)?
                    .unwrap_or_else(|| "Unknown".to_string()),
                file_path: format!(
                    "{}{}",
                    path.unwrap_or_default(),
                    file_name.unwrap_or_default()
                ),
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        log::debug!("Found {} episodes for show {}", out.len(), show_title);
        Ok(out)
    }
}

impl DurationLookup for KodiVideoDb {
    fn lookup_duration(&self, file_path: &str) -> Result<Option<u32>> {
        let (dir, file_name) = split_file_path(file_path);
        let duration: Option<Option<i64>> = self
            .conn
            .query_row(VIDEO_DURATION, params![file_name, dir], |row| row.get(0))
            .optional()?;
        Ok(duration.flatten().map(|secs| to_u32(Some(secs))))
    }
}

/// Opens a fresh [`KodiVideoDb`] connection for every generation run
#[derive(Debug, Clone)]
pub struct KodiVideoSource {
    db_path: PathBuf,
}

impl KodiVideoSource {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

impl MediaSource for KodiVideoSource {
    type Session = KodiVideoDb;

    fn open(&self) -> Result<KodiVideoDb> {
        KodiVideoDb::open(&self.db_path)
    }
}

/// Split a file path into Kodi's `(strPath, strFileName)`; the directory keeps its separator
fn split_file_path(file_path: &str) -> (String, &str) {
    match file_path.rfind(|c: char| c == '/' || c == '\\') {
        Some(idx) => (file_path[..=idx].to_string(), &file_path[idx + 1..]),
        None => ("/".to_string(), file_path),
    }
}

fn to_u32(value: Option<i64>) -> u32 {
    value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
}
