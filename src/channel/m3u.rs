//! Extended M3U encoding of a schedule

use super::scheduler::ScheduledEntry;
use crate::model::Episode;

/// First line of every generated playlist
pub const M3U_HEADER: &str = "#EXTM3U";

/// Prefix of the per-entry info line
pub const EXTINF_PREFIX: &str = "#EXTINF:";

/// Display label: `<show> SxxEyy - <title>`
pub fn format_label(show_title: &str, episode: &Episode) -> String {
    format!(
        "{} S{:02}E{:02} - {}",
        show_title, episode.season, episode.episode_number, episode.title
    )
}

/// Render scheduled entries as M3U text.
///
/// Each entry becomes an `#EXTINF:<duration>,<label>` line followed by
/// the file path verbatim. Lines are joined with `\n`, without a
/// trailing newline.
pub fn encode_playlist(entries: &[ScheduledEntry<'_>]) -> String {
    let mut lines = Vec::with_capacity(1 + entries.len() * 2);
    lines.push(M3U_HEADER.to_string());

    for entry in entries {
        lines.push(format!(
            "{}{},{}",
            EXTINF_PREFIX,
            entry.episode.duration_seconds,
            format_label(entry.show_title, entry.episode)
        ));
        lines.push(entry.episode.file_path.clone());
    }

    lines.join("\n")
}

/// Labels of all info lines in an encoded playlist, in order
pub fn info_labels(encoded: &str) -> impl Iterator<Item = &str> {
    encoded
        .lines()
        .filter_map(|line| line.strip_prefix(EXTINF_PREFIX))
        .map(|rest| rest.split_once(',').map_or("", |(_, label)| label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(season: u32, number: u32, title: &str, path: &str) -> Episode {
        Episode {
            show_title: "Show".to_string(),
            season,
            episode_number: number,
            title: title.to_string(),
            file_path: path.to_string(),
            duration_seconds: 1325,
        }
    }

    #[test]
    fn test_label_zero_pads() {
        let ep = episode(1, 3, "The Third", "/x.mkv");
        assert_eq!(format_label("Show", &ep), "Show S01E03 - The Third");

        let ep = episode(12, 104, "Late", "/y.mkv");
        assert_eq!(format_label("Show", &ep), "Show S12E104 - Late");
    }

    #[test]
    fn test_encode_layout() {
        let a = episode(1, 1, "Pilot", "smb://nas/tv/Show/S01E01.mkv");
        let b = episode(1, 2, "Second, Part 1", "/tv/Show/S01E02.mkv");
        let entries = vec![
            ScheduledEntry {
                show_title: "Show",
                episode: &a,
            },
            ScheduledEntry {
                show_title: "Show",
                episode: &b,
            },
        ];

        let text = encode_playlist(&entries);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "#EXTM3U",
                "#EXTINF:1325,Show S01E01 - Pilot",
                "smb://nas/tv/Show/S01E01.mkv",
                "#EXTINF:1325,Show S01E02 - Second, Part 1",
                "/tv/Show/S01E02.mkv",
            ]
        );
        assert!(!text.ends_with('\n'));

        let labels: Vec<&str> = info_labels(&text).collect();
        assert_eq!(labels[1], "Show S01E02 - Second, Part 1");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode_playlist(&[]), "#EXTM3U");
    }
}
