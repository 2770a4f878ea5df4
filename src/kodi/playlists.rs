//! Kodi smart playlist (.xsp) parser
//!
//! Only the parts that matter for channel building are kept: the
//! playlist type, match mode, rules with their values, and the order.

use crate::model::SortOrder;
use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// How a playlist combines its rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every rule must match (`<match>all</match>`, the Kodi default)
    #[default]
    All,

    /// Any rule may match (`<match>one</match>`)
    One,
}

impl MatchMode {
    fn from_text(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("one") {
            MatchMode::One
        } else {
            MatchMode::All
        }
    }
}

/// A single `<rule field=".." operator="..">` with its values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRule {
    pub field: String,
    pub operator: String,
    pub values: Vec<String>,
}

impl PlaylistRule {
    /// Whether this rule selects whole shows by exact title
    pub fn is_show_selector(&self) -> bool {
        self.field == "tvshow" && self.operator == "is"
    }
}

/// Parsed smart playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartPlaylist {
    pub name: Option<String>,

    /// Root `type` attribute (`episodes`, `tvshows`, `movies`, ...)
    pub playlist_type: String,

    pub match_mode: MatchMode,
    pub rules: Vec<PlaylistRule>,
    pub order: SortOrder,
}

impl SmartPlaylist {
    pub fn is_episode_playlist(&self) -> bool {
        self.playlist_type == "episodes"
    }

    /// Rules that select shows by title
    pub fn show_rules(&self) -> impl Iterator<Item = &PlaylistRule> {
        self.rules.iter().filter(|rule| rule.is_show_selector())
    }
}

/// Parse a smart playlist file
pub fn parse_smart_playlist(path: &Path) -> Result<SmartPlaylist> {
    let file =
        File::open(path).with_context(|| format!("Failed to open smart playlist: {:?}", path))?;
    parse_from_reader(Reader::from_reader(BufReader::new(file)))
        .with_context(|| format!("Failed to parse smart playlist: {:?}", path))
}

/// Parse smart playlist XML held in memory
pub fn parse_smart_playlist_str(xml: &str) -> Result<SmartPlaylist> {
    parse_from_reader(Reader::from_reader(xml.as_bytes()))
}

fn parse_from_reader<R: BufRead>(mut reader: Reader<R>) -> Result<SmartPlaylist> {
    reader.config_mut().trim_text(true);

    let mut playlist: Option<SmartPlaylist> = None;
    let mut current_rule: Option<PlaylistRule> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                text.clear();
                match e.name().as_ref() {
                    b"smartplaylist" => playlist = Some(start_playlist(&e)),
                    b"rule" => current_rule = Some(start_rule(&e)),
                    _ => {}
                }
            }

            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"smartplaylist" => playlist = Some(start_playlist(&e)),
                b"rule" => {
                    if let Some(ref mut playlist) = playlist {
                        playlist.rules.push(start_rule(&e));
                    }
                }
                _ => {}
            },

            Ok(Event::Text(e)) => {
                text.push_str(&e.unescape()?);
            }

            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e));
            }

            Ok(Event::End(e)) => {
                if let Some(ref mut playlist) = playlist {
                    match e.name().as_ref() {
                        b"name" if current_rule.is_none() => {
                            playlist.name = Some(text.trim().to_string());
                        }
                        b"match" => playlist.match_mode = MatchMode::from_text(&text),
                        b"order" => playlist.order = SortOrder::from_order_text(&text),
                        b"value" => {
                            if let Some(ref mut rule) = current_rule {
                                rule.values.push(text.trim().to_string());
                            }
                        }
                        b"rule" => {
                            if let Some(rule) = current_rule.take() {
                                playlist.rules.push(rule);
                            }
                        }
                        _ => {}
                    }
                }
                text.clear();
            }

            Ok(Event::Eof) => break,
            Err(e) => bail!(
                "XML error at position {}: {}",
                reader.buffer_position(),
                e
            ),
            _ => {}
        }

        buf.clear();
    }

    match playlist {
        Some(playlist) => Ok(playlist),
        None => bail!("missing <smartplaylist> root element"),
    }
}

fn start_playlist(e: &BytesStart<'_>) -> SmartPlaylist {
    let mut playlist = SmartPlaylist {
        name: None,
        playlist_type: String::new(),
        match_mode: MatchMode::default(),
        rules: Vec::new(),
        order: SortOrder::default(),
    };

    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.as_ref() {
            b"type" => playlist.playlist_type = value.into_owned(),
            // Some hand-written playlists carry match as an attribute
            b"match" => playlist.match_mode = MatchMode::from_text(&value),
            _ => {}
        }
    }

    playlist
}

fn start_rule(e: &BytesStart<'_>) -> PlaylistRule {
    let mut rule = PlaylistRule {
        field: String::new(),
        operator: String::new(),
        values: Vec::new(),
    };

    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        match attr.key.as_ref() {
            b"field" => rule.field = value,
            b"operator" => rule.operator = value,
            _ => {}
        }
    }

    rule
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARTOONS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>
<smartplaylist type="episodes">
    <name>Cartoons</name>
    <match>one</match>
    <rule field="tvshow" operator="is">
        <value>Futurama</value>
        <value>Law &amp; Order</value>
    </rule>
    <rule field="playcount" operator="lessthan">
        <value>1</value>
    </rule>
    <order direction="ascending">random</order>
</smartplaylist>"#;

    #[test]
    fn test_parse_full_playlist() {
        let playlist = parse_smart_playlist_str(CARTOONS).unwrap();

        assert_eq!(playlist.name.as_deref(), Some("Cartoons"));
        assert!(playlist.is_episode_playlist());
        assert_eq!(playlist.match_mode, MatchMode::One);
        assert_eq!(playlist.order, SortOrder::Random);
        assert_eq!(playlist.rules.len(), 2);
        assert_eq!(
            playlist.rules[0].values,
            vec!["Futurama".to_string(), "Law & Order".to_string()]
        );

        let selectors: Vec<&PlaylistRule> = playlist.show_rules().collect();
        assert_eq!(selectors.len(), 1);
    }

    #[test]
    fn test_defaults() {
        let playlist =
            parse_smart_playlist_str(r#"<smartplaylist type="tvshows"></smartplaylist>"#).unwrap();
        assert_eq!(playlist.match_mode, MatchMode::All);
        assert_eq!(playlist.order, SortOrder::Episode);
        assert!(!playlist.is_episode_playlist());
    }

    #[test]
    fn test_match_attribute() {
        let playlist = parse_smart_playlist_str(
            r#"<smartplaylist type="episodes" match="one"><rule field="tvshow" operator="is"/></smartplaylist>"#,
        )
        .unwrap();
        assert_eq!(playlist.match_mode, MatchMode::One);
        assert_eq!(playlist.rules.len(), 1);
        assert!(playlist.rules[0].values.is_empty());
    }

    #[test]
    fn test_rejects_non_playlist() {
        assert!(parse_smart_playlist_str("<playlist></playlist>").is_err());
        assert!(parse_smart_playlist_str("<smartplaylist><rule></smartplaylist>").is_err());
    }
}
