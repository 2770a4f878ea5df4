//! Interactive channel management flows

use super::{Answer, InputKind, Prompter};
use crate::channel::MediaSource;
use crate::error::{ChannelError, ChannelUpdateError, GenerateError};
use crate::export::ChannelGenerator;
use crate::kodi::{display_name, KodiPaths};
use crate::model::{check_channel_number, next_channel_number, Channel, EMPTY_CHANNEL_NAME};
use crate::store::Storage;

const EDIT_OPTIONS: [&str; 5] = [
    "Edit Channel Number/Name",
    "Delete Channel",
    "Delete Playlist",
    "Add Playlist",
    "Configure Advanced Rules",
];

/// Drives the add/edit/delete dialogs against the channel store
pub struct ChannelManager<'a, P: Prompter, S: MediaSource> {
    prompter: P,
    storage: &'a Storage,
    kodi: &'a KodiPaths,
    generator: ChannelGenerator<'a, S>,
}

impl<'a, P: Prompter, S: MediaSource> ChannelManager<'a, P, S> {
    pub fn new(
        prompter: P,
        storage: &'a Storage,
        kodi: &'a KodiPaths,
        generator: ChannelGenerator<'a, S>,
    ) -> Self {
        Self {
            prompter,
            storage,
            kodi,
            generator,
        }
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Entry menu shown when no action is requested
    pub fn main_menu(&mut self) {
        let options = vec!["View Channels".to_string()];
        if let Answer::Value(0) = self.prompter.select("Smart Channels", &options) {
            self.display_channels();
        }
    }

    /// Add/Edit menu
    pub fn manage(&mut self) {
        let options = vec!["Add".to_string(), "Edit".to_string()];
        match self.prompter.select("Manage Channels", &options) {
            Answer::Value(0) => {
                if self.add_channel().is_none() {
                    self.prompter.notify("Channel creation cancelled");
                }
            }
            Answer::Value(1) => self.edit_channel(),
            _ => {}
        }
    }

    /// Create a channel; `None` when the user backs out or saving fails
    pub fn add_channel(&mut self) -> Option<Channel> {
        self.show_existing_channels();
        let channels = self.storage.load_channels();

        let number = loop {
            let entered = self
                .prompter
                .input("Enter Channel Number", None, InputKind::Numeric)
                .value()?;
            let number = if entered.is_empty() {
                next_channel_number(&channels)
            } else {
                entered
            };
            match check_channel_number(&number, &channels, None) {
                Ok(()) => break number,
                Err(e) => self.reject_number(&e),
            }
        };

        let name = self
            .prompter
            .input("Enter Channel Name", None, InputKind::Text)
            .value()?;
        let name = non_empty_name(name);

        let playlists = self.select_playlists();
        if playlists.is_empty() {
            let create_empty = self
                .prompter
                .confirm("Smart Channels", "Create Empty Channel?")
                .value()
                .unwrap_or(false);
            if !create_empty {
                log::info!("Empty channel {} declined", number);
                return None;
            }
        }

        let channel = Channel::new(number.clone(), name, playlists);
        let saved = self.storage.update_channels(|channels| {
            check_channel_number(&channel.number, channels, None)?;
            channels.push(channel.clone());
            Ok::<_, ChannelUpdateError>(())
        });
        if let Err(e) = saved {
            self.report_update_failure(&e);
            return None;
        }
        log::info!("Added channel {}: {}", channel.number, channel.name);
        self.prompter
            .notify(&format!("Channel {} added successfully!", channel.name));

        let configure = self
            .prompter
            .confirm("Smart Channels", "Configure Advanced Channel Rules?")
            .value()
            .unwrap_or(false);
        if configure {
            self.configure_rules(&number);
        }

        if !channel.playlists.is_empty() && !self.generate_channel(&number) {
            self.prompter
                .notify("Channel created, but M3U file generation failed.");
        }

        self.storage.find_channel(&number).or(Some(channel))
    }

    /// Pick a channel, then one edit action
    pub fn edit_channel(&mut self) {
        let channels = self.storage.load_channels();
        if channels.is_empty() {
            self.prompter.notify("No Channels Created");
            return;
        }

        let names: Vec<String> = channels
            .iter()
            .map(|ch| format!("{}: {}", ch.number, ch.name))
            .collect();
        let selected = self.prompter.select("Select Channel to Edit", &names).value();
        let Some(channel) = selected.and_then(|i| channels.get(i)) else {
            return;
        };

        let options: Vec<String> = EDIT_OPTIONS.iter().map(|s| s.to_string()).collect();
        let heading = format!("Edit Channel: {}", channel.name);
        match self.prompter.select(&heading, &options).value() {
            Some(0) => self.edit_number_and_name(channel),
            Some(1) => self.delete_channel(&channel.number),
            Some(2) => self.delete_playlists(channel),
            Some(3) => self.add_playlists(&channel.number),
            Some(4) => self.configure_rules(&channel.number),
            _ => {}
        }
    }

    fn edit_number_and_name(&mut self, current: &Channel) {
        let channels = self.storage.load_channels();

        let number = loop {
            let Some(entered) = self
                .prompter
                .input("Edit Channel Number", Some(&current.number), InputKind::Numeric)
                .value()
            else {
                return;
            };
            let number = if entered.is_empty() {
                current.number.clone()
            } else {
                entered
            };
            match check_channel_number(&number, &channels, Some(&current.number)) {
                Ok(()) => break number,
                Err(e) => self.reject_number(&e),
            }
        };

        let Some(name) = self
            .prompter
            .input("Edit Channel Name", Some(&current.name), InputKind::Text)
            .value()
        else {
            return;
        };
        let name = non_empty_name(name);

        let old_number = current.number.clone();
        let saved = self.storage.update_channels(|channels| {
            check_channel_number(&number, channels, Some(&old_number))?;
            let channel = channels
                .iter_mut()
                .find(|ch| ch.number == old_number)
                .ok_or_else(|| ChannelError::NotFound(old_number.clone()))?;
            channel.number = number.clone();
            channel.name = name.clone();
            Ok::<_, ChannelUpdateError>(())
        });
        if let Err(e) = saved {
            self.report_update_failure(&e);
            return;
        }

        if number != old_number {
            if let Err(e) = self
                .storage
                .organizer()
                .rename_playlist(&old_number, &number)
            {
                log::error!(
                    "Failed to rename M3U for channel {} to {}: {}",
                    old_number,
                    number,
                    e
                );
            }
        }
        log::info!("Updated channel {} -> {}: {}", old_number, number, name);
        self.prompter.notify("Channel updated successfully");
    }

    fn delete_channel(&mut self, number: &str) {
        let removed = self.storage.update_channels(|channels| {
            let before = channels.len();
            channels.retain(|ch| ch.number != number);
            if channels.len() == before {
                return Err(ChannelError::NotFound(number.to_string()).into());
            }
            Ok::<_, ChannelUpdateError>(())
        });
        if let Err(e) = removed {
            self.report_update_failure(&e);
            return;
        }

        self.storage.organizer().remove_playlist(number);
        log::info!("Deleted channel {}", number);
        self.prompter.notify("Channel deleted successfully");
    }

    fn delete_playlists(&mut self, channel: &Channel) {
        if channel.playlists.is_empty() {
            self.prompter.notify("No playlists available");
            return;
        }

        let names: Vec<String> = channel
            .playlists
            .iter()
            .map(|p| display_name(p).to_string())
            .collect();
        let selected = match self.prompter.multi_select("Select Playlists to Delete", &names) {
            Answer::Value(selected) if !selected.is_empty() => selected,
            _ => return,
        };

        let number = channel.number.clone();
        let remaining = self.storage.update_channels(|channels| {
            let channel = channels
                .iter_mut()
                .find(|ch| ch.number == number)
                .ok_or_else(|| ChannelError::NotFound(number.clone()))?;
            let mut index = 0;
            channel.playlists.retain(|_| {
                let keep = !selected.contains(&index);
                index += 1;
                keep
            });
            Ok::<_, ChannelUpdateError>(channel.playlists.len())
        });

        match remaining {
            Ok(remaining) => {
                if remaining == 0 {
                    self.prompter.notify("Channel Empty");
                }
                self.prompter.notify("Playlists deleted successfully");
            }
            Err(e) => self.report_update_failure(&e),
        }
    }

    fn add_playlists(&mut self, number: &str) {
        let new_playlists = self.select_playlists();
        if new_playlists.is_empty() {
            return;
        }

        let limit = self.storage.load_settings().playlist_upper_limit;
        let added = self.storage.update_channels(|channels| {
            let channel = channels
                .iter_mut()
                .find(|ch| ch.number == number)
                .ok_or_else(|| ChannelError::NotFound(number.to_string()))?;
            let current = channel.playlists.len();
            if current + new_playlists.len() > limit {
                return Err(ChannelError::PlaylistLimit {
                    current,
                    adding: new_playlists.len(),
                    limit,
                }
                .into());
            }
            channel.playlists.extend(new_playlists.iter().cloned());
            Ok::<_, ChannelUpdateError>(())
        });

        match added {
            Ok(()) => self.prompter.notify("Playlists added successfully"),
            Err(ChannelUpdateError::Channel(ChannelError::PlaylistLimit { limit, .. })) => {
                self.prompter.notify(&format!(
                    "Cannot add playlists. Total would exceed limit of {}.",
                    limit
                ));
            }
            Err(e) => self.report_update_failure(&e),
        }
    }

    /// Toggle the channel's advanced rules
    pub fn configure_rules(&mut self, number: &str) {
        let Some(channel) = self.storage.find_channel(number) else {
            self.prompter.notify("No channel selected for advanced rules.");
            return;
        };

        let toggle = if channel.rules.randomize_shows {
            "Disable"
        } else {
            "Enable"
        };
        let options = vec![format!(
            "{} Randomize TV Shows (episodes in order)",
            toggle
        )];
        let heading = format!(
            "Advanced Rules for Channel {}: {}",
            channel.number, channel.name
        );
        if self.prompter.select(&heading, &options).value() != Some(0) {
            return;
        }

        let toggled = self.storage.update_channels(|channels| {
            let channel = channels
                .iter_mut()
                .find(|ch| ch.number == number)
                .ok_or_else(|| ChannelError::NotFound(number.to_string()))?;
            channel.rules.randomize_shows = !channel.rules.randomize_shows;
            Ok::<_, ChannelUpdateError>(channel.rules.randomize_shows)
        });

        match toggled {
            Ok(enabled) => {
                log::info!("Set randomize_shows to {} for channel {}", enabled, number);
                let state = if enabled { "enabled" } else { "disabled" };
                self.prompter.notify(&format!(
                    "Randomize TV Shows {} for channel {}.",
                    state, number
                ));
            }
            Err(e) => self.report_update_failure(&e),
        }
    }

    /// Delete every channel and its M3U file after confirmation
    pub fn delete_all_channels(&mut self) -> bool {
        let confirmed = self
            .prompter
            .confirm(
                "Smart Channels",
                "Are You Sure?\nThis will delete all created channels and their M3U files.",
            )
            .value()
            .unwrap_or(false);
        if !confirmed {
            return false;
        }

        let cleared = self
            .storage
            .update_channels(|channels| Ok::<_, ChannelUpdateError>(std::mem::take(channels)));
        match cleared {
            Ok(removed) => {
                for channel in &removed {
                    self.storage.organizer().remove_playlist(&channel.number);
                }
                log::info!("Deleted all {} channels", removed.len());
                self.prompter.notify("All channels deleted successfully.");
                true
            }
            Err(e) => {
                self.report_update_failure(&e);
                false
            }
        }
    }

    /// List every channel in a text viewer
    pub fn display_channels(&mut self) {
        let channels = self.storage.load_channels();
        if channels.is_empty() {
            self.prompter.notify("No channels to display");
            return;
        }

        let text = channels
            .iter()
            .map(Channel::summary)
            .collect::<Vec<_>>()
            .join("\n");
        self.prompter.text_viewer("Smart Channels", &text);
    }

    /// Regenerate one channel with a progress dialog; true on success
    pub fn generate_channel(&mut self, number: &str) -> bool {
        let result = {
            let mut progress = self.prompter.progress(
                "Smart Channels",
                &format!("Creating Channel {}, Please wait...", number),
            );
            let result = self.generator.generate(number, progress.as_mut());
            progress.close();
            result
        };

        match result {
            Ok(outcome) => {
                self.prompter.notify(&outcome.message(number));
                outcome.is_success()
            }
            Err(e) => {
                let message = generate_failure_message(&e);
                log::error!(
                    "Generation failed for channel {}: {:#}",
                    number,
                    anyhow::Error::from(e)
                );
                self.prompter.notify(&message);
                false
            }
        }
    }

    fn show_existing_channels(&mut self) {
        let channels = self.storage.load_channels();
        if channels.is_empty() {
            self.prompter.notify("No channels to display");
            return;
        }
        let text = channels
            .iter()
            .map(Channel::summary)
            .collect::<Vec<_>>()
            .join("\n");
        self.prompter.text_viewer("Existing Channels", &text);
    }

    fn select_playlists(&mut self) -> Vec<String> {
        let available = self.kodi.discover_playlists();
        if available.is_empty() {
            log::warn!("No .xsp playlists found under {:?}", self.kodi.home());
            self.prompter.notify("No Smart Playlists found.");
            return Vec::new();
        }

        let names: Vec<String> = available
            .iter()
            .map(|p| display_name(p).to_string())
            .collect();
        match self
            .prompter
            .multi_select("Select Playlists for Channel", &names)
        {
            Answer::Value(selected) if !selected.is_empty() => {
                let picked: Vec<String> = selected
                    .into_iter()
                    .filter_map(|i| available.get(i).cloned())
                    .collect();
                log::debug!("Selected playlists: {:?}", picked);
                picked
            }
            _ => {
                log::info!("No playlists selected");
                Vec::new()
            }
        }
    }

    fn reject_number(&mut self, error: &ChannelError) {
        let message = match error {
            ChannelError::DuplicateNumber(_) => "Channel number already exists",
            _ => "Channel number must be a valid number.",
        };
        log::warn!("{}", error);
        self.prompter.notify(message);
    }

    fn report_update_failure(&mut self, error: &ChannelUpdateError) {
        match error {
            ChannelUpdateError::Channel(e) => {
                log::warn!("{}", e);
                self.prompter.notify(&capitalize(&e.to_string()));
            }
            ChannelUpdateError::Store(e) => {
                log::error!("Failed to save channels: {:?}", e);
                self.prompter
                    .notify("Failed to save channels. Check the log for details.");
            }
        }
    }
}

fn non_empty_name(name: String) -> String {
    let name = name.trim();
    if name.is_empty() {
        EMPTY_CHANNEL_NAME.to_string()
    } else {
        name.to_string()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn generate_failure_message(error: &GenerateError) -> String {
    match error {
        GenerateError::ChannelNotFound(number) => format!("Channel {} not found.", number),
        GenerateError::OpenSource(_) => "Failed to connect to database. Check the log.".to_string(),
        GenerateError::SkipLog(_) => "Failed to log skipped files.".to_string(),
        GenerateError::Write { path, .. } => format!(
            "Failed to create M3U file at {}. Check the log.",
            path.display()
        ),
    }
}
