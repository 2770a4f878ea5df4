//! Channel playlist generation core
//!
//! Episodes resolved from a channel's playlists are grouped per show,
//! interleaved round-robin up to an entry cap, and encoded as M3U.
//! The media library and duration store sit behind the traits in
//! [`source`], so the core can run against Kodi's database or a fake.

pub mod grouper;
pub mod m3u;
pub mod scheduler;
pub mod source;

pub use grouper::{group_episodes, Grouping, ShowBucket};
pub use m3u::{encode_playlist, format_label, M3U_HEADER};
pub use scheduler::{RoundRobinScheduler, Schedule, ScheduleConfig, ScheduledEntry};
pub use source::{DurationLookup, EpisodeLibrary, MediaSource};
