//! Smart Channels - virtual TV channels from Kodi smart playlists
//!
//! This library turns a channel's Kodi smart playlists into an M3U
//! playlist that interleaves episodes of every show round-robin, so a
//! channel plays like a broadcast schedule.

pub mod channel;
pub mod context;
pub mod error;
pub mod export;
pub mod kodi;
pub mod model;
pub mod store;
pub mod ui;
pub mod validation;

pub use context::AppContext;
pub use export::config::GenerationConfig;
pub use export::pipeline::ChannelGenerator;
pub use store::Storage;
