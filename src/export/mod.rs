//! Channel generation orchestration and data-directory layout

pub mod config;
pub mod organizer;
pub mod pipeline;

pub use config::GenerationConfig;
pub use organizer::DataDirOrganizer;
pub use pipeline::{ChannelGenerator, GenerationOutcome, GenerationReport};
