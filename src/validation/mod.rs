//! Validation utilities
//!
//! Re-reads generated playlists and checks them against what the
//! scheduler intended.

mod order;

pub use order::{observed_show_order, validate_order, validate_schedule, OrderMismatch};
