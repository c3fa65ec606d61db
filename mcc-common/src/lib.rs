//! # MCC Common Library
//!
//! Shared code for the media control console crates:
//! - Data model (media items, playback status)
//! - Push-channel wire protocol (inbound events, outbound commands)
//! - Configuration loading
//! - Error types
//! - Duration display formatting

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;
pub mod models;

pub use error::{Error, Result};
pub use events::{Command, CommandResponse, Envelope, ServerEvent};
pub use models::{MediaItem, PlayState, PlaybackStatus, TrackId};
