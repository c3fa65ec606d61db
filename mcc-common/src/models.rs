//! Data model shared by the session gate and the dashboard
//!
//! Wire field names follow the media-control service (`currentTrack`,
//! `track_id`), Rust field names are snake_case.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::human_time::{format_track_duration, format_track_duration_f64};

/// Unique identifier of a media item
///
/// The listing service is free to use numeric or string identifiers. The
/// value is echoed back verbatim in `play` commands, so the original JSON
/// type is preserved. Numbers outside the `i64` range and fractional
/// numbers are kept as `OtherNumber`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackId {
    Number(i64),
    OtherNumber(serde_json::Number),
    Text(String),
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Number(n) => write!(f, "{}", n),
            TrackId::OtherNumber(n) => write!(f, "{}", n),
            TrackId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for TrackId {
    fn from(value: i64) -> Self {
        TrackId::Number(value)
    }
}

impl From<i32> for TrackId {
    fn from(value: i32) -> Self {
        TrackId::Number(i64::from(value))
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        TrackId::Text(value.to_string())
    }
}

impl From<String> for TrackId {
    fn from(value: String) -> Self {
        TrackId::Text(value)
    }
}

/// Parses operator input: integers become `Number`, anything else `Text`.
impl FromStr for TrackId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i64>() {
            Ok(n) => TrackId::Number(n),
            Err(_) => TrackId::Text(trimmed.to_string()),
        })
    }
}

/// A playable track entry with display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: TrackId,
    pub title: String,
    /// Empty when the service reports no artist
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artist: String,
    /// Display string; numeric seconds are formatted on decode
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: String,
}

impl MediaItem {
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration: duration.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Text(String),
        Seconds(i64),
        FractionalSeconds(f64),
    }

    Ok(match Option::<RawDuration>::deserialize(deserializer)? {
        Some(RawDuration::Text(s)) => s,
        Some(RawDuration::Seconds(n)) => format_track_duration(n),
        Some(RawDuration::FractionalSeconds(f)) => format_track_duration_f64(f),
        None => String::new(),
    })
}

/// Play state reported by the media-control service
///
/// Only `playing` drives the UI highlight; every other value is carried
/// through for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlayState {
    Playing,
    Paused,
    #[default]
    Stopped,
    Other(String),
}

impl PlayState {
    pub fn as_str(&self) -> &str {
        match self {
            PlayState::Playing => "playing",
            PlayState::Paused => "paused",
            PlayState::Stopped => "stopped",
            PlayState::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for PlayState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "playing" => PlayState::Playing,
            "paused" => PlayState::Paused,
            "stopped" => PlayState::Stopped,
            _ => PlayState::Other(value),
        }
    }
}

impl From<PlayState> for String {
    fn from(value: PlayState) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last playback status reported by the server
///
/// Replaced wholesale on every `status_update`; no history is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    #[serde(default)]
    pub status: PlayState,
    #[serde(default, rename = "currentTrack", alias = "current_track")]
    pub current_track: Option<MediaItem>,
}

impl PlaybackStatus {
    pub fn is_playing(&self) -> bool {
        self.status == PlayState::Playing
    }

    /// Whether `item` carries the "playing" indicator.
    ///
    /// Derived from the status, never stored: true iff the status is
    /// `playing` and the current track has the same identifier.
    pub fn is_highlighted(&self, item: &MediaItem) -> bool {
        self.is_playing()
            && self
                .current_track
                .as_ref()
                .is_some_and(|track| track.id == item.id)
    }

    /// Items from `items` that carry the "playing" indicator
    pub fn highlighted<'a>(&'a self, items: &'a [MediaItem]) -> impl Iterator<Item = &'a MediaItem> {
        items.iter().filter(move |item| self.is_highlighted(item))
    }
}

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /login`
///
/// Accepts both `{token}` and the `{access_token, token_type}` shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl LoginResponse {
    /// The issued token, if any non-empty one is present
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.access_token.as_deref().filter(|t| !t.is_empty()))
    }
}
