//! Observable dashboard state

use mcc_common::models::{MediaItem, PlaybackStatus, TrackId};

/// Inline error shown when the media listing could not be fetched
pub const MEDIA_FETCH_ERROR: &str = "Failed to fetch media";
/// Notice text for an error `command_response` without a message
pub const COMMAND_FAILED_MESSAGE: &str = "Command failed";

/// Push-channel connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The service reported an error for a dispatched command
    CommandFailed,
}

/// Non-blocking, dismissible user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// Everything the dashboard renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub connection: ConnectionState,
    /// Fetched once per mount, never re-fetched
    pub media: Vec<MediaItem>,
    /// Last status received; replaced wholesale by every update
    pub status: PlaybackStatus,
    /// Inline listing error
    pub error: Option<String>,
    pub notices: Vec<Notice>,
}

/// A media list row together with its derived "playing" indicator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRow<'a> {
    pub item: &'a MediaItem,
    pub playing: bool,
}

impl DashboardState {
    pub(crate) fn mounting() -> Self {
        Self {
            connection: ConnectionState::Connecting,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = TrackRow<'_>> {
        self.media.iter().map(move |item| TrackRow {
            item,
            playing: self.status.is_highlighted(item),
        })
    }

    /// Identifiers of rows carrying the "playing" indicator (at most one)
    pub fn highlighted_ids(&self) -> Vec<&TrackId> {
        self.status.highlighted(&self.media).map(|item| &item.id).collect()
    }

    pub fn current_track(&self) -> Option<&MediaItem> {
        self.status.current_track.as_ref()
    }

    /// Find a listed item by its displayed identifier
    pub fn find_track(&self, raw_id: &str) -> Option<&MediaItem> {
        let raw_id = raw_id.trim();
        self.media.iter().find(|item| item.id.to_string() == raw_id)
    }
}
