//! Plain-text rendering of the dashboard
//!
//! Pure functions of [`DashboardState`]; the binary prints the result after
//! every state change.

use crate::dashboard::{DashboardState, TrackRow};

const PLAYING_MARKER: &str = ">";

pub fn render_dashboard(state: &DashboardState) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Dashboard [{}]", state.connection));
    if let Some(error) = &state.error {
        lines.push(format!("! {}", error));
    }

    lines.push(String::new());
    lines.push("Media Library".to_string());
    if state.media.is_empty() {
        lines.push("  (no media)".to_string());
    }
    lines.extend(state.rows().map(|row| render_row(&row)));

    lines.push(String::new());
    lines.push("Current Track".to_string());
    match state.current_track() {
        Some(track) => {
            lines.push(format!("  {} by {}", track.title, track.artist));
            lines.push(format!("  Duration: {}", track.duration));
            let label = if state.status.is_playing() { "Playing" } else { "Stopped" };
            lines.push(format!("  {}", label));
        }
        None => lines.push("  No track is currently playing".to_string()),
    }

    if !state.notices.is_empty() {
        lines.push(String::new());
        lines.push("Notices (dismiss <n>)".to_string());
        for notice in &state.notices {
            lines.push(format!("  [{}] {}", notice.id, notice.message));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// One media list row; the marker is set exactly for the highlighted item
pub fn render_row(row: &TrackRow<'_>) -> String {
    let marker = if row.playing { PLAYING_MARKER } else { " " };
    format!(
        "{} [{}] {} - {} ({})",
        marker, row.item.id, row.item.title, row.item.artist, row.item.duration
    )
}
