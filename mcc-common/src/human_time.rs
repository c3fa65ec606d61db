//! Human-readable track duration formatting
//!
//! The listing service may report durations either as preformatted strings
//! or as a number of seconds. Numeric values are normalized here so every
//! row in the media list displays the same way.

/// Durations at or above this many seconds include an hour field
const HOUR_FORMAT_MIN: u64 = 3600;

/// Format a track duration given in seconds.
///
/// - Under one hour: `M:SS`
/// - One hour or more: `H:MM:SS`
///
/// # Examples
///
/// ```
/// use mcc_common::human_time::format_track_duration;
///
/// assert_eq!(format_track_duration(180), "3:00");
/// assert_eq!(format_track_duration(65), "1:05");
/// assert_eq!(format_track_duration(3661), "1:01:01");
/// ```
pub fn format_track_duration(seconds: i64) -> String {
    let is_negative = seconds < 0;
    let abs_seconds = seconds.unsigned_abs();

    let formatted = if abs_seconds < HOUR_FORMAT_MIN {
        let minutes = abs_seconds / 60;
        let secs = abs_seconds % 60;
        format!("{}:{:02}", minutes, secs)
    } else {
        let hours = abs_seconds / 3600;
        let mins = (abs_seconds % 3600) / 60;
        let secs = abs_seconds % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Format fractional seconds, rounding to the nearest whole second.
pub fn format_track_duration_f64(seconds: f64) -> String {
    // Not representable as whole seconds
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return String::new();
    }
    format_track_duration(seconds.round() as i64)
}
