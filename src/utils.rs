/// Time helpers shared by the player and the views.
use chrono::{NaiveTime, Timelike};

/// Placeholder shown before any playback time is known.
pub const ELAPSED_PLACEHOLDER: &str = "--:--:--";

/// Format a number of seconds as `HH:MM:SS`.
///
/// Non-finite and negative input renders as the placeholder. Values past 24h
/// keep counting hours instead of wrapping.
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return ELAPSED_PLACEHOLDER.to_string();
    }

    let whole = seconds.floor() as u64;
    let hours = whole / 3600;
    match NaiveTime::from_num_seconds_from_midnight_opt((whole % 86_400) as u32, 0) {
        Some(time) if hours < 24 => time.format("%T").to_string(),
        _ => format!("{:02}:{:02}:{:02}", hours, (whole / 60) % 60, whole % 60),
    }
}

/// Parse a human-readable duration label into seconds.
///
/// Accepts `HH:MM:SS`, `MM:SS` and plain seconds (`"1830"` or `"1830.5"`).
/// Returns `None` for anything else.
pub fn parse_duration_label(label: &str) -> Option<f64> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    if !label.contains(':') {
        return label
            .parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite() && *secs >= 0.0);
    }

    if let Ok(time) = NaiveTime::parse_from_str(label, "%H:%M:%S") {
        return Some(time.num_seconds_from_midnight() as f64);
    }

    let parts: Vec<&str> = label.split(':').collect();
    let numbers: Option<Vec<u64>> = parts.iter().map(|p| p.trim().parse::<u64>().ok()).collect();
    match numbers?.as_slice() {
        [minutes, seconds] if *seconds < 60 => {
            minutes.checked_mul(60)?.checked_add(*seconds).map(|s| s as f64)
        }
        [hours, minutes, seconds] if *minutes < 60 && *seconds < 60 => hours
            .checked_mul(3600)?
            .checked_add(minutes * 60 + seconds)
            .map(|s| s as f64),
        _ => None,
    }
}
