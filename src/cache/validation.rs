//! Duration strings for TTLs and timeouts.

use anyhow::{bail, Result};
use chrono::Duration;

/// Parse a duration string like "7d", "24h", "30m", "90s".
///
/// A bare number is taken as seconds. Negative values are rejected.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let value = value.trim().to_lowercase();

    let (amount, unit): (&str, fn(i64) -> Option<Duration>) =
        if let Some(days) = value.strip_suffix('d') {
            (days, Duration::try_days)
        } else if let Some(hours) = value.strip_suffix('h') {
            (hours, Duration::try_hours)
        } else if let Some(mins) = value.strip_suffix('m') {
            (mins, Duration::try_minutes)
        } else if let Some(secs) = value.strip_suffix('s') {
            (secs, Duration::try_seconds)
        } else {
            (value.as_str(), Duration::try_seconds)
        };

    let Some(duration) = unit(amount.trim().parse()?) else {
        bail!("duration out of range: {}", value);
    };

    if duration < Duration::zero() {
        bail!("duration must not be negative: {}", value);
    }
    Ok(duration)
}

/// Format a duration for display.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();

    if secs >= 86400 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
