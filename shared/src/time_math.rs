//! Time math - conversions between clock text, minute-of-day and angles
//!
//! The chart frame puts minute 0 at the 12 o'clock position and increases
//! clockwise, one full turn per day. Pointer angles come from `atan2` in a
//! different frame and are brought into the chart frame by
//! [`POINTER_ANGLE_OFFSET_DEG`].

use thiserror::Error;

/// Minutes in one day
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Offset added to a raw pointer angle to land in the chart frame.
///
/// Raw pointer angles are measured from the 9 o'clock position, clockwise
/// on screen (see [`pointer_angle`]); the chart frame starts at 12 o'clock.
pub const POINTER_ANGLE_OFFSET_DEG: f64 = 270.0;

/// Error returned when parsing `HH:MM` text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    /// Text is not of the form `HH:MM`
    #[error("expected HH:MM, got {0:?}")]
    Malformed(String),
    /// Hour or minute field out of range
    #[error("time out of range: {0:?}")]
    OutOfRange(String),
}

/// Convert `HH:MM` text to minutes since midnight (e.g. "13:45" -> 825)
pub fn time_string_to_minutes(text: &str) -> Result<u32, TimeParseError> {
    let trimmed = text.trim();
    let (hours, minutes) = trimmed
        .split_once(':')
        .ok_or_else(|| TimeParseError::Malformed(text.to_string()))?;

    let hours: u32 = hours
        .parse()
        .map_err(|_| TimeParseError::Malformed(text.to_string()))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| TimeParseError::Malformed(text.to_string()))?;

    if hours >= 24 || minutes >= 60 {
        return Err(TimeParseError::OutOfRange(text.to_string()));
    }

    Ok(hours * 60 + minutes)
}

/// Convert minutes since midnight to `HH:MM` text (hours wrap at 24)
pub fn minutes_to_time_string(minutes: u32) -> String {
    let hours = (minutes / 60) % 24;
    let mins = minutes % 60;
    format!("{:02}:{:02}", hours, mins)
}

/// Convert minutes since midnight to 12-hour text ("9:05 AM", "12 PM")
pub fn minutes_to_readable_time(minutes: u32) -> String {
    let hours = (minutes / 60) % 24;
    let mins = minutes % 60;
    let period = if hours < 12 { "AM" } else { "PM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };

    if mins > 0 {
        format!("{}:{:02} {}", display_hours, mins, period)
    } else {
        format!("{} {}", display_hours, period)
    }
}

/// Map a minute of the day to a chart angle in degrees (0 at 12 o'clock, clockwise)
pub fn day_minutes_to_angle(minutes: u32) -> f64 {
    minutes as f64 / MINUTES_PER_DAY as f64 * 360.0
}

/// Map a raw pointer angle (degrees, see [`pointer_angle`]) to a minute of the day
///
/// The result is rounded to the nearest whole minute and wrapped into `[0, 1440)`.
pub fn angle_to_day_minutes(pointer_angle_deg: f64) -> u32 {
    let chart_angle = (pointer_angle_deg + POINTER_ANGLE_OFFSET_DEG).rem_euclid(360.0);
    let minutes = (chart_angle / 360.0 * MINUTES_PER_DAY as f64).round() as u32;
    minutes % MINUTES_PER_DAY
}

/// Convert a chart angle to the raw pointer angle that points at the same spot
pub fn chart_angle_to_pointer_angle(chart_angle_deg: f64) -> f64 {
    (chart_angle_deg - POINTER_ANGLE_OFFSET_DEG).rem_euclid(360.0)
}

/// Raw pointer angle of a pointer offset from the chart center
///
/// `dx`/`dy` use y-up coordinates. The angle is measured with `atan2`,
/// starting at the 9 o'clock position and increasing clockwise, in `[0, 360)`.
pub fn pointer_angle(dx: f32, dy: f32) -> f64 {
    (dy as f64).atan2(-(dx as f64)).to_degrees().rem_euclid(360.0)
}

/// Round minutes to the nearest multiple of `interval`
///
/// May return 1440; callers normalize modulo a day.
pub fn round_to_nearest_interval(minutes: u32, interval: u32) -> u32 {
    if interval == 0 {
        return minutes;
    }
    (minutes as f64 / interval as f64).round() as u32 * interval
}

/// Length of an interval in minutes, crossing midnight when `end < start`
pub fn duration_minutes(start: u32, end: u32) -> u32 {
    if end < start {
        end + MINUTES_PER_DAY - start
    } else {
        end - start
    }
}

/// Format a minute count as "1h 30m", "45m", "2h" or "0m"
pub fn format_duration(total: u32) -> String {
    let hours = total / 60;
    let minutes = total % 60;

    match (hours, minutes) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Format an interval as "HH:MM - HH:MM (duration)"
pub fn format_time_range(start: u32, end: u32) -> String {
    format!(
        "{} - {} ({})",
        minutes_to_time_string(start),
        minutes_to_time_string(end),
        format_duration(duration_minutes(start, end))
    )
}

/// Whether two intervals overlap, each allowed to cross midnight
pub fn is_time_overlap(start1: u32, end1: u32, start2: u32, end2: u32) -> bool {
    let end1 = if end1 < start1 { end1 + MINUTES_PER_DAY } else { end1 };
    let end2 = if end2 < start2 { end2 + MINUTES_PER_DAY } else { end2 };

    start1 < end2 && start2 < end1
}
