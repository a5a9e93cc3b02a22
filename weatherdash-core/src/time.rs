//! Wall-clock rendering for a location that is not the viewer's.
//!
//! The feed reports a UTC instant plus the location's offset in seconds, so
//! instants are re-expressed in a fixed-offset zone rather than a named one.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::FormatError;

const DATE_PATTERN: &str = "%A, %-d %B %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockStyle {
    /// `17:30`
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    /// `5:30 PM`
    #[serde(rename = "12h")]
    TwelveHour,
}

impl ClockStyle {
    fn pattern(self) -> &'static str {
        match self {
            ClockStyle::TwentyFourHour => "%H:%M",
            ClockStyle::TwelveHour => "%-I:%M %p",
        }
    }

    pub const fn all() -> &'static [ClockStyle] {
        &[ClockStyle::TwentyFourHour, ClockStyle::TwelveHour]
    }
}

impl std::fmt::Display for ClockStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockStyle::TwentyFourHour => f.write_str("24-hour (17:30)"),
            ClockStyle::TwelveHour => f.write_str("12-hour (5:30 PM)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDateTime {
    /// e.g. "Thursday, 14 March 2024"
    pub date: String,
    /// e.g. "17:30"
    pub time: String,
    /// e.g. "UTC+5:30"
    pub offset_label: String,
}

/// Offset split into sign and whole minutes; the minute remainder is rounded.
struct SplitOffset {
    negative: bool,
    whole_hours: bool,
    total_minutes: i64,
}

impl SplitOffset {
    fn new(offset_seconds: i32) -> Self {
        let abs = i64::from(offset_seconds).abs();
        Self {
            negative: offset_seconds < 0,
            whole_hours: abs % 3600 == 0,
            total_minutes: (abs + 30) / 60,
        }
    }

    fn seconds(&self) -> i64 {
        let secs = self.total_minutes * 60;
        if self.negative { -secs } else { secs }
    }
}

/// `UTC+5`, `UTC-5`, `UTC+5:30`, `UTC+0`.
pub fn offset_label(offset_seconds: i32) -> String {
    let split = SplitOffset::new(offset_seconds);
    let sign = if split.negative { '-' } else { '+' };
    let hours = split.total_minutes / 60;

    if split.whole_hours {
        format!("UTC{sign}{hours}")
    } else {
        format!("UTC{sign}{hours}:{:02}", split.total_minutes % 60)
    }
}

/// The fixed-offset zone named by [`offset_label`].
pub fn fixed_offset(offset_seconds: i32) -> Result<FixedOffset, FormatError> {
    i32::try_from(SplitOffset::new(offset_seconds).seconds())
        .ok()
        .and_then(FixedOffset::east_opt)
        .ok_or(FormatError::OffsetOutOfRange(offset_seconds))
}

pub fn instant(unix_seconds: i64) -> Result<DateTime<Utc>, FormatError> {
    DateTime::from_timestamp(unix_seconds, 0).ok_or(FormatError::TimestampOutOfRange(unix_seconds))
}

/// Renders `instant` in whatever zone it already carries.
pub fn format_in_zone<Tz>(instant: &DateTime<Tz>, clock: ClockStyle) -> LocalDateTime
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    LocalDateTime {
        date: instant.format(DATE_PATTERN).to_string(),
        time: instant.format(clock.pattern()).to_string(),
        offset_label: offset_label(instant.offset().fix().local_minus_utc()),
    }
}

/// Date and time at the location whose UTC offset is `offset_seconds`,
/// independent of the zone this process runs in.
pub fn resolve_local(
    unix_seconds: i64,
    offset_seconds: i32,
    clock: ClockStyle,
) -> Result<LocalDateTime, FormatError> {
    let zone = fixed_offset(offset_seconds)?;
    let local = instant(unix_seconds)?.with_timezone(&zone);

    let resolved = format_in_zone(&local, clock);
    tracing::trace!(unix_seconds, offset = %resolved.offset_label, %local, "resolved local time");

    Ok(resolved)
}
