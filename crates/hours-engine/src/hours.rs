//! Entry point: from a raw venue description to weekly hours.

use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::error::{HoursError, Result};
use crate::extractor::extract_intervals;
use crate::sentence::{extract_time_sentence, DEFAULT_OPEN_MARKER};
use crate::week_intervals::WeekIntervalSet;

/// Options for [`parse_weekly_hours_with_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// The text that opens the hours sentence. Defaults to `"Open "`.
    pub open_marker: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            open_marker: DEFAULT_OPEN_MARKER.to_string(),
        }
    }
}

/// Parse the weekly opening hours out of a venue description.
///
/// The hours are read from the description's last sentence when it starts
/// with `"Open "`, e.g. `"Cosy vegan cafe. Open Mon-Fri 8am-5pm, Sat 9am-3pm."`.
///
/// # Errors
///
/// Returns [`HoursError::NoHoursSentence`] if there is no hours sentence, or
/// [`HoursError::Unparseable`] if the sentence does not yield consistent
/// intervals. Either way the hours are unknown.
///
/// # Examples
///
/// ```
/// use hours_engine::{parse_weekly_hours, DayLocalTime};
/// use chrono::{NaiveTime, Weekday};
///
/// let hours = parse_weekly_hours("Vegan deli. Open Mon-Fri 8am-5pm.").unwrap();
/// let tuesday_noon = DayLocalTime::new(Weekday::Tue, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
/// assert!(hours.contains(tuesday_noon));
/// ```
pub fn parse_weekly_hours(description: &str) -> Result<WeekIntervalSet> {
    parse_weekly_hours_with_options(description, &ParseOptions::default())
}

/// Parse weekly opening hours with options.
///
/// # Errors
///
/// See [`parse_weekly_hours`].
pub fn parse_weekly_hours_with_options(
    description: &str,
    options: &ParseOptions,
) -> Result<WeekIntervalSet> {
    let sentence =
        extract_time_sentence(description, &options.open_marker).ok_or_else(|| {
            HoursError::NoHoursSentence(format!(
                "no sentence starting with '{}'",
                options.open_marker.trim()
            ))
        })?;
    extract_intervals(&sentence)
}

// ── Open status ─────────────────────────────────────────────────────────────

/// Whether a venue is open at some instant, as far as its description says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenStatus {
    Open,
    Closed,
    /// The hours could not be determined. Callers should treat the venue as
    /// possibly open.
    Unknown,
}

impl OpenStatus {
    /// Status at `at` given the parsed hours, if any.
    pub fn at<T: TimeZone>(hours: Option<&WeekIntervalSet>, at: &DateTime<T>) -> Self {
        match hours {
            Some(hours) if hours.contains_datetime(at) => OpenStatus::Open,
            Some(_) => OpenStatus::Closed,
            None => OpenStatus::Unknown,
        }
    }

    /// True only when the hours are known and say closed.
    pub fn is_known_closed(self) -> bool {
        self == OpenStatus::Closed
    }
}

impl fmt::Display for OpenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OpenStatus::Open => "open",
            OpenStatus::Closed => "closed",
            OpenStatus::Unknown => "unknown",
        })
    }
}

/// Whether the venue described by `description` is open at `at`.
pub fn open_status<T: TimeZone>(description: &str, at: &DateTime<T>) -> OpenStatus {
    open_status_with_options(description, at, &ParseOptions::default())
}

/// [`open_status`] with options.
pub fn open_status_with_options<T: TimeZone>(
    description: &str,
    at: &DateTime<T>,
    options: &ParseOptions,
) -> OpenStatus {
    let hours = parse_weekly_hours_with_options(description, options).ok();
    OpenStatus::at(hours.as_ref(), at)
}

// ── Tests ───────────────────────────────────────────────────────────────────
