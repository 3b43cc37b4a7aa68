//! An immutable collection of time intervals in a week.
//!
//! A [`WeekIntervalSet`] holds intervals such as "Monday 08:00–17:00" and
//! answers whether a given weekday and time falls inside any of them. Sets
//! are persistent: [`WeekIntervalSet::add`] returns a new set and leaves the
//! receiver untouched.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::error::{HoursError, Result};
use crate::token::START_OF_DAY;

// ── DayLocalTime ────────────────────────────────────────────────────────────

/// A wall-clock time on a day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DayLocalTime {
    pub day: Weekday,
    pub time: NaiveTime,
}

impl DayLocalTime {
    pub fn new(day: Weekday, time: NaiveTime) -> Self {
        Self { day, time }
    }

    /// Project an instant onto its weekday and minute in the instant's own
    /// zone. Seconds and below are dropped.
    pub fn from_datetime<T: TimeZone>(datetime: &DateTime<T>) -> Self {
        let time = NaiveTime::from_hms_opt(datetime.hour(), datetime.minute(), 0)
            .unwrap_or(START_OF_DAY);
        Self {
            day: datetime.weekday(),
            time,
        }
    }
}

impl fmt::Display for DayLocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time.format("%H:%M"))
    }
}

// ── DayLocalInterval ────────────────────────────────────────────────────────

/// An interval within a single day, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DayLocalInterval {
    day: Weekday,
    start: NaiveTime,
    end: NaiveTime,
}

impl DayLocalInterval {
    /// Build an interval on `day`.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::InvalidInterval`] if `start` is after `end`. An
    /// interval that crosses midnight must be split into two days first.
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start > end {
            return Err(HoursError::InvalidInterval(format!(
                "{} {} is after {}",
                day,
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { day, start, end })
    }

    /// Build an interval from two day-local times, which must share a day.
    pub fn between(start: DayLocalTime, end: DayLocalTime) -> Result<Self> {
        if start.day != end.day {
            return Err(HoursError::InvalidInterval(format!(
                "{} and {} are on different days",
                start, end
            )));
        }
        Self::new(start.day, start.time, end.time)
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn start(&self) -> DayLocalTime {
        DayLocalTime::new(self.day, self.start)
    }

    pub fn end(&self) -> DayLocalTime {
        DayLocalTime::new(self.day, self.end)
    }

    pub fn contains(&self, time: DayLocalTime) -> bool {
        time.day == self.day && self.start <= time.time && time.time <= self.end
    }
}

impl fmt::Display for DayLocalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

// ── WeekIntervalSet ─────────────────────────────────────────────────────────

/// A set of [`DayLocalInterval`]s. Value-equal intervals collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekIntervalSet {
    intervals: HashSet<DayLocalInterval>,
}

impl WeekIntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new set that also includes `interval`.
    #[must_use]
    pub fn add(&self, interval: DayLocalInterval) -> Self {
        let mut intervals = self.intervals.clone();
        intervals.insert(interval);
        Self { intervals }
    }

    /// Whether any interval covers `time`. Bounds are inclusive.
    pub fn contains(&self, time: DayLocalTime) -> bool {
        self.intervals.iter().any(|interval| interval.contains(time))
    }

    /// Whether the set covers the weekday and minute of `datetime`, read in
    /// the datetime's own zone.
    pub fn contains_datetime<T: TimeZone>(&self, datetime: &DateTime<T>) -> bool {
        self.contains(DayLocalTime::from_datetime(datetime))
    }

    /// Whether the set covers an RFC 3339 instant seen from an IANA zone.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::InvalidDatetime`] if the datetime string cannot
    /// be parsed, or [`HoursError::InvalidTimezone`] if the timezone name is
    /// not a valid IANA timezone.
    pub fn is_open_at(&self, datetime: &str, timezone: &str) -> Result<bool> {
        let local = local_instant(datetime, timezone)?;
        Ok(self.contains_datetime(&local))
    }

    /// Whether two sets hold the same intervals.
    ///
    /// This is literal set equality, not availability equivalence: a set
    /// holding Mon 09:00-12:00 and Mon 12:00-17:00 is not equivalent to one
    /// holding Mon 09:00-17:00, although both cover the same minutes.
    pub fn equivalent(&self, other: &WeekIntervalSet) -> bool {
        self.intervals == other.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayLocalInterval> {
        self.intervals.iter()
    }

    /// The intervals ordered by day (Monday first), then start, then end.
    pub fn sorted(&self) -> Vec<DayLocalInterval> {
        let mut sorted: Vec<_> = self.intervals.iter().copied().collect();
        sorted.sort_by_key(|i| (i.day.number_from_monday(), i.start, i.end));
        sorted
    }
}

impl FromIterator<DayLocalInterval> for WeekIntervalSet {
    fn from_iter<I: IntoIterator<Item = DayLocalInterval>>(iter: I) -> Self {
        Self {
            intervals: iter.into_iter().collect(),
        }
    }
}

impl Serialize for WeekIntervalSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.sorted().serialize(serializer)
    }
}

impl fmt::Display for WeekIntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.sorted().iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Read an RFC 3339 instant in an IANA zone, so its weekday and wall-clock
/// time are the zone's.
///
/// # Errors
///
/// Returns [`HoursError::InvalidDatetime`] or [`HoursError::InvalidTimezone`].
pub fn local_instant(datetime: &str, timezone: &str) -> Result<DateTime<Tz>> {
    let dt = parse_rfc3339(datetime)?;
    let tz = parse_timezone(timezone)?;
    Ok(dt.with_timezone(&tz))
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Parse an RFC 3339 datetime string into `DateTime<Utc>`.
fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HoursError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| HoursError::InvalidTimezone(format!("'{}'", s)))
}

// ── Tests ───────────────────────────────────────────────────────────────────
