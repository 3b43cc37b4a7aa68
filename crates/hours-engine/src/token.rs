//! Lexical elements recognized inside free-text hours descriptions.
//!
//! The tokenizer reduces a sentence such as `"Mon-Fri 8am-5pm, Sat 9am-3pm"`
//! to a flat sequence of [`Token`]s. Everything it does not recognize is
//! dropped, so the token stream is the only thing the extractor ever sees.

use chrono::{NaiveTime, Weekday};
use serde::Serialize;

/// 00:00, the first minute of a day.
pub const START_OF_DAY: NaiveTime = clock(0, 0);

/// 23:59, the last minute of a day.
pub const END_OF_DAY: NaiveTime = clock(23, 59);

const fn clock(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => panic!("clock constant out of range"),
    }
}

// ── Tokens ──────────────────────────────────────────────────────────────────

/// One recognized element of an hours description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Token {
    /// A single weekday, e.g. `"Tue"`.
    Day(Weekday),
    /// A forward-wrapping run of weekdays, e.g. `"Mon-Fri"` or `"daily"`.
    DayRange(DayRange),
    /// A clock-time span, e.g. `"9:30am-2pm"`.
    TimeRange(TimeRange),
    /// A clause-separating comma.
    Separator,
    /// The word `closed`, marking its clause as a closure.
    Closed,
}

impl Token {
    /// The day selector carried by this token, if it is a day or day range.
    pub fn day_selector(&self) -> Option<DaySelector> {
        match *self {
            Token::Day(day) => Some(DaySelector::Day(day)),
            Token::DayRange(range) => Some(DaySelector::Range(range)),
            Token::TimeRange(_) | Token::Separator | Token::Closed => None,
        }
    }
}

/// A recognized element together with the input that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed<'a, T> {
    pub element: T,
    pub remainder: &'a str,
}

impl<'a, T> Parsed<'a, T> {
    pub fn new(element: T, remainder: &'a str) -> Self {
        Self { element, remainder }
    }

    /// Transform the element, keeping the remainder.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<'a, U> {
        Parsed {
            element: f(self.element),
            remainder: self.remainder,
        }
    }
}

// ── Day ranges ──────────────────────────────────────────────────────────────

/// Every day walking forward from `start` to `end`, inclusive.
///
/// When `end` comes before `start` in the Monday-first week the walk wraps
/// past Sunday, so `Sat-Mon` covers Saturday, Sunday and Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DayRange {
    pub start: Weekday,
    pub end: Weekday,
}

impl DayRange {
    /// Monday through Sunday; the meaning of `"daily"`.
    pub const DAILY: DayRange = DayRange::new(Weekday::Mon, Weekday::Sun);

    pub const fn new(start: Weekday, end: Weekday) -> Self {
        Self { start, end }
    }

    /// The concrete days this range spans, in walking order.
    pub fn days(&self) -> DayRangeIter {
        DayRangeIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DayRange {
    type Item = Weekday;
    type IntoIter = DayRangeIter;

    fn into_iter(self) -> DayRangeIter {
        self.days()
    }
}

/// Iterator over the days of a [`DayRange`]. Yields at most seven days.
#[derive(Debug, Clone)]
pub struct DayRangeIter {
    next: Option<Weekday>,
    end: Weekday,
}

impl Iterator for DayRangeIter {
    type Item = Weekday;

    fn next(&mut self) -> Option<Weekday> {
        let current = self.next?;
        self.next = if current == self.end {
            None
        } else {
            Some(current.succ())
        };
        Some(current)
    }
}

/// The days a clause applies to: a single day or a day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaySelector {
    Day(Weekday),
    Range(DayRange),
}

impl DaySelector {
    pub fn days(&self) -> DayRangeIter {
        match *self {
            DaySelector::Day(day) => DayRange::new(day, day).days(),
            DaySelector::Range(range) => range.days(),
        }
    }
}

// ── Time ranges ─────────────────────────────────────────────────────────────

/// A wall-clock span. `start > end` is legal and means the span runs past
/// midnight into the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    /// The span applied to a day stated without any time.
    pub const WHOLE_DAY: TimeRange = TimeRange::new(START_OF_DAY, END_OF_DAY);

    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.start > self.end
    }
}
