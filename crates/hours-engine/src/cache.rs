//! Memoized parsing of venue descriptions.
//!
//! Map layers ask "is this venue open?" for the same descriptions over and
//! over. [`HoursCache`] parses each distinct description once and remembers
//! the outcome, failures included, so a description that cannot be parsed is
//! not re-parsed on every lookup.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use dashmap::DashMap;

use crate::hours::{parse_weekly_hours_with_options, OpenStatus, ParseOptions};
use crate::week_intervals::WeekIntervalSet;

/// The remembered outcome of parsing one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedHours {
    Parsed(Arc<WeekIntervalSet>),
    Unknown,
}

impl CachedHours {
    pub fn hours(&self) -> Option<&WeekIntervalSet> {
        match self {
            CachedHours::Parsed(hours) => Some(hours.as_ref()),
            CachedHours::Unknown => None,
        }
    }

    pub fn status_at<T: TimeZone>(&self, at: &DateTime<T>) -> OpenStatus {
        OpenStatus::at(self.hours(), at)
    }
}

/// A concurrent map from description text to its parse outcome.
///
/// Entries are never evicted; the cache grows with the number of distinct
/// descriptions until [`HoursCache::clear`] is called.
#[derive(Debug, Default)]
pub struct HoursCache {
    options: ParseOptions,
    entries: DashMap<String, CachedHours>,
}

impl HoursCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            entries: DashMap::new(),
        }
    }

    /// The outcome for `description`, parsing it on first sight.
    pub fn lookup(&self, description: &str) -> CachedHours {
        if let Some(hit) = self.entries.get(description) {
            return hit.value().clone();
        }

        self.entries
            .entry(description.to_string())
            .or_insert_with(|| self.parse(description))
            .value()
            .clone()
    }

    /// Whether the venue described by `description` is open at `at`.
    pub fn status_at<T: TimeZone>(&self, description: &str, at: &DateTime<T>) -> OpenStatus {
        self.lookup(description).status_at(at)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    fn parse(&self, description: &str) -> CachedHours {
        match parse_weekly_hours_with_options(description, &self.options) {
            Ok(hours) => CachedHours::Parsed(Arc::new(hours)),
            Err(err) => {
                tracing::debug!(%err, "caching unknown hours");
                CachedHours::Unknown
            }
        }
    }
}
