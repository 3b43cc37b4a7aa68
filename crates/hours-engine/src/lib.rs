//! # hours-engine
//!
//! Deterministic opening-hours extraction for venue descriptions.
//!
//! Turns free text such as `"Open Mon-Fri 8am-5pm, Sat 9am-3pm."` into a set
//! of per-day intervals and answers whether a venue is open at a given
//! moment. Only a small fixed grammar of day and time phrases is understood;
//! everything else is skipped as noise. If the phrases do not add up to a
//! consistent schedule the result is an error, never a guess.
//!
//! ## Modules
//!
//! - [`token`] — Tokens: days, day ranges, time ranges, separators, closures
//! - [`tokenizer`] — Free text → token stream
//! - [`extractor`] — Token stream → [`WeekIntervalSet`], with day carry-over and midnight splitting
//! - [`week_intervals`] — Immutable weekly interval set and containment queries
//! - [`sentence`] — Locating the hours sentence in a longer description
//! - [`hours`] — Entry point and open/closed/unknown status
//! - [`cache`] — Memoized parse outcomes keyed by description
//! - [`error`] — Error types

pub mod cache;
pub mod error;
pub mod extractor;
pub mod hours;
pub mod sentence;
pub mod token;
pub mod tokenizer;
pub mod week_intervals;

pub use cache::{CachedHours, HoursCache};
pub use error::HoursError;
pub use extractor::{extract_intervals, intervals_from_tokens, split_clauses, Clause};
pub use hours::{
    open_status, open_status_with_options, parse_weekly_hours, parse_weekly_hours_with_options,
    OpenStatus, ParseOptions,
};
pub use sentence::{extract_time_sentence, DEFAULT_OPEN_MARKER};
pub use token::{DayRange, DaySelector, Parsed, TimeRange, Token, END_OF_DAY, START_OF_DAY};
pub use tokenizer::{parse_day, parse_day_range, parse_time_range, tokenize};
pub use week_intervals::{local_instant, DayLocalInterval, DayLocalTime, WeekIntervalSet};
