//! Folds a token stream into a [`WeekIntervalSet`].
//!
//! The tokens are first split into clauses at each separator. Clauses are
//! then reduced left to right, carrying the most recent day selector so a
//! clause like `"6pm-9pm"` in `"Mon 8am-5pm, 6pm-9pm"` applies to Monday.
//!
//! Rules, in the order they are checked for each clause:
//!
//! 1. A clause containing `closed` emits nothing. The days it names are
//!    excluded from every other clause.
//! 2. A clause with no time defaults to the whole day, but only if it is the
//!    last clause. Otherwise the input is rejected.
//! 3. A clause with no day reuses the carried selector. With nothing to
//!    carry, the input is rejected.
//! 4. A time range that runs past midnight is split into an evening piece
//!    and a next-morning piece. A zero-length range that stays within one
//!    day is dropped.

use std::collections::HashSet;

use chrono::Weekday;

use crate::error::{HoursError, Result};
use crate::token::{DaySelector, TimeRange, Token, END_OF_DAY, START_OF_DAY};
use crate::tokenizer::tokenize;
use crate::week_intervals::{DayLocalInterval, WeekIntervalSet};

/// The tokens between two separators, reduced to what extraction needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clause {
    /// The first day or day range in the clause.
    pub day: Option<DaySelector>,
    /// The first time range in the clause.
    pub time: Option<TimeRange>,
    /// Whether the clause contains the word `closed`.
    pub closed: bool,
}

impl Clause {
    fn from_tokens(tokens: &[Token]) -> Self {
        Self {
            day: tokens.iter().find_map(Token::day_selector),
            time: tokens.iter().find_map(|token| match token {
                Token::TimeRange(range) => Some(*range),
                _ => None,
            }),
            closed: tokens.iter().any(|token| matches!(token, Token::Closed)),
        }
    }
}

/// Split a token stream into clauses at each separator.
///
/// A trailing separator does not open an empty final clause.
pub fn split_clauses(tokens: &[Token]) -> Vec<Clause> {
    let mut pieces: Vec<&[Token]> = tokens
        .split(|token| matches!(token, Token::Separator))
        .collect();
    if matches!(tokens.last(), Some(Token::Separator)) {
        pieces.pop();
    }
    pieces.into_iter().map(Clause::from_tokens).collect()
}

/// Tokenize a time description (e.g. `"Mon-Fri 8am-5pm, Sat 9am-3pm"`) and
/// extract its weekly intervals.
///
/// # Errors
///
/// Returns [`HoursError::Unparseable`] if the text holds no recognizable
/// tokens, or a clause has neither a day nor one to inherit, or a clause
/// other than the last has no time.
pub fn extract_intervals(time_description: &str) -> Result<WeekIntervalSet> {
    let tokens = tokenize(time_description);
    intervals_from_tokens(&tokens).inspect_err(|err| {
        tracing::debug!(time_description, %err, "rejected hours description");
    })
}

/// Extract weekly intervals from an already tokenized description.
///
/// # Errors
///
/// See [`extract_intervals`].
pub fn intervals_from_tokens(tokens: &[Token]) -> Result<WeekIntervalSet> {
    if tokens.is_empty() {
        return Err(unparseable("no day or time tokens"));
    }

    let clauses = split_clauses(tokens);
    tracing::trace!(clauses = clauses.len(), "split hours into clauses");

    if clauses.iter().all(|clause| clause.closed) {
        return Err(unparseable("only closures, no opening hours"));
    }

    let closed = closed_days(&clauses);
    let last = clauses.len() - 1;

    let (_, intervals) = clauses.iter().enumerate().try_fold(
        (None, WeekIntervalSet::new()),
        |(carried, intervals), (index, clause)| {
            fold_clause(carried, intervals, clause, index == last, &closed)
        },
    )?;

    Ok(intervals)
}

/// Every day named by a closure clause.
fn closed_days(clauses: &[Clause]) -> HashSet<Weekday> {
    clauses
        .iter()
        .filter(|clause| clause.closed)
        .filter_map(|clause| clause.day)
        .flat_map(|selector| selector.days())
        .collect()
}

fn fold_clause(
    carried: Option<DaySelector>,
    intervals: WeekIntervalSet,
    clause: &Clause,
    is_last: bool,
    closed: &HashSet<Weekday>,
) -> Result<(Option<DaySelector>, WeekIntervalSet)> {
    if clause.closed {
        return Ok((carried, intervals));
    }

    let time = match clause.time {
        Some(time) => time,
        None if is_last => TimeRange::WHOLE_DAY,
        None => return Err(unparseable("a clause before the last one has no time")),
    };

    let selector = clause
        .day
        .or(carried)
        .ok_or_else(|| unparseable("a clause has no day and none to inherit"))?;

    let intervals = selector
        .days()
        .filter(|day| !closed.contains(day))
        .try_fold(intervals, |acc, day| {
            Ok::<_, HoursError>(
                day_intervals(day, time)?
                    .into_iter()
                    .fold(acc, |acc, interval| acc.add(interval)),
            )
        })?;

    Ok((Some(selector), intervals))
}

/// The same-day pieces of `time` starting on `day`. A range that crosses
/// midnight always yields an evening piece on `day` and a morning piece on
/// the following day, even when one of them is a single minute. A range
/// that does not cross midnight is dropped when it is zero-length.
fn day_intervals(day: Weekday, time: TimeRange) -> Result<Vec<DayLocalInterval>> {
    if time.crosses_midnight() {
        return Ok(vec![
            DayLocalInterval::new(day, time.start, END_OF_DAY)?,
            DayLocalInterval::new(day.succ(), START_OF_DAY, time.end)?,
        ]);
    }
    if time.start == time.end {
        return Ok(Vec::new());
    }
    Ok(vec![DayLocalInterval::new(day, time.start, time.end)?])
}

fn unparseable(reason: &str) -> HoursError {
    HoursError::Unparseable(reason.to_string())
}

// ── Tests ───────────────────────────────────────────────────────────────────
