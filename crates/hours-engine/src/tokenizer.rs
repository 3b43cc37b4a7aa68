//! Tokenizer for free-text hours descriptions.
//!
//! Scans left to right. At each position the grammars are tried in a fixed
//! order (day range, day, time range, separator, closed); the first one that
//! recognizes a prefix wins. When none does, one unit of noise is skipped: a
//! whole alphanumeric word, or a single other character. Scanning never
//! fails, it only produces fewer tokens.
//!
//! # Grammar
//!
//! - **Day**: `monday`/`mon`, `tuesday`/`tues`/`tue`, `wednesday`/`weds`/`wed`,
//!   `thursday`/`thurs`/`thur`/`thu`, `friday`/`fri`, `saturday`/`sat`,
//!   `sunday`/`sun`; case-insensitive, not followed by a letter.
//! - **Day range**: `Day - Day` or `daily`.
//! - **Time range**: `Time - Time`, where a time is `H`, `H:MM` or `H.MM`,
//!   optionally followed by `am`/`pm` (`a.m.`/`p.m.` accepted).
//! - **Separator**: `,`.
//! - **Closed**: `closed`.
//!
//! # AM/PM inference
//!
//! | Input        | Result        |
//! |--------------|---------------|
//! | `9:30-2pm`   | 09:30–14:00   |
//! | `1-2pm`      | 13:00–14:00   |
//! | `11-2am`     | 23:00–02:00   |
//! | `12-1pm`     | 12:00–13:00   |
//! | `11pm-2`     | 23:00–02:00   |
//! | `9-5:30`     | 09:00–17:30   |
//! | `14:00-22:00`| 14:00–22:00   |
//!
//! A side without a meridiem first borrows the other side's meridiem and
//! keeps it if the range then runs forward; otherwise it takes the opposite
//! one. A bare `12` is always noon. A bare hour above 12 (or `0`) is read as
//! a 24-hour clock value.

use chrono::{NaiveTime, Weekday};

use crate::token::{DayRange, Parsed, TimeRange, Token};

/// Tokenize an hours description. Unrecognized text is skipped.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        match next_token(rest) {
            Some(parsed) => {
                tokens.push(parsed.element);
                rest = parsed.remainder;
            }
            None => rest = skip_unit(rest),
        }
        rest = rest.trim_start();
    }

    tracing::trace!(text, ?tokens, "tokenized hours description");
    tokens
}

/// Try every grammar at the head of `input`, in priority order.
fn next_token(input: &str) -> Option<Parsed<'_, Token>> {
    parse_day_range(input)
        .map(|p| p.map(Token::DayRange))
        .or_else(|| parse_day(input).map(|p| p.map(Token::Day)))
        .or_else(|| parse_time_range(input).map(|p| p.map(Token::TimeRange)))
        .or_else(|| try_separator(input))
        .or_else(|| try_closed(input))
}

/// Skip one unit of unrecognized text: an alphanumeric word, or one character.
fn skip_unit(input: &str) -> &str {
    match input.chars().next() {
        Some(c) if c.is_alphanumeric() => {
            let end = input
                .char_indices()
                .find(|(_, c)| !c.is_alphanumeric())
                .map_or(input.len(), |(i, _)| i);
            &input[end..]
        }
        Some(c) => &input[c.len_utf8()..],
        None => input,
    }
}

// ── Day grammars ────────────────────────────────────────────────────────────

/// Longer spellings first so `"thursday"` is not cut short at `"thu"`.
const DAY_NAMES: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("tues", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("weds", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("thurs", Weekday::Thu),
    ("thur", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sat", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("sun", Weekday::Sun),
];

/// Parse a weekday name at the start of `input`.
pub fn parse_day(input: &str) -> Option<Parsed<'_, Weekday>> {
    DAY_NAMES.iter().find_map(|&(name, day)| {
        let rest = strip_word_ignore_case(input, name)?;
        Some(Parsed::new(day, rest))
    })
}

/// Parse `Day - Day` or `daily` at the start of `input`.
pub fn parse_day_range(input: &str) -> Option<Parsed<'_, DayRange>> {
    try_daily(input).or_else(|| try_day_span(input))
}

fn try_daily(input: &str) -> Option<Parsed<'_, DayRange>> {
    let rest = strip_word_ignore_case(input, "daily")?;
    Some(Parsed::new(DayRange::DAILY, rest))
}

fn try_day_span(input: &str) -> Option<Parsed<'_, DayRange>> {
    let start = parse_day(input)?;
    let rest = strip_dash(start.remainder)?;
    let end = parse_day(rest)?;
    Some(Parsed::new(
        DayRange::new(start.element, end.element),
        end.remainder,
    ))
}

// ── Time grammars ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn opposite(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

/// A clock time as written, before any AM/PM inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockReading {
    hour: u32,
    minute: u32,
    meridiem: Option<Meridiem>,
}

impl ClockReading {
    /// The time as written when no meridiem applies. `12` is noon.
    fn literal(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }

    fn with_meridiem(&self, meridiem: Meridiem) -> Option<NaiveTime> {
        let hour = match (self.hour, meridiem) {
            (12, Meridiem::Am) => 0,
            (12, Meridiem::Pm) => 12,
            (h, Meridiem::Am) => h,
            (h, Meridiem::Pm) => h + 12,
        };
        NaiveTime::from_hms_opt(hour, self.minute, 0)
    }

    /// Whether a bare reading must be taken literally: noon, midnight-as-0,
    /// or a 24-hour value.
    fn is_fixed(&self) -> bool {
        self.hour == 0 || self.hour >= 12
    }
}

/// Parse `Time - Time` at the start of `input`, resolving omitted meridiems.
pub fn parse_time_range(input: &str) -> Option<Parsed<'_, TimeRange>> {
    let start = parse_clock(input)?;
    let rest = strip_dash(start.remainder)?;
    let end = parse_clock(rest)?;
    let range = resolve_meridiems(start.element, end.element)?;
    Some(Parsed::new(range, end.remainder))
}

fn resolve_meridiems(start: ClockReading, end: ClockReading) -> Option<TimeRange> {
    let (start_time, end_time) = match (start.meridiem, end.meridiem) {
        (Some(s), Some(e)) => (start.with_meridiem(s)?, end.with_meridiem(e)?),
        (None, Some(e)) => {
            let end_time = end.with_meridiem(e)?;
            let start_time = if start.is_fixed() {
                start.literal()?
            } else {
                let same = start.with_meridiem(e)?;
                if same <= end_time {
                    same
                } else {
                    start.with_meridiem(e.opposite())?
                }
            };
            (start_time, end_time)
        }
        (Some(s), None) => {
            let start_time = start.with_meridiem(s)?;
            let end_time = if end.is_fixed() {
                end.literal()?
            } else {
                let same = end.with_meridiem(s)?;
                if same > start_time {
                    same
                } else {
                    end.with_meridiem(s.opposite())?
                }
            };
            (start_time, end_time)
        }
        (None, None) => {
            let start_time = start.literal()?;
            let end_time = end.literal()?;
            let twelve_hour = start.hour > 0 && start.hour <= 12 && end.hour > 0 && end.hour < 12;
            if twelve_hour && end_time <= start_time {
                (start_time, end.with_meridiem(Meridiem::Pm)?)
            } else {
                (start_time, end_time)
            }
        }
    };

    Some(TimeRange::new(start_time, end_time))
}

/// Parse `H[:MM|.MM][ ][am|pm]` and check it is in range.
fn parse_clock(input: &str) -> Option<Parsed<'_, ClockReading>> {
    let (hour, rest) = take_number(input, 1, 2)?;
    let (minute, rest) = try_minutes(rest).unwrap_or((0, rest));
    let (meridiem, rest) = match try_meridiem(rest) {
        Some((meridiem, rest)) => (Some(meridiem), rest),
        None => (None, rest),
    };

    let hour_ok = match meridiem {
        Some(_) => (1..=12).contains(&hour),
        None => hour <= 23,
    };
    if !hour_ok || minute > 59 {
        return None;
    }

    Some(Parsed::new(
        ClockReading {
            hour,
            minute,
            meridiem,
        },
        rest,
    ))
}

/// `:MM` or `.MM` with exactly two digits.
fn try_minutes(input: &str) -> Option<(u32, &str)> {
    let rest = input.strip_prefix(':').or_else(|| input.strip_prefix('.'))?;
    take_number(rest, 2, 2)
}

/// `am`, `pm`, `a.m.`, `p.m` and friends, optionally after spaces.
fn try_meridiem(input: &str) -> Option<(Meridiem, &str)> {
    let rest = input.trim_start();
    let (meridiem, rest) = if let Some(rest) = strip_prefix_ignore_case(rest, "a") {
        (Meridiem::Am, rest)
    } else {
        (Meridiem::Pm, strip_prefix_ignore_case(rest, "p")?)
    };
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let rest = strip_prefix_ignore_case(rest, "m")?;
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    at_word_boundary(rest).then_some((meridiem, rest))
}

// ── Punctuation ─────────────────────────────────────────────────────────────

fn try_separator(input: &str) -> Option<Parsed<'_, Token>> {
    let rest = input.strip_prefix(',')?;
    Some(Parsed::new(Token::Separator, rest))
}

fn try_closed(input: &str) -> Option<Parsed<'_, Token>> {
    let rest = strip_word_ignore_case(input, "closed")?;
    Some(Parsed::new(Token::Closed, rest))
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// A dash (or en dash) with optional whitespace on both sides.
fn strip_dash(input: &str) -> Option<&str> {
    let rest = input.trim_start();
    let rest = rest
        .strip_prefix('-')
        .or_else(|| rest.strip_prefix('\u{2013}'))?;
    Some(rest.trim_start())
}

/// Read between `min` and `max` ASCII digits. More digits than `max` is a
/// non-match, so `"2024"` is never read as an hour.
fn take_number(input: &str, min: usize, max: usize) -> Option<(u32, &str)> {
    let len = input.bytes().take_while(u8::is_ascii_digit).count();
    if len < min || len > max {
        return None;
    }
    let value = input[..len].parse().ok()?;
    Some((value, &input[len..]))
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&input[prefix.len()..])
    } else {
        None
    }
}

/// Strip a whole word: the prefix must not run on into further letters.
fn strip_word_ignore_case<'a>(input: &'a str, word: &str) -> Option<&'a str> {
    let rest = strip_prefix_ignore_case(input, word)?;
    at_word_boundary(rest).then_some(rest)
}

fn at_word_boundary(rest: &str) -> bool {
    !rest.chars().next().is_some_and(char::is_alphabetic)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn range(input: &str) -> TimeRange {
        parse_time_range(input).unwrap().element
    }

    // ── tokenize ────────────────────────────────────────────────────────

    #[test]
    fn test_tokenize_sentence_with_noise() {
        let tokens = tokenize("Mon-Sun 11-3pm, something irrelevant, Tue 9am - 11am");
        assert_eq!(
            tokens,
            vec![
                Token::DayRange(DayRange::new(Weekday::Mon, Weekday::Sun)),
                Token::TimeRange(TimeRange::new(t(11, 0), t(15, 0))),
                Token::Separator,
                Token::Separator,
                Token::Day(Weekday::Tue),
                Token::TimeRange(TimeRange::new(t(9, 0), t(11, 0))),
            ]
        );
    }

    #[test]
    fn test_tokenize_empty_and_noise_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("call ahead for reservations").is_empty());
    }

    #[test]
    fn test_tokenize_closed_clauses() {
        let tokens = tokenize("Tue-Sun 5-10:30pm, Mon closed.");
        assert_eq!(
            tokens,
            vec![
                Token::DayRange(DayRange::new(Weekday::Tue, Weekday::Sun)),
                Token::TimeRange(TimeRange::new(t(17, 0), t(22, 30))),
                Token::Separator,
                Token::Day(Weekday::Mon),
                Token::Closed,
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_words_containing_day_names() {
        let tokens = tokenize("monthly sunset wedding brunch");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_tokenize_colon_after_day() {
        let tokens = tokenize("Mon-Sat: 11AM-11PM Sun: 12PM-11PM / Patio");
        assert_eq!(
            tokens,
            vec![
                Token::DayRange(DayRange::new(Weekday::Mon, Weekday::Sat)),
                Token::TimeRange(TimeRange::new(t(11, 0), t(23, 0))),
                Token::Day(Weekday::Sun),
                Token::TimeRange(TimeRange::new(t(12, 0), t(23, 0))),
            ]
        );
    }

    #[test]
    fn test_tokenize_non_ascii_noise() {
        let tokens = tokenize("Café ☕ Mon 8am–4pm");
        assert_eq!(
            tokens,
            vec![
                Token::Day(Weekday::Mon),
                Token::TimeRange(TimeRange::new(t(8, 0), t(16, 0))),
            ]
        );
    }

    #[test]
    fn test_tokenize_out_of_range_time_is_noise() {
        let tokens = tokenize("Mon 25-26, Tue 9am-13pm");
        assert_eq!(
            tokens,
            vec![
                Token::Day(Weekday::Mon),
                Token::Separator,
                Token::Day(Weekday::Tue),
            ]
        );
    }

    // ── parse_day ───────────────────────────────────────────────────────

    #[test]
    fn test_day_parse_positive() {
        let result = parse_day("tue starts").unwrap();
        assert_eq!(result.remainder, " starts");
        assert_eq!(result.element.number_from_monday(), 2);
    }

    #[test]
    fn test_day_parse_negative() {
        assert!(parse_day("thursty times").is_none());
    }

    #[test]
    fn test_day_parse_full_names_any_case() {
        assert_eq!(parse_day("WEDNESDAY").unwrap().element, Weekday::Wed);
        assert_eq!(parse_day("Thurs.").unwrap().remainder, ".");
        assert_eq!(parse_day("sunday, late").unwrap().element, Weekday::Sun);
    }

    // ── parse_day_range ─────────────────────────────────────────────────

    #[test]
    fn test_day_range_parse_positive() {
        let result = parse_day_range("thur- sun starts").unwrap();
        assert_eq!(result.remainder, " starts");
        assert_eq!(result.element.start.number_from_monday(), 4);
        assert_eq!(result.element.end.number_from_monday(), 7);
    }

    #[test]
    fn test_day_range_parse_negative() {
        assert!(parse_day_range("starts").is_none());
        assert!(parse_day_range("mon starts").is_none());
    }

    #[test]
    fn test_day_range_parse_daily() {
        let result = parse_day_range("daily starts").unwrap();
        assert_eq!(result.remainder, " starts");
        assert_eq!(result.element, DayRange::DAILY);
    }

    #[test]
    fn test_day_range_parse_dailyish_word_rejected() {
        assert!(parse_day_range("dailies").is_none());
    }

    // ── parse_time_range ────────────────────────────────────────────────

    #[test]
    fn test_time_range_parse_fully_specified() {
        let result = parse_time_range("9:30am- 2pm starts").unwrap();
        assert_eq!(result.remainder, " starts");
        assert_eq!(result.element, TimeRange::new(t(9, 30), t(14, 0)));
    }

    #[test]
    fn test_time_range_parse_infer_am() {
        let result = parse_time_range("9:30 -2pm starts").unwrap();
        assert_eq!(result.remainder, " starts");
        assert_eq!(result.element, TimeRange::new(t(9, 30), t(14, 0)));
    }

    #[test]
    fn test_time_range_parse_infer_afternoon_pm() {
        let result = parse_time_range("1- 2pm starts").unwrap();
        assert_eq!(result.remainder, " starts");
        assert_eq!(result.element, TimeRange::new(t(13, 0), t(14, 0)));
    }

    #[test]
    fn test_time_range_parse_infer_night_pm() {
        let result = parse_time_range("11- 2am starts").unwrap();
        assert_eq!(result.remainder, " starts");
        assert_eq!(result.element, TimeRange::new(t(23, 0), t(2, 0)));
    }

    #[test]
    fn test_time_range_parse_noon() {
        let result = parse_time_range("12 - 1pm starts").unwrap();
        assert_eq!(result.remainder, " starts");
        assert_eq!(result.element, TimeRange::new(t(12, 0), t(13, 0)));
    }

    #[test]
    fn test_time_range_infer_morning_start_before_pm_end() {
        assert_eq!(range("8-5:30pm"), TimeRange::new(t(8, 0), t(17, 30)));
        assert_eq!(range("11-3pm"), TimeRange::new(t(11, 0), t(15, 0)));
        assert_eq!(range("5-10pm"), TimeRange::new(t(17, 0), t(22, 0)));
    }

    #[test]
    fn test_time_range_midnight_end() {
        assert_eq!(range("10-12am"), TimeRange::new(t(22, 0), t(0, 0)));
        assert_eq!(range("11:30am-12am"), TimeRange::new(t(11, 30), t(0, 0)));
    }

    #[test]
    fn test_time_range_infer_end_from_start() {
        assert_eq!(range("11am-3"), TimeRange::new(t(11, 0), t(15, 0)));
        assert_eq!(range("11pm-2"), TimeRange::new(t(23, 0), t(2, 0)));
        assert_eq!(range("9am-11"), TimeRange::new(t(9, 0), t(11, 0)));
        assert_eq!(range("10am-12"), TimeRange::new(t(10, 0), t(12, 0)));
    }

    #[test]
    fn test_time_range_no_meridiem() {
        assert_eq!(range("9-5:30"), TimeRange::new(t(9, 0), t(17, 30)));
        assert_eq!(range("12-3"), TimeRange::new(t(12, 0), t(15, 0)));
        assert_eq!(range("10-11"), TimeRange::new(t(10, 0), t(11, 0)));
    }

    #[test]
    fn test_time_range_24_hour_clock() {
        assert_eq!(range("14:00-22:00"), TimeRange::new(t(14, 0), t(22, 0)));
        assert_eq!(range("18:00-02:00"), TimeRange::new(t(18, 0), t(2, 0)));
    }

    #[test]
    fn test_time_range_period_minutes_and_dotted_meridiem() {
        assert_eq!(range("11am-9.30pm"), TimeRange::new(t(11, 0), t(21, 30)));
        assert_eq!(range("7 a.m. - 3 p.m."), TimeRange::new(t(7, 0), t(15, 0)));
        assert_eq!(range("7AM-3PM"), TimeRange::new(t(7, 0), t(15, 0)));
    }

    #[test]
    fn test_time_range_trailing_period_is_remainder() {
        let result = parse_time_range("8-5.").unwrap();
        assert_eq!(result.remainder, ".");
        assert_eq!(result.element, TimeRange::new(t(8, 0), t(17, 0)));
    }

    #[test]
    fn test_time_range_rejects_out_of_range() {
        assert!(parse_time_range("13pm-2pm").is_none());
        assert!(parse_time_range("9:75-10pm").is_none());
        assert!(parse_time_range("24-25").is_none());
        assert!(parse_time_range("2024-2025").is_none());
    }

    #[test]
    fn test_time_range_meridiem_must_end_word() {
        // "am" here is the start of "amazing", so 2 is bare and 11-2 is read
        // as 11:00-14:00.
        let result = parse_time_range("11 - 2 amazing").unwrap();
        assert_eq!(result.element, TimeRange::new(t(11, 0), t(14, 0)));
        assert_eq!(result.remainder, " amazing");
    }

    #[test]
    fn test_single_time_is_not_a_range() {
        assert!(parse_time_range("5pm sharp").is_none());
    }
}
