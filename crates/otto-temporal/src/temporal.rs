//! Spoken date and time phrase resolution.
//!
//! Turns loosely-phrased dates ("tomorrow", "friday", "Jan. 3rd") and times
//! ("3pm", "11:30 PM") into the `YYYY-MM-DD` / `HH:MM` values a scheduling
//! backend expects. All functions take explicit inputs (no system clock
//! access); the caller provides the reference date.
//!
//! # Fail-soft contract
//!
//! Resolution never returns an error. A phrase that matches no rule is handed
//! back verbatim as [`ResolvedDate::Unparsed`] or [`ResolvedTime::PassThrough`],
//! leaving validation to the backend and clarification to the conversation.
//!
//! # Functions
//!
//! - [`resolve_date`] — Resolve a date phrase against a reference date
//! - [`resolve_time`] — Convert a 12-hour time phrase to 24-hour form

use std::fmt;
use std::sync::OnceLock;

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use regex::Regex;
use serde::{Serialize, Serializer};

// ── Resolved values ─────────────────────────────────────────────────────────

/// The outcome of resolving a date phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDate {
    /// A calendar date; displays and serializes as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// The raw phrase, returned unchanged because no rule matched.
    Unparsed(String),
}

impl ResolvedDate {
    /// The calendar date, if the phrase was understood.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ResolvedDate::Date(date) => Some(*date),
            ResolvedDate::Unparsed(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolvedDate::Date(_))
    }
}

impl fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedDate::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ResolvedDate::Unparsed(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for ResolvedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The outcome of resolving a time phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTime {
    /// A 12-hour phrase converted to a time of day; displays as `HH:MM`.
    Clock(NaiveTime),
    /// The raw phrase, assumed to already be 24-hour `HH:MM`. Not validated.
    PassThrough(String),
}

impl ResolvedTime {
    /// Whether this value is a structurally valid 24-hour `HH:MM` time.
    ///
    /// Pass-through values are checked but never rejected by the resolver;
    /// callers decide what to do with a malformed one.
    pub fn is_well_formed(&self) -> bool {
        match self {
            ResolvedTime::Clock(_) => true,
            ResolvedTime::PassThrough(raw) => {
                NaiveTime::parse_from_str(raw.trim(), "%H:%M").is_ok()
            }
        }
    }
}

impl fmt::Display for ResolvedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedTime::Clock(time) => write!(f, "{}", time.format("%H:%M")),
            ResolvedTime::PassThrough(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for ResolvedTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── resolve_date ────────────────────────────────────────────────────────────

/// A `strftime` pattern tried against explicit date phrases.
struct DatePattern {
    format: &'static str,
    /// Month/day-only patterns take their year from the reference date.
    has_year: bool,
}

/// Explicit date patterns, in priority order.
const DATE_PATTERNS: &[DatePattern] = &[
    // 2026-01-20
    DatePattern {
        format: "%Y-%m-%d",
        has_year: true,
    },
    // 01/20/2026
    DatePattern {
        format: "%m/%d/%Y",
        has_year: true,
    },
    // 01-20-2026
    DatePattern {
        format: "%m-%d-%Y",
        has_year: true,
    },
    // january 20
    DatePattern {
        format: "%B %d",
        has_year: false,
    },
    // jan 20
    DatePattern {
        format: "%b %d",
        has_year: false,
    },
    // jan. 20
    DatePattern {
        format: "%b. %d",
        has_year: false,
    },
];

/// Resolve a spoken date phrase against a reference date.
///
/// # Arguments
///
/// * `phrase` — The raw date phrase (case-insensitive, surrounding whitespace ignored)
/// * `reference` — The date treated as "today"
///
/// # Rules
///
/// Tried in order; the first match wins.
///
/// 1. **Relative keywords**: `"today"`, `"tomorrow"`, `"next week"` (reference + 7 days)
/// 2. **Weekday names**: `"monday"` … `"sunday"` → the next occurrence strictly
///    after the reference. Naming today's weekday yields the same weekday next week.
/// 3. **Explicit formats**: `YYYY-MM-DD`, `MM/DD/YYYY`, `MM-DD-YYYY`,
///    `"January 20"`, `"Jan 20"`, `"Jan. 20"`, each also tried with ordinal
///    suffixes removed (`"Jan 3rd"` → `"Jan 3"`). Month/day forms land in the
///    reference year, or the following year if that date has already passed.
///
/// Anything else comes back as [`ResolvedDate::Unparsed`] holding the
/// original phrase.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use otto_temporal::temporal::resolve_date;
///
/// // Monday, June 2 2025
/// let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
/// assert_eq!(resolve_date("friday", monday).to_string(), "2025-06-06");
/// assert_eq!(resolve_date("monday", monday).to_string(), "2025-06-09");
/// assert_eq!(resolve_date("next Wednesday", monday).to_string(), "next Wednesday");
/// ```
pub fn resolve_date(phrase: &str, reference: NaiveDate) -> ResolvedDate {
    let normalized = normalize_phrase(phrase);

    let resolved = try_relative_keyword(&normalized, reference)
        .or_else(|| try_weekday(&normalized, reference))
        .or_else(|| try_explicit_formats(&normalized, reference));

    match resolved {
        Some(date) => {
            tracing::debug!(phrase, %reference, %date, "resolved date phrase");
            ResolvedDate::Date(date)
        }
        None => {
            tracing::debug!(phrase, "date phrase matched no rule, passing through");
            ResolvedDate::Unparsed(phrase.to_string())
        }
    }
}

/// Normalize a phrase: trim, lowercase, collapse whitespace runs.
fn normalize_phrase(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Try relative keywords: "today", "tomorrow", "next week".
fn try_relative_keyword(s: &str, reference: NaiveDate) -> Option<NaiveDate> {
    match s {
        "today" => Some(reference),
        "tomorrow" => reference.succ_opt(),
        "next week" => reference.checked_add_signed(chrono::Duration::days(7)),
        _ => None,
    }
}

/// Try a bare weekday name: always the upcoming one, never today.
fn try_weekday(s: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let target = parse_weekday(s)?;
    let mut days_ahead = target.num_days_from_monday() as i64
        - reference.weekday().num_days_from_monday() as i64;
    if days_ahead <= 0 {
        days_ahead += 7;
    }
    reference.checked_add_signed(chrono::Duration::days(days_ahead))
}

/// Try each explicit pattern against the phrase, then its suffix-stripped form.
fn try_explicit_formats(s: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let stripped = strip_ordinal_suffixes(s);

    DATE_PATTERNS.iter().find_map(|pattern| {
        [s, stripped.as_str()].into_iter().find_map(|candidate| {
            let date = parse_with_pattern(candidate, pattern, reference)?;
            tracing::trace!(pattern = pattern.format, candidate, "explicit date pattern matched");
            Some(date)
        })
    })
}

fn parse_with_pattern(s: &str, pattern: &DatePattern, reference: NaiveDate) -> Option<NaiveDate> {
    // `%Y` alone takes any digit count; "01/20/26" must not become year 26.
    if pattern.has_year && !has_four_digit_year(s) {
        return None;
    }

    let mut parsed = Parsed::new();
    parse(&mut parsed, s, StrftimeItems::new(pattern.format)).ok()?;

    if pattern.has_year {
        parsed.to_naive_date().ok()
    } else {
        infer_year(&parsed, reference)
    }
}

/// Whether `s` is shaped like `YYYY-MM-DD`, `MM/DD/YYYY` or `MM-DD-YYYY`
/// with exactly four year digits.
fn has_four_digit_year(s: &str) -> bool {
    static NUMERIC_DATE: OnceLock<Regex> = OnceLock::new();
    NUMERIC_DATE
        .get_or_init(|| {
            Regex::new(r"^(?:\d{4}-\d{1,2}-\d{1,2}|\d{1,2}[/-]\d{1,2}[/-]\d{4})$")
                .expect("valid numeric date regex")
        })
        .is_match(s)
}

/// Place a parsed month/day in the reference year, or the next year if it
/// falls before the reference date or does not exist in the reference year.
fn infer_year(parsed: &Parsed, reference: NaiveDate) -> Option<NaiveDate> {
    let in_year = |year: i32| {
        let mut parsed = parsed.clone();
        parsed.set_year(i64::from(year)).ok()?;
        parsed.to_naive_date().ok()
    };

    match in_year(reference.year()) {
        Some(date) if date >= reference => Some(date),
        _ => in_year(reference.year() + 1),
    }
}

/// Remove `st`/`nd`/`rd`/`th` following a digit: "jan 3rd" → "jan 3".
fn strip_ordinal_suffixes(s: &str) -> String {
    static ORDINAL_SUFFIX: OnceLock<Regex> = OnceLock::new();
    let re = ORDINAL_SUFFIX
        .get_or_init(|| Regex::new(r"(\d)(?:st|nd|rd|th)\b").expect("valid ordinal regex"));
    re.replace_all(s, "$1").into_owned()
}

/// Parse a full weekday name.
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

// ── resolve_time ────────────────────────────────────────────────────────────

/// A `strftime` pattern tried against 12-hour time phrases.
struct ClockPattern {
    format: &'static str,
    /// Hour-only patterns fill in `:00`.
    has_minute: bool,
}

/// 12-hour patterns, in priority order.
const CLOCK_PATTERNS: &[ClockPattern] = &[
    // 3pm
    ClockPattern {
        format: "%I%p",
        has_minute: false,
    },
    // 3:30pm
    ClockPattern {
        format: "%I:%M%p",
        has_minute: true,
    },
    // 3:00pm
    ClockPattern {
        format: "%I:00%p",
        has_minute: false,
    },
];

/// Resolve a spoken time phrase to 24-hour form.
///
/// Whitespace is removed and case ignored. Phrases containing `am` or `pm`
/// are parsed as 12-hour times (`"3pm"` → `15:00`, `"12am"` → `00:00`).
/// Everything else, including 12-hour phrases that fail to parse, is passed
/// through unchanged on the assumption that it is already `HH:MM`.
///
/// # Examples
///
/// ```
/// use otto_temporal::temporal::resolve_time;
///
/// assert_eq!(resolve_time("3pm").to_string(), "15:00");
/// assert_eq!(resolve_time("11:30 PM").to_string(), "23:30");
/// assert_eq!(resolve_time("14:00").to_string(), "14:00");
/// ```
pub fn resolve_time(phrase: &str) -> ResolvedTime {
    let compact: String = phrase
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if compact.contains("am") || compact.contains("pm") {
        if let Some(time) = CLOCK_PATTERNS
            .iter()
            .find_map(|pattern| parse_twelve_hour(&compact, pattern))
        {
            tracing::debug!(phrase, time = %time.format("%H:%M"), "converted 12-hour time");
            return ResolvedTime::Clock(time);
        }
    }

    tracing::debug!(phrase, "time phrase passed through unchanged");
    ResolvedTime::PassThrough(phrase.to_string())
}

fn parse_twelve_hour(s: &str, pattern: &ClockPattern) -> Option<NaiveTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, s, StrftimeItems::new(pattern.format)).ok()?;
    if !pattern.has_minute {
        parsed.set_minute(0).ok()?;
    }
    parsed.to_naive_time().ok()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference() -> NaiveDate {
        // Monday, June 2, 2025
        date(2025, 6, 2)
    }

    fn time(h: u32, m: u32) -> ResolvedTime {
        ResolvedTime::Clock(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    // ── relative keyword tests ──────────────────────────────────────────

    #[test]
    fn test_resolve_today() {
        assert_eq!(resolve_date("today", reference()), ResolvedDate::Date(reference()));
    }

    #[test]
    fn test_resolve_tomorrow() {
        assert_eq!(
            resolve_date("tomorrow", reference()),
            ResolvedDate::Date(date(2025, 6, 3))
        );
    }

    #[test]
    fn test_resolve_tomorrow_across_year_end() {
        assert_eq!(
            resolve_date("tomorrow", date(2025, 12, 31)),
            ResolvedDate::Date(date(2026, 1, 1))
        );
    }

    #[test]
    fn test_resolve_next_week_is_seven_days() {
        assert_eq!(
            resolve_date("next week", reference()),
            ResolvedDate::Date(date(2025, 6, 9))
        );
    }

    #[test]
    fn test_resolve_case_and_whitespace_insensitive() {
        assert_eq!(
            resolve_date("  TOMORROW ", reference()),
            ResolvedDate::Date(date(2025, 6, 3))
        );
        assert_eq!(
            resolve_date("Next   Week", reference()),
            ResolvedDate::Date(date(2025, 6, 9))
        );
    }

    // ── weekday tests ───────────────────────────────────────────────────

    #[test]
    fn test_resolve_friday_from_monday() {
        assert_eq!(
            resolve_date("friday", reference()),
            ResolvedDate::Date(date(2025, 6, 6))
        );
    }

    #[test]
    fn test_resolve_monday_on_monday_skips_today() {
        assert_eq!(
            resolve_date("monday", reference()),
            ResolvedDate::Date(date(2025, 6, 9))
        );
    }

    #[test]
    fn test_resolve_sunday_from_monday() {
        assert_eq!(
            resolve_date("Sunday", reference()),
            ResolvedDate::Date(date(2025, 6, 8))
        );
    }

    #[test]
    fn test_resolve_weekday_already_passed_this_week() {
        // Thursday June 5 → Tuesday is next week's
        assert_eq!(
            resolve_date("tuesday", date(2025, 6, 5)),
            ResolvedDate::Date(date(2025, 6, 10))
        );
    }

    #[test]
    fn test_resolve_qualified_weekday_passes_through() {
        assert_eq!(
            resolve_date("next Wednesday", reference()),
            ResolvedDate::Unparsed("next Wednesday".to_string())
        );
    }

    // ── explicit format tests ───────────────────────────────────────────

    #[test]
    fn test_resolve_iso_date_ignores_reference() {
        assert_eq!(
            resolve_date("2026-01-20", reference()),
            ResolvedDate::Date(date(2026, 1, 20))
        );
        // A full date in the past is not rolled forward
        assert_eq!(
            resolve_date("2020-03-01", reference()),
            ResolvedDate::Date(date(2020, 3, 1))
        );
    }

    #[test]
    fn test_resolve_us_slash_and_dash() {
        assert_eq!(
            resolve_date("01/20/2026", reference()),
            ResolvedDate::Date(date(2026, 1, 20))
        );
        assert_eq!(
            resolve_date("01-20-2026", reference()),
            ResolvedDate::Date(date(2026, 1, 20))
        );
    }

    #[test]
    fn test_resolve_month_name_later_this_year() {
        assert_eq!(
            resolve_date("July 4", reference()),
            ResolvedDate::Date(date(2025, 7, 4))
        );
        assert_eq!(
            resolve_date("jul 4th", reference()),
            ResolvedDate::Date(date(2025, 7, 4))
        );
    }

    #[test]
    fn test_resolve_month_name_rolls_to_next_year() {
        let december = date(2025, 12, 15);
        assert_eq!(
            resolve_date("Jan 3", december),
            ResolvedDate::Date(date(2026, 1, 3))
        );
        assert_eq!(
            resolve_date("January 20", reference()),
            ResolvedDate::Date(date(2026, 1, 20))
        );
    }

    #[test]
    fn test_resolve_month_name_on_reference_day_stays() {
        assert_eq!(
            resolve_date("June 2", reference()),
            ResolvedDate::Date(reference())
        );
    }

    #[test]
    fn test_resolve_abbreviation_with_period_and_ordinal() {
        let december = date(2025, 12, 15);
        assert_eq!(resolve_date("Jan. 3rd", december), resolve_date("jan 3", december));
        assert_eq!(
            resolve_date("Jan. 3rd", december),
            ResolvedDate::Date(date(2026, 1, 3))
        );
    }

    #[test]
    fn test_resolve_ordinal_stripping_leaves_month_names_intact() {
        assert_eq!(
            resolve_date("August 1st", reference()),
            ResolvedDate::Date(date(2025, 8, 1))
        );
        assert_eq!(
            resolve_date("August 22nd", reference()),
            ResolvedDate::Date(date(2025, 8, 22))
        );
    }

    #[test]
    fn test_resolve_leap_day_moves_to_year_where_it_exists() {
        assert_eq!(
            resolve_date("feb 29", date(2027, 3, 1)),
            ResolvedDate::Date(date(2028, 2, 29))
        );
    }

    #[test]
    fn test_resolve_invalid_calendar_date_passes_through() {
        assert_eq!(
            resolve_date("02/30/2026", reference()),
            ResolvedDate::Unparsed("02/30/2026".to_string())
        );
        assert_eq!(
            resolve_date("feb 30", reference()),
            ResolvedDate::Unparsed("feb 30".to_string())
        );
    }

    #[test]
    fn test_resolve_unparseable_returns_raw_phrase() {
        let raw = "  sometime soon ";
        assert_eq!(
            resolve_date(raw, reference()),
            ResolvedDate::Unparsed(raw.to_string())
        );
        assert_eq!(resolve_date("", reference()), ResolvedDate::Unparsed(String::new()));
    }

    #[test]
    fn test_resolve_numeric_date_needs_four_digit_year() {
        for raw in ["01/20/26", "01-20-26", "26-01-20", "1/2/3", "20260-01-20", "01/20/02026"] {
            assert_eq!(
                resolve_date(raw, reference()),
                ResolvedDate::Unparsed(raw.to_string()),
                "'{raw}' should pass through"
            );
        }
    }

    #[test]
    fn test_has_four_digit_year() {
        assert!(has_four_digit_year("2026-01-20"));
        assert!(has_four_digit_year("1/2/2026"));
        assert!(has_four_digit_year("01-20-2026"));
        assert!(!has_four_digit_year("01/20/26"));
        assert!(!has_four_digit_year("20260-01-20"));
        assert!(!has_four_digit_year("jan 20"));
    }

    #[test]
    fn test_resolve_month_name_without_space() {
        // Pattern spaces match zero or more whitespace characters
        assert_eq!(
            resolve_date("jan20", reference()),
            ResolvedDate::Date(date(2026, 1, 20))
        );
        assert_eq!(
            resolve_date("july4th", reference()),
            ResolvedDate::Date(date(2025, 7, 4))
        );
    }

    #[test]
    fn test_strip_ordinal_suffixes() {
        assert_eq!(strip_ordinal_suffixes("jan 1st"), "jan 1");
        assert_eq!(strip_ordinal_suffixes("march 22nd"), "march 22");
        assert_eq!(strip_ordinal_suffixes("august 3rd"), "august 3");
        assert_eq!(strip_ordinal_suffixes("thursday"), "thursday");
    }

    // ── resolve_time tests ──────────────────────────────────────────────

    #[test]
    fn test_resolve_time_hour_only() {
        assert_eq!(resolve_time("3pm"), time(15, 0));
        assert_eq!(resolve_time("11pm"), time(23, 0));
        assert_eq!(resolve_time("9 AM"), time(9, 0));
    }

    #[test]
    fn test_resolve_time_with_minutes() {
        assert_eq!(resolve_time("3:30pm"), time(15, 30));
        assert_eq!(resolve_time("11:30 pm"), time(23, 30));
        assert_eq!(resolve_time("3:00PM"), time(15, 0));
    }

    #[test]
    fn test_resolve_time_noon_and_midnight() {
        assert_eq!(resolve_time("12am"), time(0, 0));
        assert_eq!(resolve_time("12pm"), time(12, 0));
    }

    #[test]
    fn test_resolve_time_24_hour_passes_through() {
        assert_eq!(
            resolve_time("14:00"),
            ResolvedTime::PassThrough("14:00".to_string())
        );
        assert_eq!(resolve_time("14:00").to_string(), "14:00");
    }

    #[test]
    fn test_resolve_time_explicit_zero_minutes() {
        assert_eq!(resolve_time("3:00pm"), time(15, 0));
        assert_eq!(resolve_time("12:00 am"), time(0, 0));
    }

    #[test]
    fn test_resolve_time_bad_twelve_hour_passes_through() {
        assert_eq!(
            resolve_time("13pm"),
            ResolvedTime::PassThrough("13pm".to_string())
        );
    }

    #[test]
    fn test_resolve_time_is_well_formed() {
        assert!(resolve_time("3pm").is_well_formed());
        assert!(resolve_time("14:00").is_well_formed());
        assert!(!resolve_time("noon").is_well_formed());
        assert!(!resolve_time("25:00").is_well_formed());
    }

    // ── formatting tests ────────────────────────────────────────────────

    #[test]
    fn test_display_formats() {
        assert_eq!(ResolvedDate::Date(date(2026, 1, 3)).to_string(), "2026-01-03");
        assert_eq!(time(7, 5).to_string(), "07:05");
    }

    #[test]
    fn test_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ResolvedDate::Date(date(2025, 6, 6))).unwrap();
        assert_eq!(json, "\"2025-06-06\"");
        let json = serde_json::to_string(&ResolvedDate::Unparsed("someday".into())).unwrap();
        assert_eq!(json, "\"someday\"");
        let json = serde_json::to_string(&time(15, 0)).unwrap();
        assert_eq!(json, "\"15:00\"");
    }
}
