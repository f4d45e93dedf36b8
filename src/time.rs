//! Timestamp parsing
//!
//! Session logs carry ISO-8601 text. A trailing `Z` is rewritten to `+00:00` before
//! parsing, and every accepted form is normalized to a UTC instant so that events
//! recorded with different offsets still order correctly.
//!
//! Accepted forms cover both the extended (`2024-01-01T10:15:30`) and basic
//! (`20240101T101530`) layouts, calendar and ISO week dates, hour/minute/second
//! precision, a `.` or `,` fraction separator, and offsets written as `±HH`,
//! `±HHMM`, `±HH:MM` or with seconds. Ordinal dates (`2024-032`) are rejected.
//! Instants keep microsecond precision; finer digits are truncated.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SubsecRound, Utc};

use crate::error::ComputeError;

/// Calendar and week-date layouts for the date half
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%G-W%V-%u", "%GW%V%u"];

/// Clock layouts for the time half (offset already split off)
const CLOCK_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"];

/// Parse an ISO-8601 timestamp into a UTC instant.
///
/// `field` names the value being parsed and is only used for error reporting.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, ComputeError> {
    parse_iso8601(value)
        .map(|dt| dt.trunc_subsecs(6))
        .ok_or_else(|| ComputeError::ParseError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "not an ISO-8601 date-time".to_string(),
        })
}

fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    let normalized = match value.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => value.to_string(),
    };
    let normalized = normalized.replacen(',', ".", 1);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    let (date_part, time_part) = match normalized.split_once(|c: char| c == 'T' || c == ' ') {
        Some((date, time)) => (date, Some(time)),
        None => (normalized.as_str(), None),
    };

    let date = parse_date(date_part)?;
    let Some(time_part) = time_part else {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    };

    let (clock, offset) = match time_part.find(|c: char| c == '+' || c == '-') {
        Some(pos) => (&time_part[..pos], Some(&time_part[pos..])),
        None => (time_part, None),
    };

    let local = date.and_time(parse_clock(clock)?);
    match offset {
        None => Some(local.and_utc()),
        Some(offset) => local
            .and_local_timezone(parse_offset(offset)?)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    {
        return Some(date);
    }

    // A bare week (`2024-W01`, `2024W01`) means its Monday.
    if text.contains('W') {
        let separator = if text.contains('-') { "-" } else { "" };
        let monday = format!("{text}{separator}1");
        return DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&monday, format).ok());
    }

    None
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    if let Some(time) = CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
    {
        return Some(time);
    }

    // Hour precision
    if text.len() == 2 && text.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveTime::from_hms_opt(text.parse().ok()?, 0, 0);
    }

    None
}

/// `±HH`, `±HHMM`, `±HHMMSS`, with or without colons
fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };

    let digits: String = if rest.contains(':') {
        let parts: Vec<&str> = rest.split(':').collect();
        if parts.iter().any(|part| part.len() != 2) {
            return None;
        }
        parts.concat()
    } else {
        rest.to_string()
    };

    if !matches!(digits.len(), 2 | 4 | 6) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut seconds = 0;
    for (i, (pair, unit)) in digits.as_bytes().chunks(2).zip([3600, 60, 1]).enumerate() {
        let value = i32::from(pair[0] - b'0') * 10 + i32::from(pair[1] - b'0');
        if i > 0 && value >= 60 {
            return None;
        }
        seconds += value * unit;
    }

    FixedOffset::east_opt(sign * seconds)
}

/// Elapsed seconds from `from` to `to`, negative when `to` precedes `from`.
///
/// Microsecond precision; spans too large for microseconds fall back to whole seconds.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}
