//! Conversions between ATSD timestamp strings, calendar datetimes and epoch
//! milliseconds.
//!
//! ATSD writes timestamps as `YYYY-MM-DDTHH:MM:SS[.fff]Z±HHMM`. The literal `Z`
//! is a separator between the wall-clock time and the numeric zone offset of
//! that wall clock, not a UTC marker. A bare trailing `Z` with no offset is
//! read as `+0000`.
//!
//! Every conversion takes its offset explicitly; nothing here consults the
//! process timezone.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

use crate::error::{Error, Result};

const WALL_CLOCK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses an ATSD timestamp string into epoch milliseconds.
///
/// Sub-millisecond digits are truncated.
///
/// # Example
///
/// ```
/// use atsd_client::time::parse_timestamp;
///
/// let millis = parse_timestamp("2015-04-14T10:03:31Z+0300").unwrap();
/// assert_eq!(millis, 1_428_995_011_000);
/// ```
pub fn parse_timestamp(s: &str) -> Result<i64> {
    let (wall_clock, zone) = s.split_once('Z').ok_or_else(|| {
        Error::InvalidTimeValue(format!("'{}' has no 'Z' separator before the offset", s))
    })?;

    let naive = NaiveDateTime::parse_from_str(wall_clock, WALL_CLOCK_FORMAT)
        .map_err(|e| Error::InvalidTimeValue(format!("'{}': {}", s, e)))?;
    let offset = parse_offset(zone)?;

    Ok(naive_to_millis(naive, offset))
}

/// Parses a `±HHMM` (or `±HH:MM`) zone offset. An empty string is `+0000`.
pub fn parse_offset(zone: &str) -> Result<FixedOffset> {
    if zone.is_empty() {
        return Ok(utc_offset());
    }

    let invalid = || Error::InvalidTimeValue(format!("invalid zone offset '{}'", zone));

    let (sign, digits) = match zone.as_bytes()[0] {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return Err(invalid()),
    };
    let digits = digits.replacen(':', "", 1);
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Formats epoch milliseconds as an ATSD timestamp string in the given offset.
///
/// The fraction is written only when the value has a millisecond part, so
/// whole-second values keep the historical `YYYY-MM-DDTHH:MM:SSZ±HHMM` form.
pub fn format_timestamp(millis: i64, offset: FixedOffset) -> Result<String> {
    let utc = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        Error::InvalidTimeValue(format!("{} ms is outside the supported range", millis))
    })?;
    let local = utc.with_timezone(&offset);

    let mut out = local.format("%Y-%m-%dT%H:%M:%S").to_string();
    let fraction = local.timestamp_subsec_millis();
    if fraction != 0 {
        out.push_str(&format!(".{:03}", fraction));
    }
    out.push('Z');
    out.push_str(&local.format("%z").to_string());
    Ok(out)
}

/// Epoch milliseconds of a datetime that carries its own offset.
pub fn datetime_to_millis<Tz: TimeZone>(dt: &DateTime<Tz>) -> i64 {
    dt.timestamp_millis()
}

/// Epoch milliseconds of a wall-clock datetime observed at `offset`.
pub fn naive_to_millis(naive: NaiveDateTime, offset: FixedOffset) -> i64 {
    naive.and_utc().timestamp_millis() - i64::from(offset.local_minus_utc()) * 1000
}

/// Parses either an RFC 3339 date (`2018-07-26T17:56:39.303Z`) or an ATSD
/// timestamp string.
pub fn parse_date(s: &str) -> Result<i64> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(datetime_to_millis(&dt)),
        Err(_) => parse_timestamp(s),
    }
}

/// UTC datetime for epoch milliseconds, saturating at chrono's supported range.
pub fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(if millis < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}
