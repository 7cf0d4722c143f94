//! # Time strings and epochs
//!
//! Conversion of the human-readable time strings used by the occultation and illumination
//! drivers into [`hifitime::Epoch`] values.
//!
//! Two forms are accepted:
//!
//! - **Calendar form**: `YYYY Mon DD HH:MM:SS[.fff] [SCALE]`, e.g. `2021 Apr 25 16:25:12` or
//!   `2021 APR 01 00:00:00 TDB`. Month names are matched on their first three letters,
//!   case-insensitively. The time scale defaults to UTC.
//! - **ISO 8601**, delegated to hifitime's parser, e.g. `2025-01-15T03:22:00`.
//!
//! ## See also
//! ------------
//! * [`EphemerisGateway::time_to_epoch`](crate::gateway::EphemerisGateway::time_to_epoch) – Gateway entry point using these rules.

use std::str::FromStr;

use hifitime::{Epoch, TimeScale};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::EphemerisTime;
use crate::geometry_errors::GeometryError;

static CALENDAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\d{4})\s+([A-Za-z]{3})[A-Za-z]*\.?\s+(\d{1,2})\s+(\d{1,2}):(\d{2}):(\d{2})(\.\d+)?\s*([A-Za-z]{2,3})?\s*$",
    )
    .expect("calendar time regex is valid")
});

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

fn parse_time_scale(token: Option<&str>) -> Result<TimeScale, GeometryError> {
    match token.map(|s| s.to_ascii_uppercase()).as_deref() {
        None | Some("UTC") => Ok(TimeScale::UTC),
        Some("TDB") => Ok(TimeScale::TDB),
        Some("TT") => Ok(TimeScale::TT),
        Some("TAI") => Ok(TimeScale::TAI),
        Some(other) => Err(GeometryError::InvalidTimeString(format!(
            "unsupported time scale '{other}'"
        ))),
    }
}

/// Nanoseconds from a fractional-second suffix such as `.25` (digits beyond 9 are dropped).
fn parse_nanos(fraction: Option<&str>) -> u32 {
    let Some(digits) = fraction.map(|f| f.trim_start_matches('.')) else {
        return 0;
    };
    let mut padded: String = digits.chars().take(9).collect();
    while padded.len() < 9 {
        padded.push('0');
    }
    padded.parse().unwrap_or(0)
}

/// Parse a calendar-form time string (`YYYY Mon DD HH:MM:SS[.fff] [SCALE]`).
///
/// Arguments
/// -----------------
/// * `time`: the time string.
///
/// Return
/// ----------
/// * `Ok(Some(epoch))` when the string is in calendar form and valid,
///   `Ok(None)` when it is not in calendar form at all,
///   or an [`GeometryError::InvalidTimeString`] when it is but a field is out of range.
fn parse_calendar(time: &str) -> Result<Option<Epoch>, GeometryError> {
    let Some(caps) = CALENDAR_RE.captures(time) else {
        return Ok(None);
    };

    let invalid = |what: &str| GeometryError::InvalidTimeString(format!("{time}: invalid {what}"));

    let year: i32 = caps[1].parse().map_err(|_| invalid("year"))?;
    let month_name = caps[2].to_ascii_uppercase();
    let month = MONTHS
        .iter()
        .position(|m| *m == month_name)
        .map(|idx| idx as u8 + 1)
        .ok_or_else(|| invalid("month"))?;
    let day: u8 = caps[3].parse().map_err(|_| invalid("day"))?;
    let hour: u8 = caps[4].parse().map_err(|_| invalid("hour"))?;
    let minute: u8 = caps[5].parse().map_err(|_| invalid("minute"))?;
    let second: u8 = caps[6].parse().map_err(|_| invalid("second"))?;
    let nanos = parse_nanos(caps.get(7).map(|m| m.as_str()));
    let scale = parse_time_scale(caps.get(8).map(|m| m.as_str()))?;

    Epoch::maybe_from_gregorian(year, month, day, hour, minute, second, nanos, scale)
        .map(Some)
        .map_err(|e| GeometryError::InvalidTimeString(format!("{time}: {e}")))
}

/// Convert a UTC or TDB time string into an [`Epoch`].
///
/// Arguments
/// -----------------
/// * `time`: a calendar-form or ISO 8601 time string.
///
/// Return
/// ----------
/// * The parsed [`Epoch`], or [`GeometryError::InvalidTimeString`] if neither form matches.
pub fn parse_epoch(time: &str) -> Result<Epoch, GeometryError> {
    if let Some(epoch) = parse_calendar(time)? {
        return Ok(epoch);
    }
    Epoch::from_str(time.trim())
        .map_err(|e| GeometryError::InvalidTimeString(format!("{time}: {e}")))
}

/// Ephemeris time (TDB seconds past J2000) of an epoch.
#[inline]
pub fn ephemeris_time(epoch: &Epoch) -> EphemerisTime {
    epoch.to_et_seconds()
}

/// Epoch from ephemeris time (TDB seconds past J2000).
#[inline]
pub fn epoch_from_ephemeris_time(et: EphemerisTime) -> Epoch {
    Epoch::from_et_seconds(et)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_calendar_utc() {
        let epoch = parse_epoch("2021 Apr 25 16:25:12").unwrap();
        let iso = Epoch::from_gregorian_utc(2021, 4, 25, 16, 25, 12, 0);
        assert_eq!(epoch, iso);
    }

    #[test]
    fn test_calendar_tdb_upper_case() {
        let epoch = parse_epoch("2021 APR 01 00:00:00 TDB").unwrap();
        let expected = Epoch::from_gregorian(2021, 4, 1, 0, 0, 0, 0, TimeScale::TDB);
        assert_eq!(epoch, expected);
    }

    #[test]
    fn test_calendar_fraction() {
        let epoch = parse_epoch("2021 Apr 25 16:25:12.5").unwrap();
        let base = parse_epoch("2021 Apr 25 16:25:12").unwrap();
        assert_relative_eq!(
            ephemeris_time(&epoch) - ephemeris_time(&base),
            0.5,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_iso_fallback() {
        let epoch = parse_epoch("2025-01-15T03:22:00").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc(2025, 1, 15, 3, 22, 0, 0));
    }

    #[test]
    fn test_invalid_strings() {
        assert!(matches!(
            parse_epoch("2021 Foo 01 00:00:00"),
            Err(GeometryError::InvalidTimeString(_))
        ));
        assert!(matches!(
            parse_epoch("2021 Apr 01 00:00:00 XYZ"),
            Err(GeometryError::InvalidTimeString(_))
        ));
        assert!(matches!(
            parse_epoch("not a date"),
            Err(GeometryError::InvalidTimeString(_))
        ));
    }

    #[test]
    fn test_ephemeris_time_round_trip() {
        let epoch = parse_epoch("2000 Jan 01 12:00:00 TDB").unwrap();
        assert_relative_eq!(ephemeris_time(&epoch), 0.0, epsilon = 1e-3);
        let back = epoch_from_ephemeris_time(3600.0);
        assert_relative_eq!(ephemeris_time(&back), 3600.0, epsilon = 1e-5);
    }
}
