//! Retention strings: a non-negative integer magnitude followed by one unit
//! character (`s`, `m`, `h`, `d`), e.g. `10m`.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

// Digits only: a leading sign is never a valid magnitude.
static MAGNITUDE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Parses a retention string into a span.
///
/// An unrecognised unit character yields `Duration::ZERO` without an error.
/// Callers treat a zero span as "nothing to schedule".
pub fn parse_retention(spec: &str) -> Result<Duration> {
    let invalid = || Error::InvalidFormat(spec.to_string());

    let unit = spec.chars().last().ok_or_else(invalid)?;
    let magnitude = &spec[..spec.len() - unit.len_utf8()];
    if !MAGNITUDE_RE.is_match(magnitude) {
        return Err(invalid());
    }
    let value: u64 = magnitude.parse().map_err(|_| invalid())?;

    let seconds_per_unit = match unit {
        's' => 1,
        'm' => MINUTE,
        'h' => HOUR,
        'd' => DAY,
        _ => return Ok(Duration::ZERO),
    };

    value
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

/// True when `spec` parses to a positive span, i.e. when it would actually
/// schedule deletions.
pub fn is_schedulable(spec: &str) -> bool {
    matches!(parse_retention(spec), Ok(span) if !span.is_zero())
}
