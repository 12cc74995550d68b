use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Parses an end-of-life date in the exact `YYYY-MM-DD` form
///
/// chrono alone accepts single digit months and days (`2022-4-1`), so the shape
/// is checked before handing off to the calendar validation
pub fn parse_eol_date(input: &str) -> Result<NaiveDate, Error> {
  let invalid = || Error::DateParse {
    input: input.to_owned(),
  };

  let bytes = input.as_bytes();
  let well_formed = bytes.len() == 10
    && bytes
      .iter()
      .enumerate()
      .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
  if !well_formed {
    return Err(invalid());
  }

  NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())
}

/// Days remaining until `eol` (midnight UTC), rounded half away from zero
///
/// Negative once the date has passed
pub fn days_until_end(eol: NaiveDate, now: DateTime<Utc>) -> i64 {
  let end = eol.and_time(chrono::NaiveTime::MIN).and_utc();
  let seconds = (end - now).num_seconds() as f64;

  (seconds / SECONDS_PER_DAY).round() as i64
}

/// True when fewer than `threshold_days` remain
///
/// A threshold of 0 only matches once the rounded day count is negative; it does
/// not coincide with [`is_expired`], which also matches at zero days remaining
pub fn in_expiry_range(eol: NaiveDate, now: DateTime<Utc>, threshold_days: i64) -> bool {
  days_until_end(eol, now) < threshold_days
}

/// True when less than one day remains
pub fn is_expired(eol: NaiveDate, now: DateTime<Utc>) -> bool {
  days_until_end(eol, now) < 1
}

/// The expiry decisions for one end-of-life date, all taken against the same `now`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expiry {
  pub days_left: i64,
  pub expired: bool,
  pub in_expiry_range: bool,
}

impl Expiry {
  pub fn evaluate(eol: NaiveDate, now: DateTime<Utc>, threshold_days: i64) -> Self {
    let days_left = days_until_end(eol, now);

    Expiry {
      days_left,
      expired: days_left < 1,
      in_expiry_range: days_left < threshold_days,
    }
  }

  /// Whether the command should report failure for this date
  pub fn is_failing(&self) -> bool {
    self.expired || self.in_expiry_range
  }
}
