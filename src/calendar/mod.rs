//! Solar date-time to sexagenary (stem-branch) conversion.
//!
//! The [`CalendarAdapter`] trait is the contract the chart builder depends on:
//! given a civil birth moment it returns the four two-character stem-branch
//! codes. [`solar::SolarTermCalendar`] is the built-in implementation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::symbols::{Branch, Stem};

pub mod ephemeris;
pub mod solar;

/// Accepted birth date-time formats, tried in order.
const BIRTH_DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Years the built-in solar model is trusted for.
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1000..=3000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while converting a birth moment.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// Input is not a `YYYY-MM-DDTHH:mm` local date-time.
    #[error("invalid birth date-time {input:?}: {reason}")]
    InvalidDateTime {
        /// Raw input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// Date parsed but falls outside the supported range.
    #[error("birth year {year} is outside the supported range {min}..={max}")]
    OutOfRange {
        /// Parsed year.
        year: i32,
        /// Lowest supported year.
        min: i32,
        /// Highest supported year.
        max: i32,
    },
}

/// Parse a `YYYY-MM-DDTHH:mm` local birth date-time.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDateTime`] when the input matches none of
/// the accepted formats, and [`CalendarError::OutOfRange`] for years the solar
/// model does not cover.
pub fn parse_birth_date(input: &str) -> Result<NaiveDateTime, CalendarError> {
    let trimmed = input.trim();
    let mut last_err = None;
    for format in BIRTH_DATE_FORMATS {
        match NaiveDateTime::parse_from_str(trimmed, format) {
            Ok(moment) => {
                check_range(moment)?;
                return Ok(moment);
            }
            Err(e) => last_err = Some(e),
        }
    }
    Err(CalendarError::InvalidDateTime {
        input: input.to_owned(),
        reason: last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unrecognized format".to_owned()),
    })
}

fn check_range(moment: NaiveDateTime) -> Result<(), CalendarError> {
    let year = moment.year();
    if SUPPORTED_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(CalendarError::OutOfRange {
            year,
            min: *SUPPORTED_YEARS.start(),
            max: *SUPPORTED_YEARS.end(),
        })
    }
}

// ---------------------------------------------------------------------------
// Hour-boundary convention
// ---------------------------------------------------------------------------

/// Where the day pillar rolls over during the Zi (rat) hour, 23:00–01:00.
///
/// In both conventions the hour pillar for 23:00–23:59 is the Zi hour whose
/// stem follows from the next day's stem; they differ only in the day pillar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HourBoundary {
    /// Day pillar changes at 00:00.
    #[default]
    Midnight,
    /// Day pillar changes at 23:00, the start of the late rat hour.
    LateRat,
}

impl HourBoundary {
    /// Config/CLI spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Midnight => "midnight",
            Self::LateRat => "late-rat",
        }
    }
}

impl fmt::Display for HourBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HourBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "midnight" => Ok(Self::Midnight),
            "late-rat" | "late_rat" => Ok(Self::LateRat),
            other => Err(format!(
                "unknown hour boundary {other:?}, expected 'midnight' or 'late-rat'"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Adapter contract
// ---------------------------------------------------------------------------

/// The four raw stem-branch codes of a birth moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanZhiCodes {
    /// Year code.
    pub year: String,
    /// Month code.
    pub month: String,
    /// Day code.
    pub day: String,
    /// Hour code.
    pub hour: String,
}

/// Converts a civil birth moment into sexagenary codes.
///
/// Implementations must return codes of exactly two characters, stem then
/// branch. Anything else is tolerated downstream but degrades to Unknown.
pub trait CalendarAdapter: Send + Sync {
    /// Convert a local birth moment.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] when the moment cannot be converted.
    fn convert(&self, moment: NaiveDateTime) -> Result<GanZhiCodes, CalendarError>;

    /// Convention applied near midnight.
    fn hour_boundary(&self) -> HourBoundary;
}

/// Two-character code for a stem and branch.
pub fn code(stem: Stem, branch: Branch) -> String {
    let mut out = String::with_capacity(6);
    out.push(stem.glyph());
    out.push(branch.glyph());
    out
}

/// Code for a position in the sixty-term cycle (0 = 甲子).
pub fn sexagenary_code(index: i64) -> String {
    let i = usize::try_from(index.rem_euclid(60)).unwrap_or(0);
    code(Stem::from_index(i), Branch::from_index(i))
}
