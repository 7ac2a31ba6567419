//! Built-in calendar adapter driven by the Sun's apparent longitude.
//!
//! Year and month pillars switch at the exact moments of the twelve "jie"
//! solar terms (Lichun at 315°, then every 30°). The day pillar is the
//! sexagenary day count from the Julian Day Number, and the hour pillar
//! follows the classical two-hour branches.
//!
//! Term moments come from [`super::ephemeris`], evaluated on Terrestrial
//! Time, so a birth a minute either side of Lichun lands in the right year.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use tracing::debug;

use super::ephemeris::{apparent_solar_longitude, ephemeris_day};
use super::{code, sexagenary_code, CalendarAdapter, CalendarError, GanZhiCodes, HourBoundary};
use crate::symbols::{Branch, Stem};

/// China Standard Time, the reference zone of the traditional calendar.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 480;

/// Longitude of Lichun, the start of the 寅 month and of the solar year.
const LICHUN_LONGITUDE: f64 = 315.0;

/// JDN of 0001-01-01 minus one, so that `num_days_from_ce + offset = JDN`.
const CE_TO_JDN: i64 = 1_721_425;

/// Offset that maps a JDN onto the sixty-day cycle (0 = 甲子).
const DAY_CYCLE_OFFSET: i64 = 49;

/// Solar-term calendar at a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarTermCalendar {
    hour_boundary: HourBoundary,
    utc_offset_minutes: i32,
}

impl Default for SolarTermCalendar {
    fn default() -> Self {
        Self::new(HourBoundary::default(), DEFAULT_UTC_OFFSET_MINUTES)
    }
}

impl SolarTermCalendar {
    /// Create a calendar for a convention and the civil-time UTC offset.
    pub fn new(hour_boundary: HourBoundary, utc_offset_minutes: i32) -> Self {
        Self {
            hour_boundary,
            utc_offset_minutes,
        }
    }

    /// UTC offset applied to civil input, in minutes.
    pub fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }

    fn to_universal(&self, moment: NaiveDateTime) -> Result<NaiveDateTime, CalendarError> {
        moment
            .checked_sub_signed(TimeDelta::minutes(i64::from(self.utc_offset_minutes)))
            .ok_or_else(|| CalendarError::InvalidDateTime {
                input: moment.to_string(),
                reason: "moment overflows after UTC conversion".to_owned(),
            })
    }
}

impl CalendarAdapter for SolarTermCalendar {
    fn convert(&self, moment: NaiveDateTime) -> Result<GanZhiCodes, CalendarError> {
        let universal = self.to_universal(moment)?;
        let longitude = solar_longitude(julian_ephemeris_day(universal));

        let solar_year = i64::from(solar_year(moment, longitude));
        let year = sexagenary_code(solar_year.saturating_sub(4));
        let year_stem = stem_index(solar_year.saturating_sub(4));

        let month_offset = month_offset(longitude);
        let month = code(
            Stem::from_index(first_stem_of_cycle(year_stem, 2).saturating_add(month_offset)),
            Branch::from_index(month_offset.saturating_add(2)),
        );

        let date_jdn = julian_day_number(moment.date());
        let late_rat = moment.hour() >= 23;
        let day_jdn = match self.hour_boundary {
            HourBoundary::LateRat if late_rat => date_jdn.saturating_add(1),
            _ => date_jdn,
        };
        let day = sexagenary_code(day_jdn.saturating_add(DAY_CYCLE_OFFSET));

        // The 23:00 Zi hour always takes its stem from the following day.
        let hour_stem_jdn = if late_rat {
            date_jdn.saturating_add(1)
        } else {
            date_jdn
        };
        let hour_day_stem = stem_index(hour_stem_jdn.saturating_add(DAY_CYCLE_OFFSET));
        let hour_branch = hour_branch_index(moment.hour());
        let hour = code(
            Stem::from_index(first_stem_of_cycle(hour_day_stem, 0).saturating_add(hour_branch)),
            Branch::from_index(hour_branch),
        );

        debug!(
            %moment,
            longitude,
            boundary = %self.hour_boundary,
            year = %year,
            month = %month,
            day = %day,
            hour = %hour,
            "converted birth moment"
        );

        Ok(GanZhiCodes {
            year,
            month,
            day,
            hour,
        })
    }

    fn hour_boundary(&self) -> HourBoundary {
        self.hour_boundary
    }
}

// ---------------------------------------------------------------------------
// Calendar arithmetic
// ---------------------------------------------------------------------------

/// Julian Day Number of a Gregorian date.
pub fn julian_day_number(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()).saturating_add(CE_TO_JDN)
}

/// Julian Date (fractional, noon-based) of a universal-time moment.
#[allow(clippy::arithmetic_side_effects)]
pub fn julian_day(universal: NaiveDateTime) -> f64 {
    let day_fraction = f64::from(universal.num_seconds_from_midnight()) / 86_400.0;
    #[allow(clippy::cast_precision_loss)] // JDNs stay far below 2^52
    let jdn = julian_day_number(universal.date()) as f64;
    jdn - 0.5 + day_fraction
}

/// Julian Ephemeris Day (Terrestrial Time) of a universal-time moment.
#[allow(clippy::arithmetic_side_effects)]
pub fn julian_ephemeris_day(universal: NaiveDateTime) -> f64 {
    let decimal_year =
        f64::from(universal.year()) + (f64::from(universal.month()) - 0.5) / 12.0;
    ephemeris_day(julian_day(universal), decimal_year)
}

/// Apparent geocentric ecliptic longitude of the Sun, in degrees `[0, 360)`.
pub fn solar_longitude(jde: f64) -> f64 {
    apparent_solar_longitude(jde)
}

/// Gregorian year whose Lichun most recently passed at `moment`.
fn solar_year(moment: NaiveDateTime, longitude: f64) -> i32 {
    let before_lichun = moment.month() <= 2 && (270.0..LICHUN_LONGITUDE).contains(&longitude);
    if before_lichun {
        moment.year().saturating_sub(1)
    } else {
        moment.year()
    }
}

/// Stem position `0..10` of a cycle count.
fn stem_index(cycle: i64) -> usize {
    usize::try_from(cycle.rem_euclid(10)).unwrap_or(0)
}

/// Stem of the first month (or hour) governed by a year (or day) stem.
///
/// Stems five apart share the pattern, so only `stem % 5` matters.
fn first_stem_of_cycle(stem: usize, base: usize) -> usize {
    (stem % 5).saturating_mul(2).saturating_add(base)
}

/// Months elapsed since the 寅 month, `0..12`.
#[allow(clippy::arithmetic_side_effects)]
fn month_offset(longitude: f64) -> usize {
    let since_lichun = (longitude - LICHUN_LONGITUDE).rem_euclid(360.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // floor of 0.0..12.0
    let offset = (since_lichun / 30.0).floor() as usize;
    offset.min(11)
}

/// Branch index of a clock hour: 23–00 is 子, 01–02 is 丑, and so on.
fn hour_branch_index(hour: u32) -> usize {
    usize::try_from(hour.saturating_add(1) / 2 % 12).unwrap_or(0)
}
