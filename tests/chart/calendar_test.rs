//! Birth-moment conversion tests.

use soulcanvas::calendar::solar::SolarTermCalendar;
use soulcanvas::calendar::{parse_birth_date, CalendarAdapter, CalendarError, GanZhiCodes, HourBoundary};

fn convert(calendar: &SolarTermCalendar, input: &str) -> GanZhiCodes {
    let moment = match parse_birth_date(input) {
        Ok(moment) => moment,
        Err(err) => panic!("{input} should parse: {err}"),
    };
    match calendar.convert(moment) {
        Ok(codes) => codes,
        Err(err) => panic!("{input} should convert: {err}"),
    }
}

fn codes(codes: &GanZhiCodes) -> [&str; 4] {
    [&codes.year, &codes.month, &codes.day, &codes.hour]
}

#[test]
fn golden_afternoon_in_may_1990() {
    let calendar = SolarTermCalendar::default();
    let result = convert(&calendar, "1990-05-15T14:30");
    assert_eq!(codes(&result), ["庚午", "辛巳", "庚辰", "癸未"]);
}

#[test]
fn new_year_2000_noon() {
    let calendar = SolarTermCalendar::default();
    let result = convert(&calendar, "2000-01-01T12:00");
    assert_eq!(codes(&result), ["己卯", "丙子", "戊午", "戊午"]);
}

#[test]
fn known_jia_zi_day() {
    let calendar = SolarTermCalendar::default();
    let result = convert(&calendar, "1949-10-01T10:00");
    assert_eq!(result.day, "甲子");
}

#[test]
fn year_switches_at_start_of_spring() {
    let calendar = SolarTermCalendar::default();

    let before = convert(&calendar, "2024-02-03T12:00");
    assert_eq!(before.year, "癸卯");
    assert!(before.month.ends_with('丑'), "month was {}", before.month);

    let after = convert(&calendar, "2024-02-05T12:00");
    assert_eq!(after.year, "甲辰");
    assert_eq!(after.month, "丙寅");
}

/// Year and month codes a few minutes either side of published term moments
/// (China Standard Time).
#[test]
fn pillars_switch_within_minutes_of_solar_terms() {
    let calendar = SolarTermCalendar::default();
    let cases = [
        // Lichun 2023-02-04 10:42
        ("2023-02-04T10:36", "壬寅", "癸丑"),
        ("2023-02-04T10:41", "壬寅", "癸丑"),
        ("2023-02-04T10:44", "癸卯", "甲寅"),
        // Lichun 2024-02-04 16:27
        ("2024-02-04T16:25", "癸卯", "乙丑"),
        ("2024-02-04T16:29", "甲辰", "丙寅"),
        // Jingzhe 2024-03-05 10:23
        ("2024-03-05T10:21", "甲辰", "丙寅"),
        ("2024-03-05T10:24", "甲辰", "丁卯"),
        // Lichun 2000-02-04 20:40
        ("2000-02-04T20:39", "己卯", "丁丑"),
        ("2000-02-04T20:42", "庚辰", "戊寅"),
    ];
    for (input, year, month) in cases {
        let result = convert(&calendar, input);
        assert_eq!(
            (result.year.as_str(), result.month.as_str()),
            (year, month),
            "{input}"
        );
    }
}

#[test]
fn late_rat_hour_depends_on_boundary() {
    let midnight = SolarTermCalendar::new(HourBoundary::Midnight, 480);
    let late_rat = SolarTermCalendar::new(HourBoundary::LateRat, 480);

    let kept = convert(&midnight, "2000-01-01T23:30");
    assert_eq!(kept.day, "戊午");
    assert_eq!(kept.hour, "甲子");

    let advanced = convert(&late_rat, "2000-01-01T23:30");
    assert_eq!(advanced.day, "己未");
    assert_eq!(advanced.hour, "甲子");

    assert_eq!(late_rat.hour_boundary(), HourBoundary::LateRat);
}

#[test]
fn early_rat_hour_is_same_day() {
    let calendar = SolarTermCalendar::default();
    let result = convert(&calendar, "2000-01-01T00:30");
    assert_eq!(result.day, "戊午");
    assert!(result.hour.ends_with('子'));
}

#[test]
fn conversion_is_deterministic() {
    let calendar = SolarTermCalendar::default();
    let first = convert(&calendar, "1984-07-09T06:45");
    let second = convert(&calendar, "1984-07-09T06:45");
    assert_eq!(first, second);
}

#[test]
fn seconds_are_accepted() {
    let calendar = SolarTermCalendar::default();
    let with_seconds = convert(&calendar, "1990-05-15T14:30:59");
    let without = convert(&calendar, "1990-05-15T14:30");
    assert_eq!(with_seconds, without);
}

#[test]
fn malformed_input_is_rejected() {
    for input in ["", "not a date", "1990-13-01T10:00", "1990-02-30T10:00", "1990-05-15"] {
        let result = parse_birth_date(input);
        assert!(
            matches!(result, Err(CalendarError::InvalidDateTime { .. })),
            "{input:?} should be invalid"
        );
    }
}

#[test]
fn years_outside_supported_range_are_rejected() {
    let result = parse_birth_date("0999-06-01T12:00");
    assert!(matches!(
        result,
        Err(CalendarError::OutOfRange { year: 999, .. })
    ));
}

#[test]
fn hour_boundary_parses_from_text() {
    assert_eq!("midnight".parse::<HourBoundary>(), Ok(HourBoundary::Midnight));
    assert_eq!("late-rat".parse::<HourBoundary>(), Ok(HourBoundary::LateRat));
    assert_eq!("late_rat".parse::<HourBoundary>(), Ok(HourBoundary::LateRat));
    assert!("noon".parse::<HourBoundary>().is_err());
    assert_eq!(HourBoundary::default(), HourBoundary::Midnight);
}
