//! Apparent solar longitude for locating the jie solar terms.
//!
//! Earth's heliocentric longitude comes from the truncated VSOP87D series
//! printed in Meeus, *Astronomical Algorithms* (2nd ed.), Appendix III. It is
//! then shifted to the geocentric frame and corrected for FK5, nutation in
//! longitude and aberration, as in chapter 25. Against the full theory the
//! result is good to about one arcsecond, i.e. under half a minute of time
//! around a term.
//!
//! The series run on Terrestrial Time, so civil moments are shifted by
//! ΔT (TT − UT) from the Espenak–Meeus polynomials first.

use std::f64::consts::TAU;

/// One periodic term `A·cos(B + C·τ)`, with `A` in 1e-8 radians (or AU).
type Term = (f64, f64, f64);

/// Julian Ephemeris Day of J2000.0.
pub const J2000: f64 = 2_451_545.0;

/// Days per Julian millennium.
const DAYS_PER_MILLENNIUM: f64 = 365_250.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

const L0: [Term; 64] = [
    (175_347_046.0, 0.0, 0.0),
    (3_341_656.0, 4.669_256_8, 6_283.075_85),
    (34_894.0, 4.6261, 12_566.1517),
    (3_497.0, 2.7441, 5_753.3849),
    (3_418.0, 2.8289, 3.5231),
    (3_136.0, 3.6277, 77_713.7715),
    (2_676.0, 4.4181, 7_860.4194),
    (2_343.0, 6.1352, 3_930.2097),
    (1_324.0, 0.7425, 11_506.7698),
    (1_273.0, 2.0371, 529.691),
    (1_199.0, 1.1096, 1_577.3435),
    (990.0, 5.233, 5_884.927),
    (902.0, 2.045, 26.298),
    (857.0, 3.508, 398.149),
    (780.0, 1.179, 5_223.694),
    (753.0, 2.533, 5_507.553),
    (505.0, 4.583, 18_849.228),
    (492.0, 4.205, 775.523),
    (357.0, 2.92, 0.067),
    (317.0, 5.849, 11_790.629),
    (284.0, 1.899, 796.298),
    (271.0, 0.315, 10_977.079),
    (243.0, 0.345, 5_486.778),
    (206.0, 4.806, 2_544.314),
    (205.0, 1.869, 5_573.143),
    (202.0, 2.458, 6_069.777),
    (156.0, 0.833, 213.299),
    (132.0, 3.411, 2_942.463),
    (126.0, 1.083, 20.775),
    (115.0, 0.645, 0.98),
    (103.0, 0.636, 4_694.003),
    (102.0, 0.976, 15_720.839),
    (102.0, 4.267, 7.114),
    (99.0, 6.21, 2_146.17),
    (98.0, 0.68, 155.42),
    (86.0, 5.98, 161_000.69),
    (85.0, 1.3, 6_275.96),
    (85.0, 3.67, 71_430.7),
    (80.0, 1.81, 17_260.15),
    (79.0, 3.04, 12_036.46),
    (75.0, 1.76, 5_088.63),
    (74.0, 3.5, 3_154.69),
    (74.0, 4.68, 801.82),
    (70.0, 0.83, 9_437.76),
    (62.0, 3.98, 8_827.39),
    (61.0, 1.82, 7_084.9),
    (57.0, 2.78, 6_286.6),
    (56.0, 4.39, 14_143.5),
    (56.0, 3.47, 6_279.55),
    (52.0, 0.19, 12_139.55),
    (52.0, 1.33, 1_748.02),
    (51.0, 0.28, 5_856.48),
    (49.0, 0.49, 1_194.45),
    (41.0, 5.37, 8_429.24),
    (41.0, 2.4, 19_651.05),
    (39.0, 6.17, 10_447.39),
    (37.0, 6.04, 10_213.29),
    (37.0, 2.57, 1_059.38),
    (36.0, 1.71, 2_352.87),
    (36.0, 1.78, 6_812.77),
    (33.0, 0.59, 17_789.85),
    (30.0, 0.44, 83_996.85),
    (30.0, 2.74, 1_349.87),
    (25.0, 3.16, 4_690.48),
];

const L1: [Term; 34] = [
    (628_331_966_747.0, 0.0, 0.0),
    (206_059.0, 2.678_235, 6_283.075_85),
    (4_303.0, 2.6351, 12_566.1517),
    (425.0, 1.59, 3.523),
    (119.0, 5.796, 26.298),
    (109.0, 2.966, 1_577.344),
    (93.0, 2.59, 18_849.23),
    (72.0, 1.14, 529.69),
    (68.0, 1.87, 398.15),
    (67.0, 4.41, 5_507.55),
    (59.0, 2.89, 5_223.69),
    (56.0, 2.17, 155.42),
    (45.0, 0.4, 796.3),
    (36.0, 0.47, 775.52),
    (29.0, 2.65, 7.11),
    (21.0, 5.34, 0.98),
    (19.0, 1.85, 5_486.78),
    (19.0, 4.97, 213.3),
    (17.0, 2.99, 6_275.96),
    (16.0, 0.03, 2_544.31),
    (16.0, 1.43, 2_146.17),
    (15.0, 1.21, 10_977.08),
    (12.0, 2.83, 1_748.02),
    (12.0, 3.26, 5_088.63),
    (12.0, 5.27, 1_194.45),
    (12.0, 2.08, 4_694.0),
    (11.0, 0.77, 553.57),
    (10.0, 1.3, 6_286.6),
    (10.0, 4.24, 1_349.87),
    (9.0, 2.7, 242.73),
    (9.0, 5.64, 951.72),
    (8.0, 5.3, 2_352.87),
    (6.0, 2.65, 9_437.76),
    (6.0, 4.67, 4_690.48),
];

const L2: [Term; 20] = [
    (52_919.0, 0.0, 0.0),
    (8_720.0, 1.0721, 6_283.0758),
    (309.0, 0.867, 12_566.152),
    (27.0, 0.05, 3.52),
    (16.0, 5.19, 26.3),
    (16.0, 3.68, 155.42),
    (10.0, 0.76, 18_849.23),
    (9.0, 2.06, 77_713.77),
    (7.0, 0.83, 775.52),
    (5.0, 4.66, 1_577.34),
    (4.0, 1.03, 7.11),
    (4.0, 3.44, 5_573.14),
    (3.0, 5.14, 796.3),
    (3.0, 6.05, 5_507.55),
    (3.0, 1.19, 242.73),
    (3.0, 6.12, 529.69),
    (3.0, 0.31, 398.15),
    (3.0, 2.28, 553.57),
    (2.0, 4.38, 5_223.69),
    (2.0, 3.75, 0.98),
];

const L3: [Term; 7] = [
    (289.0, 5.844, 6_283.076),
    (35.0, 0.0, 0.0),
    (17.0, 5.49, 12_566.15),
    (3.0, 5.2, 155.42),
    (1.0, 4.72, 3.52),
    (1.0, 5.3, 18_849.23),
    (1.0, 5.97, 242.73),
];

const L4: [Term; 3] = [
    (114.0, 3.142, 0.0),
    (8.0, 4.13, 6_283.08),
    (1.0, 3.84, 12_566.15),
];

const L5: [Term; 1] = [(1.0, 3.14, 0.0)];

// Radius vector, leading terms only: it feeds the aberration correction,
// where 1e-5 AU is far below an arcsecond.
const R0: [Term; 9] = [
    (100_013_989.0, 0.0, 0.0),
    (1_670_700.0, 3.098_463_5, 6_283.075_85),
    (13_956.0, 3.055_25, 12_566.1517),
    (3_084.0, 5.1985, 77_713.7715),
    (1_628.0, 1.1739, 5_753.3849),
    (1_576.0, 2.8469, 7_860.4194),
    (925.0, 5.453, 11_506.77),
    (542.0, 4.564, 3_930.21),
    (472.0, 3.661, 5_884.927),
];

const R1: [Term; 2] = [
    (103_019.0, 1.107_49, 6_283.075_85),
    (1_721.0, 1.0644, 12_566.1517),
];

#[allow(clippy::arithmetic_side_effects)]
fn sum_terms(terms: &[Term], tau: f64) -> f64 {
    terms
        .iter()
        .map(|(a, b, c)| a * (b + c * tau).cos())
        .sum()
}

/// Evaluate `S0 + S1·τ + S2·τ² + …` by Horner's rule, scaled from 1e-8.
#[allow(clippy::arithmetic_side_effects)]
fn evaluate(series: &[&[Term]], tau: f64) -> f64 {
    let value = series
        .iter()
        .rev()
        .fold(0.0, |acc, terms| acc * tau + sum_terms(terms, tau));
    value / 1e8
}

/// ΔT = TT − UT in seconds for a decimal year (Espenak & Meeus, 2006).
#[allow(clippy::arithmetic_side_effects)]
pub fn delta_t_seconds(year: f64) -> f64 {
    if year < 500.0 {
        let u = (year - 1820.0) / 100.0;
        return -20.0 + 32.0 * u * u;
    }
    if year < 1600.0 {
        let u = (year - 1000.0) / 100.0;
        return polynomial(
            u,
            &[
                1574.2,
                -556.01,
                71.234_72,
                0.319_781,
                -0.850_346_3,
                -0.005_050_998,
                0.008_357_207_3,
            ],
        );
    }
    if year < 1700.0 {
        let t = year - 1600.0;
        return polynomial(t, &[120.0, -0.9808, -0.015_32, 1.0 / 7129.0]);
    }
    if year < 1800.0 {
        let t = year - 1700.0;
        return polynomial(
            t,
            &[8.83, 0.1603, -0.005_928_5, 0.000_133_36, -1.0 / 1_174_000.0],
        );
    }
    if year < 1860.0 {
        let t = year - 1800.0;
        return polynomial(
            t,
            &[
                13.72,
                -0.332_447,
                0.006_861_2,
                0.004_111_6,
                -0.000_374_36,
                0.000_012_127_2,
                -0.000_000_169_9,
                0.000_000_000_875,
            ],
        );
    }
    if year < 1900.0 {
        let t = year - 1860.0;
        return polynomial(
            t,
            &[
                7.62,
                0.5737,
                -0.251_754,
                0.016_806_68,
                -0.000_447_362_4,
                1.0 / 233_174.0,
            ],
        );
    }
    if year < 1920.0 {
        let t = year - 1900.0;
        return polynomial(t, &[-2.79, 1.494_119, -0.059_893_9, 0.006_196_6, -0.000_197]);
    }
    if year < 1941.0 {
        let t = year - 1920.0;
        return polynomial(t, &[21.20, 0.844_93, -0.076_100, 0.002_093_6]);
    }
    if year < 1961.0 {
        let t = year - 1950.0;
        return polynomial(t, &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0]);
    }
    if year < 1986.0 {
        let t = year - 1975.0;
        return polynomial(t, &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0]);
    }
    if year < 2005.0 {
        let t = year - 2000.0;
        return polynomial(
            t,
            &[
                63.86,
                0.3345,
                -0.060_374,
                0.001_727_5,
                0.000_651_814,
                0.000_023_735_99,
            ],
        );
    }
    if year < 2050.0 {
        let t = year - 2000.0;
        return polynomial(t, &[62.92, 0.322_17, 0.005_589]);
    }
    let u = (year - 1820.0) / 100.0;
    let long_term = -20.0 + 32.0 * u * u;
    if year < 2150.0 {
        long_term - 0.5628 * (2150.0 - year)
    } else {
        long_term
    }
}

#[allow(clippy::arithmetic_side_effects)]
fn polynomial(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Convert a Julian Day in UT to a Julian Ephemeris Day (TT).
#[allow(clippy::arithmetic_side_effects)]
pub fn ephemeris_day(jd_ut: f64, decimal_year: f64) -> f64 {
    jd_ut + delta_t_seconds(decimal_year) / SECONDS_PER_DAY
}

/// Apparent geocentric ecliptic longitude of the Sun in degrees `[0, 360)`,
/// for a Julian Ephemeris Day.
#[allow(clippy::arithmetic_side_effects)]
pub fn apparent_solar_longitude(jde: f64) -> f64 {
    let tau = (jde - J2000) / DAYS_PER_MILLENNIUM;
    let longitude_series: [&[Term]; 6] = [&L0, &L1, &L2, &L3, &L4, &L5];
    let radius_series: [&[Term]; 2] = [&R0, &R1];
    let heliocentric = evaluate(&longitude_series, tau).rem_euclid(TAU);
    let radius = evaluate(&radius_series, tau);

    let geometric = heliocentric.to_degrees() + 180.0;
    let fk5 = -0.090_33 / 3600.0;
    let aberration = -20.4898 / 3600.0 / radius;

    (geometric + fk5 + nutation_in_longitude(tau * 10.0) + aberration).rem_euclid(360.0)
}

/// Nutation in longitude Δψ in degrees, to about 0.5″ (Meeus ch. 22).
#[allow(clippy::arithmetic_side_effects)]
fn nutation_in_longitude(t: f64) -> f64 {
    let node = (125.044_52 - 1_934.136_261 * t).to_radians();
    let sun = (280.4665 + 36_000.7698 * t).to_radians();
    let moon = (218.3165 + 481_267.8813 * t).to_radians();
    let arcsec = -17.20 * node.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * node).sin();
    arcsec / 3600.0
}
