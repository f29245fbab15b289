//! Number formatting and tick-step helpers.
//!
//! Labels use SI magnitude suffixes so that values spanning many orders of
//! magnitude stay short on a ruler.

use serde::{Deserialize, Serialize};

/// Suffixes by engineering exponent, from 1e-9 to 1e15.
const SI_SUFFIXES: [(i32, &str); 9] = [
    (-9, "n"),
    (-6, "µ"),
    (-3, "m"),
    (0, ""),
    (3, "k"),
    (6, "M"),
    (9, "G"),
    (12, "T"),
    (15, "P"),
];

const SIGNIFICANT_DIGITS: i32 = 6;

/// Thresholds controlling when a value is printed with an SI suffix.
///
/// Values with `|v| >= upper_threshold` or `0 < |v| < lower_threshold` are
/// scaled to their engineering magnitude; everything else prints plainly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiFormat {
    pub upper_threshold: f64,
    pub lower_threshold: f64,
}

impl Default for SiFormat {
    fn default() -> Self {
        Self {
            upper_threshold: 1e3,
            lower_threshold: 1.0,
        }
    }
}

impl SiFormat {
    /// Formats `value` for a tick label.
    ///
    /// # Examples
    /// ```
    /// use rnav::SiFormat;
    ///
    /// let format = SiFormat::default();
    /// assert_eq!(format.format(2500.0), "2.5k");
    /// assert_eq!(format.format(0.25), "250m");
    /// assert_eq!(format.format(42.0), "42");
    /// ```
    pub fn format(&self, value: f64) -> String {
        if value == 0.0 {
            return "0".to_string();
        }
        if !value.is_finite() {
            return value.to_string();
        }

        let abs = value.abs();
        if abs < self.upper_threshold && abs >= self.lower_threshold {
            return format_significant(value);
        }

        let mut exponent = engineering_exponent(abs);
        let mut mantissa = round_significant(value / 10f64.powi(exponent));
        // Rounding can carry 999.9999 up to 1000; move to the next suffix.
        if mantissa.abs() >= 1000.0 && exponent < 15 {
            exponent += 3;
            mantissa /= 1000.0;
        }
        let suffix = SI_SUFFIXES
            .iter()
            .find(|(e, _)| *e == exponent)
            .map(|(_, s)| *s)
            .unwrap_or("");
        format!("{}{}", format_significant(mantissa), suffix)
    }
}

fn engineering_exponent(abs: f64) -> i32 {
    let mut exponent = ((abs.log10() / 3.0).floor() * 3.0) as i32;
    // log10 may land just below an exact power of ten
    if abs >= 10f64.powi(exponent + 3) {
        exponent += 3;
    }
    exponent.clamp(-9, 15)
}

fn round_significant(value: f64) -> f64 {
    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10f64.powi(SIGNIFICANT_DIGITS - 1 - magnitude);
    (value * scale).round() / scale
}

/// Prints up to six significant digits without trailing zeros.
pub fn format_significant(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (SIGNIFICANT_DIGITS - 1 - magnitude).clamp(0, 12) as usize;
    let text = format!("{:.*}", decimals, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

/// Picks a 1-2-5 tick step so that `width` splits into roughly `divisions`
/// intervals.
///
/// A ratio exactly at 2 or 5 takes the larger multiplier.
pub fn nice_step(width: f64, divisions: f64) -> f64 {
    let raw = width / divisions.max(1.0);
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let ratio = raw / magnitude;
    if ratio < 2.0 {
        magnitude
    } else if ratio < 5.0 {
        2.0 * magnitude
    } else {
        5.0 * magnitude
    }
}

/// Smallest count on the 1-2-5 ladder that is at least `minimum`.
pub fn nice_count(minimum: f64) -> u32 {
    let mut decade = 1u32;
    loop {
        for multiplier in [1u32, 2, 5] {
            let candidate = multiplier.saturating_mul(decade);
            if candidate as f64 >= minimum || candidate == u32::MAX {
                return candidate;
            }
        }
        decade = decade.saturating_mul(10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_si_suffixes() {
        let format = SiFormat::default();
        assert_eq!(format.format(0.0), "0");
        assert_eq!(format.format(1000.0), "1k");
        assert_eq!(format.format(1500.0), "1.5k");
        assert_eq!(format.format(-2_000_000.0), "-2M");
        assert_eq!(format.format(3e9), "3G");
        assert_eq!(format.format(0.005), "5m");
        assert_eq!(format.format(2.5e-6), "2.5µ");
        assert_eq!(format.format(999.0), "999");
        assert_eq!(format.format(12.5), "12.5");
    }

    #[test]
    fn test_si_hides_float_noise() {
        let format = SiFormat::default();
        assert_eq!(format.format(3.0 * 0.1), "300m");
        assert_eq!(format.format(0.1 + 0.2), "300m");
        assert_eq!(format.format(999_999.99999999), "1M");
    }

    #[test]
    fn test_si_thresholds_are_configurable() {
        let format = SiFormat {
            upper_threshold: 1e6,
            lower_threshold: 1e-3,
        };
        assert_eq!(format.format(250_000.0), "250000");
        assert_eq!(format.format(0.5), "0.5");
        assert_eq!(format.format(2e6), "2M");
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(5.0), "5");
        assert_eq!(format_significant(1.234567), "1.23457");
        assert_eq!(format_significant(-0.5), "-0.5");
    }

    #[test]
    fn test_nice_step_ladder() {
        assert_eq!(nice_step(10.0, 10.0), 1.0);
        assert_eq!(nice_step(30.0, 10.0), 2.0);
        assert_eq!(nice_step(60.0, 10.0), 5.0);
        assert_eq!(nice_step(10_000.0, 5.0), 2000.0);
        assert_eq!(nice_step(0.0, 5.0), 1.0);
    }

    #[test]
    fn test_nice_step_tie_breaks_upward() {
        assert_eq!(nice_step(20.0, 10.0), 2.0);
        assert_eq!(nice_step(50.0, 10.0), 5.0);
    }

    #[test]
    fn test_nice_count() {
        assert_eq!(nice_count(0.3), 1);
        assert_eq!(nice_count(1.5), 2);
        assert_eq!(nice_count(3.0), 5);
        assert_eq!(nice_count(11.0), 20);
    }
}
