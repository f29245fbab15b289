//! Date/time axis with calendar-aligned ticks.
//!
//! Values are `NaiveDateTime`s encoded as seconds since the Unix epoch. The
//! tick granularity is chosen from the current density alone, and ticks come
//! in two rows: calendar periods one unit coarser above the minor periods.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};

use super::{band, AxisCore, AxisKind, AxisModel, Tick, TickLevel};
use crate::error::{NavError, Result};
use crate::format::nice_count;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Narrowest a year-tick interval may be, in pixels.
const YEAR_MIN_WIDTH: f64 = 30.0;

/// Calendar unit used for ticks, ordered coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

impl Granularity {
    /// Candidates for the minor row, finest first.
    const MINOR_CANDIDATES: [Granularity; 4] = [
        Granularity::Minute,
        Granularity::Hour,
        Granularity::Day,
        Granularity::Month,
    ];

    /// Average length of one unit in seconds.
    pub fn nominal_seconds(self) -> f64 {
        match self {
            Granularity::Year => 365.2425 * SECONDS_PER_DAY,
            Granularity::Month => 30.436875 * SECONDS_PER_DAY,
            Granularity::Day => SECONDS_PER_DAY,
            Granularity::Hour => 3_600.0,
            Granularity::Minute => 60.0,
        }
    }

    /// Pixel width one unit needs before its labels are shown.
    pub fn min_label_width(self) -> f64 {
        match self {
            Granularity::Minute | Granularity::Hour => 40.0,
            Granularity::Day => 24.0,
            Granularity::Month | Granularity::Year => YEAR_MIN_WIDTH,
        }
    }

    /// The next coarser unit, `None` for years.
    pub fn coarser(self) -> Option<Self> {
        match self {
            Granularity::Year => None,
            Granularity::Month => Some(Granularity::Year),
            Granularity::Day => Some(Granularity::Month),
            Granularity::Hour => Some(Granularity::Day),
            Granularity::Minute => Some(Granularity::Hour),
        }
    }

    /// Start of the period containing `t`.
    pub fn floor(self, t: NaiveDateTime) -> NaiveDateTime {
        let date = t.date();
        let floored = match self {
            Granularity::Year => start_of_year(date.year()),
            Granularity::Month => {
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1).map(|d| d.and_time(NaiveTime::MIN))
            }
            Granularity::Day => Some(date.and_time(NaiveTime::MIN)),
            Granularity::Hour => date.and_hms_opt(t.hour(), 0, 0),
            Granularity::Minute => date.and_hms_opt(t.hour(), t.minute(), 0),
        };
        floored.unwrap_or(t)
    }

    /// Moves `t` forward by `steps` units. `None` past the calendar's end.
    pub fn advance(self, t: NaiveDateTime, steps: u32) -> Option<NaiveDateTime> {
        match self {
            Granularity::Year => t.checked_add_months(Months::new(steps.checked_mul(12)?)),
            Granularity::Month => t.checked_add_months(Months::new(steps)),
            Granularity::Day => t.checked_add_signed(TimeDelta::try_days(steps.into())?),
            Granularity::Hour => t.checked_add_signed(TimeDelta::try_hours(steps.into())?),
            Granularity::Minute => t.checked_add_signed(TimeDelta::try_minutes(steps.into())?),
        }
    }

    /// strftime pattern for labels on the major row.
    pub fn major_format(self) -> &'static str {
        match self {
            Granularity::Year => "%Y",
            Granularity::Month => "%B %Y",
            Granularity::Day => "%a %d %b %Y",
            Granularity::Hour => "%d %b %H:00",
            Granularity::Minute => "%d %b %H:%M",
        }
    }

    /// strftime pattern for labels on the minor row.
    pub fn minor_format(self) -> &'static str {
        match self {
            Granularity::Year => "%Y",
            Granularity::Month => "%b",
            Granularity::Day => "%d",
            Granularity::Hour => "%H:00",
            Granularity::Minute => "%H:%M",
        }
    }
}

fn start_of_year(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.and_time(NaiveTime::MIN))
}

/// Tick layout selected for a density.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeScale {
    /// Coarser row of period bands, absent when the minor row shows years
    pub major: Option<Granularity>,
    pub minor: Granularity,
    /// Years per minor tick when `minor` is `Year`, otherwise 1
    pub year_step: u32,
}

impl TimeScale {
    /// Picks the finest granularity whose unit is wide enough to label.
    ///
    /// # Arguments
    /// * `pixels_per_second` - Current axis density
    pub fn for_density(pixels_per_second: f64) -> Self {
        let minor = Granularity::MINOR_CANDIDATES
            .into_iter()
            .find(|g| g.nominal_seconds() * pixels_per_second >= g.min_label_width())
            .unwrap_or(Granularity::Year);

        let year_step = if minor == Granularity::Year {
            let year_width = Granularity::Year.nominal_seconds() * pixels_per_second;
            nice_count(YEAR_MIN_WIDTH / year_width)
        } else {
            1
        };

        Self {
            major: minor.coarser(),
            minor,
            year_step,
        }
    }
}

/// Seconds since the Unix epoch, with microsecond resolution.
pub(crate) fn to_seconds(t: &NaiveDateTime) -> f64 {
    t.and_utc().timestamp_micros() as f64 / 1e6
}

/// Inverse of [`to_seconds`], saturating outside chrono's range.
pub(crate) fn from_seconds(raw: f64) -> NaiveDateTime {
    let micros = (raw * 1e6).round() as i64;
    match DateTime::<Utc>::from_timestamp_micros(micros) {
        Some(t) => t.naive_utc(),
        None if raw < 0.0 => NaiveDateTime::MIN,
        None => NaiveDateTime::MAX,
    }
}

/// Axis over a date/time range.
#[derive(Debug, Clone)]
pub struct TimelineRuler {
    core: AxisCore,
}

impl TimelineRuler {
    /// Creates a timeline over `[start, stop]`, initially showing all of it.
    ///
    /// # Errors
    /// Returns [`NavError::InvalidTimeRange`] unless `start < stop`.
    pub fn new(start: NaiveDateTime, stop: NaiveDateTime) -> Result<Self> {
        if start >= stop {
            log::warn!("rejecting time range {start}..{stop}");
            return Err(NavError::InvalidTimeRange {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }
        log::debug!("timeline ruler {start}..{stop}");
        Ok(Self {
            core: AxisCore::new(to_seconds(&start), to_seconds(&stop))?,
        })
    }

    pub fn with_visible_range(mut self, start: NaiveDateTime, stop: NaiveDateTime) -> Result<Self> {
        self.core = self.core.with_visible_range(to_seconds(&start), to_seconds(&stop))?;
        Ok(self)
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.core = self.core.with_reverse(reverse);
        self
    }

    /// Bounds zooming, in pixels per second.
    pub fn with_density_limits(mut self, min_density: f64, max_density: f64) -> Result<Self> {
        self.core = self.core.with_density_limits(min_density, max_density)?;
        Ok(self)
    }

    pub fn domain_start(&self) -> NaiveDateTime {
        from_seconds(self.core.domain_min())
    }

    pub fn domain_stop(&self) -> NaiveDateTime {
        from_seconds(self.core.domain_max())
    }

    /// Tick layout for the current density.
    pub fn scale(&self) -> TimeScale {
        TimeScale::for_density(self.core.pixels_per_unit())
    }

    fn walk(&self, granularity: Granularity, step: u32, level: TickLevel) -> PeriodWalk<'_> {
        let visible_start = from_seconds(self.core.visible_start());
        let first = match (granularity, step) {
            (Granularity::Year, step) if step > 1 => {
                let year = visible_start.year();
                start_of_year(year - year.rem_euclid(step.min(i32::MAX as u32) as i32))
                    .unwrap_or_else(|| granularity.floor(visible_start))
            }
            _ => granularity.floor(visible_start),
        };
        let format = match level {
            TickLevel::Major => granularity.major_format(),
            TickLevel::Minor => granularity.minor_format(),
        };

        PeriodWalk {
            ruler: self,
            granularity,
            step,
            level,
            format,
            next: Some(first),
        }
    }
}

impl AxisModel for TimelineRuler {
    type Value = NaiveDateTime;
    type Ticks<'a> = TimelineTicks<'a>;

    fn core(&self) -> &AxisCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AxisCore {
        &mut self.core
    }

    fn encode(&self, value: &NaiveDateTime) -> f64 {
        to_seconds(value)
    }

    fn decode(&self, raw: f64) -> NaiveDateTime {
        from_seconds(raw)
    }

    fn ticks(&self) -> TimelineTicks<'_> {
        let scale = self.scale();
        TimelineTicks {
            major: scale.major.map(|g| self.walk(g, 1, TickLevel::Major)),
            minor: self.walk(scale.minor, scale.year_step, TickLevel::Minor),
        }
    }

    fn kind(&self) -> AxisKind {
        AxisKind::Timeline
    }

    fn layered_ticks(&self) -> bool {
        self.scale().major.is_some()
    }
}

/// Major-row ticks followed by minor-row ticks.
#[derive(Debug, Clone)]
pub struct TimelineTicks<'a> {
    major: Option<PeriodWalk<'a>>,
    minor: PeriodWalk<'a>,
}

impl Iterator for TimelineTicks<'_> {
    type Item = Tick<NaiveDateTime>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(major) = &mut self.major {
            if let Some(tick) = major.next() {
                return Some(tick);
            }
            self.major = None;
        }
        self.minor.next()
    }
}

/// Walks consecutive periods from the floored visible start to the visible
/// stop.
#[derive(Debug, Clone)]
struct PeriodWalk<'a> {
    ruler: &'a TimelineRuler,
    granularity: Granularity,
    step: u32,
    level: TickLevel,
    format: &'static str,
    next: Option<NaiveDateTime>,
}

impl Iterator for PeriodWalk<'_> {
    type Item = Tick<NaiveDateTime>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next?;
        let core = &self.ruler.core;
        let raw = to_seconds(&start);
        if raw >= core.visible_stop() {
            self.next = None;
            return None;
        }

        let end = self.granularity.advance(start, self.step);
        let end_raw = end.as_ref().map(to_seconds).unwrap_or_else(|| core.domain_max());
        self.next = end;

        let pixel = core.to_pixel(raw);
        Some(Tick {
            value: start,
            pixel,
            band: Some(band(pixel, core.to_pixel(end_raw))),
            level: self.level,
            label: start.format(self.format).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sized(start: NaiveDateTime, stop: NaiveDateTime, length: f64) -> TimelineRuler {
        let mut ruler = TimelineRuler::new(start, stop).unwrap();
        ruler.set_viewport_length(length);
        ruler
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = TimelineRuler::new(at(2024, 2, 1), at(2024, 1, 1));
        assert!(matches!(result, Err(NavError::InvalidTimeRange { .. })));
        assert!(TimelineRuler::new(at(2024, 1, 1), at(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_encoding_round_trip() {
        let t = at(2024, 2, 29) + TimeDelta::milliseconds(1500);
        assert_eq!(from_seconds(to_seconds(&t)), t);
        assert_eq!(to_seconds(&at(1970, 1, 1)), 0.0);
    }

    #[test]
    fn test_decoding_saturates() {
        assert_eq!(from_seconds(1e20), NaiveDateTime::MAX);
        assert_eq!(from_seconds(-1e20), NaiveDateTime::MIN);
    }

    #[test]
    fn test_three_day_window_shows_days() {
        let mut ruler = sized(at(2024, 1, 1), at(2024, 12, 31), 800.0);
        ruler.set_visible_range(&at(2024, 3, 1), &at(2024, 3, 4));
        let scale = ruler.scale();
        assert!(matches!(scale.minor, Granularity::Day | Granularity::Hour));
        assert_ne!(scale.minor, Granularity::Month);
        assert!(ruler.layered_ticks());
    }

    #[test]
    fn test_granularity_refines_with_zoom() {
        let mut ruler = sized(at(2000, 1, 1), at(2030, 1, 1), 1000.0);

        ruler.set_visible_range(&at(2023, 1, 1), &at(2024, 1, 1));
        assert_eq!(ruler.scale().minor, Granularity::Month);
        assert_eq!(ruler.scale().major, Some(Granularity::Year));

        ruler.set_visible_range(&at(2023, 6, 1), &at(2023, 7, 1));
        assert_eq!(ruler.scale().minor, Granularity::Day);

        ruler.set_visible_range(&at(2023, 6, 10), &at(2023, 6, 11));
        assert_eq!(ruler.scale().minor, Granularity::Hour);
    }

    #[test]
    fn test_selection_is_monotonic() {
        let mut previous = Granularity::Year;
        let mut density = 1e-9;
        while density < 10.0 {
            let minor = TimeScale::for_density(density).minor;
            assert!(minor >= previous, "coarser at {density}");
            previous = minor;
            density *= 1.1;
        }
        assert_eq!(previous, Granularity::Minute);
    }

    #[test]
    fn test_ticks_start_at_period_boundaries() {
        let ruler = sized(at(2024, 3, 1), at(2024, 3, 4), 800.0);

        let ticks: Vec<_> = ruler.ticks().collect();
        let majors: Vec<&str> = ticks
            .iter()
            .filter(|t| t.level == TickLevel::Major)
            .map(|t| t.label.as_str())
            .collect();
        let minors: Vec<&str> = ticks
            .iter()
            .filter(|t| t.level == TickLevel::Minor)
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(majors, vec!["March 2024"]);
        assert_eq!(minors, vec!["01", "02", "03"]);

        let first_day = ticks.iter().find(|t| t.level == TickLevel::Minor).unwrap();
        let (low, high) = first_day.band.unwrap();
        assert!(low.abs() < 1e-6);
        assert!((high - 800.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_ticks_begin_before_unaligned_start() {
        let start = at(2024, 5, 10) + TimeDelta::hours(5) + TimeDelta::minutes(30);
        let mut ruler = sized(at(2024, 1, 1), at(2025, 1, 1), 600.0);
        ruler.set_visible_range(&start, &(start + TimeDelta::hours(6)));
        assert_eq!(ruler.scale().minor, Granularity::Hour);

        let first_minor = ruler.ticks().find(|t| t.level == TickLevel::Minor).unwrap();
        assert_eq!(first_minor.value, at(2024, 5, 10) + TimeDelta::hours(5));
        assert!(first_minor.pixel < 0.0);
        assert_eq!(first_minor.label, "05:00");
    }

    #[test]
    fn test_year_ticks_use_nice_steps() {
        let ruler = sized(at(1900, 1, 1), at(2100, 1, 1), 500.0);
        let scale = ruler.scale();
        assert_eq!(scale.minor, Granularity::Year);
        assert_eq!(scale.major, None);
        assert_eq!(scale.year_step, 20);
        assert!(!ruler.layered_ticks());

        let years: Vec<i32> = ruler.ticks().map(|t| t.value.year()).collect();
        assert_eq!(years.first(), Some(&1900));
        assert_eq!(years.len(), 10);
        assert!(years.windows(2).all(|w| w[1] - w[0] == 20));
    }

    #[test]
    fn test_round_trip_reversed() {
        for reverse in [false, true] {
            let mut ruler = TimelineRuler::new(at(2020, 1, 1), at(2021, 1, 1))
                .unwrap()
                .with_reverse(reverse);
            ruler.set_viewport_length(700.0);
            ruler.zoom(12.0, 200.0);
            for pixel in [0.0, 99.5, 699.0] {
                let back = ruler.to_pixel(&ruler.to_domain(pixel));
                assert!((back - pixel).abs() < 1e-3, "reverse={reverse} pixel={pixel}");
            }
        }
    }

    #[test]
    fn test_floor_and_advance() {
        let t = at(2024, 1, 31) + TimeDelta::hours(13) + TimeDelta::minutes(47);
        assert_eq!(Granularity::Year.floor(t), at(2024, 1, 1));
        assert_eq!(Granularity::Month.floor(t), at(2024, 1, 1));
        assert_eq!(Granularity::Day.floor(t), at(2024, 1, 31));
        assert_eq!(Granularity::Hour.floor(t), at(2024, 1, 31) + TimeDelta::hours(13));
        assert_eq!(Granularity::Month.advance(at(2024, 1, 31), 1), Some(at(2024, 2, 29)));
        assert_eq!(Granularity::Year.advance(at(2024, 1, 1), 5), Some(at(2029, 1, 1)));
        assert_eq!(Granularity::Year.advance(NaiveDateTime::MAX, 1), None);
    }
}
