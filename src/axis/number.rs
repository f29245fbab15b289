//! Continuous numeric axis with SI-suffixed labels.

use super::{AxisCore, AxisKind, AxisModel, Tick, TickLevel};
use crate::error::Result;
use crate::format::{nice_step, SiFormat};

/// Pixels per tick interval the step selection aims for.
const PIXELS_PER_DIVISION: f64 = 100.0;

/// Fewest intervals a ruler is split into, however short it is.
const MIN_DIVISIONS: f64 = 3.0;

/// Axis over a plain `f64` range.
#[derive(Debug, Clone)]
pub struct NumberRuler {
    core: AxisCore,
    format: SiFormat,
}

impl NumberRuler {
    /// Creates a ruler over `[min, max]`, initially showing all of it.
    ///
    /// # Errors
    /// Returns [`crate::NavError::InvalidDomain`] for an empty, inverted or
    /// non-finite range.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        log::debug!("number ruler {min}..{max}");
        Ok(Self {
            core: AxisCore::new(min, max)?,
            format: SiFormat::default(),
        })
    }

    pub fn with_visible_range(mut self, start: f64, stop: f64) -> Result<Self> {
        self.core = self.core.with_visible_range(start, stop)?;
        Ok(self)
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.core = self.core.with_reverse(reverse);
        self
    }

    pub fn with_density_limits(mut self, min_density: f64, max_density: f64) -> Result<Self> {
        self.core = self.core.with_density_limits(min_density, max_density)?;
        Ok(self)
    }

    pub fn with_format(mut self, format: SiFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> &SiFormat {
        &self.format
    }

    /// Spacing between ticks for the current range and viewport length.
    pub fn tick_step(&self) -> f64 {
        let divisions = (self.core.viewport_length() / PIXELS_PER_DIVISION)
            .floor()
            .max(MIN_DIVISIONS);
        nice_step(self.core.visible_width(), divisions)
    }
}

impl AxisModel for NumberRuler {
    type Value = f64;
    type Ticks<'a> = NumberTicks<'a>;

    fn core(&self) -> &AxisCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AxisCore {
        &mut self.core
    }

    fn encode(&self, value: &f64) -> f64 {
        *value
    }

    fn decode(&self, raw: f64) -> f64 {
        raw
    }

    fn ticks(&self) -> NumberTicks<'_> {
        let step = self.tick_step();
        NumberTicks {
            ruler: self,
            step,
            index: (self.core.visible_start() / step).floor() as i64,
            last: (self.core.visible_stop() / step).ceil() as i64,
        }
    }

    fn kind(&self) -> AxisKind {
        AxisKind::Number
    }
}

/// Ticks at integer multiples of the step covering the visible range.
#[derive(Debug, Clone)]
pub struct NumberTicks<'a> {
    ruler: &'a NumberRuler,
    step: f64,
    index: i64,
    last: i64,
}

impl Iterator for NumberTicks<'_> {
    type Item = Tick<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index > self.last {
            return None;
        }
        let value = self.index as f64 * self.step;
        self.index += 1;
        Some(Tick {
            value,
            pixel: self.ruler.core.to_pixel(value),
            band: None,
            level: TickLevel::Major,
            label: self.ruler.format.format(value),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last - self.index + 1).max(0) as usize;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_density_and_transform() {
        let mut ruler = NumberRuler::new(0.0, 10_000.0).unwrap();
        ruler.set_viewport_length(500.0);
        assert!((ruler.pixels_per_unit() - 0.05).abs() < EPS);
        assert!((ruler.to_pixel(&5000.0) - 250.0).abs() < EPS);
        assert!((ruler.to_domain(250.0) - 5000.0).abs() < EPS);
    }

    #[test]
    fn test_ticks_cover_visible_range() {
        let mut ruler = NumberRuler::new(0.0, 10_000.0).unwrap();
        ruler.set_viewport_length(500.0);
        assert_eq!(ruler.tick_step(), 2000.0);

        let values: Vec<f64> = ruler.ticks().map(|t| t.value).collect();
        assert_eq!(values, vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10_000.0]);

        let labels: Vec<String> = ruler.ticks().map(|t| t.label).collect();
        assert_eq!(labels[1], "2k");
        assert_eq!(labels[5], "10k");
    }

    #[test]
    fn test_short_ruler_uses_three_divisions() {
        let mut ruler = NumberRuler::new(0.0, 90.0).unwrap();
        ruler.set_viewport_length(120.0);
        // 90 / 3 = 30 -> ratio 3 -> 2 * 10
        assert_eq!(ruler.tick_step(), 20.0);
    }

    #[test]
    fn test_ticks_follow_zoom() {
        let mut ruler = NumberRuler::new(0.0, 1.0).unwrap();
        ruler.set_viewport_length(400.0);
        let coarse = ruler.tick_step();
        ruler.zoom(100.0, 200.0);
        let fine = ruler.tick_step();
        assert!(fine < coarse);

        let start = ruler.core().visible_start();
        let stop = ruler.core().visible_stop();
        let ticks: Vec<_> = ruler.ticks().collect();
        assert!(ticks.first().map(|t| t.value <= start).unwrap_or(false));
        assert!(ticks.last().map(|t| t.value >= stop).unwrap_or(false));
        // Small values carry milli suffixes
        assert!(ticks.iter().any(|t| t.label.ends_with('m')));
    }

    #[test]
    fn test_integer_indexed_ticks_stay_exact() {
        let mut ruler = NumberRuler::new(0.0, 1.0).unwrap();
        ruler.set_viewport_length(1000.0);
        let step = ruler.tick_step();
        for (i, tick) in ruler.ticks().enumerate() {
            assert_eq!(tick.value, i as f64 * step);
        }
    }

    #[test]
    fn test_round_trip_reversed() {
        let mut ruler = NumberRuler::new(-1e6, 1e6).unwrap().with_reverse(true);
        ruler.set_viewport_length(300.0);
        ruler.zoom(7.0, 40.0);
        for pixel in [0.0, 12.25, 299.0] {
            let back = ruler.to_pixel(&ruler.to_domain(pixel));
            assert!((back - pixel).abs() < 1e-6);
        }
        assert!(ruler.is_reversed());
    }

    #[test]
    fn test_custom_format_thresholds() {
        let mut ruler = NumberRuler::new(0.0, 10_000.0)
            .unwrap()
            .with_format(SiFormat {
                upper_threshold: 1e6,
                lower_threshold: 1.0,
            });
        ruler.set_viewport_length(500.0);
        let last = ruler.ticks().last().map(|t| t.label);
        assert_eq!(last.as_deref(), Some("10000"));
    }
}
