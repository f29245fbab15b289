//! Discrete axis: one slot per item (rows of a Gantt chart, heatmap columns).
//!
//! Item `i` occupies the raw interval `[i, i + 1)`. Density is expressed in
//! pixels per item and bounded so rows never collapse below a readable size.

use std::fmt;
use std::ops::Range;

use super::{band, AxisCore, AxisKind, AxisModel, Tick, TickLevel};
use crate::error::{NavError, Result};

pub const DEFAULT_PIXELS_PER_ITEM: f64 = 30.0;
pub const MIN_PIXELS_PER_ITEM: f64 = 10.0;
pub const MAX_PIXELS_PER_ITEM: f64 = 100.0;

type LabelFn = Box<dyn Fn(usize) -> String>;

/// Axis over `item_count` discrete slots.
pub struct ItemRuler {
    core: AxisCore,
    item_count: usize,
    default_pixels_per_item: f64,
    labels: Option<LabelFn>,
}

impl fmt::Debug for ItemRuler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRuler")
            .field("core", &self.core)
            .field("item_count", &self.item_count)
            .field("default_pixels_per_item", &self.default_pixels_per_item)
            .field("custom_labels", &self.labels.is_some())
            .finish_non_exhaustive()
    }
}

impl ItemRuler {
    /// Creates a ruler over `item_count` items with the default densities
    /// (30 px per item initially, bounded to 10..=100).
    ///
    /// # Errors
    /// Returns [`NavError::InvalidItemCount`] when `item_count` is zero.
    pub fn new(item_count: usize) -> Result<Self> {
        if item_count == 0 {
            log::warn!("rejecting item ruler without items");
            return Err(NavError::InvalidItemCount(item_count));
        }
        let core = AxisCore::new(0.0, item_count as f64)?
            .with_density_limits(MIN_PIXELS_PER_ITEM, MAX_PIXELS_PER_ITEM)?
            .with_initial_density(DEFAULT_PIXELS_PER_ITEM);
        log::debug!("item ruler with {item_count} items");

        Ok(Self {
            core,
            item_count,
            default_pixels_per_item: DEFAULT_PIXELS_PER_ITEM,
            labels: None,
        })
    }

    /// Overrides the item densities.
    ///
    /// # Arguments
    /// * `default` - Pixels per item on first sizing, clamped into `[min, max]`
    /// * `min` - Smallest pixels per item reachable by zooming out
    /// * `max` - Largest pixels per item reachable by zooming in
    ///
    /// # Errors
    /// Returns [`NavError::InvalidDensityLimits`] unless `0 < min <= max` and
    /// `default` is positive.
    pub fn with_pixels_per_item(mut self, default: f64, min: f64, max: f64) -> Result<Self> {
        if !(default > 0.0) || !default.is_finite() {
            log::warn!("rejecting default pixels per item {default}");
            return Err(NavError::InvalidDensityLimits { min: default, max });
        }
        let core = self.core.with_density_limits(min, max)?;
        let default = default.clamp(min, max);
        self.core = core.with_initial_density(default);
        self.default_pixels_per_item = default;
        Ok(self)
    }

    /// Replaces the default `index.to_string()` labels.
    pub fn with_labels(mut self, labels: impl Fn(usize) -> String + 'static) -> Self {
        self.labels = Some(Box::new(labels));
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.core = self.core.with_reverse(reverse);
        self
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn default_pixels_per_item(&self) -> f64 {
        self.default_pixels_per_item
    }

    /// Label of item `index`.
    pub fn label(&self, index: usize) -> String {
        match &self.labels {
            Some(labels) => labels(index),
            None => index.to_string(),
        }
    }

    /// Index of the item under `pixel`, clamped to the valid items.
    pub fn item_at(&self, pixel: f64) -> usize {
        let raw = self.core.to_domain(pixel).floor();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.item_count - 1)
        }
    }

    /// Pixel span `(low, high)` covered by item `index`.
    pub fn item_bounds(&self, index: usize) -> (f64, f64) {
        let start = index as f64;
        band(self.core.to_pixel(start), self.core.to_pixel(start + 1.0))
    }

    /// Pixel where item `index` begins along the axis direction.
    pub fn item_to_pixel(&self, index: usize) -> f64 {
        self.core.to_pixel(index as f64)
    }

    /// Items at least partially inside the visible range.
    pub fn visible_items(&self) -> Range<usize> {
        let first = self.core.visible_start().floor().max(0.0) as usize;
        let last = (self.core.visible_stop().ceil() as usize).min(self.item_count);
        first..last
    }
}

impl AxisModel for ItemRuler {
    type Value = f64;
    type Ticks<'a> = ItemTicks<'a>;

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

    fn ticks(&self) -> ItemTicks<'_> {
        ItemTicks {
            ruler: self,
            items: self.visible_items(),
        }
    }

    fn kind(&self) -> AxisKind {
        AxisKind::Item
    }
}

/// One banded tick per visible item.
#[derive(Debug)]
pub struct ItemTicks<'a> {
    ruler: &'a ItemRuler,
    items: Range<usize>,
}

impl Iterator for ItemTicks<'_> {
    type Item = Tick<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.items.next()?;
        Some(Tick {
            value: index as f64,
            pixel: self.ruler.item_to_pixel(index),
            band: Some(self.ruler.item_bounds(index)),
            level: TickLevel::Major,
            label: self.ruler.label(index),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sized(count: usize, length: f64) -> ItemRuler {
        let mut ruler = ItemRuler::new(count).unwrap();
        ruler.set_viewport_length(length);
        ruler
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(ItemRuler::new(0), Err(NavError::InvalidItemCount(0))));
    }

    #[test]
    fn test_rejects_bad_pixels_per_item() {
        let inverted = ItemRuler::new(10).unwrap().with_pixels_per_item(30.0, 50.0, 10.0);
        assert!(matches!(inverted, Err(NavError::InvalidDensityLimits { .. })));

        let nan_min = ItemRuler::new(10).unwrap().with_pixels_per_item(30.0, f64::NAN, 100.0);
        assert!(nan_min.is_err());

        let nan_max = ItemRuler::new(10).unwrap().with_pixels_per_item(30.0, 10.0, f64::NAN);
        assert!(nan_max.is_err());
    }

    #[test]
    fn test_default_pixels_per_item_clamped_into_limits() {
        let ruler = ItemRuler::new(10).unwrap().with_pixels_per_item(500.0, 10.0, 100.0).unwrap();
        assert_eq!(ruler.default_pixels_per_item(), 100.0);
    }

    #[test]
    fn test_initial_range_uses_default_density() {
        let ruler = sized(100, 600.0);
        assert_eq!(ruler.visible_start(), 0.0);
        assert!((ruler.visible_stop() - 20.0).abs() < EPS);
        assert_eq!(ruler.visible_items(), 0..20);
    }

    #[test]
    fn test_custom_density_and_pan() {
        let mut ruler = ItemRuler::new(100)
            .unwrap()
            .with_pixels_per_item(40.0, 10.0, 100.0)
            .unwrap();
        ruler.set_viewport_length(2000.0);
        assert_eq!(ruler.visible_start(), 0.0);
        assert!((ruler.visible_stop() - 50.0).abs() < EPS);

        ruler.pan(40.0);
        assert!((ruler.visible_start() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_few_items_show_whole_domain() {
        let ruler = sized(3, 600.0);
        assert_eq!(ruler.visible_start(), 0.0);
        assert_eq!(ruler.visible_stop(), 3.0);
        assert_eq!(ruler.ticks().count(), 3);
    }

    #[test]
    fn test_zoom_stays_within_item_density() {
        let mut ruler = sized(1000, 600.0);
        for _ in 0..20 {
            ruler.zoom(2.0, 300.0);
        }
        assert!((ruler.pixels_per_unit() - MAX_PIXELS_PER_ITEM).abs() < EPS);
        for _ in 0..20 {
            ruler.zoom(0.5, 300.0);
        }
        assert!((ruler.pixels_per_unit() - MIN_PIXELS_PER_ITEM).abs() < EPS);
    }

    #[test]
    fn test_item_at_clamps() {
        let ruler = sized(10, 300.0);
        assert_eq!(ruler.item_at(-50.0), 0);
        assert_eq!(ruler.item_at(45.0), 1);
        assert_eq!(ruler.item_at(10_000.0), 9);
    }

    #[test]
    fn test_item_bounds_reversed() {
        let mut ruler = ItemRuler::new(10).unwrap().with_reverse(true);
        ruler.set_viewport_length(300.0);
        // 10 items at 30 px: item 9 sits at the top
        let (low, high) = ruler.item_bounds(9);
        assert!(low.abs() < EPS);
        assert!((high - 30.0).abs() < EPS);
        assert_eq!(ruler.item_at(5.0), 9);
    }

    #[test]
    fn test_ticks_carry_labels_and_bands() {
        let ruler = sized(5, 150.0).with_labels(|i| format!("row {i}"));
        let ticks: Vec<_> = ruler.ticks().collect();
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[2].label, "row 2");
        assert_eq!(ticks[2].band, Some((60.0, 90.0)));
        assert_eq!(ruler.kind(), AxisKind::Item);
        assert!(!ruler.kind().is_continuous());
    }

    #[test]
    fn test_round_trip() {
        for reverse in [false, true] {
            let mut ruler = ItemRuler::new(500).unwrap().with_reverse(reverse);
            ruler.set_viewport_length(480.0);
            ruler.pan(123.0);
            for pixel in [0.0, 17.5, 479.0] {
                let back = ruler.to_pixel(&ruler.to_domain(pixel));
                assert!((back - pixel).abs() < 1e-6);
            }
        }
    }
}
