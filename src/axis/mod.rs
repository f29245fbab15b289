//! Axis models: the mapping between a data domain and a pixel span.
//!
//! Three variants share one contract:
//! - [`NumberRuler`] for continuous numeric ranges
//! - [`TimelineRuler`] for date/time ranges
//! - [`ItemRuler`] for discrete rows or columns
//!
//! Every variant wraps an [`AxisCore`] and only decides how its values are
//! encoded into the core's `f64` domain and how ticks are labelled.

mod core;
mod item;
mod number;
mod timeline;

use std::fmt;
use std::ops::Range;

pub use self::core::{AxisCore, DragAnchor, MIN_VIEWPORT_LENGTH};
pub use item::{ItemRuler, ItemTicks};
pub use number::{NumberRuler, NumberTicks};
pub use timeline::{Granularity, TimeScale, TimelineRuler, TimelineTicks};

/// Which variant an axis is. Rulers and the composer use it to pick a
/// thickness and to decide whether zoom gestures apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Number,
    Timeline,
    Item,
}

impl AxisKind {
    /// Continuous axes accept free zoom from the composer. Item axes are
    /// bounded by their per-item density instead.
    pub fn is_continuous(self) -> bool {
        !matches!(self, AxisKind::Item)
    }
}

/// Row a tick belongs to on a ruler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickLevel {
    Major,
    Minor,
}

/// One tick produced for the current visible range.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick<V> {
    /// Domain value the tick marks
    pub value: V,
    /// Pixel offset of the tick along the axis
    pub pixel: f64,
    /// Pixel span `(low, high)` of the band the tick opens, for banded axes
    /// (calendar periods, items)
    pub band: Option<(f64, f64)>,
    pub level: TickLevel,
    /// Default label text
    pub label: String,
}

/// Shared contract of every axis variant.
///
/// Implementors provide value encoding and tick generation; the provided
/// methods forward pan/zoom/transform work to [`AxisCore`].
pub trait AxisModel {
    /// Domain value type (`f64`, `NaiveDateTime`, ...)
    type Value: Clone + fmt::Debug;

    /// Lazy tick sequence for the visible range
    type Ticks<'a>: Iterator<Item = Tick<Self::Value>>
    where
        Self: 'a;

    fn core(&self) -> &AxisCore;

    fn core_mut(&mut self) -> &mut AxisCore;

    /// Encodes a domain value into the core's `f64` domain.
    fn encode(&self, value: &Self::Value) -> f64;

    /// Decodes a raw `f64` back into a domain value.
    fn decode(&self, raw: f64) -> Self::Value;

    /// Ticks for the current visible range and density. Recomputed on every
    /// call; nothing is cached across zoom changes.
    fn ticks(&self) -> Self::Ticks<'_>;

    fn kind(&self) -> AxisKind;

    /// Whether ticks come in two rows (major above minor).
    fn layered_ticks(&self) -> bool {
        false
    }

    fn to_pixel(&self, value: &Self::Value) -> f64 {
        self.core().to_pixel(self.encode(value))
    }

    fn to_domain(&self, pixel: f64) -> Self::Value {
        self.decode(self.core().to_domain(pixel))
    }

    fn pan(&mut self, delta_pixels: f64) {
        self.core_mut().pan(delta_pixels);
    }

    /// Pans in screen direction, honoring `reverse`.
    fn scroll(&mut self, delta_pixels: f64) {
        self.core_mut().scroll(delta_pixels);
    }

    fn zoom(&mut self, factor: f64, anchor_pixel: f64) {
        self.core_mut().zoom(factor, anchor_pixel);
    }

    fn set_viewport_length(&mut self, pixels: f64) {
        self.core_mut().set_viewport_length(pixels);
    }

    fn set_visible_range(&mut self, start: &Self::Value, stop: &Self::Value) {
        let (start, stop) = (self.encode(start), self.encode(stop));
        self.core_mut().set_visible_range(start, stop);
    }

    fn reset(&mut self) {
        self.core_mut().reset();
    }

    fn begin_drag(&self, pixel: f64) -> DragAnchor {
        self.core().anchor_at(pixel)
    }

    fn drag(&mut self, anchor: DragAnchor, pixel: f64) {
        self.core_mut().drag(anchor, pixel);
    }

    fn visible_start(&self) -> Self::Value {
        self.decode(self.core().visible_start())
    }

    fn visible_stop(&self) -> Self::Value {
        self.decode(self.core().visible_stop())
    }

    fn visible_range(&self) -> Range<Self::Value> {
        self.visible_start()..self.visible_stop()
    }

    fn pixels_per_unit(&self) -> f64 {
        self.core().pixels_per_unit()
    }

    fn viewport_length(&self) -> f64 {
        self.core().viewport_length()
    }

    fn is_reversed(&self) -> bool {
        self.core().is_reversed()
    }
}

/// Orders two pixel offsets into a `(low, high)` band.
pub(crate) fn band(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
