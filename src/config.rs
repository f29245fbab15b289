//! Interaction and layout settings for the navigation widgets.

use serde::{Deserialize, Serialize};

use crate::axis::AxisKind;
use crate::error::Result;
use crate::input::ModifierKey;

/// Tunables shared by the composer and its rulers.
///
/// Unknown or missing fields fall back to their defaults when parsed, so
/// settings saved by older versions keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Exponent per wheel point: a wheel delta `d` zooms by `exp(d * s)`
    pub zoom_sensitivity: f64,
    /// Multiplier applied to wheel deltas when panning
    pub wheel_pan_scale: f64,
    pub zoom_modifier: ModifierKey,
    /// Zooms the vertical axis (continuous axes only)
    pub vertical_zoom_modifier: ModifierKey,
    /// Turns a primary drag into a zoom-to-region selection
    pub region_modifier: ModifierKey,
    /// Smallest region extent, in pixels, that still zooms
    pub min_region_pixels: f32,
    /// Adds or removes pressed items from the selection
    pub toggle_modifier: ModifierKey,
    /// Turns a primary drag on empty canvas into a band selection when
    /// interactive items are shown
    pub band_modifier: ModifierKey,
    /// Pointer travel (Manhattan distance) before a press on an item drags it
    pub drag_threshold_pixels: f32,
    /// Reach of an item's resize handles
    pub resize_handle_pixels: f32,
    /// Smallest size a resize leaves an item without explicit limits
    pub min_item_pixels: f32,
    pub timeline_thickness: f32,
    pub number_thickness: f32,
    /// Width of vertical number rulers, which need room for labels
    pub number_label_width: f32,
    pub item_thickness: f32,
    pub dark_mode: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            zoom_sensitivity: 0.002,
            wheel_pan_scale: 1.0,
            zoom_modifier: ModifierKey::Ctrl,
            vertical_zoom_modifier: ModifierKey::Alt,
            region_modifier: ModifierKey::Shift,
            min_region_pixels: 5.0,
            toggle_modifier: ModifierKey::Ctrl,
            band_modifier: ModifierKey::Shift,
            drag_threshold_pixels: 5.0,
            resize_handle_pixels: 8.0,
            min_item_pixels: 4.0,
            timeline_thickness: 30.0,
            number_thickness: 20.0,
            number_label_width: 48.0,
            item_thickness: 80.0,
            dark_mode: true,
        }
    }
}

impl NavigationConfig {
    /// Parses settings from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Zoom factor for a wheel delta; positive deltas zoom in.
    pub fn zoom_factor(&self, wheel_delta: f64) -> f64 {
        (wheel_delta * self.zoom_sensitivity).exp()
    }

    /// Thickness of a ruler showing `kind`.
    ///
    /// Timeline rulers reserve two label rows of `timeline_thickness`.
    /// Number rulers placed vertically use `number_label_width`.
    pub fn ruler_thickness(&self, kind: AxisKind, vertical: bool) -> f32 {
        match kind {
            AxisKind::Timeline => self.timeline_thickness * 2.0,
            AxisKind::Number if vertical => self.number_label_width,
            AxisKind::Number => self.number_thickness,
            AxisKind::Item => self.item_thickness,
        }
    }
}
