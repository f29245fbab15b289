//! Theme support for the navigation widgets
//!
//! Widgets never hard-code colors. They ask a [`ThemeService`] for a color by
//! semantic role (surfaces, borders, text) or by hue and saturation variant.
//! [`ColorMap`] is the built-in implementation with a light and a dark mode.
//!
//! # Examples
//!
//! ```
//! use rnav::theme::{ColorMap, Hue, ObjectRole, ThemeService, Variant};
//!
//! let colors = ColorMap::new(true);
//! let background = colors.object_color(ObjectRole::SurfaceLower);
//! let bar = colors.saturated_color(Hue::Blue, Variant::Fill);
//! assert_ne!(background, bar);
//! ```

use std::fmt;
use std::str::FromStr;

use egui::Color32;

use crate::error::{NavError, Result};

/// Semantic color roles for layout and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRole {
    SurfaceBase,
    SurfaceLower,
    SurfaceRaised,
    SurfaceSubtle,
    Border,
    BorderIntense,
    TextBase,
    TextSecondary,
    TextMuted,
}

impl ObjectRole {
    pub const ALL: [ObjectRole; 9] = [
        ObjectRole::SurfaceBase,
        ObjectRole::SurfaceLower,
        ObjectRole::SurfaceRaised,
        ObjectRole::SurfaceSubtle,
        ObjectRole::Border,
        ObjectRole::BorderIntense,
        ObjectRole::TextBase,
        ObjectRole::TextSecondary,
        ObjectRole::TextMuted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ObjectRole::SurfaceBase => "surface-base",
            ObjectRole::SurfaceLower => "surface-lower",
            ObjectRole::SurfaceRaised => "surface-raised",
            ObjectRole::SurfaceSubtle => "surface-subtle",
            ObjectRole::Border => "border",
            ObjectRole::BorderIntense => "border-intense",
            ObjectRole::TextBase => "text-base",
            ObjectRole::TextSecondary => "text-secondary",
            ObjectRole::TextMuted => "text-muted",
        }
    }

    /// Neutral levels `(light, dark)` the role resolves to.
    fn neutral_levels(self) -> (usize, usize) {
        match self {
            ObjectRole::SurfaceBase => (N0, N50),
            ObjectRole::SurfaceLower => (N100, N0),
            ObjectRole::SurfaceRaised => (N0, N100),
            ObjectRole::SurfaceSubtle => (N50, N100),
            ObjectRole::Border => (N200, N200),
            ObjectRole::BorderIntense => (N400, N400),
            ObjectRole::TextBase => (N900, N900),
            ObjectRole::TextSecondary => (N700, N700),
            ObjectRole::TextMuted => (N600, N600),
        }
    }
}

impl fmt::Display for ObjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectRole {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        ObjectRole::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| NavError::UnknownColor(s.to_string()))
    }
}

/// Palette hues available for data colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hue {
    Red,
    Orange,
    DeepOrange,
    Amber,
    Green,
    Teal,
    Blue,
    Indigo,
    Purple,
    Grey,
}

impl Hue {
    pub const ALL: [Hue; 10] = [
        Hue::Red,
        Hue::Orange,
        Hue::DeepOrange,
        Hue::Amber,
        Hue::Green,
        Hue::Teal,
        Hue::Blue,
        Hue::Indigo,
        Hue::Purple,
        Hue::Grey,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Hue::Red => "red",
            Hue::Orange => "orange",
            Hue::DeepOrange => "deep-orange",
            Hue::Amber => "amber",
            Hue::Green => "green",
            Hue::Teal => "teal",
            Hue::Blue => "blue",
            Hue::Indigo => "indigo",
            Hue::Purple => "purple",
            Hue::Grey => "grey",
        }
    }

    /// Shades 100 through 900.
    fn shades(self) -> &'static [&'static str; 9] {
        match self {
            Hue::Red => &[
                "#ffcdd2", "#ef9a9a", "#e57373", "#ef5350", "#f44336", "#e53935", "#d32f2f", "#c62828", "#b71c1c",
            ],
            Hue::Orange => &[
                "#ffe0b2", "#ffcc80", "#ffb74d", "#ffa726", "#ff9800", "#fb8c00", "#f57c00", "#ef6c00", "#e65100",
            ],
            Hue::DeepOrange => &[
                "#ffccbc", "#ffab91", "#ff8a65", "#ff7043", "#ff5722", "#f4511e", "#e64a19", "#d84315", "#bf360c",
            ],
            Hue::Amber => &[
                "#ffecb3", "#ffe082", "#ffd54f", "#ffca28", "#ffc107", "#ffb300", "#ffa000", "#ff8f00", "#ff6f00",
            ],
            Hue::Green => &[
                "#c8e6c9", "#a5d6a7", "#81c784", "#66bb6a", "#4caf50", "#43a047", "#388e3c", "#2e7d32", "#1b5e20",
            ],
            Hue::Teal => &[
                "#b2dfdb", "#80cbc4", "#4db6ac", "#26a69a", "#009688", "#00897b", "#00796b", "#00695c", "#004d40",
            ],
            Hue::Blue => &[
                "#bbdefb", "#90caf9", "#64b5f6", "#42a5f5", "#2196f3", "#1e88e5", "#1976d2", "#1565c0", "#0d47a1",
            ],
            Hue::Indigo => &[
                "#c5cae9", "#9fa8da", "#7986cb", "#5c6bc0", "#3f51b5", "#3949ab", "#303f9f", "#283593", "#1a237e",
            ],
            Hue::Purple => &[
                "#e1bee7", "#ce93d8", "#ba68c8", "#ab47bc", "#9c27b0", "#8e24aa", "#7b1fa2", "#6a1b9a", "#4a148c",
            ],
            Hue::Grey => &[
                "#f5f5f5", "#eeeeee", "#e0e0e0", "#bdbdbd", "#9e9e9e", "#757575", "#616161", "#424242", "#212121",
            ],
        }
    }

    fn shade(self, level: u16) -> Color32 {
        let index = usize::from(level / 100).clamp(1, 9) - 1;
        hex_to_color32(self.shades()[index])
    }
}

impl FromStr for Hue {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.replace('_', "-");
        let normalized = if normalized == "gray" { "grey" } else { normalized.as_str() };
        Hue::ALL
            .into_iter()
            .find(|hue| hue.name() == normalized)
            .ok_or_else(|| NavError::UnknownColor(s.to_string()))
    }
}

/// How saturated a hue is rendered, per use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    SubtleTint,
    LightTint,
    Background,
    Fill,
    Border,
    Line,
    TextBase,
}

impl Variant {
    pub const ALL: [Variant; 7] = [
        Variant::SubtleTint,
        Variant::LightTint,
        Variant::Background,
        Variant::Fill,
        Variant::Border,
        Variant::Line,
        Variant::TextBase,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::SubtleTint => "subtle-tint",
            Variant::LightTint => "light-tint",
            Variant::Background => "background",
            Variant::Fill => "fill",
            Variant::Border => "border",
            Variant::Line => "line",
            Variant::TextBase => "text-base",
        }
    }

    /// Shade levels `(light, dark)`.
    fn levels(self) -> (u16, u16) {
        match self {
            Variant::SubtleTint => (100, 900),
            Variant::LightTint => (200, 800),
            Variant::Background | Variant::Fill => (400, 600),
            Variant::Border | Variant::Line | Variant::TextBase => (500, 600),
        }
    }
}

impl FromStr for Variant {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name() == s)
            .ok_or_else(|| NavError::UnknownColor(s.to_string()))
    }
}

/// Source of every color the widgets paint with.
pub trait ThemeService {
    fn object_color(&self, role: ObjectRole) -> Color32;

    fn saturated_color(&self, hue: Hue, variant: Variant) -> Color32;

    fn is_dark(&self) -> bool;
}

// ===== Neutral levels =====

const N0: usize = 0;
const N50: usize = 1;
const N100: usize = 2;
const N200: usize = 3;
const N400: usize = 5;
const N600: usize = 7;
const N700: usize = 8;
const N900: usize = 10;

/// Neutral ramp 0, 50, 100..1000 as `(light, dark)` RGB triples.
const NEUTRAL_LEVELS: [([u8; 3], [u8; 3]); 12] = [
    ([255, 255, 255], [0, 0, 0]),
    ([246, 247, 249], [20, 24, 31]),
    ([237, 240, 242], [31, 38, 51]),
    ([225, 229, 234], [39, 49, 63]),
    ([211, 219, 228], [47, 59, 76]),
    ([195, 206, 215], [66, 82, 102]),
    ([176, 190, 203], [98, 112, 132]),
    ([146, 159, 177], [138, 150, 163]),
    ([96, 110, 128], [182, 191, 201]),
    ([64, 75, 90], [211, 216, 223]),
    ([24, 29, 37], [237, 239, 243]),
    ([0, 0, 0], [255, 255, 255]),
];

/// Built-in [`ThemeService`] with neutral surfaces and a material-style
/// saturated palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMap {
    dark_mode: bool,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ColorMap {
    pub fn new(dark_mode: bool) -> Self {
        Self { dark_mode }
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }

    fn pick<T>(&self, light: T, dark: T) -> T {
        if self.dark_mode {
            dark
        } else {
            light
        }
    }

    fn neutral(&self, level: usize) -> Color32 {
        let (light, dark) = NEUTRAL_LEVELS[level];
        let [r, g, b] = self.pick(light, dark);
        Color32::from_rgb(r, g, b)
    }

    /// Looks up a role by its kebab-case name (`"surface-base"`).
    ///
    /// # Errors
    /// Returns [`NavError::UnknownColor`] for unknown names.
    pub fn object_color_named(&self, name: &str) -> Result<Color32> {
        Ok(self.object_color(name.parse()?))
    }

    /// Looks up a palette color by hue and variant names (`"blue"`, `"fill"`).
    ///
    /// # Errors
    /// Returns [`NavError::UnknownColor`] if either name is unknown.
    pub fn saturated_color_named(&self, hue: &str, variant: &str) -> Result<Color32> {
        Ok(self.saturated_color(hue.parse()?, variant.parse()?))
    }

    /// Applies the surfaces and text colors to egui visuals
    pub fn apply_to_visuals(&self, visuals: &mut egui::Visuals) {
        visuals.dark_mode = self.dark_mode;
        visuals.panel_fill = self.object_color(ObjectRole::SurfaceBase);
        visuals.window_fill = self.object_color(ObjectRole::SurfaceRaised);
        visuals.extreme_bg_color = self.object_color(ObjectRole::SurfaceLower);
        visuals.faint_bg_color = self.object_color(ObjectRole::SurfaceSubtle);
        visuals.override_text_color = Some(self.object_color(ObjectRole::TextBase));

        visuals.selection.bg_fill = self.saturated_color(Hue::Blue, Variant::Background);
        visuals.selection.stroke.color = self.saturated_color(Hue::Blue, Variant::Line);
        visuals.widgets.noninteractive.bg_stroke.color = self.object_color(ObjectRole::Border);
        visuals.hyperlink_color = self.saturated_color(Hue::Teal, Variant::TextBase);
        visuals.error_fg_color = self.saturated_color(Hue::Red, Variant::TextBase);
        visuals.warn_fg_color = self.saturated_color(Hue::Orange, Variant::TextBase);
    }
}

impl ThemeService for ColorMap {
    fn object_color(&self, role: ObjectRole) -> Color32 {
        let (light, dark) = role.neutral_levels();
        self.neutral(self.pick(light, dark))
    }

    fn saturated_color(&self, hue: Hue, variant: Variant) -> Color32 {
        let (light, dark) = variant.levels();
        hue.shade(self.pick(light, dark))
    }

    fn is_dark(&self) -> bool {
        self.dark_mode
    }
}

/// Converts a hex color string (like "#282a36") to Color32
pub fn hex_to_color32(hex: &str) -> Color32 {
    let hex = hex.trim_start_matches('#');

    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        Color32::from_rgb(r, g, b)
    } else {
        Color32::from_rgb(0, 0, 0) // Fallback to black
    }
}

/// Sets the alpha channel of a color
pub fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
