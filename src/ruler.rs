//! Ruler presentation: ticks, labels and direct manipulation of one axis.
//!
//! A [`Ruler`] does not own its axis. The composer keeps both axes and lends
//! the matching one to the ruler for painting and event handling, so the
//! canvas and the ruler always see the same visible range.

use std::fmt;

use egui::{Align2, Pos2, Rect, Vec2};

use crate::axis::{AxisModel, DragAnchor, Tick, TickLevel};
use crate::config::NavigationConfig;
use crate::input::{InputOutcome, PointerInput, WheelInput};
use crate::paint::{FontSpec, PaintSurface, Style};
use crate::text_utils::{fits, truncate_text_to_fit};
use crate::theme::{with_alpha, ObjectRole, ThemeService};

const MAJOR_FONT: FontSpec = FontSpec {
    size: 12.0,
    monospace: false,
};

const MINOR_FONT: FontSpec = FontSpec {
    size: 11.0,
    monospace: false,
};

/// Gap between a point tick and its label.
const LABEL_OFFSET: f32 = 4.0;

/// Spacing of the unlabeled sub-ticks inside a band too narrow for its label.
const SUB_TICK_SPACING: f32 = 50.0;

/// Side of the canvas a ruler is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }

    /// Whether the canvas lies at the far end of the thickness axis.
    fn canvas_is_far(self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }
}

type LabelFn<V> = Box<dyn Fn(&V) -> String>;

/// Tick strip attached to one edge of the canvas.
pub struct Ruler<A: AxisModel> {
    edge: Edge,
    thickness: f32,
    labels: Option<LabelFn<A::Value>>,
    drag: Option<DragAnchor>,
}

impl<A: AxisModel> fmt::Debug for Ruler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruler")
            .field("edge", &self.edge)
            .field("thickness", &self.thickness)
            .field("custom_labels", &self.labels.is_some())
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl<A: AxisModel> Ruler<A> {
    pub fn new(edge: Edge, thickness: f32) -> Self {
        Self {
            edge,
            thickness,
            labels: None,
            drag: None,
        }
    }

    /// Replaces the axis' default tick labels.
    pub fn with_labels(mut self, labels: impl Fn(&A::Value) -> String + 'static) -> Self {
        self.labels = Some(Box::new(labels));
        self
    }

    pub fn set_labels(&mut self, labels: impl Fn(&A::Value) -> String + 'static) {
        self.labels = Some(Box::new(labels));
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f32) {
        self.thickness = thickness.max(0.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Ticks for the axis' current visible range, with the label override
    /// applied.
    pub fn ticks<'a>(&'a self, axis: &'a A) -> impl Iterator<Item = Tick<A::Value>> + 'a {
        axis.ticks().map(move |mut tick| {
            if let Some(labels) = &self.labels {
                tick.label = labels(&tick.value);
            }
            tick
        })
    }

    /// Coordinate of `pos` along this ruler's axis.
    pub fn along(&self, pos: Pos2) -> f64 {
        if self.edge.is_horizontal() {
            pos.x as f64
        } else {
            pos.y as f64
        }
    }

    // ===== Input =====

    /// Pans on a plain wheel, zooms at the pointer with the zoom modifier.
    pub fn handle_wheel(&mut self, axis: &mut A, input: &WheelInput, config: &NavigationConfig) -> InputOutcome {
        let before = (axis.core().visible_start(), axis.core().visible_stop());
        let delta = input.delta;

        if config.zoom_modifier.is_held(&input.modifiers) {
            let amount = if delta.y != 0.0 { delta.y } else { delta.x };
            axis.zoom(config.zoom_factor(amount as f64), self.along(input.pos));
        } else {
            let amount = if self.edge.is_horizontal() && delta.x != 0.0 {
                delta.x
            } else {
                delta.y
            };
            axis.scroll(-(amount as f64) * config.wheel_pan_scale);
        }

        changed(axis, before)
    }

    /// Drags the axis so the content under the press follows the pointer.
    pub fn handle_pointer(&mut self, axis: &mut A, input: &PointerInput) -> InputOutcome {
        match *input {
            PointerInput::Pressed { pos, button, .. } if button == egui::PointerButton::Primary => {
                self.drag = Some(axis.begin_drag(self.along(pos)));
                InputOutcome::Ignored
            }
            PointerInput::Moved { pos } => match self.drag {
                Some(anchor) => {
                    let before = (axis.core().visible_start(), axis.core().visible_stop());
                    axis.drag(anchor, self.along(pos));
                    changed(axis, before)
                }
                None => InputOutcome::Ignored,
            },
            PointerInput::Released { .. } => {
                self.drag = None;
                InputOutcome::Ignored
            }
            _ => InputOutcome::Ignored,
        }
    }

    // ===== Painting =====

    /// Paints background, tick separators and labels onto `surface`, which
    /// covers exactly the ruler's area.
    pub fn paint(&self, axis: &A, surface: &mut dyn PaintSurface, theme: &dyn ThemeService) {
        let size = surface.size();
        let (length, thickness) = if self.edge.is_horizontal() {
            (size.x, size.y)
        } else {
            (size.y, size.x)
        };

        surface.fill_rect(
            Rect::from_min_size(Pos2::ZERO, size),
            &Style::filled(theme.object_color(ObjectRole::SurfaceBase)),
        );

        let (major_row, minor_row) = self.rows(axis.layered_ticks(), thickness);
        let border = Style::stroked(theme.object_color(ObjectRole::Border), 1.0);
        let border_intense = Style::stroked(theme.object_color(ObjectRole::BorderIntense), 1.0);
        let major_text = Style::stroked(theme.object_color(ObjectRole::TextBase), 1.0).with_font(MAJOR_FONT);
        let minor_text = Style::stroked(theme.object_color(ObjectRole::TextSecondary), 1.0).with_font(MINOR_FONT);
        let sub_tick = Style::stroked(with_alpha(theme.object_color(ObjectRole::Border), 128), 1.0);

        for tick in self.ticks(axis) {
            let (row, separator, text) = match tick.level {
                TickLevel::Major => (major_row, &border_intense, &major_text),
                TickLevel::Minor => (minor_row, &border, &minor_text),
            };
            let pixel = tick.pixel as f32;
            let (low, high) = tick
                .band
                .map(|(a, b)| (a as f32, b as f32))
                .unwrap_or((pixel, pixel));
            if high < 0.0 || low > length {
                continue;
            }

            if (0.0..=length).contains(&pixel) {
                surface.line(self.point(pixel, row.0), self.point(pixel, row.1), separator);
            }
            if tick.label.is_empty() {
                continue;
            }
            match tick.band {
                Some(_) => {
                    if self.edge.is_horizontal() && !fits(&tick.label, high - low, &text.font, &*surface) {
                        self.paint_sub_ticks(surface, (low, high), length, row, &sub_tick);
                    }
                    self.paint_band_label(surface, &tick.label, (low, high), length, row, text)
                }
                None => self.paint_point_label(surface, &tick.label, pixel, length, row, text),
            }
        }

        if axis.layered_ticks() {
            let split = thickness * 0.5;
            surface.line(self.point(0.0, split), self.point(length, split), &border);
        }

        // Edge facing the canvas
        let inner = if self.edge.canvas_is_far() { thickness - 0.5 } else { 0.5 };
        surface.line(self.point(0.0, inner), self.point(length, inner), &border_intense);
    }

    /// Label centered in the visible part of its band when it fits there,
    /// otherwise on the band's midpoint.
    fn paint_band_label(
        &self,
        surface: &mut dyn PaintSurface,
        label: &str,
        (low, high): (f32, f32),
        length: f32,
        row: (f32, f32),
        style: &Style,
    ) {
        let horizontal = self.edge.is_horizontal();
        let room = if horizontal { high - low } else { row.1 - row.0 };
        let label = truncate_text_to_fit(label, room, &style.font, &*surface);
        if label.is_empty() {
            return;
        }

        let measured = surface.measure_text(&label, &style.font);
        let extent = if horizontal { measured.x } else { measured.y };
        let (visible_low, visible_high) = (low.max(0.0), high.min(length));
        let center = if visible_high - visible_low >= extent {
            (visible_low + visible_high) * 0.5
        } else {
            (low + high) * 0.5
        };
        let across = (row.0 + row.1) * 0.5;
        surface.text(self.point(center, across), Align2::CENTER_CENTER, &label, style);
    }

    /// Evenly spaced short marks inside a band whose label does not fit, so
    /// wide zoomed-out bands still give a sense of scale.
    fn paint_sub_ticks(
        &self,
        surface: &mut dyn PaintSurface,
        (low, high): (f32, f32),
        length: f32,
        row: (f32, f32),
        style: &Style,
    ) {
        let count = ((high - low) / SUB_TICK_SPACING) as usize;
        if count < 2 {
            return;
        }
        let step = (high - low) / count as f32;
        let mark = (row.1 - row.0) * 0.25;
        let (from, to) = if self.edge.canvas_is_far() {
            (row.1 - mark, row.1)
        } else {
            (row.0, row.0 + mark)
        };
        for i in 1..count {
            let pixel = low + step * i as f32;
            if (0.0..=length).contains(&pixel) {
                surface.line(self.point(pixel, from), self.point(pixel, to), style);
            }
        }
    }

    /// Label next to a point tick.
    fn paint_point_label(
        &self,
        surface: &mut dyn PaintSurface,
        label: &str,
        pixel: f32,
        length: f32,
        row: (f32, f32),
        style: &Style,
    ) {
        if !(0.0..=length).contains(&pixel) {
            return;
        }
        let (pos, anchor) = match self.edge {
            Edge::Top | Edge::Bottom => (
                self.point(pixel + LABEL_OFFSET, (row.0 + row.1) * 0.5),
                Align2::LEFT_CENTER,
            ),
            Edge::Left => (self.point(pixel, row.1 - LABEL_OFFSET), Align2::RIGHT_CENTER),
            Edge::Right => (self.point(pixel, row.0 + LABEL_OFFSET), Align2::LEFT_CENTER),
        };
        surface.text(pos, anchor, label, style);
    }

    /// Across-axis spans `(major, minor)`. Layered rulers put the major row
    /// on the side away from the canvas.
    fn rows(&self, layered: bool, thickness: f32) -> ((f32, f32), (f32, f32)) {
        if !layered {
            return ((0.0, thickness), (0.0, thickness));
        }
        let half = thickness * 0.5;
        if self.edge.canvas_is_far() {
            ((0.0, half), (half, thickness))
        } else {
            ((half, thickness), (0.0, half))
        }
    }

    fn point(&self, along: f32, across: f32) -> Pos2 {
        if self.edge.is_horizontal() {
            Pos2::new(along, across)
        } else {
            Pos2::new(across, along)
        }
    }

    /// Size of the ruler for a canvas of `canvas` size.
    pub fn size_for(&self, canvas: Vec2) -> Vec2 {
        if self.edge.is_horizontal() {
            Vec2::new(canvas.x, self.thickness)
        } else {
            Vec2::new(self.thickness, canvas.y)
        }
    }
}

pub(crate) fn changed<A: AxisModel>(axis: &A, before: (f64, f64)) -> InputOutcome {
    if (axis.core().visible_start(), axis.core().visible_stop()) != before {
        InputOutcome::ViewportChanged
    } else {
        InputOutcome::Ignored
    }
}
