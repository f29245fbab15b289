//! Viewport composer: two axes, their rulers, and the drawing canvas.
//!
//! [`NavigationView`] owns the horizontal and vertical axes and is the only
//! place that knows the canvas size. Rulers and the layer registry borrow
//! the axes from it while painting or handling input.

use std::fmt;

use egui::{PointerButton, Pos2, Rect, Vec2};

use crate::axis::{AxisModel, DragAnchor};
use crate::config::NavigationConfig;
use crate::input::{InputOutcome, PointerInput, WheelInput};
use crate::interaction::CanvasInteraction;
use crate::layers::{
    DomainEllipse, DomainLine, DomainPoint, DomainRect, DomainText, LayerRegistry, ViewWindow, Window,
};
use crate::link::AxisLink;
use crate::paint::{PaintSurface, Style};
use crate::ruler::{changed, Edge, Ruler};
use crate::theme::{with_alpha, ColorMap, Hue, ObjectRole, ThemeService, Variant};

/// Pointer gesture in progress on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Pan { h: DragAnchor, v: DragAnchor },
    Region { start: Pos2, current: Pos2 },
}

/// Canvas with a ruler on top (horizontal axis) and on the left (vertical
/// axis).
pub struct NavigationView<H: AxisModel, V: AxisModel, T: ThemeService = ColorMap> {
    h_axis: H,
    v_axis: V,
    theme: T,
    config: NavigationConfig,
    top_ruler: Ruler<H>,
    left_ruler: Ruler<V>,
    layers: LayerRegistry<H, V>,
    canvas_size: Vec2,
    gesture: Option<Gesture>,
    hover: Option<Pos2>,
}

impl<H: AxisModel, V: AxisModel, T: ThemeService> fmt::Debug for NavigationView<H, V, T>
where
    H: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationView")
            .field("h_axis", &self.h_axis)
            .field("v_axis", &self.v_axis)
            .field("canvas_size", &self.canvas_size)
            .field("layers", &self.layers)
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}

impl<H: AxisModel, V: AxisModel> NavigationView<H, V, ColorMap> {
    /// Creates a view with the default settings and color map.
    pub fn new(h_axis: H, v_axis: V) -> Self {
        Self::with_config(h_axis, v_axis, NavigationConfig::default())
    }

    /// Creates a view whose color map follows `config.dark_mode`.
    pub fn with_config(h_axis: H, v_axis: V, config: NavigationConfig) -> Self {
        let theme = ColorMap::new(config.dark_mode);
        Self::with_theme(h_axis, v_axis, theme, config)
    }
}

impl<H: AxisModel, V: AxisModel, T: ThemeService> NavigationView<H, V, T> {
    pub fn with_theme(h_axis: H, v_axis: V, theme: T, config: NavigationConfig) -> Self {
        let top_ruler = Ruler::new(Edge::Top, config.ruler_thickness(h_axis.kind(), false));
        let left_ruler = Ruler::new(Edge::Left, config.ruler_thickness(v_axis.kind(), true));
        log::debug!(
            "navigation view {:?} x {:?}",
            h_axis.kind(),
            v_axis.kind()
        );

        Self {
            h_axis,
            v_axis,
            theme,
            config,
            top_ruler,
            left_ruler,
            layers: LayerRegistry::new(),
            canvas_size: Vec2::ZERO,
            gesture: None,
            hover: None,
        }
    }

    // ===== Accessors =====

    pub fn h_axis(&self) -> &H {
        &self.h_axis
    }

    pub fn v_axis(&self) -> &V {
        &self.v_axis
    }

    /// Mutable horizontal axis, for setup code and programmatic navigation.
    pub fn h_axis_mut(&mut self) -> &mut H {
        &mut self.h_axis
    }

    pub fn v_axis_mut(&mut self) -> &mut V {
        &mut self.v_axis
    }

    pub fn theme(&self) -> &T {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut T {
        &mut self.theme
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Replaces the settings and re-derives the ruler thicknesses.
    pub fn set_config(&mut self, config: NavigationConfig) {
        self.top_ruler
            .set_thickness(config.ruler_thickness(self.h_axis.kind(), false));
        self.left_ruler
            .set_thickness(config.ruler_thickness(self.v_axis.kind(), true));
        self.config = config;
    }

    pub fn top_ruler(&self) -> &Ruler<H> {
        &self.top_ruler
    }

    pub fn top_ruler_mut(&mut self) -> &mut Ruler<H> {
        &mut self.top_ruler
    }

    pub fn left_ruler(&self) -> &Ruler<V> {
        &self.left_ruler
    }

    pub fn left_ruler_mut(&mut self) -> &mut Ruler<V> {
        &mut self.left_ruler
    }

    pub fn layers(&self) -> &LayerRegistry<H, V> {
        &self.layers
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    /// Visible ranges of both axes.
    pub fn visible_window(&self) -> Window<H, V> {
        ViewWindow {
            x: self.h_axis.visible_range(),
            y: self.v_axis.visible_range(),
        }
    }

    /// Domain values under the pointer, if it is over the canvas.
    pub fn hover_value(&self) -> Option<(H::Value, V::Value)> {
        self.hover
            .map(|pos| (self.h_axis.to_domain(pos.x as f64), self.v_axis.to_domain(pos.y as f64)))
    }

    pub fn hover_pos(&self) -> Option<Pos2> {
        self.hover
    }

    /// Region currently being selected, in canvas pixels.
    pub fn selection(&self) -> Option<Rect> {
        match self.gesture {
            Some(Gesture::Region { start, current }) => Some(Rect::from_two_pos(start, current)),
            _ => None,
        }
    }

    // ===== Navigation =====

    /// Sets the canvas size and forwards it to both axes.
    pub fn resize(&mut self, width: f32, height: f32) {
        let size = Vec2::new(width, height);
        if size == self.canvas_size {
            return;
        }
        log::debug!("canvas resized to {width}x{height}");
        self.canvas_size = size;
        self.h_axis.set_viewport_length(width as f64);
        self.v_axis.set_viewport_length(height as f64);
    }

    /// Shows the whole domain on both axes.
    pub fn reset(&mut self) {
        self.h_axis.reset();
        self.v_axis.reset();
    }

    /// Routes a wheel event over the canvas.
    ///
    /// Plain wheel pans both axes, the zoom modifier zooms horizontally at
    /// the pointer, and the vertical zoom modifier zooms a continuous
    /// vertical axis.
    pub fn handle_wheel(&mut self, input: &WheelInput) -> InputOutcome {
        let before_h = (self.h_axis.core().visible_start(), self.h_axis.core().visible_stop());
        let before_v = (self.v_axis.core().visible_start(), self.v_axis.core().visible_stop());
        let delta = input.delta;
        let amount = f64::from(if delta.y != 0.0 { delta.y } else { delta.x });

        if self.config.zoom_modifier.is_held(&input.modifiers) {
            self.h_axis
                .zoom(self.config.zoom_factor(amount), input.pos.x as f64);
        } else if self.config.vertical_zoom_modifier.is_held(&input.modifiers) {
            if !self.v_axis.kind().is_continuous() {
                log::trace!("vertical zoom ignored on {:?} axis", self.v_axis.kind());
                return InputOutcome::Ignored;
            }
            self.v_axis
                .zoom(self.config.zoom_factor(amount), input.pos.y as f64);
        } else {
            let scale = self.config.wheel_pan_scale;
            self.h_axis.scroll(-(delta.x as f64) * scale);
            self.v_axis.scroll(-(delta.y as f64) * scale);
        }

        changed(&self.h_axis, before_h).merge(changed(&self.v_axis, before_v))
    }

    /// Routes a pointer event over the canvas.
    pub fn handle_pointer(&mut self, input: &PointerInput) -> InputOutcome {
        match *input {
            PointerInput::Pressed { pos, button, modifiers } => {
                let region = button == PointerButton::Secondary
                    || (button == PointerButton::Primary && self.config.region_modifier.is_held(&modifiers));
                if region {
                    self.gesture = Some(Gesture::Region { start: pos, current: pos });
                    InputOutcome::HoverChanged
                } else if button == PointerButton::Primary {
                    self.gesture = Some(Gesture::Pan {
                        h: self.h_axis.begin_drag(pos.x as f64),
                        v: self.v_axis.begin_drag(pos.y as f64),
                    });
                    InputOutcome::Ignored
                } else {
                    InputOutcome::Ignored
                }
            }
            PointerInput::Moved { pos } => {
                let hover = if self.hover != Some(pos) {
                    InputOutcome::HoverChanged
                } else {
                    InputOutcome::Ignored
                };
                self.hover = Some(pos);
                match &mut self.gesture {
                    Some(Gesture::Pan { h, v }) => {
                        let (h, v) = (*h, *v);
                        let before_h = (self.h_axis.core().visible_start(), self.h_axis.core().visible_stop());
                        let before_v = (self.v_axis.core().visible_start(), self.v_axis.core().visible_stop());
                        self.h_axis.drag(h, pos.x as f64);
                        self.v_axis.drag(v, pos.y as f64);
                        hover
                            .merge(changed(&self.h_axis, before_h))
                            .merge(changed(&self.v_axis, before_v))
                    }
                    Some(Gesture::Region { current, .. }) => {
                        *current = pos;
                        InputOutcome::HoverChanged
                    }
                    None => hover,
                }
            }
            PointerInput::Released { pos, .. } => match self.gesture.take() {
                Some(Gesture::Region { start, .. }) => self.apply_region(start, pos),
                Some(Gesture::Pan { .. }) => InputOutcome::Ignored,
                None => InputOutcome::Ignored,
            },
            PointerInput::Left => {
                if self.hover.take().is_some() {
                    InputOutcome::HoverChanged
                } else {
                    InputOutcome::Ignored
                }
            }
        }
    }

    /// Offers a canvas pointer event to `interaction` first and lets the view
    /// pan or zoom only when it is not claimed.
    pub fn handle_pointer_with(
        &mut self,
        interaction: &mut dyn CanvasInteraction<H, V>,
        input: &PointerInput,
    ) -> InputOutcome {
        let handled = interaction.handle_pointer(&self.h_axis, &self.v_axis, &self.config, input);
        if !handled.consumed {
            return handled.outcome.merge(self.handle_pointer(input));
        }
        if let PointerInput::Moved { pos } = *input {
            self.hover = Some(pos);
        }
        handled.outcome
    }

    /// Zooms the continuous axes to the pixel region spanned by `a` and `b`.
    ///
    /// Extents below `min_region_pixels` leave that axis unchanged.
    pub fn apply_region(&mut self, a: Pos2, b: Pos2) -> InputOutcome {
        let region = Rect::from_two_pos(a, b);
        let min = self.config.min_region_pixels;
        let mut outcome = InputOutcome::HoverChanged;

        if region.width() >= min && self.h_axis.kind().is_continuous() {
            let before = (self.h_axis.core().visible_start(), self.h_axis.core().visible_stop());
            let start = self.h_axis.to_domain(region.min.x as f64);
            let stop = self.h_axis.to_domain(region.max.x as f64);
            self.h_axis.set_visible_range(&start, &stop);
            outcome = outcome.merge(changed(&self.h_axis, before));
        }
        if region.height() >= min && self.v_axis.kind().is_continuous() {
            let before = (self.v_axis.core().visible_start(), self.v_axis.core().visible_stop());
            let start = self.v_axis.to_domain(region.min.y as f64);
            let stop = self.v_axis.to_domain(region.max.y as f64);
            self.v_axis.set_visible_range(&start, &stop);
            outcome = outcome.merge(changed(&self.v_axis, before));
        }

        log::trace!("region {region:?} -> {outcome:?}");
        outcome
    }

    // ===== Ruler input =====

    pub fn handle_top_ruler_wheel(&mut self, input: &WheelInput) -> InputOutcome {
        self.top_ruler.handle_wheel(&mut self.h_axis, input, &self.config)
    }

    pub fn handle_top_ruler_pointer(&mut self, input: &PointerInput) -> InputOutcome {
        self.top_ruler.handle_pointer(&mut self.h_axis, input)
    }

    pub fn handle_left_ruler_wheel(&mut self, input: &WheelInput) -> InputOutcome {
        self.left_ruler.handle_wheel(&mut self.v_axis, input, &self.config)
    }

    pub fn handle_left_ruler_pointer(&mut self, input: &PointerInput) -> InputOutcome {
        self.left_ruler.handle_pointer(&mut self.v_axis, input)
    }

    // ===== Linking =====

    /// Keeps this view's horizontal axis in step with `other`'s.
    ///
    /// Call once per frame after both views handled input; returns whether
    /// either view needs a repaint.
    pub fn link_horizontal<V2: AxisModel, T2: ThemeService>(
        &mut self,
        other: &mut NavigationView<H, V2, T2>,
        link: &mut AxisLink,
    ) -> bool {
        link.sync(&mut self.h_axis, &mut other.h_axis)
    }

    /// Keeps this view's vertical axis in step with `other`'s.
    pub fn link_vertical<H2: AxisModel, T2: ThemeService>(
        &mut self,
        other: &mut NavigationView<H2, V, T2>,
        link: &mut AxisLink,
    ) -> bool {
        link.sync(&mut self.v_axis, &mut other.v_axis)
    }

    // ===== Drawing API =====

    pub fn draw_rects<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainRect<H::Value, V::Value>> + 'static,
    {
        self.layers.draw_rects(name, style, producer);
    }

    pub fn draw_lines<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainLine<H::Value, V::Value>> + 'static,
    {
        self.layers.draw_lines(name, style, producer);
    }

    pub fn draw_texts<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainText<H::Value, V::Value>> + 'static,
    {
        self.layers.draw_texts(name, style, producer);
    }

    pub fn draw_points<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainPoint<H::Value, V::Value>> + 'static,
    {
        self.layers.draw_points(name, style, producer);
    }

    pub fn draw_ellipses<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainEllipse<H::Value, V::Value>> + 'static,
    {
        self.layers.draw_ellipses(name, style, producer);
    }

    pub fn add_draw_command<F>(&mut self, name: impl Into<String>, command: F)
    where
        F: Fn(&mut dyn PaintSurface, &H, &V) + 'static,
    {
        self.layers.add_draw_command(name, command);
    }

    pub fn remove_draw_command(&mut self, name: &str) -> bool {
        self.layers.remove(name)
    }

    pub fn clear_draw_commands(&mut self) {
        self.layers.clear();
    }

    // ===== Painting =====

    /// Paints the canvas: background, layers, then selection and cursor
    /// feedback.
    pub fn paint(&self, surface: &mut dyn PaintSurface) {
        self.paint_canvas(surface, None);
    }

    /// Like [`paint`](Self::paint) with `interaction` drawn over the layers.
    pub fn paint_with(&self, surface: &mut dyn PaintSurface, interaction: &dyn CanvasInteraction<H, V>) {
        self.paint_canvas(surface, Some(interaction));
    }

    fn paint_canvas(&self, surface: &mut dyn PaintSurface, interaction: Option<&dyn CanvasInteraction<H, V>>) {
        let size = surface.size();
        surface.fill_rect(
            Rect::from_min_size(Pos2::ZERO, size),
            &Style::filled(self.theme.object_color(ObjectRole::SurfaceLower)),
        );

        self.layers.render(surface, &self.h_axis, &self.v_axis);
        if let Some(interaction) = interaction {
            interaction.paint(surface, &self.h_axis, &self.v_axis, &self.theme);
        }

        if let Some(region) = self.selection() {
            let fill = with_alpha(self.theme.saturated_color(Hue::Blue, Variant::Fill), 48);
            let style = Style::filled(fill).with_stroke(self.theme.saturated_color(Hue::Blue, Variant::Line), 1.0);
            surface.fill_rect(region, &style);
        } else if let Some(pos) = self.hover {
            let style = Style::stroked(self.theme.object_color(ObjectRole::TextMuted), 1.0);
            surface.line(Pos2::new(pos.x, 0.0), Pos2::new(pos.x, size.y), &style);
        }
    }

    pub fn paint_top_ruler(&self, surface: &mut dyn PaintSurface) {
        self.top_ruler.paint(&self.h_axis, surface, &self.theme);
    }

    pub fn paint_left_ruler(&self, surface: &mut dyn PaintSurface) {
        self.left_ruler.paint(&self.v_axis, surface, &self.theme);
    }

    /// Paints the empty square where the two rulers meet.
    pub fn paint_corner(&self, surface: &mut dyn PaintSurface) {
        let style = Style::filled(self.theme.object_color(ObjectRole::SurfaceBase))
            .with_stroke(self.theme.object_color(ObjectRole::BorderIntense), 1.0);
        surface.fill_rect(Rect::from_min_size(Pos2::ZERO, surface.size()), &style);
    }
}
