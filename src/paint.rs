//! Painting boundary between the navigation widgets and the host toolkit.
//!
//! Widgets paint through [`PaintSurface`] in local pixel coordinates (origin
//! at the top-left of the widget). [`EguiSurface`] forwards to an
//! `egui::Painter`; tests substitute a recording surface.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2};

/// Font request forwarded to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub monospace: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: 12.0,
            monospace: false,
        }
    }
}

impl FontSpec {
    pub fn to_font_id(self) -> FontId {
        if self.monospace {
            FontId::monospace(self.size)
        } else {
            FontId::proportional(self.size)
        }
    }
}

/// Opaque drawing style. Nothing in the crate inspects the colors; they are
/// handed to the surface as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill_color: Option<Color32>,
    pub stroke_color: Option<Color32>,
    pub stroke_width: f32,
    pub font: FontSpec,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill_color: None,
            stroke_color: None,
            stroke_width: 1.0,
            font: FontSpec::default(),
        }
    }
}

impl Style {
    pub fn filled(color: Color32) -> Self {
        Self {
            fill_color: Some(color),
            ..Self::default()
        }
    }

    pub fn stroked(color: Color32, width: f32) -> Self {
        Self {
            stroke_color: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, color: Color32, width: f32) -> Self {
        self.stroke_color = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    /// Stroke to outline shapes and draw lines with, if any.
    pub fn stroke(&self) -> Option<Stroke> {
        self.stroke_color
            .filter(|_| self.stroke_width > 0.0)
            .map(|color| Stroke::new(self.stroke_width, color))
    }

    /// Color used for text: the stroke color, else the fill color.
    pub fn text_color(&self) -> Color32 {
        self.stroke_color
            .or(self.fill_color)
            .unwrap_or(Color32::PLACEHOLDER)
    }
}

/// Drawing operations the widgets need from the host.
pub trait PaintSurface {
    /// Size of the surface in pixels.
    fn size(&self) -> Vec2;

    /// Fills and/or outlines `rect` according to `style`.
    fn fill_rect(&mut self, rect: Rect, style: &Style);

    fn line(&mut self, from: Pos2, to: Pos2, style: &Style);

    /// Draws `text` with `anchor` deciding which corner/edge sits at `pos`.
    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, style: &Style);

    /// Ellipse inscribed in `rect`.
    fn ellipse(&mut self, rect: Rect, style: &Style);

    /// Width and height `text` occupies with `font`.
    ///
    /// The default is a rough estimate for surfaces that cannot lay out
    /// text.
    fn measure_text(&self, text: &str, font: &FontSpec) -> Vec2 {
        let chars = text.chars().count() as f32;
        Vec2::new(chars * font.size * 0.6, font.size)
    }
}

/// [`PaintSurface`] backed by an `egui::Painter`.
pub struct EguiSurface<'a> {
    painter: &'a Painter,
    origin: Pos2,
    size: Vec2,
}

impl<'a> EguiSurface<'a> {
    /// Wraps `painter`, mapping local `(0, 0)` to `rect.min`.
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self {
            painter,
            origin: rect.min,
            size: rect.size(),
        }
    }

    fn to_screen(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2()
    }

    fn rect_to_screen(&self, rect: Rect) -> Rect {
        rect.translate(self.origin.to_vec2())
    }
}

impl PaintSurface for EguiSurface<'_> {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, style: &Style) {
        let rect = self.rect_to_screen(rect);
        if let Some(fill) = style.fill_color {
            self.painter.rect_filled(rect, 0.0, fill);
        }
        if let Some(stroke) = style.stroke() {
            self.painter.rect_stroke(rect, 0.0, stroke, StrokeKind::Inside);
        }
    }

    fn line(&mut self, from: Pos2, to: Pos2, style: &Style) {
        let stroke = style
            .stroke()
            .unwrap_or_else(|| Stroke::new(style.stroke_width.max(1.0), style.text_color()));
        self.painter
            .line_segment([self.to_screen(from), self.to_screen(to)], stroke);
    }

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, style: &Style) {
        self.painter.text(
            self.to_screen(pos),
            anchor,
            text,
            style.font.to_font_id(),
            style.text_color(),
        );
    }

    fn ellipse(&mut self, rect: Rect, style: &Style) {
        let rect = self.rect_to_screen(rect);
        let radius = rect.size() * 0.5;
        if let Some(fill) = style.fill_color {
            self.painter
                .add(Shape::ellipse_filled(rect.center(), radius, fill));
        }
        if let Some(stroke) = style.stroke() {
            self.painter
                .add(Shape::ellipse_stroke(rect.center(), radius, stroke));
        }
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> Vec2 {
        self.painter
            .layout_no_wrap(text.to_string(), font.to_font_id(), Color32::WHITE)
            .size()
    }
}
