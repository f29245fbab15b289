//! Deferred drawing: named layers that produce primitives on demand.
//!
//! Nothing is stored between repaints. Each layer holds a producer closure
//! which is asked, once per repaint, for the primitives inside the current
//! [`ViewWindow`]. Primitives are in domain coordinates; the registry maps
//! them through both axes before handing them to the [`PaintSurface`].
//!
//! Producers run on the GUI thread inside the repaint. A panicking producer
//! aborts the repaint; producers are expected to filter cheaply and return.

use std::fmt;
use std::ops::Range;

use egui::{Align2, Pos2, Rect, Vec2};
use indexmap::IndexMap;

use crate::axis::AxisModel;
use crate::paint::{PaintSurface, Style};

/// Visible ranges of both axes, handed to producers.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewWindow<X, Y> {
    pub x: Range<X>,
    pub y: Range<Y>,
}

impl<X: PartialOrd, Y: PartialOrd> ViewWindow<X, Y> {
    /// Whether the point lies inside the window (edges included).
    pub fn contains(&self, x: &X, y: &Y) -> bool {
        self.x.start <= *x && *x <= self.x.end && self.y.start <= *y && *y <= self.y.end
    }

    /// Whether `[x0, x1] x [y0, y1]` overlaps the window.
    pub fn overlaps(&self, x0: &X, x1: &X, y0: &Y, y1: &Y) -> bool {
        let (xl, xh) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (yl, yh) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        *xl <= self.x.end && self.x.start <= *xh && *yl <= self.y.end && self.y.start <= *yh
    }
}

/// Rectangle spanned by two opposite corners.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRect<X, Y> {
    pub x0: X,
    pub y0: Y,
    pub x1: X,
    pub y1: Y,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainLine<X, Y> {
    pub x0: X,
    pub y0: Y,
    pub x1: X,
    pub y1: Y,
}

/// Text anchored at a domain point.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainText<X, Y> {
    pub x: X,
    pub y: Y,
    pub text: String,
    pub anchor: Align2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainPoint<X, Y> {
    pub x: X,
    pub y: Y,
}

/// Ellipse whose top-left corner sits at a domain point and whose size is
/// given in pixels, so it keeps its shape while zooming.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainEllipse<X, Y> {
    pub x: X,
    pub y: Y,
    pub width: f32,
    pub height: f32,
}

/// Window type seen by producers of a registry over axes `H` and `V`.
pub type Window<H, V> = ViewWindow<<H as AxisModel>::Value, <V as AxisModel>::Value>;

type Producer<H, V, P> = Box<dyn Fn(&Window<H, V>) -> Vec<P>>;

/// Raw drawing callback with direct access to the surface and both axes.
pub type DrawCommand<H, V> = Box<dyn Fn(&mut dyn PaintSurface, &H, &V)>;

enum Layer<H: AxisModel, V: AxisModel> {
    Rects(Producer<H, V, DomainRect<H::Value, V::Value>>, Style),
    Lines(Producer<H, V, DomainLine<H::Value, V::Value>>, Style),
    Texts(Producer<H, V, DomainText<H::Value, V::Value>>, Style),
    Points(Producer<H, V, DomainPoint<H::Value, V::Value>>, Style),
    Ellipses(Producer<H, V, DomainEllipse<H::Value, V::Value>>, Style),
    Custom(DrawCommand<H, V>),
}

impl<H: AxisModel, V: AxisModel> Layer<H, V> {
    fn kind(&self) -> &'static str {
        match self {
            Layer::Rects(..) => "rects",
            Layer::Lines(..) => "lines",
            Layer::Texts(..) => "texts",
            Layer::Points(..) => "points",
            Layer::Ellipses(..) => "ellipses",
            Layer::Custom(_) => "custom",
        }
    }
}

/// Insertion-ordered set of named layers.
///
/// Registering a name that already exists replaces that layer in place, so
/// it keeps its position in the draw order.
pub struct LayerRegistry<H: AxisModel, V: AxisModel> {
    layers: IndexMap<String, Layer<H, V>>,
}

impl<H: AxisModel, V: AxisModel> fmt::Debug for LayerRegistry<H, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.layers.iter().map(|(name, layer)| (name, layer.kind())))
            .finish()
    }
}

impl<H: AxisModel, V: AxisModel> Default for LayerRegistry<H, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: AxisModel, V: AxisModel> LayerRegistry<H, V> {
    pub fn new() -> Self {
        Self {
            layers: IndexMap::new(),
        }
    }

    fn insert(&mut self, name: String, layer: Layer<H, V>) {
        let kind = layer.kind();
        match self.layers.get_full_mut(&name) {
            Some((index, _, slot)) => {
                *slot = layer;
                log::debug!("replaced {kind} layer '{name}' at position {index}");
            }
            None => {
                log::debug!("registered {kind} layer '{name}'");
                self.layers.insert(name, layer);
            }
        }
    }

    /// Registers rectangles spanned by two domain corners.
    pub fn draw_rects<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainRect<H::Value, V::Value>> + 'static,
    {
        self.insert(name.into(), Layer::Rects(Box::new(producer), style));
    }

    pub fn draw_lines<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainLine<H::Value, V::Value>> + 'static,
    {
        self.insert(name.into(), Layer::Lines(Box::new(producer), style));
    }

    pub fn draw_texts<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainText<H::Value, V::Value>> + 'static,
    {
        self.insert(name.into(), Layer::Texts(Box::new(producer), style));
    }

    /// Registers points, painted as dots `2 * stroke_width` across.
    pub fn draw_points<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainPoint<H::Value, V::Value>> + 'static,
    {
        self.insert(name.into(), Layer::Points(Box::new(producer), style));
    }

    pub fn draw_ellipses<F>(&mut self, name: impl Into<String>, style: Style, producer: F)
    where
        F: Fn(&Window<H, V>) -> Vec<DomainEllipse<H::Value, V::Value>> + 'static,
    {
        self.insert(name.into(), Layer::Ellipses(Box::new(producer), style));
    }

    /// Registers a raw callback painting in pixel coordinates.
    pub fn add_draw_command<F>(&mut self, name: impl Into<String>, command: F)
    where
        F: Fn(&mut dyn PaintSurface, &H, &V) + 'static,
    {
        self.insert(name.into(), Layer::Custom(Box::new(command)));
    }

    /// Removes a layer. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.layers.shift_remove(name).is_some();
        if removed {
            log::debug!("removed layer '{name}'");
        }
        removed
    }

    pub fn clear(&mut self) {
        log::debug!("cleared {} layers", self.layers.len());
        self.layers.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Layer names in draw order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    /// Evaluates every layer for the axes' visible window and paints the
    /// result, in registration order.
    pub fn render(&self, surface: &mut dyn PaintSurface, h: &H, v: &V) {
        let window = ViewWindow {
            x: h.visible_range(),
            y: v.visible_range(),
        };
        let at = |x: &H::Value, y: &V::Value| Pos2::new(h.to_pixel(x) as f32, v.to_pixel(y) as f32);

        for (name, layer) in &self.layers {
            log::trace!("rendering layer '{name}'");
            match layer {
                Layer::Rects(producer, style) => {
                    for r in producer(&window) {
                        surface.fill_rect(Rect::from_two_pos(at(&r.x0, &r.y0), at(&r.x1, &r.y1)), style);
                    }
                }
                Layer::Lines(producer, style) => {
                    for l in producer(&window) {
                        surface.line(at(&l.x0, &l.y0), at(&l.x1, &l.y1), style);
                    }
                }
                Layer::Texts(producer, style) => {
                    for t in producer(&window) {
                        surface.text(at(&t.x, &t.y), t.anchor, &t.text, style);
                    }
                }
                Layer::Points(producer, style) => {
                    let diameter = style.stroke_width.max(1.0) * 2.0;
                    for p in producer(&window) {
                        let rect = Rect::from_center_size(at(&p.x, &p.y), Vec2::splat(diameter));
                        surface.ellipse(rect, style);
                    }
                }
                Layer::Ellipses(producer, style) => {
                    for e in producer(&window) {
                        let rect = Rect::from_min_size(at(&e.x, &e.y), Vec2::new(e.width, e.height));
                        surface.ellipse(rect, style);
                    }
                }
                Layer::Custom(command) => command(&mut *surface, h, v),
            }
        }
    }
}
