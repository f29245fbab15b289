//! egui host adapter for [`NavigationView`].
//!
//! Lays out the corner, top ruler, left ruler and canvas as a grid, turns
//! egui responses into [`WheelInput`]/[`PointerInput`] events and paints
//! every part through an [`EguiSurface`].

use egui::{PointerButton, Pos2, Rect, Response, Sense, Ui, Vec2};

use crate::axis::AxisModel;
use crate::input::{InputOutcome, PointerInput, WheelInput};
use crate::interaction::CanvasInteraction;
use crate::paint::EguiSurface;
use crate::theme::ThemeService;
use crate::view::NavigationView;

const BUTTONS: [PointerButton; 2] = [PointerButton::Primary, PointerButton::Secondary];

/// Screen rectangles of the four grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLayout {
    pub corner: Rect,
    pub top_ruler: Rect,
    pub left_ruler: Rect,
    pub canvas: Rect,
}

impl ViewLayout {
    /// Splits `rect` with a top ruler `top` tall and a left ruler `left`
    /// wide.
    pub fn split(rect: Rect, top: f32, left: f32) -> Self {
        let top = top.min(rect.height());
        let left = left.min(rect.width());
        let inner = Pos2::new(rect.min.x + left, rect.min.y + top);
        Self {
            corner: Rect::from_min_max(rect.min, inner),
            top_ruler: Rect::from_min_max(Pos2::new(inner.x, rect.min.y), Pos2::new(rect.max.x, inner.y)),
            left_ruler: Rect::from_min_max(Pos2::new(rect.min.x, inner.y), Pos2::new(inner.x, rect.max.y)),
            canvas: Rect::from_min_max(inner, rect.max),
        }
    }
}

impl<H: AxisModel, V: AxisModel, T: ThemeService> NavigationView<H, V, T> {
    /// Shows the view in all space available in `ui`.
    ///
    /// Returns the canvas response so callers can attach context menus or
    /// tooltips.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        self.show_inner(ui, None)
    }

    /// Shows the view with `interaction` handling canvas pointer events
    /// first and painting over the layers. Its tooltip is attached to the
    /// returned canvas response.
    pub fn show_with(&mut self, ui: &mut Ui, interaction: &mut dyn CanvasInteraction<H, V>) -> Response {
        self.show_inner(ui, Some(interaction))
    }

    fn show_inner(&mut self, ui: &mut Ui, mut interaction: Option<&mut dyn CanvasInteraction<H, V>>) -> Response {
        let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let layout = ViewLayout::split(rect, self.top_ruler().thickness(), self.left_ruler().thickness());
        self.resize(layout.canvas.width(), layout.canvas.height());

        let id = ui.id().with("navigation_view");
        let canvas = ui.interact(layout.canvas, id.with("canvas"), Sense::click_and_drag());
        let top = ui.interact(layout.top_ruler, id.with("top_ruler"), Sense::drag());
        let left = ui.interact(layout.left_ruler, id.with("left_ruler"), Sense::drag());

        let mut outcome = InputOutcome::Ignored;

        let mut events = pointer_events(ui, &canvas, layout.canvas.min);
        if !canvas.hovered() && !canvas.dragged() && self.hover_pos().is_some() {
            events.push(PointerInput::Left);
        }
        for event in events {
            let handled = match interaction.as_deref_mut() {
                Some(interaction) => self.handle_pointer_with(interaction, &event),
                None => self.handle_pointer(&event),
            };
            outcome = outcome.merge(handled);
        }
        if let Some(wheel) = wheel_input(ui, &canvas, layout.canvas.min) {
            outcome = outcome.merge(self.handle_wheel(&wheel));
        }

        for event in pointer_events(ui, &top, layout.top_ruler.min) {
            outcome = outcome.merge(self.handle_top_ruler_pointer(&event));
        }
        if let Some(wheel) = wheel_input(ui, &top, layout.top_ruler.min) {
            outcome = outcome.merge(self.handle_top_ruler_wheel(&wheel));
        }

        for event in pointer_events(ui, &left, layout.left_ruler.min) {
            outcome = outcome.merge(self.handle_left_ruler_pointer(&event));
        }
        if let Some(wheel) = wheel_input(ui, &left, layout.left_ruler.min) {
            outcome = outcome.merge(self.handle_left_ruler_wheel(&wheel));
        }

        self.paint_cells(ui, &layout, interaction.as_deref());

        if outcome.needs_repaint() {
            ui.ctx().request_repaint();
        }
        match interaction {
            Some(interaction) => {
                if let Some(cursor) = interaction.cursor() {
                    ui.ctx().set_cursor_icon(cursor);
                }
                match interaction.tooltip() {
                    Some(text) => canvas.on_hover_text_at_pointer(text),
                    None => canvas,
                }
            }
            None => canvas,
        }
    }

    fn paint_cells(&self, ui: &Ui, layout: &ViewLayout, interaction: Option<&dyn CanvasInteraction<H, V>>) {
        let painter = ui.painter_at(layout.corner);
        self.paint_corner(&mut EguiSurface::new(&painter, layout.corner));

        let painter = ui.painter_at(layout.top_ruler);
        self.paint_top_ruler(&mut EguiSurface::new(&painter, layout.top_ruler));

        let painter = ui.painter_at(layout.left_ruler);
        self.paint_left_ruler(&mut EguiSurface::new(&painter, layout.left_ruler));

        let painter = ui.painter_at(layout.canvas);
        let mut surface = EguiSurface::new(&painter, layout.canvas);
        match interaction {
            Some(interaction) => self.paint_with(&mut surface, interaction),
            None => self.paint(&mut surface),
        }
    }
}

/// Translates drag and hover state of `response` into pointer events local
/// to `origin`.
fn pointer_events(ui: &Ui, response: &Response, origin: Pos2) -> Vec<PointerInput> {
    let local = |pos: Pos2| (pos - origin).to_pos2();
    let (press_origin, modifiers) = ui.input(|i| (i.pointer.press_origin(), i.modifiers));
    let mut events = Vec::new();

    for button in BUTTONS {
        if response.drag_started_by(button) {
            if let Some(pos) = press_origin.or_else(|| response.interact_pointer_pos()) {
                events.push(PointerInput::Pressed {
                    pos: local(pos),
                    button,
                    modifiers,
                });
            }
        }
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            events.push(PointerInput::Moved { pos: local(pos) });
        }
    } else if let Some(pos) = response.hover_pos() {
        events.push(PointerInput::Moved { pos: local(pos) });
    }

    for button in BUTTONS {
        if response.drag_stopped_by(button) {
            let pos = response
                .interact_pointer_pos()
                .or_else(|| ui.input(|i| i.pointer.latest_pos()))
                .unwrap_or(origin);
            events.push(PointerInput::Released {
                pos: local(pos),
                button,
            });
        }
    }

    events
}

/// Wheel input over `response`, if any.
fn wheel_input(ui: &Ui, response: &Response, origin: Pos2) -> Option<WheelInput> {
    let pos = response.hover_pos()?;
    let (raw, smooth, modifiers) = ui.input(|i| (i.raw_scroll_delta, i.smooth_scroll_delta, i.modifiers));

    // Try both raw_scroll_delta and smooth_scroll_delta for compatibility
    let delta = if raw != Vec2::ZERO { raw } else { smooth };
    if delta == Vec2::ZERO {
        return None;
    }
    Some(WheelInput {
        pos: (pos - origin).to_pos2(),
        delta,
        modifiers,
    })
}
