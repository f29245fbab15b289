//! Selectable, movable and resizable items on the canvas.
//!
//! An [`InteractionHandler`] keeps a set of [`InteractiveItem`]s positioned
//! in raw axis units (the `f64` domain of [`AxisCore`](crate::axis::AxisCore):
//! seconds for timelines, slots for item axes). It sees canvas pointer events
//! before the view does, through the [`CanvasInteraction`] seam, and only
//! claims the ones that hit an item or start a band selection. Everything else
//! falls through to the view's pan and region zoom.
//!
//! Gestures:
//! - press on an item selects it (the toggle modifier adds or removes it)
//! - dragging a selected item past the drag threshold moves the selection, or
//!   resizes it when the press landed on a resize handle
//! - band modifier + drag on empty space selects every item the band touches
//! - a plain click on empty space clears the selection and pans as usual

use egui::{Align2, Color32, CursorIcon, Modifiers, PointerButton, Pos2, Rect};
use indexmap::{IndexMap, IndexSet};

use crate::axis::AxisModel;
use crate::config::NavigationConfig;
use crate::input::{InputOutcome, PointerInput};
use crate::paint::{FontSpec, PaintSurface, Style};
use crate::text_utils::{truncate_text_to_fit, LABEL_PADDING};
use crate::theme::{with_alpha, Hue, ObjectRole, ThemeService, Variant};

const LABEL_FONT: FontSpec = FontSpec {
    size: 12.0,
    monospace: false,
};

/// Stroke width of selected items.
const SELECTED_STROKE: f32 = 3.0;

/// Edge of an item that can be grabbed to resize it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    Left,
    Right,
    Top,
    Bottom,
}

impl ResizeHandle {
    pub fn is_horizontal(self) -> bool {
        matches!(self, ResizeHandle::Left | ResizeHandle::Right)
    }

    pub fn cursor(self) -> CursorIcon {
        if self.is_horizontal() {
            CursorIcon::ResizeHorizontal
        } else {
            CursorIcon::ResizeVertical
        }
    }
}

/// Placement of an item in raw axis units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ItemRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `(x, y)` lies inside or on the border.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x..=self.right()).contains(&x) && (self.y..=self.bottom()).contains(&y)
    }

    /// Whether the rectangle touches `[x0, x1] x [y0, y1]`.
    pub fn intersects(&self, (x0, x1): (f64, f64), (y0, y1): (f64, f64)) -> bool {
        self.x <= x1 && x0 <= self.right() && self.y <= y1 && y0 <= self.bottom()
    }

    /// Canvas pixel rectangle of this placement.
    pub fn to_pixels<H: AxisModel, V: AxisModel>(&self, h: &H, v: &V) -> Rect {
        let (h, v) = (h.core(), v.core());
        Rect::from_two_pos(
            Pos2::new(h.to_pixel(self.x) as f32, v.to_pixel(self.y) as f32),
            Pos2::new(h.to_pixel(self.right()) as f32, v.to_pixel(self.bottom()) as f32),
        )
    }

    /// First of `handles` within tolerance of `(x, y)`, checked in the order
    /// left, right, top, bottom.
    pub fn handle_at(
        &self,
        x: f64,
        y: f64,
        handles: &[ResizeHandle],
        x_tolerance: f64,
        y_tolerance: f64,
    ) -> Option<ResizeHandle> {
        let within_y = (self.y..=self.bottom()).contains(&y);
        let within_x = (self.x..=self.right()).contains(&x);
        [
            (ResizeHandle::Left, within_y && (x - self.x).abs() <= x_tolerance),
            (ResizeHandle::Right, within_y && (x - self.right()).abs() <= x_tolerance),
            (ResizeHandle::Top, within_x && (y - self.y).abs() <= y_tolerance),
            (ResizeHandle::Bottom, within_x && (y - self.bottom()).abs() <= y_tolerance),
        ]
        .into_iter()
        .find(|(handle, hit)| *hit && handles.contains(handle))
        .map(|(handle, _)| handle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemShape {
    #[default]
    Rectangle,
    Ellipse,
}

/// How an item is drawn. Unset colors come from the theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemVisuals {
    pub shape: ItemShape,
    pub fill_color: Option<Color32>,
    pub stroke_color: Option<Color32>,
    pub stroke_width: f32,
    pub label: Option<String>,
    pub label_color: Option<Color32>,
}

impl Default for ItemVisuals {
    fn default() -> Self {
        Self {
            shape: ItemShape::Rectangle,
            fill_color: None,
            stroke_color: None,
            stroke_width: 2.0,
            label: None,
            label_color: None,
        }
    }
}

/// Size bounds in raw axis units. Unset bounds fall back to the handler's.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeLimits {
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
}

impl SizeLimits {
    /// Fills unset bounds from `fallback`.
    pub fn or(self, fallback: SizeLimits) -> SizeLimits {
        SizeLimits {
            min_width: self.min_width.or(fallback.min_width),
            max_width: self.max_width.or(fallback.max_width),
            min_height: self.min_height.or(fallback.min_height),
            max_height: self.max_height.or(fallback.max_height),
        }
    }
}

/// What the user may do with an item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCapabilities {
    pub can_move: bool,
    pub can_resize: bool,
    pub resize_handles: Vec<ResizeHandle>,
    pub limits: SizeLimits,
}

impl Default for ItemCapabilities {
    fn default() -> Self {
        Self {
            can_move: true,
            can_resize: true,
            resize_handles: vec![ResizeHandle::Left, ResizeHandle::Right],
            limits: SizeLimits::default(),
        }
    }
}

impl ItemCapabilities {
    /// Neither movable nor resizable; the item can still be selected.
    pub fn fixed() -> Self {
        Self {
            can_move: false,
            can_resize: false,
            ..Self::default()
        }
    }

    fn allows(&self, handle: ResizeHandle) -> bool {
        self.active_handles().contains(&handle)
    }

    fn active_handles(&self) -> &[ResizeHandle] {
        if self.can_resize {
            &self.resize_handles
        } else {
            &[]
        }
    }
}

/// A piece of user data placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveItem<T> {
    pub data: T,
    pub rect: ItemRect,
    pub visuals: ItemVisuals,
    pub capabilities: ItemCapabilities,
    pub tooltip: Option<String>,
}

impl<T> InteractiveItem<T> {
    pub fn new(data: T, rect: ItemRect) -> Self {
        Self {
            data,
            rect,
            visuals: ItemVisuals::default(),
            capabilities: ItemCapabilities::default(),
            tooltip: None,
        }
    }

    /// Places an item between typed axis values.
    ///
    /// # Arguments
    /// * `x` - Horizontal extent as `(start, stop)` on `h`
    /// * `y` - Vertical extent as `(start, stop)` on `v`
    pub fn spanning<H: AxisModel, V: AxisModel>(
        data: T,
        h: &H,
        v: &V,
        x: (&H::Value, &H::Value),
        y: (&V::Value, &V::Value),
    ) -> Self {
        let (x0, x1) = (h.encode(x.0), h.encode(x.1));
        let (y0, y1) = (v.encode(y.0), v.encode(y.1));
        let rect = ItemRect::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs());
        Self::new(data, rect)
    }

    pub fn with_visuals(mut self, visuals: ItemVisuals) -> Self {
        self.visuals = visuals;
        self
    }

    pub fn with_capabilities(mut self, capabilities: ItemCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Horizontal extent decoded into `h`'s values.
    pub fn x_range<H: AxisModel>(&self, h: &H) -> (H::Value, H::Value) {
        (h.decode(self.rect.x), h.decode(self.rect.right()))
    }

    pub fn y_range<V: AxisModel>(&self, v: &V) -> (V::Value, V::Value) {
        (v.decode(self.rect.y), v.decode(self.rect.bottom()))
    }

}

/// Stable handle of an item inside its [`InteractionHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

/// Result of offering a pointer event to a [`CanvasInteraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handled {
    /// The view must not pan or zoom for this event
    pub consumed: bool,
    pub outcome: InputOutcome,
}

impl Handled {
    pub fn consumed(outcome: InputOutcome) -> Self {
        Self {
            consumed: true,
            outcome,
        }
    }

    pub fn passed(outcome: InputOutcome) -> Self {
        Self {
            consumed: false,
            outcome,
        }
    }
}

/// Canvas content that reacts to the pointer ahead of the view's navigation.
pub trait CanvasInteraction<H: AxisModel, V: AxisModel> {
    /// Offers a canvas pointer event; unclaimed events go on to the view.
    fn handle_pointer(&mut self, h: &H, v: &V, config: &NavigationConfig, input: &PointerInput) -> Handled;

    /// Paints on top of the view's layers.
    fn paint(&self, surface: &mut dyn PaintSurface, h: &H, v: &V, theme: &dyn ThemeService);

    fn tooltip(&self) -> Option<String> {
        None
    }

    fn cursor(&self) -> Option<CursorIcon> {
        None
    }
}

type SnapFn<T> = Box<dyn Fn(f64, &InteractiveItem<T>) -> f64>;
type DropCheckFn<T> = Box<dyn Fn(&[&InteractiveItem<T>]) -> bool>;
type DropFn<T> = Box<dyn FnMut(&[&InteractiveItem<T>])>;
type DragUpdateFn<T> = Box<dyn Fn(&InteractiveItem<T>) -> Option<ItemRect>>;
type HoverFn<T> = Box<dyn FnMut(Option<&InteractiveItem<T>>)>;
type TextFn<T> = Box<dyn Fn(&InteractiveItem<T>) -> Option<String>>;
type ColorFn<T> = Box<dyn Fn(&InteractiveItem<T>) -> Option<Color32>>;

#[derive(Debug, Clone, Copy)]
struct Press {
    pos: Pos2,
    raw: (f64, f64),
    item: Option<ItemId>,
    toggle: bool,
}

#[derive(Debug, Clone)]
struct Band {
    start: Pos2,
    current: Pos2,
    /// Selection kept when the band is additive
    base: IndexSet<ItemId>,
}

#[derive(Debug, Clone)]
struct DragState {
    handle: Option<ResizeHandle>,
    press: (f64, f64),
    originals: Vec<(ItemId, ItemRect)>,
    valid: bool,
}

/// Selection, hover and drag/resize of a set of items.
pub struct InteractionHandler<T> {
    items: IndexMap<ItemId, InteractiveItem<T>>,
    next_id: u64,
    selected: IndexSet<ItemId>,
    hover: Option<(ItemId, Option<ResizeHandle>)>,
    press: Option<Press>,
    band: Option<Band>,
    drag: Option<DragState>,
    limits: SizeLimits,
    snap_x: Option<SnapFn<T>>,
    snap_y: Option<SnapFn<T>>,
    resize_snap_x: Option<SnapFn<T>>,
    resize_snap_y: Option<SnapFn<T>>,
    can_drop: Option<DropCheckFn<T>>,
    on_drop: Option<DropFn<T>>,
    on_drag_update: Option<DragUpdateFn<T>>,
    on_hover: Option<HoverFn<T>>,
    item_label: Option<TextFn<T>>,
    item_tooltip: Option<TextFn<T>>,
    item_color: Option<ColorFn<T>>,
}

impl<T> Default for InteractionHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for InteractionHandler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionHandler")
            .field("items", &self.items.len())
            .field("selected", &self.selected)
            .field("hover", &self.hover)
            .field("dragging", &self.drag.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> InteractionHandler<T> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            next_id: 0,
            selected: IndexSet::new(),
            hover: None,
            press: None,
            band: None,
            drag: None,
            limits: SizeLimits::default(),
            snap_x: None,
            snap_y: None,
            resize_snap_x: None,
            resize_snap_y: None,
            can_drop: None,
            on_drop: None,
            on_drag_update: None,
            on_hover: None,
            item_label: None,
            item_tooltip: None,
            item_color: None,
        }
    }

    // ===== Items =====

    pub fn add_item(&mut self, item: InteractiveItem<T>) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, item);
        id
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = InteractiveItem<T>>) -> Vec<ItemId> {
        items.into_iter().map(|item| self.add_item(item)).collect()
    }

    /// Removes an item, dropping it from the selection and hover state.
    pub fn remove_item(&mut self, id: ItemId) -> Option<InteractiveItem<T>> {
        self.selected.shift_remove(&id);
        if self.hover.is_some_and(|(hovered, _)| hovered == id) {
            self.hover = None;
        }
        self.items.shift_remove(&id)
    }

    /// Removes every item and resets all gesture state.
    pub fn clear_items(&mut self) {
        self.items.clear();
        self.selected.clear();
        self.hover = None;
        self.press = None;
        self.band = None;
        self.drag = None;
    }

    pub fn item(&self, id: ItemId) -> Option<&InteractiveItem<T>> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut InteractiveItem<T>> {
        self.items.get_mut(&id)
    }

    /// Items in insertion (and painting) order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &InteractiveItem<T>)> {
        self.items.iter().map(|(id, item)| (*id, item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_item(&self, data: &T) -> Option<ItemId>
    where
        T: PartialEq,
    {
        self.items
            .iter()
            .find(|(_, item)| item.data == *data)
            .map(|(id, _)| *id)
    }

    /// Topmost item containing the raw point.
    pub fn item_at(&self, x: f64, y: f64) -> Option<ItemId> {
        self.items
            .iter()
            .rev()
            .find(|(_, item)| item.rect.contains(x, y))
            .map(|(id, _)| *id)
    }

    // ===== Selection =====

    pub fn selected(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.selected.iter().copied()
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    /// Selects `id`, keeping the current selection when `add` is set.
    pub fn select(&mut self, id: ItemId, add: bool) {
        if !self.items.contains_key(&id) {
            return;
        }
        if !add {
            self.selected.clear();
        }
        self.selected.insert(id);
    }

    pub fn toggle(&mut self, id: ItemId) {
        if !self.selected.shift_remove(&id) && self.items.contains_key(&id) {
            self.selected.insert(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // ===== State =====

    pub fn hovered_item(&self) -> Option<ItemId> {
        self.hover.map(|(id, _)| id)
    }

    pub fn hovered_handle(&self) -> Option<ResizeHandle> {
        self.hover.and_then(|(_, handle)| handle)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the items being dragged would be accepted if dropped now.
    pub fn drag_is_valid(&self) -> bool {
        self.drag.as_ref().is_some_and(|drag| drag.valid)
    }

    pub fn is_banding(&self) -> bool {
        self.band.is_some()
    }

    /// Band selection rectangle in canvas pixels.
    pub fn band_rect(&self) -> Option<Rect> {
        self.band
            .as_ref()
            .map(|band| Rect::from_two_pos(band.start, band.current))
    }

    // ===== Behavior hooks =====

    /// Size bounds for items that leave theirs unset.
    pub fn set_size_limits(&mut self, limits: SizeLimits) {
        self.limits = limits;
    }

    /// Snaps horizontal positions while moving (and resizing, unless a
    /// resize snap is set).
    pub fn set_snap_x(&mut self, snap: impl Fn(f64, &InteractiveItem<T>) -> f64 + 'static) {
        self.snap_x = Some(Box::new(snap));
    }

    pub fn set_snap_y(&mut self, snap: impl Fn(f64, &InteractiveItem<T>) -> f64 + 'static) {
        self.snap_y = Some(Box::new(snap));
    }

    pub fn set_resize_snap_x(&mut self, snap: impl Fn(f64, &InteractiveItem<T>) -> f64 + 'static) {
        self.resize_snap_x = Some(Box::new(snap));
    }

    pub fn set_resize_snap_y(&mut self, snap: impl Fn(f64, &InteractiveItem<T>) -> f64 + 'static) {
        self.resize_snap_y = Some(Box::new(snap));
    }

    /// Decides whether the dragged items may be dropped where they are.
    /// Rejected drops put the items back.
    pub fn set_can_drop(&mut self, check: impl Fn(&[&InteractiveItem<T>]) -> bool + 'static) {
        self.can_drop = Some(Box::new(check));
    }

    /// Called with the dragged items after an accepted drop.
    pub fn set_on_drop(&mut self, on_drop: impl FnMut(&[&InteractiveItem<T>]) + 'static) {
        self.on_drop = Some(Box::new(on_drop));
    }

    /// Called for every dragged item after each move; a returned rectangle
    /// replaces the computed one.
    pub fn set_on_drag_update(&mut self, hook: impl Fn(&InteractiveItem<T>) -> Option<ItemRect> + 'static) {
        self.on_drag_update = Some(Box::new(hook));
    }

    pub fn set_on_hover(&mut self, on_hover: impl FnMut(Option<&InteractiveItem<T>>) + 'static) {
        self.on_hover = Some(Box::new(on_hover));
    }

    /// Label drawn inside items, overriding `visuals.label`.
    pub fn set_item_label(&mut self, label: impl Fn(&InteractiveItem<T>) -> Option<String> + 'static) {
        self.item_label = Some(Box::new(label));
    }

    /// Tooltip for the hovered item, overriding `tooltip`.
    pub fn set_item_tooltip(&mut self, tooltip: impl Fn(&InteractiveItem<T>) -> Option<String> + 'static) {
        self.item_tooltip = Some(Box::new(tooltip));
    }

    /// Fill color, overriding `visuals.fill_color`.
    pub fn set_item_color(&mut self, color: impl Fn(&InteractiveItem<T>) -> Option<Color32> + 'static) {
        self.item_color = Some(Box::new(color));
    }

    // ===== Gestures =====

    fn press<H: AxisModel, V: AxisModel>(
        &mut self,
        h: &H,
        v: &V,
        config: &NavigationConfig,
        pos: Pos2,
        modifiers: Modifiers,
    ) -> Handled {
        let raw = (h.core().to_domain(pos.x as f64), v.core().to_domain(pos.y as f64));
        let toggle = config.toggle_modifier.is_held(&modifiers);

        if let Some(id) = self.item_at(raw.0, raw.1) {
            if toggle {
                self.toggle(id);
            } else if !self.is_selected(id) {
                self.select(id, false);
            }
            self.press = Some(Press {
                pos,
                raw,
                item: Some(id),
                toggle,
            });
            return Handled::consumed(InputOutcome::HoverChanged);
        }

        if config.band_modifier.is_held(&modifiers) {
            let base = if toggle { self.selected.clone() } else { IndexSet::new() };
            self.selected = base.clone();
            self.band = Some(Band {
                start: pos,
                current: pos,
                base,
            });
            self.press = Some(Press {
                pos,
                raw,
                item: None,
                toggle,
            });
            return Handled::consumed(InputOutcome::HoverChanged);
        }

        if self.selected.is_empty() {
            Handled::passed(InputOutcome::Ignored)
        } else {
            self.selected.clear();
            Handled::passed(InputOutcome::HoverChanged)
        }
    }

    fn motion<H: AxisModel, V: AxisModel>(
        &mut self,
        h: &H,
        v: &V,
        config: &NavigationConfig,
        pos: Pos2,
    ) -> Handled {
        if self.drag.is_some() {
            self.update_drag(h, v, config, pos);
            return Handled::consumed(InputOutcome::HoverChanged);
        }

        if let Some(band) = &mut self.band {
            band.current = pos;
            self.update_band(h, v);
            return Handled::consumed(InputOutcome::HoverChanged);
        }

        if let Some(press) = self.press {
            if let Some(pressed) = press.item {
                if manhattan(pos, press.pos) > config.drag_threshold_pixels && !self.selected.is_empty() {
                    self.start_drag(h, v, config, pressed, press.raw);
                    self.update_drag(h, v, config, pos);
                    return Handled::consumed(InputOutcome::HoverChanged);
                }
                return Handled::consumed(InputOutcome::Ignored);
            }
        }

        Handled::passed(self.update_hover(h, v, config, pos))
    }

    fn release(&mut self, pos: Pos2, config: &NavigationConfig) -> Handled {
        let press = self.press.take();

        if self.drag.is_some() {
            self.finish_drag();
            return Handled::consumed(InputOutcome::HoverChanged);
        }
        if self.band.take().is_some() {
            return Handled::consumed(InputOutcome::HoverChanged);
        }

        match press {
            Some(press) => {
                let click = manhattan(pos, press.pos) < config.drag_threshold_pixels;
                if let Some(id) = press.item.filter(|_| click && !press.toggle) {
                    self.select(id, false);
                }
                Handled::consumed(InputOutcome::HoverChanged)
            }
            None => Handled::passed(InputOutcome::Ignored),
        }
    }

    fn update_hover<H: AxisModel, V: AxisModel>(
        &mut self,
        h: &H,
        v: &V,
        config: &NavigationConfig,
        pos: Pos2,
    ) -> InputOutcome {
        let (x, y) = (h.core().to_domain(pos.x as f64), v.core().to_domain(pos.y as f64));
        let (x_tolerance, y_tolerance) = tolerances(h, v, config.resize_handle_pixels);
        let hover = self.item_at(x, y).map(|id| {
            let handle = self.items.get(&id).and_then(|item| {
                let handles = item.capabilities.active_handles();
                item.rect.handle_at(x, y, handles, x_tolerance, y_tolerance)
            });
            (id, handle)
        });
        self.set_hover(hover)
    }

    fn set_hover(&mut self, hover: Option<(ItemId, Option<ResizeHandle>)>) -> InputOutcome {
        if hover == self.hover {
            return InputOutcome::Ignored;
        }
        let item_changed = hover.map(|(id, _)| id) != self.hover.map(|(id, _)| id);
        self.hover = hover;
        if item_changed {
            let item = hover.and_then(|(id, _)| self.items.get(&id));
            if let Some(on_hover) = &mut self.on_hover {
                on_hover(item);
            }
        }
        InputOutcome::HoverChanged
    }

    fn update_band<H: AxisModel, V: AxisModel>(&mut self, h: &H, v: &V) {
        let Some(band) = &self.band else {
            return;
        };
        let region = Rect::from_two_pos(band.start, band.current);
        let x = sorted(
            h.core().to_domain(region.min.x as f64),
            h.core().to_domain(region.max.x as f64),
        );
        let y = sorted(
            v.core().to_domain(region.min.y as f64),
            v.core().to_domain(region.max.y as f64),
        );

        let mut selected = band.base.clone();
        selected.extend(
            self.items
                .iter()
                .filter(|(_, item)| item.rect.intersects(x, y))
                .map(|(id, _)| *id),
        );
        self.selected = selected;
    }

    fn start_drag<H: AxisModel, V: AxisModel>(
        &mut self,
        h: &H,
        v: &V,
        config: &NavigationConfig,
        pressed: ItemId,
        press: (f64, f64),
    ) {
        let (x_tolerance, y_tolerance) = tolerances(h, v, config.resize_handle_pixels);
        let handle = self.items.get(&pressed).and_then(|item| {
            let handles = item.capabilities.active_handles();
            item.rect.handle_at(press.0, press.1, handles, x_tolerance, y_tolerance)
        });
        let originals = self
            .selected
            .iter()
            .filter_map(|id| self.items.get(id).map(|item| (*id, item.rect)))
            .collect();

        log::debug!("drag of {} items, handle {handle:?}", self.selected.len());
        self.drag = Some(DragState {
            handle,
            press,
            originals,
            valid: true,
        });
        self.drag_valid_now();
    }

    fn update_drag<H: AxisModel, V: AxisModel>(&mut self, h: &H, v: &V, config: &NavigationConfig, pos: Pos2) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let dx = h.core().to_domain(pos.x as f64) - drag.press.0;
        let dy = v.core().to_domain(pos.y as f64) - drag.press.1;
        let default_min = (
            config.min_item_pixels as f64 / h.core().pixels_per_unit(),
            config.min_item_pixels as f64 / v.core().pixels_per_unit(),
        );

        for (id, original) in &drag.originals {
            let Some(item) = self.items.get(id) else {
                continue;
            };
            let rect = match drag.handle {
                Some(handle) => self.resized(item, *original, handle, (dx, dy), default_min),
                None => self.moved(item, *original, (dx, dy)),
            };
            if let Some(item) = self.items.get_mut(id) {
                item.rect = rect;
                if let Some(hook) = &self.on_drag_update {
                    if let Some(adjusted) = hook(item) {
                        item.rect = adjusted;
                    }
                }
            }
        }

        self.drag = Some(drag);
        self.drag_valid_now();
    }

    fn moved(&self, item: &InteractiveItem<T>, original: ItemRect, (dx, dy): (f64, f64)) -> ItemRect {
        if !item.capabilities.can_move {
            return original;
        }
        let x = snap(self.snap_x.as_ref(), original.x + dx, item);
        let y = snap(self.snap_y.as_ref(), original.y + dy, item);
        ItemRect { x, y, ..original }
    }

    fn resized(
        &self,
        item: &InteractiveItem<T>,
        original: ItemRect,
        handle: ResizeHandle,
        (dx, dy): (f64, f64),
        (default_min_width, default_min_height): (f64, f64),
    ) -> ItemRect {
        if !item.capabilities.allows(handle) {
            return original;
        }
        let limits = item.capabilities.limits.or(self.limits);
        let width = |w: f64| {
            w.max(limits.min_width.unwrap_or(default_min_width))
                .min(limits.max_width.unwrap_or(f64::INFINITY))
        };
        let height = |h: f64| {
            h.max(limits.min_height.unwrap_or(default_min_height))
                .min(limits.max_height.unwrap_or(f64::INFINITY))
        };
        let snap_x = self.resize_snap_x.as_ref().or(self.snap_x.as_ref());
        let snap_y = self.resize_snap_y.as_ref().or(self.snap_y.as_ref());

        let mut rect = original;
        match handle {
            ResizeHandle::Left => {
                let left = snap(snap_x, original.x + dx, item);
                rect.width = width(original.right() - left);
                rect.x = original.right() - rect.width;
            }
            ResizeHandle::Right => {
                let right = snap(snap_x, original.right() + dx, item);
                rect.width = width(right - original.x);
            }
            ResizeHandle::Top => {
                let top = snap(snap_y, original.y + dy, item);
                rect.height = height(original.bottom() - top);
                rect.y = original.bottom() - rect.height;
            }
            ResizeHandle::Bottom => {
                let bottom = snap(snap_y, original.bottom() + dy, item);
                rect.height = height(bottom - original.y);
            }
        }
        rect
    }

    fn dragged_items(&self, drag: &DragState) -> Vec<&InteractiveItem<T>> {
        drag.originals
            .iter()
            .filter_map(|(id, _)| self.items.get(id))
            .collect()
    }

    fn drag_valid_now(&mut self) {
        let Some(drag) = &self.drag else {
            return;
        };
        let valid = match &self.can_drop {
            Some(check) => check(&self.dragged_items(drag)),
            None => true,
        };
        if let Some(drag) = &mut self.drag {
            drag.valid = valid;
        }
    }

    /// Ends the drag: rejected drops restore the original rectangles,
    /// accepted ones notify `on_drop` and clear the selection.
    fn finish_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let valid = match &self.can_drop {
            Some(check) => check(&self.dragged_items(&drag)),
            None => true,
        };

        if !valid {
            log::debug!("drop rejected, restoring {} items", drag.originals.len());
            for (id, original) in &drag.originals {
                if let Some(item) = self.items.get_mut(id) {
                    item.rect = *original;
                }
            }
            return false;
        }

        if let Some(on_drop) = &mut self.on_drop {
            let items: Vec<&InteractiveItem<T>> = drag
                .originals
                .iter()
                .filter_map(|(id, _)| self.items.get(id))
                .collect();
            on_drop(&items);
        }
        self.selected.clear();
        true
    }

    // ===== Painting =====

    fn paint_item<H: AxisModel, V: AxisModel>(
        &self,
        surface: &mut dyn PaintSurface,
        h: &H,
        v: &V,
        theme: &dyn ThemeService,
        id: ItemId,
        item: &InteractiveItem<T>,
    ) {
        let rect = item.rect.to_pixels(h, v);
        let fill = self
            .item_color
            .as_ref()
            .and_then(|color| color(item))
            .or(item.visuals.fill_color)
            .unwrap_or_else(|| theme.saturated_color(Hue::Blue, Variant::Fill));
        let stroke = item
            .visuals
            .stroke_color
            .unwrap_or_else(|| theme.saturated_color(Hue::Blue, Variant::Border));
        let style = if self.is_selected(id) {
            Style::filled(fill).with_stroke(theme.saturated_color(Hue::Orange, Variant::Line), SELECTED_STROKE)
        } else if self.hovered_item() == Some(id) {
            Style::filled(fill).with_stroke(stroke, item.visuals.stroke_width + 1.0)
        } else {
            Style::filled(fill).with_stroke(stroke, item.visuals.stroke_width)
        };

        match item.visuals.shape {
            ItemShape::Rectangle => surface.fill_rect(rect, &style),
            ItemShape::Ellipse => surface.ellipse(rect, &style),
        }

        let label = self
            .item_label
            .as_ref()
            .and_then(|label| label(item))
            .or_else(|| item.visuals.label.clone());
        if let Some(label) = label {
            let left = rect.min.x.max(0.0);
            let right = rect.max.x.min(surface.size().x);
            let text = truncate_text_to_fit(&label, right - left, &LABEL_FONT, &*surface);
            if !text.is_empty() {
                let color = item
                    .visuals
                    .label_color
                    .unwrap_or_else(|| theme.object_color(ObjectRole::TextBase));
                let style = Style::stroked(color, 0.0).with_font(LABEL_FONT);
                let pos = Pos2::new(left + LABEL_PADDING * 0.5, rect.center().y);
                surface.text(pos, Align2::LEFT_CENTER, &text, &style);
            }
        }
    }
}

impl<T, H: AxisModel, V: AxisModel> CanvasInteraction<H, V> for InteractionHandler<T> {
    fn handle_pointer(&mut self, h: &H, v: &V, config: &NavigationConfig, input: &PointerInput) -> Handled {
        match *input {
            PointerInput::Pressed { pos, button, modifiers } if button == PointerButton::Primary => {
                self.press(h, v, config, pos, modifiers)
            }
            PointerInput::Pressed { .. } => Handled::passed(InputOutcome::Ignored),
            PointerInput::Moved { pos } => self.motion(h, v, config, pos),
            PointerInput::Released { pos, button } if button == PointerButton::Primary => self.release(pos, config),
            PointerInput::Released { .. } => Handled::passed(InputOutcome::Ignored),
            PointerInput::Left => Handled::passed(self.set_hover(None)),
        }
    }

    fn paint(&self, surface: &mut dyn PaintSurface, h: &H, v: &V, theme: &dyn ThemeService) {
        let x = sorted(h.core().visible_start(), h.core().visible_stop());
        let y = sorted(v.core().visible_start(), v.core().visible_stop());

        if let Some(drag) = &self.drag {
            let ghost = Style::filled(with_alpha(theme.object_color(ObjectRole::SurfaceSubtle), 96));
            for (_, original) in &drag.originals {
                let rect = original.to_pixels(h, v);
                surface.fill_rect(rect, &ghost);
            }
        }

        for (id, item) in self.items.iter().filter(|(_, item)| item.rect.intersects(x, y)) {
            self.paint_item(surface, h, v, theme, *id, item);
        }

        if let Some(drag) = &self.drag {
            let hue = if drag.valid { Hue::Green } else { Hue::Red };
            let outline = Style::stroked(theme.saturated_color(hue, Variant::Line), 2.0);
            for (id, _) in &drag.originals {
                if let Some(item) = self.items.get(id) {
                    surface.fill_rect(item.rect.to_pixels(h, v), &outline);
                }
            }
        }

        if let Some(band) = self.band_rect() {
            let style = Style::filled(with_alpha(theme.saturated_color(Hue::Blue, Variant::Fill), 40))
                .with_stroke(theme.saturated_color(Hue::Blue, Variant::Line), 1.0);
            surface.fill_rect(band, &style);
        }
    }

    fn tooltip(&self) -> Option<String> {
        if self.drag.is_some() {
            return None;
        }
        let item = self.items.get(&self.hovered_item()?)?;
        self.item_tooltip
            .as_ref()
            .and_then(|tooltip| tooltip(item))
            .or_else(|| item.tooltip.clone())
    }

    fn cursor(&self) -> Option<CursorIcon> {
        match &self.drag {
            Some(drag) => Some(drag.handle.map_or(CursorIcon::Grabbing, ResizeHandle::cursor)),
            None => self.hovered_handle().map(ResizeHandle::cursor),
        }
    }
}

fn snap<T>(snap: Option<&SnapFn<T>>, value: f64, item: &InteractiveItem<T>) -> f64 {
    snap.map_or(value, |snap| snap(value, item))
}

fn manhattan(a: Pos2, b: Pos2) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

fn sorted(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pixel tolerance converted to raw units on each axis.
fn tolerances<H: AxisModel, V: AxisModel>(h: &H, v: &V, pixels: f32) -> (f64, f64) {
    (
        pixels as f64 / h.core().pixels_per_unit(),
        pixels as f64 / v.core().pixels_per_unit(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{NumberRuler, TimelineRuler};
    use crate::paint::testing::{Op, RecordingSurface};
    use crate::theme::ColorMap;
    use chrono::NaiveDate;
    use std::cell::Cell;
    use std::rc::Rc;

    const EPS: f64 = 1e-9;

    /// 100x100 canvas at one pixel per unit, so raw units equal pixels.
    struct Fixture {
        h: NumberRuler,
        v: NumberRuler,
        config: NavigationConfig,
        handler: InteractionHandler<&'static str>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut h = NumberRuler::new(0.0, 100.0).unwrap();
            h.set_viewport_length(100.0);
            let mut v = NumberRuler::new(0.0, 100.0).unwrap();
            v.set_viewport_length(100.0);
            Self {
                h,
                v,
                config: NavigationConfig::default(),
                handler: InteractionHandler::new(),
            }
        }

        fn add(&mut self, data: &'static str, x: f64, y: f64, width: f64) -> ItemId {
            self.handler
                .add_item(InteractiveItem::new(data, ItemRect::new(x, y, width, 10.0)))
        }

        fn send(&mut self, input: PointerInput) -> Handled {
            self.handler.handle_pointer(&self.h, &self.v, &self.config, &input)
        }

        fn press(&mut self, x: f32, y: f32, modifiers: Modifiers) -> Handled {
            self.send(PointerInput::Pressed {
                pos: Pos2::new(x, y),
                button: PointerButton::Primary,
                modifiers,
            })
        }

        fn move_to(&mut self, x: f32, y: f32) -> Handled {
            self.send(PointerInput::Moved { pos: Pos2::new(x, y) })
        }

        fn release(&mut self, x: f32, y: f32) -> Handled {
            self.send(PointerInput::Released {
                pos: Pos2::new(x, y),
                button: PointerButton::Primary,
            })
        }

        fn rect(&self, id: ItemId) -> ItemRect {
            self.handler.item(id).unwrap().rect
        }
    }

    #[test]
    fn test_handle_at_prefers_horizontal_edges() {
        let rect = ItemRect::new(10.0, 10.0, 20.0, 10.0);
        let all = [
            ResizeHandle::Left,
            ResizeHandle::Right,
            ResizeHandle::Top,
            ResizeHandle::Bottom,
        ];
        assert_eq!(rect.handle_at(11.0, 11.0, &all, 2.0, 2.0), Some(ResizeHandle::Left));
        assert_eq!(rect.handle_at(29.0, 15.0, &all, 2.0, 2.0), Some(ResizeHandle::Right));
        assert_eq!(rect.handle_at(20.0, 19.0, &all, 2.0, 2.0), Some(ResizeHandle::Bottom));
        assert_eq!(rect.handle_at(20.0, 15.0, &all, 2.0, 2.0), None);
        assert_eq!(rect.handle_at(11.0, 15.0, &[ResizeHandle::Right], 2.0, 2.0), None);
    }

    #[test]
    fn test_press_on_item_selects_and_claims_event() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        let b = f.add("b", 50.0, 10.0, 20.0);

        assert!(f.press(20.0, 15.0, Modifiers::NONE).consumed);
        f.release(20.0, 15.0);
        assert!(f.handler.is_selected(a));

        f.press(60.0, 15.0, Modifiers::NONE);
        f.release(60.0, 15.0);
        assert_eq!(f.handler.selected().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_toggle_modifier_adds_and_removes() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        let b = f.add("b", 50.0, 10.0, 20.0);

        f.press(20.0, 15.0, Modifiers::NONE);
        f.release(20.0, 15.0);
        f.press(60.0, 15.0, Modifiers::CTRL);
        f.release(60.0, 15.0);
        assert!(f.handler.is_selected(a) && f.handler.is_selected(b));

        f.press(20.0, 15.0, Modifiers::CTRL);
        f.release(20.0, 15.0);
        assert_eq!(f.handler.selected().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_click_on_empty_space_clears_and_passes_through() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        f.handler.select(a, false);

        let handled = f.press(80.0, 80.0, Modifiers::NONE);
        assert!(!handled.consumed);
        assert!(handled.outcome.needs_repaint());
        assert_eq!(f.handler.selected().count(), 0);
        assert!(!f.release(80.0, 80.0).consumed);
    }

    #[test]
    fn test_click_on_selected_item_narrows_selection() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        let b = f.add("b", 50.0, 10.0, 20.0);
        f.handler.select(a, false);
        f.handler.select(b, true);

        f.press(20.0, 15.0, Modifiers::NONE);
        assert_eq!(f.handler.selected().count(), 2);
        f.release(21.0, 15.0);
        assert_eq!(f.handler.selected().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_drag_moves_selection_with_snapping() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        let b = f.add("b", 50.0, 30.0, 20.0);
        f.handler.set_snap_x(|x, _| x.round());
        f.handler.set_snap_y(|y, _| (y / 10.0).round() * 10.0);
        let dropped = Rc::new(Cell::new(0));
        let counter = Rc::clone(&dropped);
        f.handler.set_on_drop(move |items| counter.set(counter.get() + items.len()));

        f.press(60.0, 35.0, Modifiers::NONE);
        f.release(60.0, 35.0);
        f.press(20.0, 15.0, Modifiers::CTRL);
        f.release(20.0, 15.0);

        // Below the threshold nothing moves yet
        assert!(f.press(20.0, 15.0, Modifiers::NONE).consumed);
        f.move_to(22.0, 16.0);
        assert!(!f.handler.is_dragging());

        f.move_to(32.4, 19.0);
        assert!(f.handler.is_dragging());
        assert_eq!(f.rect(a), ItemRect::new(22.0, 10.0, 20.0, 10.0));
        assert_eq!(f.rect(b), ItemRect::new(62.0, 30.0, 20.0, 10.0));

        f.move_to(32.4, 22.0);
        assert_eq!(f.rect(a).y, 20.0);

        assert!(f.release(32.4, 22.0).consumed);
        assert!(!f.handler.is_dragging());
        assert_eq!(dropped.get(), 2);
        assert_eq!(f.handler.selected().count(), 0);
    }

    #[test]
    fn test_resize_right_and_left_handles() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);

        f.press(30.0, 15.0, Modifiers::NONE);
        f.move_to(50.0, 15.0);
        assert_eq!(CanvasInteraction::<NumberRuler, NumberRuler>::cursor(&f.handler), Some(CursorIcon::ResizeHorizontal));
        f.release(50.0, 15.0);
        assert_eq!(f.rect(a), ItemRect::new(10.0, 10.0, 40.0, 10.0));

        // Dragging the left edge past the right one stops at the minimum size
        f.press(10.0, 15.0, Modifiers::NONE);
        f.move_to(70.0, 15.0);
        f.release(70.0, 15.0);
        let rect = f.rect(a);
        assert!((rect.width - f.config.min_item_pixels as f64).abs() < EPS);
        assert!((rect.right() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_item_limits_override_handler_limits() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        let b = f.add("b", 10.0, 40.0, 20.0);
        f.handler.set_size_limits(SizeLimits {
            max_width: Some(30.0),
            ..SizeLimits::default()
        });
        if let Some(item) = f.handler.item_mut(b) {
            item.capabilities.limits.max_width = Some(25.0);
        }

        f.press(30.0, 15.0, Modifiers::NONE);
        f.move_to(90.0, 15.0);
        f.release(90.0, 15.0);
        assert_eq!(f.rect(a).width, 30.0);

        f.press(30.0, 45.0, Modifiers::NONE);
        f.move_to(90.0, 45.0);
        f.release(90.0, 45.0);
        assert_eq!(f.rect(b).width, 25.0);
    }

    #[test]
    fn test_fixed_items_stay_put() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        if let Some(item) = f.handler.item_mut(a) {
            item.capabilities = ItemCapabilities::fixed();
        }

        f.press(20.0, 15.0, Modifiers::NONE);
        f.move_to(60.0, 15.0);
        f.release(60.0, 15.0);
        assert_eq!(f.rect(a), ItemRect::new(10.0, 10.0, 20.0, 10.0));
    }

    #[test]
    fn test_rejected_drop_restores_items() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        f.handler.set_can_drop(|items| items.iter().all(|item| item.rect.x < 40.0));
        let dropped = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dropped);
        f.handler.set_on_drop(move |_| flag.set(true));

        f.press(20.0, 15.0, Modifiers::NONE);
        f.move_to(30.0, 15.0);
        assert!(f.handler.drag_is_valid());
        f.move_to(60.0, 15.0);
        assert!(!f.handler.drag_is_valid());
        f.release(60.0, 15.0);

        assert_eq!(f.rect(a).x, 10.0);
        assert!(!dropped.get());
        assert!(f.handler.is_selected(a));
    }

    #[test]
    fn test_drag_update_hook_adjusts_rect() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        f.handler
            .set_on_drag_update(|item| Some(ItemRect { y: 10.0, ..item.rect }));

        f.press(20.0, 15.0, Modifiers::NONE);
        f.move_to(40.0, 45.0);
        f.release(40.0, 45.0);
        assert_eq!(f.rect(a), ItemRect::new(30.0, 10.0, 20.0, 10.0));
    }

    #[test]
    fn test_band_selects_touched_items() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        let b = f.add("b", 50.0, 50.0, 20.0);
        let c = f.add("c", 80.0, 80.0, 10.0);
        f.handler.select(c, false);

        assert!(f.press(40.0, 40.0, Modifiers::SHIFT).consumed);
        assert_eq!(f.handler.selected().count(), 0);
        f.move_to(5.0, 5.0);
        assert!(f.handler.is_banding());
        assert_eq!(f.handler.selected().collect::<Vec<_>>(), vec![a]);

        f.move_to(55.0, 55.0);
        assert_eq!(f.handler.selected().collect::<Vec<_>>(), vec![b]);
        assert!(f.release(55.0, 55.0).consumed);
        assert!(f.handler.band_rect().is_none());

        // With the toggle modifier the band adds to the selection
        f.press(5.0, 5.0, Modifiers::SHIFT | Modifiers::CTRL);
        f.move_to(15.0, 15.0);
        f.release(15.0, 15.0);
        assert!(f.handler.is_selected(a) && f.handler.is_selected(b));
    }

    #[test]
    fn test_hover_reports_item_handle_and_tooltip() {
        let mut f = Fixture::new();
        let a = f.handler.add_item(
            InteractiveItem::new("a", ItemRect::new(10.0, 10.0, 40.0, 10.0)).with_tooltip("task a"),
        );
        let hovered = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hovered);
        f.handler.set_on_hover(move |_| counter.set(counter.get() + 1));

        let handled = f.move_to(30.0, 15.0);
        assert!(!handled.consumed);
        assert_eq!(handled.outcome, InputOutcome::HoverChanged);
        assert_eq!(f.handler.hovered_item(), Some(a));
        assert_eq!(f.handler.hovered_handle(), None);
        assert_eq!(CanvasInteraction::<NumberRuler, NumberRuler>::tooltip(&f.handler).as_deref(), Some("task a"));

        f.move_to(48.0, 15.0);
        assert_eq!(f.handler.hovered_handle(), Some(ResizeHandle::Right));
        assert_eq!(CanvasInteraction::<NumberRuler, NumberRuler>::cursor(&f.handler), Some(CursorIcon::ResizeHorizontal));

        f.handler.set_item_tooltip(|item| Some(format!("item {}", item.data)));
        assert_eq!(CanvasInteraction::<NumberRuler, NumberRuler>::tooltip(&f.handler).as_deref(), Some("item a"));

        f.send(PointerInput::Left);
        assert_eq!(f.handler.hovered_item(), None);
        assert_eq!(hovered.get(), 2);
    }

    #[test]
    fn test_remove_item_forgets_selection() {
        let mut f = Fixture::new();
        let a = f.add("a", 10.0, 10.0, 20.0);
        let b = f.add("b", 50.0, 10.0, 20.0);
        f.handler.select(a, false);

        assert_eq!(f.handler.remove_item(a).map(|item| item.data), Some("a"));
        assert!(!f.handler.is_selected(a));
        assert_eq!(f.handler.find_item(&"b"), Some(b));
        assert_eq!(f.handler.len(), 1);
        assert_eq!(f.handler.item_at(20.0, 15.0), None);
    }

    #[test]
    fn test_topmost_item_wins() {
        let mut f = Fixture::new();
        f.add("under", 10.0, 10.0, 40.0);
        let over = f.add("over", 20.0, 10.0, 10.0);
        assert_eq!(f.handler.item_at(25.0, 15.0), Some(over));
    }

    #[test]
    fn test_paint_items_labels_and_selection() {
        let mut f = Fixture::new();
        let visuals = ItemVisuals {
            label: Some("Build".to_string()),
            ..ItemVisuals::default()
        };
        let a = f.handler.add_item(
            InteractiveItem::new("a", ItemRect::new(10.0, 10.0, 60.0, 10.0)).with_visuals(visuals),
        );
        f.add("offscreen", 200.0, 10.0, 10.0);
        f.handler.select(a, false);

        let mut surface = RecordingSurface::new(100.0, 100.0);
        f.handler.paint(&mut surface, &f.h, &f.v, &ColorMap::default());

        let rects: Vec<(Rect, f32)> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Rect(rect, style) => Some((*rect, style.stroke_width)),
                _ => None,
            })
            .collect();
        assert_eq!(
            rects,
            vec![(Rect::from_min_max(Pos2::new(10.0, 10.0), Pos2::new(70.0, 20.0)), SELECTED_STROKE)]
        );
        assert_eq!(surface.texts(), vec!["Build"]);
    }

    #[test]
    fn test_spanning_round_trips_typed_values() {
        let day = |d| {
            NaiveDate::from_ymd_opt(2024, 5, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let h = TimelineRuler::new(day(1), day(31)).unwrap();
        let v = NumberRuler::new(0.0, 10.0).unwrap();

        let item = InteractiveItem::spanning((), &h, &v, (&day(9), &day(3)), (&2.0, &3.0));
        assert_eq!(item.x_range(&h), (day(3), day(9)));
        assert_eq!(item.y_range(&v), (2.0, 3.0));
        assert!((item.rect.width - 6.0 * 86_400.0).abs() < 1e-6);
    }
}
