//! Navigation and viewport toolkit for interactive 2D data views.
//!
//! An [`AxisModel`] maps a domain (numbers, timestamps or indexed items) onto
//! a pixel range and supports pan/zoom. [`Ruler`] presents an axis along a
//! screen edge, [`NavigationView`] composes two axes into a navigable canvas,
//! and [`LayerRegistry`] holds named deferred drawing layers that are
//! evaluated for the visible window only. [`InteractionHandler`] adds
//! selectable, draggable items on top, and [`AxisLink`] keeps axes of
//! separate views in step.

pub mod axis;
pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod interaction;
pub mod layers;
pub mod link;
pub mod paint;
pub mod ruler;
pub mod text_utils;
pub mod theme;
pub mod view;
pub mod widget;

// Axis models
pub use axis::{
    AxisCore, AxisKind, AxisModel, DragAnchor, Granularity, ItemRuler, ItemTicks, NumberRuler,
    NumberTicks, Tick, TickLevel, TimeScale, TimelineRuler, TimelineTicks,
};

// Presentation and composition
pub use ruler::{Edge, Ruler};
pub use view::NavigationView;
pub use widget::ViewLayout;

// Deferred drawing
pub use layers::{
    DomainEllipse, DomainLine, DomainPoint, DomainRect, DomainText, DrawCommand, LayerRegistry,
    ViewWindow, Window,
};

// Interaction
pub use interaction::{
    CanvasInteraction, Handled, InteractionHandler, InteractiveItem, ItemCapabilities, ItemId, ItemRect,
    ItemShape, ItemVisuals, ResizeHandle, SizeLimits,
};
pub use link::AxisLink;

// Host boundary
pub use input::{InputOutcome, ModifierKey, PointerInput, WheelInput};
pub use paint::{EguiSurface, FontSpec, PaintSurface, Style};
pub use theme::{hex_to_color32, with_alpha, ColorMap, Hue, ObjectRole, ThemeService, Variant};

pub use config::NavigationConfig;
pub use error::{NavError, Result};
pub use format::SiFormat;
