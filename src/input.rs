//! Host-independent input events in local pixel coordinates.

use egui::{Modifiers, PointerButton, Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub pos: Pos2,
    /// Scroll amount in points; positive `y` scrolls up/away from the user
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

/// Pointer button and movement events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Pressed {
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
    },
    Moved {
        pos: Pos2,
    },
    Released {
        pos: Pos2,
        button: PointerButton,
    },
    /// Pointer left the widget
    Left,
}

/// Modifier key that activates a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierKey {
    Ctrl,
    Alt,
    Shift,
    /// Ctrl on Windows/Linux, Cmd on macOS
    Command,
}

impl ModifierKey {
    pub fn is_held(self, modifiers: &Modifiers) -> bool {
        match self {
            ModifierKey::Ctrl => modifiers.ctrl,
            ModifierKey::Alt => modifiers.alt,
            ModifierKey::Shift => modifiers.shift,
            ModifierKey::Command => modifiers.command,
        }
    }
}

/// What handling an event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    /// An axis' visible range moved; everything must repaint
    ViewportChanged,
    /// Only hover or selection feedback changed
    HoverChanged,
}

impl InputOutcome {
    pub fn needs_repaint(self) -> bool {
        !matches!(self, InputOutcome::Ignored)
    }

    /// Keeps the stronger of two outcomes.
    pub fn merge(self, other: InputOutcome) -> InputOutcome {
        match (self, other) {
            (InputOutcome::ViewportChanged, _) | (_, InputOutcome::ViewportChanged) => InputOutcome::ViewportChanged,
            (InputOutcome::HoverChanged, _) | (_, InputOutcome::HoverChanged) => InputOutcome::HoverChanged,
            _ => InputOutcome::Ignored,
        }
    }
}
