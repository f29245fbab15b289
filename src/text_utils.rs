//! Text fitting utilities
//!
//! Shared utilities for text measurement and truncation.

use crate::paint::{FontSpec, PaintSurface};

/// Horizontal padding kept free around fitted labels.
pub const LABEL_PADDING: f32 = 8.0;

const ELLIPSIS: &str = "..";

/// Truncates text to fit within a given width, adding ".." if truncated
///
/// # Arguments
/// * `text` - The text to potentially truncate
/// * `available_width` - Maximum width available for the text
/// * `font` - Font to use for measuring text
/// * `surface` - Surface used for text measurement
///
/// # Returns
/// * Truncated string that fits within the available width (minus padding)
pub fn truncate_text_to_fit(
    text: &str,
    available_width: f32,
    font: &FontSpec,
    surface: &dyn PaintSurface,
) -> String {
    let max_width = available_width - LABEL_PADDING;
    if max_width <= 0.0 {
        return String::new();
    }

    if surface.measure_text(text, font).x <= max_width {
        return text.to_string();
    }

    let ellipsis_width = surface.measure_text(ELLIPSIS, font).x;
    if ellipsis_width >= max_width {
        return String::new();
    }
    let available_for_text = max_width - ellipsis_width;

    // Binary search for the longest prefix that fits
    let mut low = 0;
    let mut high = text.chars().count();
    let mut best_fit = 0;

    while low <= high {
        let mid = (low + high) / 2;
        let truncated: String = text.chars().take(mid).collect();
        if surface.measure_text(&truncated, font).x <= available_for_text {
            best_fit = mid;
            low = mid + 1;
        } else if mid == 0 {
            break;
        } else {
            high = mid - 1;
        }
    }

    let mut result: String = text.chars().take(best_fit).collect();
    result.push_str(ELLIPSIS);
    result
}

/// Whether `text` fits in `available_width` including padding.
pub fn fits(text: &str, available_width: f32, font: &FontSpec, surface: &dyn PaintSurface) -> bool {
    surface.measure_text(text, font).x + LABEL_PADDING <= available_width
}
