//! Error types for axis construction and configuration.
//!
//! Only setup can fail. Pan, zoom and resize clamp their inputs and never
//! return errors.

use thiserror::Error;

/// Errors raised while configuring axes, themes or settings.
#[derive(Debug, Error)]
pub enum NavError {
    /// Continuous domain bounds are inverted, empty or not finite.
    #[error("invalid domain: min {min} must be finite and below max {max}")]
    InvalidDomain { min: f64, max: f64 },

    /// Timeline domain bounds are inverted or empty.
    #[error("invalid time range: start {start} must be before stop {stop}")]
    InvalidTimeRange { start: String, stop: String },

    /// Item rulers need at least one item.
    #[error("invalid item count {0}: an item ruler needs at least one item")]
    InvalidItemCount(usize),

    /// Density limits must be positive and ordered.
    #[error("invalid density limits: min {min} must be positive and not above max {max}")]
    InvalidDensityLimits { min: f64, max: f64 },

    /// An explicit visible range does not lie inside the domain.
    #[error("invalid visible range {start}..{stop}: must be non-empty and inside {domain_min}..{domain_max}")]
    InvalidVisibleRange {
        start: f64,
        stop: f64,
        domain_min: f64,
        domain_max: f64,
    },

    /// A color role, hue or variant name is not known to the theme.
    #[error("unknown color name '{0}'")]
    UnknownColor(String),

    /// Navigation settings could not be parsed or serialized.
    #[error("invalid navigation config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NavError>;
