//! Application-level modules for the navigation demo viewer.
//!
//! Each demo builds a [`rnav::NavigationView`] with its own generated data;
//! settings persistence is shared.

pub mod scatter;
pub mod schedule;
mod settings_coordinator;

pub use settings_coordinator::{SettingsCoordinator, ACTIVE_DEMO_KEY};
