//! Settings persistence through eframe storage.
//!
//! Values are stored as JSON strings under fixed keys. Anything missing or
//! unparsable falls back to defaults so a corrupt entry never blocks start-up.

use serde::{Deserialize, Serialize};

use rnav::NavigationConfig;

/// Storage key for the navigation settings.
pub const NAVIGATION_CONFIG_KEY: &str = "navigation_config";

/// Storage key for the selected demo tab.
pub const ACTIVE_DEMO_KEY: &str = "active_demo";

/// Loads and saves viewer settings.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads the navigation settings, or defaults when absent or invalid.
    ///
    /// # Arguments
    /// * `storage` - The eframe storage interface, if persistence is enabled
    pub fn load_config(storage: Option<&dyn eframe::Storage>) -> NavigationConfig {
        let Some(json) = storage.and_then(|s| s.get_string(NAVIGATION_CONFIG_KEY)) else {
            return NavigationConfig::default();
        };
        match NavigationConfig::from_json(&json) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring stored navigation settings: {err}");
                NavigationConfig::default()
            }
        }
    }

    pub fn save_config(storage: &mut dyn eframe::Storage, config: &NavigationConfig) {
        match config.to_json() {
            Ok(json) => {
                storage.set_string(NAVIGATION_CONFIG_KEY, json);
                storage.flush();
            }
            Err(err) => log::warn!("could not save navigation settings: {err}"),
        }
    }

    /// Loads a setting with a custom default.
    ///
    /// # Arguments
    /// * `storage` - The eframe storage interface
    /// * `key` - The storage key for this setting
    /// * `default` - The value to use if loading fails
    pub fn load_setting_or<T>(storage: Option<&dyn eframe::Storage>, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        storage
            .and_then(|s| s.get_string(key))
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or(default)
    }

    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        if let Ok(json) = serde_json::to_string(value) {
            storage.set_string(key, json);
            storage.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rnav::ModifierKey;
    use std::collections::HashMap;
    use eframe::Storage;

    /// Simple mock storage for testing
    struct MockStorage {
        data: HashMap<String, String>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                data: HashMap::new(),
            }
        }
    }

    impl eframe::Storage for MockStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.data.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.data.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_save_and_load_config() {
        let mut storage = MockStorage::new();
        let config = NavigationConfig {
            zoom_modifier: ModifierKey::Command,
            dark_mode: false,
            ..NavigationConfig::default()
        };

        SettingsCoordinator::save_config(&mut storage, &config);
        assert_eq!(SettingsCoordinator::load_config(Some(&storage)), config);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let storage = MockStorage::new();
        assert_eq!(SettingsCoordinator::load_config(Some(&storage)), NavigationConfig::default());
        assert_eq!(SettingsCoordinator::load_config(None), NavigationConfig::default());
    }

    #[test]
    fn test_corrupt_config_uses_defaults() {
        let mut storage = MockStorage::new();
        storage.set_string(NAVIGATION_CONFIG_KEY, "{oops".to_string());
        assert_eq!(SettingsCoordinator::load_config(Some(&storage)), NavigationConfig::default());
    }

    #[test]
    fn test_save_and_load_setting() {
        let mut storage = MockStorage::new();
        SettingsCoordinator::save_setting(&mut storage, ACTIVE_DEMO_KEY, &"scatter");

        let loaded: String = SettingsCoordinator::load_setting_or(Some(&storage), ACTIVE_DEMO_KEY, String::new());
        assert_eq!(loaded, "scatter");

        let missing: u32 = SettingsCoordinator::load_setting_or(Some(&storage), "missing", 7);
        assert_eq!(missing, 7);
    }
}
