//! Player preferences
//!
//! Persisted as JSON in LocalStorage. Older builds of the site stored only a
//! `"true"`/`"false"` mute flag under its own key; that value is still read
//! when no JSON settings exist yet.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Silence every sound effect
    pub muted: bool,
}

impl Settings {
    /// LocalStorage key
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "toaste_game_settings";
    /// Pre-JSON mute flag
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const LEGACY_MUTED_KEY: &'static str = "toaste_game_muted";

    /// Flip the mute flag, returning the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Resolve settings from what storage holds under the current and legacy keys
    pub fn from_stored(json: Option<&str>, legacy_muted: Option<&str>) -> Self {
        if let Some(json) = json {
            match serde_json::from_str(json) {
                Ok(settings) => return settings,
                Err(err) => log::warn!("Ignoring unreadable settings: {}", err),
            }
        }
        Self {
            muted: legacy_muted == Some("true"),
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::info!("Using default settings");
            return Self::default();
        };
        let json = storage.get_item(Self::STORAGE_KEY).ok().flatten();
        let legacy = storage.get_item(Self::LEGACY_MUTED_KEY).ok().flatten();
        let settings = Self::from_stored(json.as_deref(), legacy.as_deref());
        log::info!("Loaded settings from LocalStorage (muted: {})", settings.muted);
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                // Keep the legacy flag in step for pages still reading it
                let _ = storage.set_item(Self::LEGACY_MUTED_KEY, &self.muted.to_string());
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
        log::debug!("Settings not persisted on native (muted: {})", self.muted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_unmuted() {
        assert!(!Settings::from_stored(None, None).muted);
    }

    #[test]
    fn test_legacy_flag_honoured() {
        assert!(Settings::from_stored(None, Some("true")).muted);
        assert!(!Settings::from_stored(None, Some("false")).muted);
    }

    #[test]
    fn test_json_wins_over_legacy() {
        let settings = Settings::from_stored(Some(r#"{"muted":false}"#), Some("true"));
        assert!(!settings.muted);
    }

    #[test]
    fn test_corrupt_json_falls_back_to_legacy() {
        let settings = Settings::from_stored(Some("{oops"), Some("true"));
        assert!(settings.muted);
    }

    #[test]
    fn test_toggle_and_roundtrip() {
        let mut settings = Settings::default();
        assert!(settings.toggle_mute());
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_stored(Some(&json), None), settings);
        assert!(!settings.toggle_mute());
    }
}
