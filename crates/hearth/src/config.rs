//! Manager construction settings and the export/import document.

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;
use crate::preset::{PresetRegistry, ThemePreset, DEFAULT_THEME};
use crate::prefs::{PreferenceState, StorageKeys, DEFAULT_STORAGE_PREFIX};

/// Settings used to build a [`ThemeManager`](crate::ThemeManager).
///
/// # Example
///
/// ```rust
/// use hearth::{Palette, ThemeConfig, ThemePreset};
///
/// let config = ThemeConfig::new()
///     .storage_prefix("ledger")
///     .preset(ThemePreset::new("ink", "Ink").colors(Palette::new().with("primary", "#1F2937")))
///     .default_theme("ink");
///
/// let registry = config.registry().unwrap();
/// assert_eq!(registry.default_key(), "ink");
/// assert_eq!(config.keys().prefix(), "ledger");
/// ```
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    storage_prefix: String,
    default_theme: String,
    presets: Vec<ThemePreset>,
}

impl ThemeConfig {
    pub fn new() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            default_theme: DEFAULT_THEME.to_string(),
            presets: Vec::new(),
        }
    }

    /// Sets the namespace prefix for storage keys.
    pub fn storage_prefix(mut self, prefix: &str) -> Self {
        self.storage_prefix = prefix.to_string();
        self
    }

    /// Sets the fallback theme key. Must name a built-in or added preset.
    pub fn default_theme(mut self, key: &str) -> Self {
        self.default_theme = key.to_string();
        self
    }

    /// Adds a preset on top of the built-ins.
    pub fn preset(mut self, preset: ThemePreset) -> Self {
        self.presets.push(preset);
        self
    }

    pub fn keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.storage_prefix)
    }

    /// Builds the preset registry: built-ins, then added presets in order.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidPreset`] for a preset that fails
    /// validation and [`ThemeError::UnknownTheme`] if the default theme is
    /// not registered.
    pub fn registry(&self) -> Result<PresetRegistry, ThemeError> {
        let mut registry = PresetRegistry::builtin();
        for preset in &self.presets {
            preset.validate()?;
            registry.insert(preset.clone());
        }
        if !registry.set_default(&self.default_theme) {
            return Err(ThemeError::UnknownTheme {
                key: self.default_theme.clone(),
            });
        }
        Ok(registry)
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Display flags as carried in an export document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportedPreferences {
    pub is_dark_mode: bool,
    pub is_high_contrast: bool,
    pub is_reduced_motion: bool,
}

/// A portable snapshot of presets and preferences.
///
/// Every field is optional on import: missing presets add nothing, a
/// missing or unknown `currentTheme` keeps the active one, and missing
/// `preferences` keep the current flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeExport {
    #[serde(default, with = "preset_map")]
    pub themes: Vec<ThemePreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<ExportedPreferences>,
}

impl ThemeExport {
    pub(crate) fn capture(registry: &PresetRegistry, state: &PreferenceState) -> Self {
        Self {
            themes: registry.iter().cloned().collect(),
            current_theme: Some(state.theme.clone()),
            preferences: Some(ExportedPreferences {
                is_dark_mode: state.dark_mode,
                is_high_contrast: state.high_contrast,
                is_reduced_motion: state.reduced_motion,
            }),
        }
    }

    pub fn to_json(&self) -> Result<String, ThemeError> {
        serde_json::to_string_pretty(self).map_err(|e| ThemeError::Export(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, ThemeError> {
        serde_json::from_str(text).map_err(|e| ThemeError::Import(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, ThemeError> {
        serde_yaml::to_string(self).map_err(|e| ThemeError::Export(e.to_string()))
    }

    pub fn from_yaml(text: &str) -> Result<Self, ThemeError> {
        serde_yaml::from_str(text).map_err(|e| ThemeError::Import(e.to_string()))
    }
}

/// Serializes presets as a map keyed by preset key, keeping their order.
mod preset_map {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use crate::preset::ThemePreset;

    pub fn serialize<S: Serializer>(presets: &[ThemePreset], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(presets.len()))?;
        for preset in presets {
            map.serialize_entry(&preset.key, preset)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ThemePreset>, D::Error> {
        struct PresetMapVisitor;

        impl<'de> Visitor<'de> for PresetMapVisitor {
            type Value = Vec<ThemePreset>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of theme keys to presets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut presets = Vec::new();
                while let Some((key, mut preset)) = access.next_entry::<String, ThemePreset>()? {
                    preset.key = key;
                    presets.push(preset);
                }
                Ok(presets)
            }
        }

        deserializer.deserialize_map(PresetMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Palette;

    #[test]
    fn test_default_config() {
        let config = ThemeConfig::default();
        assert_eq!(config.keys(), StorageKeys::default());
        let registry = config.registry().unwrap();
        assert_eq!(registry.default_key(), "classic");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_config_rejects_unknown_default() {
        let err = ThemeConfig::new()
            .default_theme("ghost-theme")
            .registry()
            .unwrap_err();
        assert!(matches!(err, ThemeError::UnknownTheme { key } if key == "ghost-theme"));
    }

    #[test]
    fn test_config_rejects_invalid_preset() {
        let err = ThemeConfig::new()
            .preset(ThemePreset::new("bad", ""))
            .registry()
            .unwrap_err();
        assert!(matches!(err, ThemeError::InvalidPreset { .. }));
    }

    #[test]
    fn test_export_json_shape() {
        let registry = PresetRegistry::builtin();
        let state = PreferenceState {
            theme: "natural".to_string(),
            dark_mode: true,
            ..Default::default()
        };
        let json = ThemeExport::capture(&registry, &state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["currentTheme"], "natural");
        assert_eq!(value["preferences"]["isDarkMode"], true);
        assert_eq!(value["preferences"]["isHighContrast"], false);
        assert_eq!(value["themes"]["modern"]["colors"]["primary"], "#6B73FF");
        assert_eq!(value["themes"]["classic"]["name"], "经典烘焙");
    }

    #[test]
    fn test_import_json_sets_keys_from_map() {
        let json = r##"{
            "themes": {
                "dusk": { "name": "Dusk", "colors": { "primary": "#5B4B8A" } }
            },
            "currentTheme": "dusk"
        }"##;
        let export = ThemeExport::from_json(json).unwrap();

        assert_eq!(export.themes.len(), 1);
        assert_eq!(export.themes[0].key, "dusk");
        assert_eq!(export.themes[0].description, "");
        assert_eq!(export.current_theme.as_deref(), Some("dusk"));
        assert_eq!(export.preferences, None);
    }

    #[test]
    fn test_import_partial_preferences_default_false() {
        let export =
            ThemeExport::from_json(r#"{ "preferences": { "isDarkMode": true } }"#).unwrap();
        assert_eq!(
            export.preferences,
            Some(ExportedPreferences {
                is_dark_mode: true,
                is_high_contrast: false,
                is_reduced_motion: false,
            })
        );
    }

    #[test]
    fn test_yaml_keeps_preset_order() {
        let export = ThemeExport {
            themes: vec![
                ThemePreset::new("zest", "Zest").colors(Palette::new().with("primary", "#FACC15")),
                ThemePreset::new("ash", "Ash"),
            ],
            ..Default::default()
        };
        let yaml = export.to_yaml().unwrap();
        let back = ThemeExport::from_yaml(&yaml).unwrap();
        let keys: Vec<_> = back.themes.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["zest", "ash"]);
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(
            ThemeExport::from_json("[1, 2]"),
            Err(ThemeError::Import(_))
        ));
    }
}
