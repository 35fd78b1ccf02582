//! Theme presets and the registry that holds them.
//!
//! A [`ThemePreset`] is a named bundle of display colors. Presets live in a
//! [`PresetRegistry`], which keeps them in registration order so selectors
//! list them predictably. Registering a key that already exists replaces
//! the earlier preset in place.

use std::fmt;

use once_cell::sync::Lazy;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ThemeError;
use crate::util::parse_hex_color;

/// Key of the preset used when nothing else resolves.
pub const DEFAULT_THEME: &str = "classic";

/// An ordered set of named color values.
///
/// Serializes as a map (`{"primary": "#DE6005", ...}`) while keeping the
/// insertion order, which `BTreeMap` would lose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<(String, String)>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named color, returning the palette for chaining.
    ///
    /// Re-adding a name overwrites its value without moving it.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PaletteVisitor;

        impl<'de> Visitor<'de> for PaletteVisitor {
            type Value = Palette;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of color names to color values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Palette, A::Error> {
                let mut palette = Palette::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    palette.set(&name, &value);
                }
                Ok(palette)
            }
        }

        deserializer.deserialize_map(PaletteVisitor)
    }
}

/// A named theme: display metadata plus its color palette.
///
/// # Example
///
/// ```rust
/// use hearth::{Palette, ThemePreset};
///
/// let preset = ThemePreset::new("dusk", "Dusk")
///     .description("Muted purples for late shifts")
///     .colors(Palette::new().with("primary", "#5B4B8A").with("accent", "#7E6BC4"));
///
/// assert!(preset.validate().is_ok());
/// assert_eq!(preset.colors.get("primary"), Some("#5B4B8A"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreset {
    #[serde(skip)]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub colors: Palette,
}

impl ThemePreset {
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: String::new(),
            colors: Palette::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn colors(mut self, colors: Palette) -> Self {
        self.colors = colors;
        self
    }

    /// Checks that the preset can be registered.
    ///
    /// The key and display name must be non-empty and every color must be a
    /// `#RGB` or `#RRGGBB` hex value.
    pub fn validate(&self) -> Result<(), ThemeError> {
        let invalid = |reason: String| ThemeError::InvalidPreset {
            key: self.key.clone(),
            reason,
        };

        if self.key.trim().is_empty() {
            return Err(invalid("key is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("display name is empty".to_string()));
        }
        for (name, value) in self.colors.iter() {
            if parse_hex_color(value).is_none() {
                return Err(invalid(format!(
                    "color '{}' has non-hex value '{}'",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

static BUILTIN_PRESETS: Lazy<Vec<ThemePreset>> = Lazy::new(|| {
    vec![
        ThemePreset::new("classic", "经典烘焙")
            .description("温暖的橙棕色调，营造传统烘焙氛围")
            .colors(
                Palette::new()
                    .with("primary", "#DE6005")
                    .with("secondary", "#D97706")
                    .with("accent", "#B26018"),
            ),
        ThemePreset::new("modern", "现代简约")
            .description("清新的蓝紫色调，现代简洁设计")
            .colors(
                Palette::new()
                    .with("primary", "#6B73FF")
                    .with("secondary", "#9BA3FF")
                    .with("accent", "#5A61E6"),
            ),
        ThemePreset::new("natural", "温馨自然")
            .description("清新的绿色调，自然温馨感受")
            .colors(
                Palette::new()
                    .with("primary", "#8FBC8F")
                    .with("secondary", "#B8D4B8")
                    .with("accent", "#7AA67A"),
            ),
    ]
});

/// Insertion-ordered collection of presets keyed by name.
///
/// A registry always holds at least its default preset, so resolution
/// never comes up empty.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<ThemePreset>,
    default_index: usize,
}

impl PresetRegistry {
    /// Creates a registry holding only `preset`, which becomes the default.
    pub fn with_default(preset: ThemePreset) -> Self {
        Self {
            presets: vec![preset],
            default_index: 0,
        }
    }

    /// Creates a registry holding the built-in presets.
    pub fn builtin() -> Self {
        let presets = BUILTIN_PRESETS.clone();
        let default_index = presets
            .iter()
            .position(|p| p.key == DEFAULT_THEME)
            .unwrap_or(0);
        Self {
            presets,
            default_index,
        }
    }

    /// Changes the fallback key. Ignored if the key is not registered.
    pub fn set_default(&mut self, key: &str) -> bool {
        match self.presets.iter().position(|p| p.key == key) {
            Some(index) => {
                self.default_index = index;
                true
            }
            None => false,
        }
    }

    /// The key substituted for missing or unregistered theme selections.
    pub fn default_key(&self) -> &str {
        &self.default_preset().key
    }

    pub fn default_preset(&self) -> &ThemePreset {
        &self.presets[self.default_index]
    }

    /// The preset registered under `key`, or the default preset.
    pub fn get_or_default(&self, key: &str) -> &ThemePreset {
        self.get(key).unwrap_or_else(|| self.default_preset())
    }

    /// Registers a preset. An existing preset with the same key is replaced.
    pub fn insert(&mut self, preset: ThemePreset) {
        match self.presets.iter_mut().find(|p| p.key == preset.key) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ThemePreset> {
        self.presets.iter().find(|p| p.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemePreset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_default() {
        let registry = PresetRegistry::builtin();
        let keys: Vec<_> = registry.keys().collect();
        assert_eq!(keys, vec!["classic", "modern", "natural"]);
        assert_eq!(registry.default_key(), "classic");
    }

    #[test]
    fn test_builtin_classic_colors() {
        let registry = PresetRegistry::builtin();
        let classic = registry.get("classic").unwrap();
        let colors: Vec<_> = classic.colors.iter().collect();
        assert_eq!(
            colors,
            vec![
                ("primary", "#DE6005"),
                ("secondary", "#D97706"),
                ("accent", "#B26018")
            ]
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut registry = PresetRegistry::builtin();
        registry.insert(ThemePreset::new("modern", "Modern v2"));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("modern").unwrap().name, "Modern v2");
        let keys: Vec<_> = registry.keys().collect();
        assert_eq!(keys[1], "modern");
    }

    #[test]
    fn test_insert_appends_new_key() {
        let mut registry = PresetRegistry::builtin();
        registry.insert(ThemePreset::new("dusk", "Dusk"));
        assert_eq!(registry.keys().last(), Some("dusk"));
    }

    #[test]
    fn test_set_default_requires_registered_key() {
        let mut registry = PresetRegistry::builtin();
        assert!(!registry.set_default("ghost-theme"));
        assert_eq!(registry.default_key(), "classic");
        assert!(registry.set_default("natural"));
        assert_eq!(registry.default_key(), "natural");
    }

    #[test]
    fn test_default_survives_replacement() {
        let mut registry = PresetRegistry::with_default(ThemePreset::new("ink", "Ink"));
        registry.insert(ThemePreset::new("paper", "Paper"));
        registry.insert(ThemePreset::new("ink", "Ink v2"));

        assert_eq!(registry.default_key(), "ink");
        assert_eq!(registry.default_preset().name, "Ink v2");
        assert_eq!(registry.get_or_default("ghost-theme").key, "ink");
        assert_eq!(registry.get_or_default("paper").key, "paper");
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let preset = ThemePreset::new("  ", "Blank");
        assert!(matches!(
            preset.validate(),
            Err(ThemeError::InvalidPreset { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_named_color() {
        let preset = ThemePreset::new("warm", "Warm")
            .colors(Palette::new().with("primary", "orange"));
        let err = preset.validate().unwrap_err();
        assert!(err.to_string().contains("orange"));
    }

    #[test]
    fn test_palette_set_keeps_position() {
        let palette = Palette::new()
            .with("primary", "#111111")
            .with("accent", "#222222")
            .with("primary", "#333333");
        let names: Vec<_> = palette.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["primary", "accent"]);
        assert_eq!(palette.get("primary"), Some("#333333"));
    }

    #[test]
    fn test_palette_serde_preserves_order() {
        let palette = Palette::new()
            .with("secondary", "#D97706")
            .with("primary", "#DE6005");
        let json = serde_json::to_string(&palette).unwrap();
        assert_eq!(json, r##"{"secondary":"#D97706","primary":"#DE6005"}"##);

        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, palette);
    }
}
