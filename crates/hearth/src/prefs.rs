//! Preference values: the live state, the persisted overrides, and the
//! system-detected defaults.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::preset::DEFAULT_THEME;
use crate::store::PreferenceStore;

/// Storage prefix used when none is configured.
pub const DEFAULT_STORAGE_PREFIX: &str = "baking";

/// One of the four independently stored preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceField {
    Theme,
    DarkMode,
    HighContrast,
    ReducedMotion,
}

impl PreferenceField {
    pub const ALL: [PreferenceField; 4] = [
        PreferenceField::Theme,
        PreferenceField::DarkMode,
        PreferenceField::HighContrast,
        PreferenceField::ReducedMotion,
    ];

    /// Suffix appended to the storage prefix to form this field's key.
    pub fn key_suffix(self) -> &'static str {
        match self {
            PreferenceField::Theme => "theme",
            PreferenceField::DarkMode => "dark-mode",
            PreferenceField::HighContrast => "high-contrast",
            PreferenceField::ReducedMotion => "reduced-motion",
        }
    }
}

impl fmt::Display for PreferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_suffix())
    }
}

/// The fixed storage keys for each preference, namespaced by a prefix.
///
/// With the default prefix the keys are `baking-theme`, `baking-dark-mode`,
/// `baking-high-contrast` and `baking-reduced-motion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key(&self, field: PreferenceField) -> String {
        format!("{}-{}", self.prefix, field.key_suffix())
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_STORAGE_PREFIX)
    }
}

/// The effective, fully resolved preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceState {
    pub theme: String,
    pub dark_mode: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

impl PreferenceState {
    pub fn flag(&self, field: PreferenceField) -> Option<bool> {
        match field {
            PreferenceField::Theme => None,
            PreferenceField::DarkMode => Some(self.dark_mode),
            PreferenceField::HighContrast => Some(self.high_contrast),
            PreferenceField::ReducedMotion => Some(self.reduced_motion),
        }
    }
}

impl Default for PreferenceState {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            dark_mode: false,
            high_contrast: false,
            reduced_motion: false,
        }
    }
}

/// Host-reported display preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPreferences {
    pub dark_mode: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

/// A single host preference that changed after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemChange {
    DarkMode(bool),
    HighContrast(bool),
    ReducedMotion(bool),
}

impl SystemChange {
    pub fn field(self) -> PreferenceField {
        match self {
            SystemChange::DarkMode(_) => PreferenceField::DarkMode,
            SystemChange::HighContrast(_) => PreferenceField::HighContrast,
            SystemChange::ReducedMotion(_) => PreferenceField::ReducedMotion,
        }
    }

    pub fn value(self) -> bool {
        match self {
            SystemChange::DarkMode(v)
            | SystemChange::HighContrast(v)
            | SystemChange::ReducedMotion(v) => v,
        }
    }

    /// Folds the change into a set of detected preferences.
    pub fn apply_to(self, detected: &mut SystemPreferences) {
        match self {
            SystemChange::DarkMode(v) => detected.dark_mode = v,
            SystemChange::HighContrast(v) => detected.high_contrast = v,
            SystemChange::ReducedMotion(v) => detected.reduced_motion = v,
        }
    }

    /// Sets the matching flag on a resolved state. The theme is untouched.
    pub fn apply_to_state(self, state: &mut PreferenceState) {
        match self {
            SystemChange::DarkMode(v) => state.dark_mode = v,
            SystemChange::HighContrast(v) => state.high_contrast = v,
            SystemChange::ReducedMotion(v) => state.reduced_motion = v,
        }
    }
}

/// The user's explicit overrides as held in storage.
///
/// `None` means the user never set the field and the detected system value
/// applies. `Some` is an override and wins over detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedRecord {
    pub theme: Option<String>,
    pub dark_mode: Option<bool>,
    pub high_contrast: Option<bool>,
    pub reduced_motion: Option<bool>,
}

impl PersistedRecord {
    /// Reads every field from the store. Missing keys stay `None`.
    ///
    /// Boolean entries decode as `true` only for the exact string `"true"`;
    /// any other present value is an explicit `false`.
    pub fn load<S: PreferenceStore + ?Sized>(store: &S, keys: &StorageKeys) -> Self {
        let flag = |field| store.load(&keys.key(field)).map(|v| v == "true");
        let record = Self {
            theme: store.load(&keys.key(PreferenceField::Theme)),
            dark_mode: flag(PreferenceField::DarkMode),
            high_contrast: flag(PreferenceField::HighContrast),
            reduced_motion: flag(PreferenceField::ReducedMotion),
        };
        debug!(prefix = keys.prefix(), ?record, "loaded persisted preferences");
        record
    }

    /// Writes every present field to the store.
    ///
    /// Returns `false` if any write failed; the failure has already been
    /// logged by the store and the remaining fields are still attempted.
    pub fn save<S: PreferenceStore + ?Sized>(&self, store: &mut S, keys: &StorageKeys) -> bool {
        let mut ok = true;
        if let Some(theme) = &self.theme {
            ok &= store.save(&keys.key(PreferenceField::Theme), theme);
        }
        let flags = [
            (PreferenceField::DarkMode, self.dark_mode),
            (PreferenceField::HighContrast, self.high_contrast),
            (PreferenceField::ReducedMotion, self.reduced_motion),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                ok &= store.save(&keys.key(field), if value { "true" } else { "false" });
            }
        }
        ok
    }

    /// Whether the user has overridden `field`.
    pub fn is_overridden(&self, field: PreferenceField) -> bool {
        match field {
            PreferenceField::Theme => self.theme.is_some(),
            PreferenceField::DarkMode => self.dark_mode.is_some(),
            PreferenceField::HighContrast => self.high_contrast.is_some(),
            PreferenceField::ReducedMotion => self.reduced_motion.is_some(),
        }
    }
}

impl From<&PreferenceState> for PersistedRecord {
    fn from(state: &PreferenceState) -> Self {
        Self {
            theme: Some(state.theme.clone()),
            dark_mode: Some(state.dark_mode),
            high_contrast: Some(state.high_contrast),
            reduced_motion: Some(state.reduced_motion),
        }
    }
}
