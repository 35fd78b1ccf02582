//! Merging stored overrides with detected preferences.

use tracing::debug;

use crate::preset::PresetRegistry;
use crate::prefs::{PersistedRecord, PreferenceState, SystemPreferences};

/// Computes the effective preferences.
///
/// The theme is the stored key when it names a registered preset and the
/// registry default otherwise. Each boolean independently takes the stored
/// override when one exists and the detected value when not, so an explicit
/// user choice outlives any change in the host setting.
///
/// # Example
///
/// ```rust
/// use hearth::{resolve, PersistedRecord, PresetRegistry, SystemPreferences};
///
/// let stored = PersistedRecord {
///     theme: Some("modern".into()),
///     dark_mode: Some(false),
///     ..Default::default()
/// };
/// let detected = SystemPreferences { dark_mode: true, high_contrast: true, reduced_motion: false };
///
/// let state = resolve(&stored, &detected, &PresetRegistry::builtin());
/// assert_eq!(state.theme, "modern");
/// assert!(!state.dark_mode);
/// assert!(state.high_contrast);
/// ```
pub fn resolve(
    stored: &PersistedRecord,
    detected: &SystemPreferences,
    registry: &PresetRegistry,
) -> PreferenceState {
    let theme = match stored.theme.as_deref() {
        Some(key) if registry.contains(key) => key.to_string(),
        Some(key) => {
            debug!(key, fallback = registry.default_key(), "discarding unregistered stored theme");
            registry.default_key().to_string()
        }
        None => registry.default_key().to_string(),
    };

    PreferenceState {
        theme,
        dark_mode: stored.dark_mode.unwrap_or(detected.dark_mode),
        high_contrast: stored.high_contrast.unwrap_or(detected.high_contrast),
        reduced_motion: stored.reduced_motion.unwrap_or(detected.reduced_motion),
    }
}

/// Clears a stored theme key that names no registered preset.
///
/// A stale key must not become a live override if a preset with that key
/// is registered later. Returns whether the key was cleared.
pub fn discard_unregistered_theme(stored: &mut PersistedRecord, registry: &PresetRegistry) -> bool {
    match stored.theme.as_deref() {
        Some(key) if !registry.contains(key) => {
            debug!(key, "clearing unregistered stored theme");
            stored.theme = None;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::ThemePreset;
    use proptest::prelude::*;

    fn two_presets() -> PresetRegistry {
        let mut registry = PresetRegistry::with_default(ThemePreset::new("classic", "Classic"));
        registry.insert(ThemePreset::new("modern", "Modern"));
        registry
    }

    #[test]
    fn test_stored_theme_with_detected_dark_mode() {
        let stored = PersistedRecord {
            theme: Some("modern".to_string()),
            ..Default::default()
        };
        let detected = SystemPreferences {
            dark_mode: true,
            high_contrast: false,
            reduced_motion: false,
        };

        let state = resolve(&stored, &detected, &two_presets());
        assert_eq!(
            state,
            PreferenceState {
                theme: "modern".to_string(),
                dark_mode: true,
                high_contrast: false,
                reduced_motion: false,
            }
        );
    }

    #[test]
    fn test_unregistered_theme_falls_back() {
        let stored = PersistedRecord {
            theme: Some("ghost-theme".to_string()),
            ..Default::default()
        };
        let state = resolve(&stored, &SystemPreferences::default(), &two_presets());
        assert_eq!(state.theme, "classic");
    }

    #[test]
    fn test_discard_unregistered_theme_clears_only_ghosts() {
        let registry = two_presets();
        let mut ghost = PersistedRecord {
            theme: Some("ghost-theme".to_string()),
            dark_mode: Some(true),
            ..Default::default()
        };
        assert!(discard_unregistered_theme(&mut ghost, &registry));
        assert_eq!(ghost.theme, None);
        assert_eq!(ghost.dark_mode, Some(true));

        let mut known = PersistedRecord {
            theme: Some("modern".to_string()),
            ..Default::default()
        };
        assert!(!discard_unregistered_theme(&mut known, &registry));
        assert_eq!(known.theme.as_deref(), Some("modern"));
    }

    #[test]
    fn test_missing_theme_uses_registry_default() {
        let mut registry = two_presets();
        registry.set_default("modern");
        let state = resolve(
            &PersistedRecord::default(),
            &SystemPreferences::default(),
            &registry,
        );
        assert_eq!(state.theme, "modern");
    }

    #[test]
    fn test_explicit_false_beats_detected_true() {
        let stored = PersistedRecord {
            dark_mode: Some(false),
            ..Default::default()
        };
        let detected = SystemPreferences {
            dark_mode: true,
            ..Default::default()
        };
        let state = resolve(&stored, &detected, &two_presets());
        assert!(!state.dark_mode);
    }

    fn arb_override() -> impl Strategy<Value = Option<bool>> {
        prop_oneof![Just(None), Just(Some(false)), Just(Some(true))]
    }

    proptest! {
        #[test]
        fn prop_each_flag_follows_override_else_detection(
            dark in arb_override(),
            contrast in arb_override(),
            motion in arb_override(),
            sys_dark in any::<bool>(),
            sys_contrast in any::<bool>(),
            sys_motion in any::<bool>(),
        ) {
            let stored = PersistedRecord {
                theme: None,
                dark_mode: dark,
                high_contrast: contrast,
                reduced_motion: motion,
            };
            let detected = SystemPreferences {
                dark_mode: sys_dark,
                high_contrast: sys_contrast,
                reduced_motion: sys_motion,
            };
            let state = resolve(&stored, &detected, &two_presets());

            prop_assert_eq!(state.dark_mode, dark.unwrap_or(sys_dark));
            prop_assert_eq!(state.high_contrast, contrast.unwrap_or(sys_contrast));
            prop_assert_eq!(state.reduced_motion, motion.unwrap_or(sys_motion));
        }

        #[test]
        fn prop_theme_always_registered(key in "[a-z-]{0,12}") {
            let stored = PersistedRecord { theme: Some(key), ..Default::default() };
            let registry = two_presets();
            let state = resolve(&stored, &SystemPreferences::default(), &registry);
            prop_assert!(registry.contains(&state.theme));
        }
    }
}
