//! The owned preference state object.
//!
//! A [`ThemeManager`] is built once per session: it loads the persisted
//! overrides, asks the detector for host preferences, resolves the two
//! against the preset registry and applies the result to its target. After
//! that, state only changes through the mutators. Each successful mutation
//! persists the full record, re-applies, and notifies subscribers.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use hearth::{Document, FixedDetector, MemoryStore, SystemPreferences, ThemeConfig, ThemeManager};
//!
//! let detector = FixedDetector(SystemPreferences { dark_mode: true, ..Default::default() });
//! let mut manager =
//!     ThemeManager::new(ThemeConfig::new(), MemoryStore::new(), &detector, Document::new()).unwrap();
//! assert!(manager.state().dark_mode);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! manager.subscribe(move |event| sink.borrow_mut().push(event.theme.clone()));
//!
//! manager.set_theme("modern").unwrap();
//! assert_eq!(*seen.borrow(), vec!["modern".to_string()]);
//! assert!(manager.target().has_class("theme-modern"));
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::apply::{apply, AppliedTheme, ThemeTarget};
use crate::config::{ThemeConfig, ThemeExport};
use crate::detect::SystemDetector;
use crate::error::ThemeError;
use crate::preset::{PresetRegistry, ThemePreset};
use crate::prefs::{
    PersistedRecord, PreferenceState, StorageKeys, SystemChange, SystemPreferences,
};
use crate::resolve::{discard_unregistered_theme, resolve};
use crate::store::PreferenceStore;

/// Snapshot broadcast to subscribers after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeChangeEvent {
    pub theme: String,
    pub is_dark_mode: bool,
    pub is_high_contrast: bool,
    pub is_reduced_motion: bool,
}

impl From<&PreferenceState> for ThemeChangeEvent {
    fn from(state: &PreferenceState) -> Self {
        Self {
            theme: state.theme.clone(),
            is_dark_mode: state.dark_mode,
            is_high_contrast: state.high_contrast,
            is_reduced_motion: state.reduced_motion,
        }
    }
}

/// Handle returned by [`ThemeManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ThemeChangeEvent)>;

/// The active theme together with its preset and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeInfo<'a> {
    pub key: &'a str,
    pub preset: &'a ThemePreset,
    pub is_dark_mode: bool,
    pub is_high_contrast: bool,
    pub is_reduced_motion: bool,
}

/// Owns the live preference state, its storage and its presentation.
pub struct ThemeManager<S, T> {
    store: S,
    target: T,
    keys: StorageKeys,
    registry: PresetRegistry,
    overrides: PersistedRecord,
    detected: SystemPreferences,
    state: PreferenceState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: PreferenceStore, T: ThemeTarget> ThemeManager<S, T> {
    /// Loads, detects, resolves and applies.
    ///
    /// # Errors
    ///
    /// Fails only when `config` describes an invalid registry; storage and
    /// detection problems fall back to defaults.
    pub fn new(
        config: ThemeConfig,
        store: S,
        detector: &dyn SystemDetector,
        target: T,
    ) -> Result<Self, ThemeError> {
        let registry = config.registry()?;
        let keys = config.keys();
        let mut overrides = PersistedRecord::load(&store, &keys);
        discard_unregistered_theme(&mut overrides, &registry);
        let detected = detector.detect();
        let state = resolve(&overrides, &detected, &registry);
        info!(theme = %state.theme, dark_mode = state.dark_mode, "theme manager initialized");

        let mut manager = Self {
            store,
            target,
            keys,
            registry,
            overrides,
            detected,
            state,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        manager.render();
        Ok(manager)
    }

    pub fn state(&self) -> &PreferenceState {
        &self.state
    }

    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    /// The overrides recorded for this session.
    pub fn overrides(&self) -> &PersistedRecord {
        &self.overrides
    }

    pub fn detected(&self) -> SystemPreferences {
        self.detected
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The presentation output for the current state.
    pub fn applied(&self) -> AppliedTheme {
        apply(&self.state, &self.registry)
    }

    /// The active theme and flags.
    pub fn current(&self) -> ThemeInfo<'_> {
        ThemeInfo {
            key: &self.state.theme,
            preset: self.registry.get_or_default(&self.state.theme),
            is_dark_mode: self.state.dark_mode,
            is_high_contrast: self.state.high_contrast,
            is_reduced_motion: self.state.reduced_motion,
        }
    }

    /// Registers a callback for change events.
    pub fn subscribe(&mut self, listener: impl FnMut(&ThemeChangeEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Switches the active theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownTheme`] if `key` is not registered. State
    /// and storage are untouched in that case.
    pub fn set_theme(&mut self, key: &str) -> Result<(), ThemeError> {
        if !self.registry.contains(key) {
            return Err(ThemeError::UnknownTheme {
                key: key.to_string(),
            });
        }
        self.state.theme = key.to_string();
        self.commit();
        Ok(())
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.state.dark_mode = !self.state.dark_mode;
        self.commit();
        self.state.dark_mode
    }

    pub fn toggle_high_contrast(&mut self) -> bool {
        self.state.high_contrast = !self.state.high_contrast;
        self.commit();
        self.state.high_contrast
    }

    pub fn toggle_reduced_motion(&mut self) -> bool {
        self.state.reduced_motion = !self.state.reduced_motion;
        self.commit();
        self.state.reduced_motion
    }

    /// Restores the default theme with every flag off, as an override.
    pub fn reset_to_defaults(&mut self) {
        self.state = PreferenceState {
            theme: self.registry.default_key().to_string(),
            dark_mode: false,
            high_contrast: false,
            reduced_motion: false,
        };
        self.commit();
    }

    /// Folds in a host preference change.
    ///
    /// Ignored when the user has overridden the field. Otherwise the state
    /// follows the host, and a change is applied and broadcast. Returns
    /// whether the state changed.
    pub fn handle_system_change(&mut self, change: SystemChange) -> bool {
        change.apply_to(&mut self.detected);
        if self.overrides.is_overridden(change.field()) {
            debug!(field = %change.field(), "system change ignored; user override in place");
            return false;
        }

        let mut next = self.state.clone();
        change.apply_to_state(&mut next);
        if next == self.state {
            return false;
        }
        self.state = next;
        self.refresh();
        true
    }

    /// Registers a custom preset. The active theme does not change.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidPreset`] if the preset fails validation.
    pub fn add_custom_theme(&mut self, preset: ThemePreset) -> Result<(), ThemeError> {
        preset.validate()?;
        debug!(key = %preset.key, "registering custom theme");
        let replaces_active = preset.key == self.state.theme;
        self.registry.insert(preset);
        if replaces_active {
            self.render();
        }
        Ok(())
    }

    pub fn export_config(&self) -> ThemeExport {
        ThemeExport::capture(&self.registry, &self.state)
    }

    /// Merges an exported configuration into this session.
    ///
    /// All presets are validated before any is registered. The theme
    /// switches only if `currentTheme` is registered afterwards; flags are
    /// replaced when `preferences` is present.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidPreset`] and changes nothing if any
    /// preset is invalid.
    pub fn import_config(&mut self, config: ThemeExport) -> Result<(), ThemeError> {
        for preset in &config.themes {
            preset.validate()?;
        }
        for preset in config.themes {
            self.registry.insert(preset);
        }

        if let Some(key) = config.current_theme {
            if self.registry.contains(&key) {
                self.state.theme = key;
            } else {
                debug!(key = %key, "imported theme is not registered; keeping current");
            }
        }
        if let Some(prefs) = config.preferences {
            self.state.dark_mode = prefs.is_dark_mode;
            self.state.high_contrast = prefs.is_high_contrast;
            self.state.reduced_motion = prefs.is_reduced_motion;
        }

        self.commit();
        Ok(())
    }

    /// Records the current state as the user's overrides, persists it and
    /// refreshes.
    fn commit(&mut self) {
        self.overrides = PersistedRecord::from(&self.state);
        if !self.overrides.save(&mut self.store, &self.keys) {
            debug!("preferences are session-only until storage accepts writes");
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.render();
        let event = ThemeChangeEvent::from(&self.state);
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    fn render(&mut self) {
        let applied = apply(&self.state, &self.registry);
        self.target.apply(&applied);
    }
}

impl<S, T> std::fmt::Debug for ThemeManager<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeManager")
            .field("state", &self.state)
            .field("overrides", &self.overrides)
            .field("detected", &self.detected)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
