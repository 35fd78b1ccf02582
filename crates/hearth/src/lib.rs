//! # Hearth - theme presets and display preferences
//!
//! Hearth keeps one session's display preferences: which theme preset is
//! active, and whether dark mode, high contrast and reduced motion are on.
//!
//! ## Resolution
//!
//! Preferences come from three places:
//!
//! 1. **Stored overrides**: values the user set explicitly, read from a
//!    [`PreferenceStore`] under fixed keys (`baking-theme`,
//!    `baking-dark-mode`, ...). An absent key means "not overridden".
//! 2. **Detected host preferences**: queried once from a
//!    [`SystemDetector`] when the manager is built.
//! 3. **Built-in defaults**: the `classic` preset.
//!
//! Each field is resolved on its own. An override always wins over
//! detection, even when the host setting changes later; a field without an
//! override follows the host. A stored theme key that no longer names a
//! registered preset is dropped in favor of the default.
//!
//! ## Example
//!
//! ```rust
//! use hearth::{
//!     FixedDetector, MemoryStore, Stylesheet, SystemChange, SystemPreferences, ThemeConfig,
//!     ThemeManager,
//! };
//!
//! let store = MemoryStore::new().with_entry("baking-dark-mode", "false");
//! let detector = FixedDetector(SystemPreferences { dark_mode: true, ..Default::default() });
//! let mut manager =
//!     ThemeManager::new(ThemeConfig::new(), store, &detector, Stylesheet::new().unwrap()).unwrap();
//!
//! // The stored "false" is an explicit choice and beats the host.
//! assert!(!manager.state().dark_mode);
//!
//! // Contrast has no override, so host changes are followed.
//! assert!(manager.handle_system_change(SystemChange::HighContrast(true)));
//! assert!(manager.target().css().contains("high-contrast"));
//! ```
//!
//! ## Modules
//!
//! - [`preset`]: [`ThemePreset`], [`Palette`] and the [`PresetRegistry`]
//! - [`prefs`]: the state, override record and storage key types
//! - [`store`]: [`PreferenceStore`] with memory and JSON file backends
//! - [`detect`]: [`SystemDetector`] and the OS detector
//! - [`mod@resolve`]: the per-field merge
//! - [`mod@apply`]: presentation output and [`ThemeTarget`] sinks
//! - [`manager`]: [`ThemeManager`], mutators and subscriptions
//! - [`config`]: [`ThemeConfig`] and the [`ThemeExport`] document

pub mod apply;
pub mod config;
pub mod detect;
pub mod error;
pub mod manager;
pub mod prefs;
pub mod preset;
pub mod preview;
pub mod resolve;
pub mod store;
mod util;

pub use apply::{
    apply, color_variable, theme_flag, AppliedTheme, Document, Stylesheet, ThemeTarget,
    ThemeVariable, DARK_MODE_FLAG, HIGH_CONTRAST_FLAG, REDUCED_MOTION_FLAG,
};
pub use config::{ExportedPreferences, ThemeConfig, ThemeExport};
pub use detect::{
    accessibility_from_env, FixedDetector, OsDetector, SystemDetector, CONTRAST_ENV,
    REDUCED_MOTION_ENV,
};
pub use error::{StoreError, ThemeError};
pub use manager::{SubscriptionId, ThemeChangeEvent, ThemeInfo, ThemeManager};
pub use prefs::{
    PersistedRecord, PreferenceField, PreferenceState, StorageKeys, SystemChange,
    SystemPreferences, DEFAULT_STORAGE_PREFIX,
};
pub use preset::{Palette, PresetRegistry, ThemePreset, DEFAULT_THEME};
pub use preview::{preview_registry, swatches};
pub use resolve::{discard_unregistered_theme, resolve};
pub use store::{FileStore, MemoryStore, PreferenceStore};
pub use util::{pad_to_width, parse_hex_color, rgb_to_ansi256};
