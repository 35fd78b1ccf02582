//! Turning resolved preferences into presentation output.
//!
//! [`apply`] is a pure function from a [`PreferenceState`] to an
//! [`AppliedTheme`]: a set of named on/off flags and a list of color
//! variables. A [`ThemeTarget`] writes that onto something visible.
//! Targets replace what they wrote last time, so applying the same state
//! twice leaves the same result.

use std::collections::BTreeMap;

use minijinja::{context, Environment, Error};
use serde::Serialize;
use tracing::warn;

use crate::preset::PresetRegistry;
use crate::prefs::PreferenceState;

/// Flag set while dark mode is on.
pub const DARK_MODE_FLAG: &str = "dark-mode";
/// Flag set while high contrast is on.
pub const HIGH_CONTRAST_FLAG: &str = "high-contrast";
/// Flag set while reduced motion is on.
pub const REDUCED_MOTION_FLAG: &str = "reduced-motion";

/// Name of the flag marking `key` as the active theme.
pub fn theme_flag(key: &str) -> String {
    format!("theme-{}", key)
}

/// Name of the variable carrying palette color `name`.
pub fn color_variable(name: &str) -> String {
    format!("--theme-{}", name)
}

/// A color variable and its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeVariable {
    pub name: String,
    pub value: String,
}

/// Presentation output for one preference state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedTheme {
    /// Every flag a target should know about, on or off. Includes one
    /// `theme-<key>` flag per registered preset.
    pub flags: BTreeMap<String, bool>,
    /// Color variables of the active preset, in palette order.
    pub variables: Vec<ThemeVariable>,
}

impl AppliedTheme {
    /// The flags that are on, in name order.
    pub fn active_flags(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
    }

    pub fn is_set(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }
}

/// Maps a state onto flags and color variables.
pub fn apply(state: &PreferenceState, registry: &PresetRegistry) -> AppliedTheme {
    let mut flags = BTreeMap::new();
    for key in registry.keys() {
        flags.insert(theme_flag(key), key == state.theme);
    }
    flags.insert(DARK_MODE_FLAG.to_string(), state.dark_mode);
    flags.insert(HIGH_CONTRAST_FLAG.to_string(), state.high_contrast);
    flags.insert(REDUCED_MOTION_FLAG.to_string(), state.reduced_motion);

    let variables = registry
        .get(&state.theme)
        .map(|preset| {
            preset
                .colors
                .iter()
                .map(|(name, value)| ThemeVariable {
                    name: color_variable(name),
                    value: value.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    AppliedTheme { flags, variables }
}

/// Something that displays an [`AppliedTheme`].
pub trait ThemeTarget {
    fn apply(&mut self, applied: &AppliedTheme);
}

impl<T: ThemeTarget + ?Sized> ThemeTarget for Box<T> {
    fn apply(&mut self, applied: &AppliedTheme) {
        (**self).apply(applied)
    }
}

/// An in-memory document root: a class list plus style properties.
///
/// Classes and properties the theme does not manage are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    classes: Vec<String>,
    properties: BTreeMap<String, String>,
    managed_properties: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }
}

impl ThemeTarget for Document {
    fn apply(&mut self, applied: &AppliedTheme) {
        for (flag, on) in &applied.flags {
            if *on {
                self.add_class(flag);
            } else {
                self.remove_class(flag);
            }
        }

        for stale in std::mem::take(&mut self.managed_properties) {
            self.properties.remove(&stale);
        }
        for var in &applied.variables {
            self.properties.insert(var.name.clone(), var.value.clone());
            self.managed_properties.push(var.name.clone());
        }
    }
}

const STYLESHEET_TEMPLATE: &str = r#"/* classes: {{ classes | join(" ") }} */
:root {
{%- for var in variables %}
  {{ var.name }}: {{ var.value }};
{%- endfor %}
}
"#;

/// Renders the applied theme as a CSS block.
///
/// Each apply replaces the previous output.
///
/// # Example
///
/// ```rust
/// use hearth::{apply, PreferenceState, PresetRegistry, Stylesheet, ThemeTarget};
///
/// let registry = PresetRegistry::builtin();
/// let mut sheet = Stylesheet::new().unwrap();
/// sheet.apply(&apply(&PreferenceState::default(), &registry));
///
/// assert!(sheet.css().contains("--theme-primary: #DE6005;"));
/// ```
pub struct Stylesheet {
    env: Environment<'static>,
    css: String,
}

impl Stylesheet {
    /// Creates a stylesheet renderer with the built-in template.
    pub fn new() -> Result<Self, Error> {
        Self::with_template(STYLESHEET_TEMPLATE)
    }

    /// Creates a stylesheet renderer with a custom template.
    ///
    /// The template sees `classes` (active flag names), `variables`
    /// (objects with `name` and `value`) and `flags` (every flag).
    pub fn with_template(source: &str) -> Result<Self, Error> {
        let mut env = Environment::new();
        env.add_template_owned("stylesheet.css", source.to_string())?;
        Ok(Self {
            env,
            css: String::new(),
        })
    }

    /// The most recently rendered CSS.
    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn render(&self, applied: &AppliedTheme) -> Result<String, Error> {
        let classes: Vec<&str> = applied.active_flags().collect();
        self.env.get_template("stylesheet.css")?.render(context! {
            classes => classes,
            variables => &applied.variables,
            flags => &applied.flags,
        })
    }
}

impl ThemeTarget for Stylesheet {
    fn apply(&mut self, applied: &AppliedTheme) {
        match self.render(applied) {
            Ok(css) => self.css = css,
            Err(e) => warn!(error = %e, "stylesheet render failed; keeping previous output"),
        }
    }
}

impl std::fmt::Debug for Stylesheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stylesheet").field("css", &self.css).finish()
    }
}
