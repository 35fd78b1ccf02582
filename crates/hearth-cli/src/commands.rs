//! Command execution against a preference manager.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hearth::{
    preview_registry, PreferenceField, PreferenceStore, Stylesheet, ThemeExport, ThemeManager,
};

use crate::cli::{Command, Flag, Format};

/// Runs one command and returns the text to print.
pub fn execute<S: PreferenceStore>(
    manager: &mut ThemeManager<S, Stylesheet>,
    command: &Command,
    use_color: bool,
) -> Result<String> {
    match command {
        Command::Show => Ok(show(manager)),
        Command::List => Ok(preview_registry(
            manager.registry(),
            &manager.state().theme,
            use_color,
        )),
        Command::Set { key } => {
            manager.set_theme(key)?;
            Ok(format!("theme: {}\n", key))
        }
        Command::Toggle { flag } => {
            let (label, on) = match flag {
                Flag::Dark => ("dark mode", manager.toggle_dark_mode()),
                Flag::Contrast => ("high contrast", manager.toggle_high_contrast()),
                Flag::Motion => ("reduced motion", manager.toggle_reduced_motion()),
            };
            Ok(format!("{}: {}\n", label, on_off(on)))
        }
        Command::Reset => {
            manager.reset_to_defaults();
            Ok(show(manager))
        }
        Command::Css => Ok(format!("{}\n", manager.target().css())),
        Command::Export { format } => {
            let export = manager.export_config();
            let text = match format {
                Format::Json => format!("{}\n", export.to_json()?),
                Format::Yaml => export.to_yaml()?,
            };
            Ok(text)
        }
        Command::Import { file } => {
            let export = read_export(file)?;
            manager.import_config(export)?;
            Ok(show(manager))
        }
    }
}

fn read_export(path: &Path) -> Result<ThemeExport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let export = if is_yaml {
        ThemeExport::from_yaml(&text)
    } else {
        ThemeExport::from_json(&text)
    };
    export.with_context(|| format!("parsing {}", path.display()))
}

fn show<S: PreferenceStore>(manager: &ThemeManager<S, Stylesheet>) -> String {
    let state = manager.state();
    let overrides = manager.overrides();
    let source = |field| {
        if overrides.is_overridden(field) {
            "set"
        } else {
            "system"
        }
    };
    let preset = manager.current().preset;
    let name = &preset.name;

    format!(
        "theme: {} ({})\ndark mode: {} ({})\nhigh contrast: {} ({})\nreduced motion: {} ({})\n",
        state.theme,
        name,
        on_off(state.dark_mode),
        source(PreferenceField::DarkMode),
        on_off(state.high_contrast),
        source(PreferenceField::HighContrast),
        on_off(state.reduced_motion),
        source(PreferenceField::ReducedMotion),
    )
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
