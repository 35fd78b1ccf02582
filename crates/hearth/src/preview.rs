//! Terminal previews of presets.

use console::Style;

use crate::preset::{PresetRegistry, ThemePreset};
use crate::util::{pad_to_width, parse_hex_color, rgb_to_ansi256};

/// Renders a block of colored cells for every palette entry.
///
/// Colors that do not parse are shown as `?`. With `use_color` off the
/// cells are plain text, which keeps output stable for pipes and tests.
pub fn swatches(preset: &ThemePreset, use_color: bool) -> String {
    preset
        .colors
        .iter()
        .map(|(_, value)| match parse_hex_color(value) {
            Some(rgb) => Style::new()
                .on_color256(rgb_to_ansi256(rgb))
                .force_styling(use_color)
                .apply_to("  ")
                .to_string(),
            None => "? ".to_string(),
        })
        .collect()
}

/// Renders one line per preset: marker, key, display name, swatches and
/// description.
///
/// Keys and names are padded by display width so wide characters align.
///
/// # Example
///
/// ```rust
/// use hearth::{preview_registry, PresetRegistry};
///
/// let text = preview_registry(&PresetRegistry::builtin(), "modern", false);
/// let lines: Vec<_> = text.lines().collect();
/// assert_eq!(lines.len(), 3);
/// assert!(lines[1].starts_with("* modern"));
/// ```
pub fn preview_registry(registry: &PresetRegistry, active: &str, use_color: bool) -> String {
    use unicode_width::UnicodeWidthStr;

    let key_width = registry.keys().map(|k| k.width()).max().unwrap_or(0);
    let name_width = registry.iter().map(|p| p.name.width()).max().unwrap_or(0);
    let highlight = Style::new().bold().force_styling(use_color);
    let muted = Style::new().dim().force_styling(use_color);

    let mut out = String::new();
    for preset in registry.iter() {
        let marker = if preset.key == active { "*" } else { " " };
        let key = pad_to_width(&preset.key, key_width);
        let key = if preset.key == active {
            highlight.apply_to(key).to_string()
        } else {
            key
        };
        out.push_str(&format!(
            "{} {}  {}  {} {}\n",
            marker,
            key,
            pad_to_width(&preset.name, name_width),
            swatches(preset, use_color),
            muted.apply_to(&preset.description),
        ));
    }
    out
}
