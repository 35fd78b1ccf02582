//! Color parsing and text width helpers.

/// Parses a CSS hex color (`#RGB` or `#RRGGBB`) into an RGB triplet.
///
/// # Example
///
/// ```rust
/// use hearth::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#DE6005"), Some((0xDE, 0x60, 0x05)));
/// assert_eq!(parse_hex_color("#fff"), Some((255, 255, 255)));
/// assert_eq!(parse_hex_color("orange"), None);
/// ```
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).unwrap_or(0) as u8 * 17);
            Some((digits.next()?, digits.next()?, digits.next()?))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
///
/// Grays map onto the 24-step gray ramp, everything else onto the 6x6x6 cube.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

/// Pads a string with trailing spaces up to a display width.
///
/// Width is measured in terminal columns, so CJK preset names line up with
/// ASCII ones. Strings already at or past `width` are returned unchanged.
pub fn pad_to_width(s: &str, width: usize) -> String {
    use unicode_width::UnicodeWidthStr;

    let current = s.width();
    if current >= width {
        return s.to_string();
    }
    let mut padded = String::with_capacity(s.len() + width - current);
    padded.push_str(s);
    padded.extend(std::iter::repeat(' ').take(width - current));
    padded
}
