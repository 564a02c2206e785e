use crate::color::Color;

/// Error returned when text cannot be turned into a color.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("unknown color name '{0}'")]
    UnknownName(String),

    #[error("malformed hex color '{0}'")]
    MalformedHex(String),

    #[error("malformed rgb text '{0}', expected three comma separated numbers")]
    MalformedRgb(String),
}

// CSS/X11 names that show up in strand configs. Lookups ignore case,
// whitespace and underscores.
#[allow(clippy::unreadable_literal)]
const NAMED_COLORS: &[(&str, u32)] = &[
    ("off", 0x000000),
    ("black", 0x000000),
    ("white", 0xFFFFFF),
    ("red", 0xFF0000),
    ("darkred", 0x8B0000),
    ("crimson", 0xDC143C),
    ("firebrick", 0xB22222),
    ("maroon", 0x800000),
    ("salmon", 0xFA8072),
    ("coral", 0xFF7F50),
    ("tomato", 0xFF6347),
    ("orangered", 0xFF4500),
    ("orange", 0xFFA500),
    ("darkorange", 0xFF8C00),
    ("amber", 0xFFBF00),
    ("gold", 0xFFD700),
    ("yellow", 0xFFFF00),
    ("lightyellow", 0xFFFFE0),
    ("khaki", 0xF0E68C),
    ("lime", 0x00FF00),
    ("green", 0x008000),
    ("darkgreen", 0x006400),
    ("forestgreen", 0x228B22),
    ("lightgreen", 0x90EE90),
    ("olive", 0x808000),
    ("chartreuse", 0x7FFF00),
    ("springgreen", 0x00FF7F),
    ("seagreen", 0x2E8B57),
    ("teal", 0x008080),
    ("cyan", 0x00FFFF),
    ("aqua", 0x00FFFF),
    ("turquoise", 0x40E0D0),
    ("lightblue", 0xADD8E6),
    ("skyblue", 0x87CEEB),
    ("deepskyblue", 0x00BFFF),
    ("dodgerblue", 0x1E90FF),
    ("royalblue", 0x4169E1),
    ("blue", 0x0000FF),
    ("mediumblue", 0x0000CD),
    ("darkblue", 0x00008B),
    ("navy", 0x000080),
    ("indigo", 0x4B0082),
    ("purple", 0x800080),
    ("violet", 0xEE82EE),
    ("magenta", 0xFF00FF),
    ("fuchsia", 0xFF00FF),
    ("orchid", 0xDA70D6),
    ("plum", 0xDDA0DD),
    ("lavender", 0xE6E6FA),
    ("pink", 0xFFC0CB),
    ("hotpink", 0xFF69B4),
    ("deeppink", 0xFF1493),
    ("brown", 0xA52A2A),
    ("chocolate", 0xD2691E),
    ("sienna", 0xA0522D),
    ("tan", 0xD2B48C),
    ("beige", 0xF5F5DC),
    ("ivory", 0xFFFFF0),
    ("silver", 0xC0C0C0),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("darkgray", 0xA9A9A9),
    ("darkgrey", 0xA9A9A9),
    ("lightgray", 0xD3D3D3),
    ("lightgrey", 0xD3D3D3),
    ("warmwhite", 0xFDF4DC),
];

fn parse_hex(digits: &str, original: &str) -> Result<Color, ColorError> {
    let malformed = || ColorError::MalformedHex(original.to_owned());
    // from_str_radix would also take a leading sign
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| malformed())?;
    match digits.len() {
        6 => Ok(Color::from_u32(value)),
        3 => {
            // #rgb -> #rrggbb
            let expand = |nibble: u32| (nibble << 4) | nibble;
            let r = expand((value >> 8) & 0xF);
            let g = expand((value >> 4) & 0xF);
            let b = expand(value & 0xF);
            Ok(Color::from_u32((r << 16) | (g << 8) | b))
        }
        _ => Err(malformed()),
    }
}

/// Parse a color name, `#rrggbb`, `#rgb` or `0xrrggbb`.
pub fn parse_color(text: &str) -> Result<Color, ColorError> {
    let trimmed = text.trim();
    if let Some(digits) = trimmed.strip_prefix('#') {
        return parse_hex(digits, trimmed);
    }
    if let Some(digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return parse_hex(digits, trimmed);
    }

    let key: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| Color::from_u32(*value))
        .ok_or_else(|| ColorError::UnknownName(trimmed.to_owned()))
}

/// Parse `"r,g,b"` text.
///
/// When every component lies within `0..=1` the values are treated as
/// fractions of full brightness, otherwise as `0..=255` channel values.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_rgb_text(text: &str) -> Result<Color, ColorError> {
    let malformed = || ColorError::MalformedRgb(text.to_owned());
    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;

    let [r, g, b] = values[..] else {
        return Err(malformed());
    };
    if [r, g, b].iter().any(|v| !v.is_finite()) {
        return Err(malformed());
    }

    let scale = if [r, g, b].iter().all(|v| (0.0..=1.0).contains(v)) {
        255.0
    } else {
        1.0
    };
    let channel = |v: f32| (v * scale).clamp(0.0, 255.0) as u8;

    Ok(Color::new(channel(r), channel(g), channel(b)))
}
