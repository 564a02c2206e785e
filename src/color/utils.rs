use fastrand::Rng;

use crate::color::Color;

/// A palette entry: a base color plus optional per-channel jitter fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteColor {
    pub color: Color,
    /// `[r, g, b]` fractions of the full channel range (0..1)
    pub variation: Option<[f32; 3]>,
}

impl PaletteColor {
    pub const fn solid(color: Color) -> Self {
        Self {
            color,
            variation: None,
        }
    }
}

/// Clamp a fraction into `0..=1`, mapping NaN to 0.
#[inline]
fn unit(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Linear interpolation between two colors
///
/// `amount_of_b` is clamped to `0..=1`; each channel is truncated towards
/// zero, so `0` returns `a` and `1` returns `b` exactly.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend(a: Color, b: Color, amount_of_b: f32) -> Color {
    let t = unit(amount_of_b);
    let mix = |from: u8, to: u8| (f32::from(from) * (1.0 - t) + f32::from(to) * t) as u8;

    Color::rgbw(
        mix(a.r(), b.r()),
        mix(a.g(), b.g()),
        mix(a.b(), b.b()),
        mix(a.w(), b.w()),
    )
}

/// Map a position on the color wheel (taken modulo 256) to a fully
/// saturated color.
///
/// The wheel is split into three 85-step arcs: red→green, green→blue and
/// blue→red, each a pair of linear ramps.
#[allow(clippy::cast_possible_truncation)]
pub const fn hue_wheel(position: u32) -> Color {
    let pos = (position & 0xFF) as u8;
    if pos < 85 {
        Color::new(pos * 3, 255 - pos * 3, 0)
    } else if pos < 170 {
        let pos = pos - 85;
        Color::new(255 - pos * 3, 0, pos * 3)
    } else {
        let pos = pos - 170;
        Color::new(0, pos * 3, 255 - pos * 3)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn jitter_channel(channel: u8, fraction: f32, rng: &mut Rng) -> u8 {
    let spread = unit(fraction) * 255.0;
    if spread <= 0.0 {
        return channel;
    }
    let offset = (rng.f32() * 2.0 - 1.0) * spread;
    (f32::from(channel) + offset).clamp(0.0, 255.0) as u8
}

/// Randomly shift each channel by up to `fraction * 255` in either direction.
///
/// The white channel is kept as is.
pub fn jitter(color: Color, fractions: [f32; 3], rng: &mut Rng) -> Color {
    Color::rgbw(
        jitter_channel(color.r(), fractions[0], rng),
        jitter_channel(color.g(), fractions[1], rng),
        jitter_channel(color.b(), fractions[2], rng),
        color.w(),
    )
}

/// Pick a random palette entry and jitter it.
///
/// Entries without their own variation use `default_variance` on every
/// channel. An empty palette yields black.
pub fn pick_color(palette: &[PaletteColor], default_variance: f32, rng: &mut Rng) -> Color {
    if palette.is_empty() {
        return Color::BLACK;
    }
    let entry = palette[rng.usize(..palette.len())];
    let fractions = entry.variation.unwrap_or([default_variance; 3]);
    jitter(entry.color, fractions, rng)
}
