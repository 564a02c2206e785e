//! Animation spec mini-language
//!
//! A spec is a comma separated description such as
//! `"red:.1 and gold, twinkle, random, fast, density:.4"`:
//!
//! 1. a color phrase, colors joined by `and`, each optionally suffixed with
//!    `:v` or `:vr:vg:vb` jitter fractions
//! 2. any number of further fields, each either an animation kind, a loop
//!    modifier, a speed (word or digit) or a free-form `key:value` pair
//!
//! Parsing is total: anything that is not understood is logged and skipped.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::color::{Color, PaletteColor, parse_color};

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 6;
pub const DEFAULT_SPEED: u8 = 3;

pub const DEFAULT_DENSITY: f32 = 0.3;
pub const DEFAULT_PULSE_HEIGHT: u32 = 50;
/// Largest accepted `pulse_height`, in steps per half cycle.
pub const MAX_PULSE_HEIGHT: u32 = 10_000;
pub const DEFAULT_MODE: &str = "linear";

/// Texts this short never describe anything and parse to the "off" spec.
const MIN_SPEC_LEN: usize = 4;

const KIND_NAME_NONE: &str = "none";
const KIND_NAME_RAINBOW: &str = "rainbow";
const KIND_NAME_WARP: &str = "warp";
const KIND_NAME_PULSE: &str = "pulse";
const KIND_NAME_BLINK: &str = "blink";
const KIND_NAME_BLINKENLICHT: &str = "blinkenlicht";
const KIND_NAME_TWINKLE: &str = "twinkle";

const MODIFIER_NAME_RANDOM: &str = "random";
const MODIFIER_NAME_CENTERED: &str = "centered";
const MODIFIER_NAME_REVERSE: &str = "reverse";

const SPEED_WORDS: &[(&str, u8)] = &[
    ("slow", 1),
    ("gentle", 2),
    ("medium", 3),
    ("normal", 3),
    ("quick", 4),
    ("speedy", 5),
    ("fast", 6),
];

/// Known animation kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Static colors, no generator
    None,
    Rainbow,
    Warp,
    Pulse,
    Blink,
    Blinkenlicht,
    Twinkle,
}

impl AnimationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => KIND_NAME_NONE,
            Self::Rainbow => KIND_NAME_RAINBOW,
            Self::Warp => KIND_NAME_WARP,
            Self::Pulse => KIND_NAME_PULSE,
            Self::Blink => KIND_NAME_BLINK,
            Self::Blinkenlicht => KIND_NAME_BLINKENLICHT,
            Self::Twinkle => KIND_NAME_TWINKLE,
        }
    }

    /// Match a lowercase token, accepting the `-ing` forms used in configs.
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            KIND_NAME_NONE | "static" | "solid" => Some(Self::None),
            KIND_NAME_RAINBOW => Some(Self::Rainbow),
            KIND_NAME_WARP => Some(Self::Warp),
            KIND_NAME_PULSE | "pulsing" => Some(Self::Pulse),
            KIND_NAME_BLINK | "blinking" => Some(Self::Blink),
            KIND_NAME_BLINKENLICHT => Some(Self::Blinkenlicht),
            KIND_NAME_TWINKLE | "twinkling" => Some(Self::Twinkle),
            _ => None,
        }
    }

    /// Whether this kind needs a frame generator.
    pub const fn is_animated(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Optional flag altering how a generator walks its pixels or colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopModifier {
    Random,
    Centered,
    Reverse,
}

impl LoopModifier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => MODIFIER_NAME_RANDOM,
            Self::Centered => MODIFIER_NAME_CENTERED,
            Self::Reverse => MODIFIER_NAME_REVERSE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODIFIER_NAME_RANDOM => Some(Self::Random),
            MODIFIER_NAME_CENTERED => Some(Self::Centered),
            MODIFIER_NAME_REVERSE => Some(Self::Reverse),
            _ => None,
        }
    }
}

/// Structured form of an animation spec text.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSpec {
    /// Colors in the order they were written
    pub colors: Vec<PaletteColor>,
    /// `None` means "off"
    pub animation: Option<AnimationKind>,
    pub loop_modifier: Option<LoopModifier>,
    /// Always within `MIN_SPEED..=MAX_SPEED`
    pub loop_speed: u8,
    pub extra_params: BTreeMap<String, String>,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            colors: Vec::new(),
            animation: None,
            loop_modifier: None,
            loop_speed: DEFAULT_SPEED,
            extra_params: BTreeMap::new(),
        }
    }
}

impl AnimationSpec {
    /// Parse a spec text. Never fails.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let mut spec = Self::default();
        if text.chars().count() < MIN_SPEC_LEN {
            return spec;
        }

        let mut fields = text.split(',');
        if let Some(phrase) = fields.next() {
            spec.parse_color_phrase(phrase);
        }
        for field in fields {
            spec.parse_field(field);
        }
        spec
    }

    /// Base colors without their variations.
    pub fn base_colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().map(|entry| entry.color)
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some_and(AnimationKind::is_animated)
    }

    pub fn has_modifier(&self, modifier: LoopModifier) -> bool {
        self.loop_modifier == Some(modifier)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.extra_params.get(key).map(String::as_str)
    }

    /// Chance-shaping density, `0..=1`.
    pub fn density(&self) -> f32 {
        self.param("density")
            .and_then(|value| value.parse::<f32>().ok())
            .filter(|value| value.is_finite())
            .map_or(DEFAULT_DENSITY, |value| value.clamp(0.0, 1.0))
    }

    /// Height shaping / sub-mode name, lowercase.
    pub fn mode(&self) -> String {
        self.param("mode")
            .map_or_else(|| DEFAULT_MODE.to_owned(), str::to_lowercase)
    }

    pub fn pulse_height(&self) -> u32 {
        self.param("pulse_height")
            .and_then(|value| value.parse::<u32>().ok())
            .map_or(DEFAULT_PULSE_HEIGHT, |value| {
                if value > MAX_PULSE_HEIGHT {
                    warn!("pulse_height {value} is too large, using {MAX_PULSE_HEIGHT}");
                }
                value.clamp(1, MAX_PULSE_HEIGHT)
            })
    }

    fn parse_color_phrase(&mut self, phrase: &str) {
        let phrase = phrase.trim().to_lowercase();
        for token in phrase.split(" and ") {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            let mut parts = token.split(':');
            let name = parts.next().unwrap_or_default().trim();
            match parse_color(name) {
                Ok(color) => {
                    let variation = parse_variation(parts);
                    self.colors.push(PaletteColor { color, variation });
                }
                Err(err) => {
                    if let Some(kind) = AnimationKind::parse_from_str(name) {
                        self.animation = Some(kind);
                    } else {
                        warn!("Skipping color in animation spec: {err}");
                    }
                }
            }
        }
    }

    fn parse_field(&mut self, field: &str) {
        let token = field.trim();
        if token.is_empty() {
            return;
        }
        let lower = token.to_lowercase();

        if let Some(kind) = AnimationKind::parse_from_str(&lower) {
            self.animation = Some(kind);
        } else if let Some(modifier) = LoopModifier::parse_from_str(&lower) {
            self.loop_modifier = Some(modifier);
        } else if let Some(speed) = parse_speed(&lower) {
            self.loop_speed = speed;
        } else if let Some((key, value)) = token.split_once(':') {
            self.extra_params
                .insert(key.trim().to_lowercase(), value.trim().to_owned());
        } else {
            debug!("Ignoring unknown animation spec token '{token}'");
        }
    }
}

fn parse_speed(token: &str) -> Option<u8> {
    if let Some((_, speed)) = SPEED_WORDS.iter().find(|(word, _)| *word == token) {
        return Some(*speed);
    }
    let value = token.parse::<i64>().ok()?;
    let clamped = value.clamp(i64::from(MIN_SPEED), i64::from(MAX_SPEED));
    u8::try_from(clamped).ok()
}

/// Turn `["v"]` or `["vr", "vg", "vb"]` into channel fractions.
///
/// A single value applies to all channels; missing trailing channels repeat
/// the last value given.
fn parse_variation<'a>(parts: impl Iterator<Item = &'a str>) -> Option<[f32; 3]> {
    let values: Vec<f32> = parts
        .filter_map(|part| match part.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => Some(value.clamp(0.0, 1.0)),
            _ => {
                warn!("Ignoring malformed color variation '{part}'");
                None
            }
        })
        .take(3)
        .collect();

    let last = *values.last()?;
    let mut fractions = [last; 3];
    fractions[..values.len()].copy_from_slice(&values);
    Some(fractions)
}
