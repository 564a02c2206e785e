//! Pulse
//!
//! Breathes the whole group between a start and an end color. Every time the
//! pulse falls back to zero the end color moves on to the next palette color,
//! so a longer palette chases through its colors.

use log::warn;

use super::{Animation, paint, write_pixel};
use crate::{
    color::{Color, blend},
    math::{HeightCycle, sine_ease, sine_weight, speed_to_interval, spike},
    spec::{AnimationSpec, LoopModifier},
    strand::Strand,
};

const SLOWEST_INTERVAL: u32 = 6;
const FASTEST_INTERVAL: u32 = 1;
const DEFAULT_START: Color = Color::BLACK;
const DEFAULT_END: Color = Color::WHITE;

/// How the raw pulse height is shaped before blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseShape {
    Linear,
    Sine,
    Spike,
}

impl PulseShape {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            "linear" => Some(Self::Linear),
            "sin" | "sine" => Some(Self::Sine),
            "spike" => Some(Self::Spike),
            _ => None,
        }
    }

    pub fn apply(self, height: f32) -> f32 {
        match self {
            Self::Linear => height,
            Self::Sine => sine_ease(height),
            Self::Spike => spike(height),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PulseAnimation {
    pixels: Vec<usize>,
    palette: Vec<Color>,
    start: Color,
    end: Color,
    shape: PulseShape,
    /// Sine weights along the group when centered
    weights: Option<Vec<f32>>,
    heights: HeightCycle,
    iteration: usize,
    interval: u32,
}

impl PulseAnimation {
    pub fn new(pixels: Vec<usize>, spec: &AnimationSpec) -> Self {
        let palette: Vec<Color> = spec.base_colors().collect();
        let start = palette.first().copied().unwrap_or(DEFAULT_START);
        let end = palette.get(1).copied().unwrap_or(DEFAULT_END);

        let mode = spec.mode();
        let shape = PulseShape::parse_from_str(&mode).unwrap_or_else(|| {
            warn!("Unknown pulse mode '{mode}', using linear");
            PulseShape::Linear
        });
        let weights = spec.has_modifier(LoopModifier::Centered).then(|| {
            (0..pixels.len())
                .map(|i| sine_weight(i, pixels.len()))
                .collect()
        });

        Self {
            pixels,
            palette,
            start,
            end,
            shape,
            weights,
            heights: HeightCycle::new(spec.pulse_height()),
            iteration: 0,
            interval: speed_to_interval(spec.loop_speed, SLOWEST_INTERVAL, FASTEST_INTERVAL),
        }
    }

    pub fn pixels(&self) -> &[usize] {
        &self.pixels
    }

    /// Color the pulse is currently heading to.
    pub const fn end_color(&self) -> Color {
        self.end
    }

    pub const fn shape(&self) -> PulseShape {
        self.shape
    }
}

impl Animation for PulseAnimation {
    fn frame_interval_ticks(&self) -> u32 {
        self.interval
    }

    #[allow(clippy::cast_precision_loss)]
    fn advance(&mut self, strand: &mut Strand) {
        let raw = self.heights.next_height();
        if raw == 0 {
            if self.palette.len() > 1 {
                self.end = self.palette[(self.iteration + 1) % self.palette.len()];
            }
            self.iteration += 1;
        }

        let height = self.shape.apply(raw as f32 / self.heights.peak() as f32);
        match &self.weights {
            Some(weights) => {
                for (&index, &weight) in self.pixels.iter().zip(weights) {
                    write_pixel(strand, index, blend(self.start, self.end, height * weight));
                }
            }
            None => paint(strand, &self.pixels, blend(self.start, self.end, height)),
        }
    }
}
