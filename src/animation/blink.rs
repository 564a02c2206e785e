//! Blink through the palette, one solid color per frame.

use fastrand::Rng;

use super::{Animation, paint};
use crate::{
    color::Color,
    math::speed_to_interval,
    spec::{AnimationSpec, LoopModifier},
    strand::Strand,
};

const SLOWEST_INTERVAL: u32 = 200;
const FASTEST_INTERVAL: u32 = 10;

#[derive(Debug, Clone)]
pub struct BlinkAnimation {
    pixels: Vec<usize>,
    /// At least two colors
    colors: Vec<Color>,
    iteration: usize,
    random: bool,
    rng: Rng,
    interval: u32,
}

impl BlinkAnimation {
    pub fn new(pixels: Vec<usize>, spec: &AnimationSpec, rng: Rng) -> Self {
        let mut colors: Vec<Color> = spec.base_colors().collect();
        if colors.is_empty() {
            colors.push(Color::WHITE);
        }
        if colors.len() < 2 {
            colors.push(Color::BLACK);
        }

        Self {
            pixels,
            colors,
            iteration: 0,
            random: spec.has_modifier(LoopModifier::Random),
            rng,
            interval: speed_to_interval(spec.loop_speed, SLOWEST_INTERVAL, FASTEST_INTERVAL),
        }
    }

    pub fn pixels(&self) -> &[usize] {
        &self.pixels
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Animation for BlinkAnimation {
    fn frame_interval_ticks(&self) -> u32 {
        self.interval
    }

    fn advance(&mut self, strand: &mut Strand) {
        let color = if self.random {
            self.colors[self.rng.usize(..self.colors.len())]
        } else {
            self.colors[self.iteration % self.colors.len()]
        };
        paint(strand, &self.pixels, color);
        self.iteration += 1;
    }
}
