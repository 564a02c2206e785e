//! Warp
//!
//! The middle of the group swells from the start color towards the end color
//! and back, shaped as one sine hump along the pixels.

use super::{Animation, write_pixel};
use crate::{
    color::{Color, blend},
    math::{HeightCycle, sine_weight, speed_to_interval},
    spec::AnimationSpec,
    strand::Strand,
};

const SLOWEST_INTERVAL: u32 = 8;
const FASTEST_INTERVAL: u32 = 1;
const DEFAULT_START: Color = Color::new(0, 0, 255);
const DEFAULT_END: Color = Color::WHITE;

#[derive(Debug, Clone)]
pub struct WarpAnimation {
    pixels: Vec<usize>,
    /// Per pixel sine weight, fixed for the group size
    weights: Vec<f32>,
    start: Color,
    end: Color,
    heights: HeightCycle,
    interval: u32,
}

impl WarpAnimation {
    pub fn new(pixels: Vec<usize>, spec: &AnimationSpec) -> Self {
        let mut colors = spec.base_colors();
        let start = colors.next().unwrap_or(DEFAULT_START);
        let end = colors.next().unwrap_or(DEFAULT_END);
        let weights = (0..pixels.len())
            .map(|i| sine_weight(i, pixels.len()))
            .collect();

        Self {
            pixels,
            weights,
            start,
            end,
            heights: HeightCycle::new(spec.pulse_height()),
            interval: speed_to_interval(spec.loop_speed, SLOWEST_INTERVAL, FASTEST_INTERVAL),
        }
    }

    pub fn pixels(&self) -> &[usize] {
        &self.pixels
    }
}

impl Animation for WarpAnimation {
    fn frame_interval_ticks(&self) -> u32 {
        self.interval
    }

    #[allow(clippy::cast_precision_loss)]
    fn advance(&mut self, strand: &mut Strand) {
        let height = self.heights.next_height() as f32 / self.heights.peak() as f32;

        for (&index, &weight) in self.pixels.iter().zip(&self.weights) {
            write_pixel(strand, index, blend(self.start, self.end, weight * height));
        }
    }
}
