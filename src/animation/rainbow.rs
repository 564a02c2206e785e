//! Rainbow rotation
//!
//! Spreads the whole color wheel over the group and rotates it by one wheel
//! step per frame.

use super::{Animation, write_pixel};
use crate::{
    color::hue_wheel,
    math::speed_to_interval,
    spec::{AnimationSpec, LoopModifier},
    strand::Strand,
};

const SLOWEST_INTERVAL: u32 = 40;
const FASTEST_INTERVAL: u32 = 1;
const WHEEL_STEPS: u32 = 256;

#[derive(Debug, Clone)]
pub struct RainbowAnimation {
    pixels: Vec<usize>,
    /// Wheel rotation, `0..256`
    phase: u32,
    reverse: bool,
    interval: u32,
}

impl RainbowAnimation {
    pub fn new(pixels: Vec<usize>, spec: &AnimationSpec) -> Self {
        Self {
            pixels,
            phase: 0,
            reverse: spec.has_modifier(LoopModifier::Reverse),
            interval: speed_to_interval(spec.loop_speed, SLOWEST_INTERVAL, FASTEST_INTERVAL),
        }
    }

    pub fn pixels(&self) -> &[usize] {
        &self.pixels
    }

    pub const fn phase(&self) -> u32 {
        self.phase
    }
}

impl Animation for RainbowAnimation {
    fn frame_interval_ticks(&self) -> u32 {
        self.interval
    }

    fn advance(&mut self, strand: &mut Strand) {
        self.phase = if self.reverse {
            (self.phase + WHEEL_STEPS - 1) % WHEEL_STEPS
        } else {
            (self.phase + 1) % WHEEL_STEPS
        };

        let count = self.pixels.len();
        for (i, &index) in self.pixels.iter().enumerate() {
            let offset = u32::try_from(i * WHEEL_STEPS as usize / count).unwrap_or(0);
            write_pixel(strand, index, hue_wheel(offset + self.phase));
        }
    }
}
