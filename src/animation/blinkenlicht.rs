//! Blinkenlicht
//!
//! Like twinkle, but pixels rest on the first palette color and light up to
//! a freshly picked palette color instead of flashing. With `mode:linear`
//! the rise is steady, otherwise pixels may stall or change color midway.

use fastrand::Rng;

use super::{Animation, read_pixel, write_pixel};
use crate::{
    color::{Color, PaletteColor, blend, pick_color},
    math::speed_to_interval,
    spec::{AnimationSpec, DEFAULT_MODE},
    strand::Strand,
};

const SLOWEST_INTERVAL: u32 = 12;
const FASTEST_INTERVAL: u32 = 1;

const CHANCE_TO_STALL: f32 = 0.05;
const CHANCE_TO_CHANGE_COLOR: f32 = 0.05;
const VARIANCE: f32 = 0.2;
const DEFAULT_COLORS: [Color; 2] = [Color::BLACK, Color::new(247, 218, 76)];

#[derive(Debug, Clone)]
pub struct BlinkenlichtAnimation {
    pixels: Vec<usize>,
    palette: Vec<PaletteColor>,
    /// Resting color, the first palette entry
    baseline: Color,
    progress: Vec<f32>,
    targets: Vec<Color>,
    max_amount: f32,
    threshold: f32,
    settle_floor: f32,
    start_chance: f32,
    blend_step: f32,
    linear: bool,
    rng: Rng,
    interval: u32,
}

impl BlinkenlichtAnimation {
    pub fn new(pixels: Vec<usize>, spec: &AnimationSpec, strand: &mut Strand, rng: Rng) -> Self {
        let mut palette = spec.colors.clone();
        for &fallback in DEFAULT_COLORS.iter().skip(palette.len()) {
            palette.push(PaletteColor::solid(fallback));
        }
        let baseline = palette[0].color;

        for &index in &pixels {
            write_pixel(strand, index, baseline);
        }

        let speed = f32::from(spec.loop_speed);
        let max_amount = 2.0 + 5.0 * speed;
        let density = spec.density();

        Self {
            progress: vec![0.0; pixels.len()],
            targets: vec![baseline; pixels.len()],
            pixels,
            palette,
            baseline,
            max_amount,
            threshold: 2.0 + speed,
            settle_floor: -1.0 - speed,
            start_chance: density * density,
            blend_step: 2.0 / max_amount,
            linear: spec.mode() == DEFAULT_MODE,
            rng,
            interval: speed_to_interval(spec.loop_speed, SLOWEST_INTERVAL, FASTEST_INTERVAL),
        }
    }

    pub fn pixels(&self) -> &[usize] {
        &self.pixels
    }

    pub fn progress(&self) -> &[f32] {
        &self.progress
    }

    pub const fn baseline(&self) -> Color {
        self.baseline
    }

    fn step(&mut self, slot: usize, current: Color, fresh: Color) -> Color {
        let progress = self.progress[slot];
        let target = self.targets[slot];

        if progress >= self.max_amount {
            self.progress[slot] = -progress;
            blend(current, target, self.blend_step)
        } else if progress > self.threshold {
            let color = blend(current, target, self.blend_step);
            if self.linear {
                self.progress[slot] += self.rng.f32();
            } else {
                if self.rng.f32() < CHANCE_TO_STALL {
                    self.progress[slot] = progress / 2.0;
                } else {
                    self.progress[slot] += self.rng.f32();
                }
                if self.rng.f32() < CHANCE_TO_CHANGE_COLOR {
                    self.targets[slot] = fresh;
                }
            }
            color
        } else if progress > 0.0 {
            self.progress[slot] += self.rng.f32();
            blend(current, target, self.blend_step)
        } else if progress >= 0.0 {
            if self.rng.f32() < self.start_chance {
                self.progress[slot] += self.rng.f32();
                self.targets[slot] = fresh;
                blend(current, fresh, self.blend_step)
            } else {
                current
            }
        } else if progress > self.settle_floor {
            self.progress[slot] = 0.0;
            self.targets[slot] = self.baseline;
            self.baseline
        } else {
            self.progress[slot] += self.rng.f32();
            blend(current, self.baseline, self.blend_step)
        }
    }
}

impl Animation for BlinkenlichtAnimation {
    fn frame_interval_ticks(&self) -> u32 {
        self.interval
    }

    fn advance(&mut self, strand: &mut Strand) {
        let fresh = pick_color(&self.palette, VARIANCE, &mut self.rng);

        for slot in 0..self.pixels.len() {
            let index = self.pixels[slot];
            let Some(current) = read_pixel(strand, index) else {
                continue;
            };
            let color = self.step(slot, current, fresh);
            write_pixel(strand, index, color);
        }
    }
}
