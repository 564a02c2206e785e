//! Twinkle
//!
//! Each pixel runs its own little state machine driven by a progress value:
//!
//! * `0`: idle, may start a twinkle with a chance of `density²`. Starting
//!   flashes the pixel white and picks a jittered target near its color.
//! * `0 < p < max`: fading towards the target, progress grows randomly. Past
//!   the threshold it may stall or pick a new target.
//! * `p >= max`: turns negative and counts back up to settle.
//! * `p < 0`: returning; once above the settle floor the pixel snaps to its
//!   target and goes idle again.

use fastrand::Rng;

use super::{Animation, read_pixel, write_pixel};
use crate::{
    color::{Color, PaletteColor, blend, jitter, pick_color},
    math::speed_to_interval,
    spec::AnimationSpec,
    strand::Strand,
};

const SLOWEST_INTERVAL: u32 = 12;
const FASTEST_INTERVAL: u32 = 1;

const CHANCE_TO_STALL: f32 = 0.05;
const CHANCE_TO_CHANGE_COLOR: f32 = 0.05;
const BLEND_STEP: f32 = 0.05;
const VARIANCE: f32 = 0.2;
const FLASH_COLOR: Color = Color::WHITE;
const DEFAULT_COLORS: [Color; 2] = [Color::new(200, 200, 0), Color::new(247, 218, 76)];

#[derive(Debug, Clone)]
pub struct TwinkleAnimation {
    pixels: Vec<usize>,
    palette: Vec<PaletteColor>,
    progress: Vec<f32>,
    targets: Vec<Color>,
    max_amount: f32,
    threshold: f32,
    settle_floor: f32,
    start_chance: f32,
    rng: Rng,
    interval: u32,
}

impl TwinkleAnimation {
    pub fn new(
        pixels: Vec<usize>,
        spec: &AnimationSpec,
        strand: &mut Strand,
        mut rng: Rng,
    ) -> Self {
        let mut palette = spec.colors.clone();
        for &fallback in DEFAULT_COLORS.iter().skip(palette.len()) {
            palette.push(PaletteColor::solid(fallback));
        }

        let speed = f32::from(spec.loop_speed);
        let density = spec.density();

        let mut targets = Vec::with_capacity(pixels.len());
        for &index in &pixels {
            let target = pick_color(&palette, VARIANCE, &mut rng);
            write_pixel(strand, index, target);
            targets.push(target);
        }

        Self {
            progress: vec![0.0; pixels.len()],
            pixels,
            palette,
            targets,
            max_amount: 2.0 + 5.0 * speed,
            threshold: 2.0 + speed / 2.0,
            settle_floor: -1.0 - speed / 2.0,
            start_chance: density * density,
            rng,
            interval: speed_to_interval(spec.loop_speed, SLOWEST_INTERVAL, FASTEST_INTERVAL),
        }
    }

    pub fn pixels(&self) -> &[usize] {
        &self.pixels
    }

    /// Per pixel progress, in group order.
    pub fn progress(&self) -> &[f32] {
        &self.progress
    }

    pub const fn max_amount(&self) -> f32 {
        self.max_amount
    }

    fn step(&mut self, slot: usize, current: Color) -> Color {
        let progress = self.progress[slot];
        let target = self.targets[slot];

        if progress >= self.max_amount {
            self.progress[slot] = -progress;
            blend(current, target, BLEND_STEP)
        } else if progress > self.threshold {
            let color = blend(current, target, BLEND_STEP);
            if self.rng.f32() < CHANCE_TO_STALL {
                self.progress[slot] = progress / 2.0;
            } else {
                self.progress[slot] += self.rng.f32();
            }
            if self.rng.f32() < CHANCE_TO_CHANGE_COLOR {
                self.targets[slot] = pick_color(&self.palette, VARIANCE, &mut self.rng);
            }
            color
        } else if progress > 0.0 {
            self.progress[slot] += self.rng.f32();
            blend(current, target, BLEND_STEP)
        } else if progress >= 0.0 {
            if self.rng.f32() < self.start_chance {
                self.progress[slot] += self.rng.f32();
                self.targets[slot] = jitter(current, [VARIANCE; 3], &mut self.rng);
                FLASH_COLOR
            } else {
                current
            }
        } else if progress > self.settle_floor {
            self.progress[slot] = 0.0;
            target
        } else {
            self.progress[slot] += self.rng.f32();
            blend(current, target, BLEND_STEP)
        }
    }
}

impl Animation for TwinkleAnimation {
    fn frame_interval_ticks(&self) -> u32 {
        self.interval
    }

    fn advance(&mut self, strand: &mut Strand) {
        for slot in 0..self.pixels.len() {
            let index = self.pixels[slot];
            let Some(current) = read_pixel(strand, index) else {
                continue;
            };
            let color = self.step(slot, current);
            write_pixel(strand, index, color);
        }
    }
}
