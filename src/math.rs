use core::f32::consts::PI;

use crate::spec::{MAX_SPEED, MIN_SPEED};

/// Interval used when a speed remap collapses to zero ticks.
pub const FALLBACK_FRAME_INTERVAL: u32 = 5;

/// Map a loop speed (1 = slowest, 6 = fastest) linearly onto a tick interval.
///
/// `slowest` is the interval at speed 1, `fastest` at speed 6. The result is
/// truncated towards zero and never 0.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn speed_to_interval(speed: u8, slowest: u32, fastest: u32) -> u32 {
    let speed = i64::from(speed.clamp(MIN_SPEED, MAX_SPEED));
    let span = i64::from(MAX_SPEED - MIN_SPEED);
    let slowest = i64::from(slowest);
    let fastest = i64::from(fastest);

    let interval = (slowest * span + (speed - i64::from(MIN_SPEED)) * (fastest - slowest)) / span;
    match interval {
        i if i <= 0 => FALLBACK_FRAME_INTERVAL,
        i => u32::try_from(i).unwrap_or(u32::MAX),
    }
}

/// Brightness weight of a pixel along a strip, shaped as one sine hump.
///
/// Pixels are offset by half a step so the first one is already slightly
/// into the mix.
#[allow(clippy::cast_precision_loss)]
pub fn sine_weight(index: usize, count: usize) -> f32 {
    let x = (index as f32 + 0.5) / (count as f32 + 1.0);
    0.5 * (libm::sinf(2.0 * PI * x - 0.5 * PI) + 1.0)
}

/// Sine ease-in/ease-out of a normalized height.
pub fn sine_ease(height: f32) -> f32 {
    0.5 * (1.0 + libm::sinf((1.5 + height) * PI))
}

/// Sharpened sine curve peaking at half height, clipped to `0..=1`.
pub fn spike(height: f32) -> f32 {
    let regular = 0.5 * (1.0 + libm::sinf(2.0 * PI * height + 1.5 * PI));
    if regular <= 0.0 {
        return 0.0;
    }
    (2.0 - libm::powf(regular, -2.0)).clamp(0.0, 1.0)
}

/// Endless triangular counter: `0, 1, .., peak, peak - 1, .., 1, 0, 1, ..`
#[derive(Debug, Clone)]
pub struct HeightCycle {
    peak: u32,
    position: u32,
}

impl HeightCycle {
    pub fn new(peak: u32) -> Self {
        Self {
            peak: peak.clamp(1, u32::MAX / 2),
            position: 0,
        }
    }

    pub const fn peak(&self) -> u32 {
        self.peak
    }

    /// Return the current height and move one step along the cycle.
    pub fn next_height(&mut self) -> u32 {
        let height = if self.position <= self.peak {
            self.position
        } else {
            2 * self.peak - self.position
        };
        // peak <= u32::MAX / 2, so the full cycle fits
        self.position = (self.position + 1) % (2 * self.peak);
        height
    }
}
