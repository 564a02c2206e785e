//! Frame generators with a closed set of variants
//!
//! Every generator is bound to a list of pixels on one strand. The frame
//! scheduler calls [`Animation::advance`] every
//! [`Animation::frame_interval_ticks`] ticks; the generator writes one frame
//! into the strand buffer, touching only its own pixels.

mod blink;
mod blinkenlicht;
mod pulse;
mod rainbow;
mod twinkle;
mod warp;

use fastrand::Rng;
use log::warn;

pub use blink::BlinkAnimation;
pub use blinkenlicht::BlinkenlichtAnimation;
pub use pulse::{PulseAnimation, PulseShape};
pub use rainbow::RainbowAnimation;
pub use twinkle::TwinkleAnimation;
pub use warp::WarpAnimation;

use crate::{
    color::Color,
    spec::{AnimationKind, AnimationSpec},
    strand::Strand,
};

pub trait Animation {
    /// Ticks between two frames, fixed at construction
    fn frame_interval_ticks(&self) -> u32;

    /// Compute the next frame into the strand buffer
    fn advance(&mut self, strand: &mut Strand);
}

/// Read a pixel the generator owns; a failed read is logged and skipped.
pub(crate) fn read_pixel(strand: &Strand, index: usize) -> Option<Color> {
    let color = strand.pixel(index);
    if color.is_none() {
        warn!(
            "Cannot read pixel {index} of strand '{}' ({} pixels), skipping it",
            strand.name(),
            strand.pixel_count()
        );
    }
    color
}

pub(crate) fn write_pixel(strand: &mut Strand, index: usize, color: Color) {
    if !strand.set_pixel(index, color) {
        warn!(
            "Cannot write pixel {index} of strand '{}' ({} pixels)",
            strand.name(),
            strand.pixel_count()
        );
    }
}

pub(crate) fn paint(strand: &mut Strand, pixels: &[usize], color: Color) {
    for &index in pixels {
        write_pixel(strand, index, color);
    }
}

/// Animation slot - enum containing every generator variant
#[derive(Debug, Clone)]
pub enum AnimationSlot {
    Rainbow(RainbowAnimation),
    Warp(WarpAnimation),
    Pulse(PulseAnimation),
    Blink(BlinkAnimation),
    Blinkenlicht(BlinkenlichtAnimation),
    Twinkle(TwinkleAnimation),
}

impl AnimationSlot {
    /// Build the generator a spec asks for.
    ///
    /// Twinkle and Blinkenlicht paint their starting colors into `strand`.
    /// Returns `None` for specs without an animation.
    pub fn new(
        spec: &AnimationSpec,
        pixels: Vec<usize>,
        strand: &mut Strand,
        rng: Rng,
    ) -> Option<Self> {
        Some(match spec.animation? {
            AnimationKind::None => return None,
            AnimationKind::Rainbow => Self::Rainbow(RainbowAnimation::new(pixels, spec)),
            AnimationKind::Warp => Self::Warp(WarpAnimation::new(pixels, spec)),
            AnimationKind::Pulse => Self::Pulse(PulseAnimation::new(pixels, spec)),
            AnimationKind::Blink => Self::Blink(BlinkAnimation::new(pixels, spec, rng)),
            AnimationKind::Blinkenlicht => {
                Self::Blinkenlicht(BlinkenlichtAnimation::new(pixels, spec, strand, rng))
            }
            AnimationKind::Twinkle => {
                Self::Twinkle(TwinkleAnimation::new(pixels, spec, strand, rng))
            }
        })
    }

    pub fn kind(&self) -> AnimationKind {
        match self {
            Self::Rainbow(_) => AnimationKind::Rainbow,
            Self::Warp(_) => AnimationKind::Warp,
            Self::Pulse(_) => AnimationKind::Pulse,
            Self::Blink(_) => AnimationKind::Blink,
            Self::Blinkenlicht(_) => AnimationKind::Blinkenlicht,
            Self::Twinkle(_) => AnimationKind::Twinkle,
        }
    }

    pub fn frame_interval_ticks(&self) -> u32 {
        match self {
            Self::Rainbow(animation) => animation.frame_interval_ticks(),
            Self::Warp(animation) => animation.frame_interval_ticks(),
            Self::Pulse(animation) => animation.frame_interval_ticks(),
            Self::Blink(animation) => animation.frame_interval_ticks(),
            Self::Blinkenlicht(animation) => animation.frame_interval_ticks(),
            Self::Twinkle(animation) => animation.frame_interval_ticks(),
        }
    }

    pub fn advance(&mut self, strand: &mut Strand) {
        match self {
            Self::Rainbow(animation) => animation.advance(strand),
            Self::Warp(animation) => animation.advance(strand),
            Self::Pulse(animation) => animation.advance(strand),
            Self::Blink(animation) => animation.advance(strand),
            Self::Blinkenlicht(animation) => animation.advance(strand),
            Self::Twinkle(animation) => animation.advance(strand),
        }
    }

    pub fn pixels(&self) -> &[usize] {
        match self {
            Self::Rainbow(animation) => animation.pixels(),
            Self::Warp(animation) => animation.pixels(),
            Self::Pulse(animation) => animation.pixels(),
            Self::Blink(animation) => animation.pixels(),
            Self::Blinkenlicht(animation) => animation.pixels(),
            Self::Twinkle(animation) => animation.pixels(),
        }
    }
}
