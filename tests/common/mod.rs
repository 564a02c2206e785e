#![allow(dead_code)]

use std::sync::{Arc, Mutex, PoisonError};

use curio_led_engine::{
    Color, DriverError, OutputDriver, SharedStrand, Strand, animation::AnimationSlot,
    spec::AnimationSpec,
};
use fastrand::Rng;

pub const RED: Color = Color::new(255, 0, 0);
pub const GREEN: Color = Color::new(0, 255, 0);
pub const BLUE: Color = Color::new(0, 0, 255);
pub const BLACK: Color = Color::BLACK;
pub const WHITE: Color = Color::WHITE;

pub const SEED: u64 = 0x5EED;

pub fn seeded_rng() -> Rng {
    Rng::with_seed(SEED)
}

/// Every frame a [`RecordingDriver`] was asked to write.
#[derive(Clone, Default)]
pub struct FrameLog(Arc<Mutex<Vec<Vec<Color>>>>);

impl FrameLog {
    pub fn frames(&self) -> Vec<Vec<Color>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn last(&self) -> Option<Vec<Color>> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

pub struct RecordingDriver {
    log: FrameLog,
}

impl OutputDriver for RecordingDriver {
    fn write(&mut self, colors: &[Color]) -> Result<(), DriverError> {
        self.log
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(colors.to_vec());
        Ok(())
    }
}

pub fn recording_driver() -> (Box<dyn OutputDriver + Send>, FrameLog) {
    let log = FrameLog::default();
    let driver = RecordingDriver { log: log.clone() };
    (Box::new(driver), log)
}

/// Driver that refuses every frame.
pub struct BrokenDriver;

impl OutputDriver for BrokenDriver {
    fn write(&mut self, _colors: &[Color]) -> Result<(), DriverError> {
        Err(DriverError("strand unplugged".to_owned()))
    }
}

pub fn recording_strand(name: &str, size: usize) -> (SharedStrand, FrameLog) {
    let (driver, log) = recording_driver();
    (Strand::new(name, 18, size, driver).shared(), log)
}

pub fn plain_strand(size: usize) -> Strand {
    let (driver, _) = recording_driver();
    Strand::new("test", 18, size, driver)
}

/// Build the generator for `spec_text` over the first `pixel_count` pixels.
pub fn slot_for(spec_text: &str, strand: &mut Strand, pixel_count: usize) -> AnimationSlot {
    let spec = AnimationSpec::parse(spec_text);
    AnimationSlot::new(&spec, (0..pixel_count).collect(), strand, seeded_rng())
        .unwrap_or_else(|| panic!("'{spec_text}' has no animation"))
}

pub const SAMPLE_CONFIG: &str = r#"
default_mode: default
strands:
  porch:
    size: 10
    pin: 18
    id_ranges:
      roofline:
        id_start: 0
        id_end: 6
        animations:
          default: "red and blue, blink, 6"
          party: "rainbow, fast"
      window:
        ids: "6,7"
        animations:
          default: "green"
    ids:
      9:
        name: doorbell
        animations:
          default: "white"
          night: "blue, pulse, slow"
  garage:
    size: 4
    pin: 21
    id_ranges:
      all:
        ids: [0, 1, 2, 3]
        animations:
          party: "gold, twinkle, density:.5"
"#;
