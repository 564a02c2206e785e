//! Strand buffers and the hardware output capability.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use smart_leds::{RGB8, SmartLedsWrite};

use crate::{OutputDriver, color::Color};

/// Opaque failure reported by an output driver.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("driver error: {0}")]
pub struct DriverError(pub String);

/// Strand shared between the controller and the running generation.
pub type SharedStrand = Arc<Mutex<Strand>>;

/// Lock a shared strand.
///
/// A poisoned lock is recovered: the buffer holds whole colors only, so it is
/// never observed half-written.
pub fn lock_strand(strand: &SharedStrand) -> MutexGuard<'_, Strand> {
    strand.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One physical LED strip: a fixed size color buffer plus the driver that
/// pushes it to hardware.
pub struct Strand {
    name: String,
    pin: u8,
    pixels: Vec<Color>,
    driver: Box<dyn OutputDriver + Send>,
}

impl fmt::Debug for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strand")
            .field("name", &self.name)
            .field("pin", &self.pin)
            .field("pixel_count", &self.pixels.len())
            .finish_non_exhaustive()
    }
}

impl Strand {
    pub fn new(
        name: impl Into<String>,
        pin: u8,
        pixel_count: usize,
        driver: Box<dyn OutputDriver + Send>,
    ) -> Self {
        Self {
            name: name.into(),
            pin,
            pixels: vec![Color::BLACK; pixel_count],
            driver,
        }
    }

    /// Wrap the strand for sharing with a generation.
    pub fn shared(self) -> SharedStrand {
        Arc::new(Mutex::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn pin(&self) -> u8 {
        self.pin
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Current buffered color, `None` when the index is outside the strand.
    pub fn pixel(&self, index: usize) -> Option<Color> {
        self.pixels.get(index).copied()
    }

    /// Set one pixel in the buffer. Returns `false` when out of range.
    pub fn set_pixel(&mut self, index: usize, color: Color) -> bool {
        match self.pixels.get_mut(index) {
            Some(pixel) => {
                *pixel = color;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Flush the buffer to the hardware.
    pub fn show(&mut self) -> Result<(), DriverError> {
        self.driver.write(&self.pixels)
    }
}

/// Driver that accepts and discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDriver;

impl OutputDriver for NullDriver {
    fn write(&mut self, _colors: &[Color]) -> Result<(), DriverError> {
        Ok(())
    }
}

/// Adapts any [`SmartLedsWrite`] implementation (WS2812 over SPI, RMT, ...)
/// to the strand output capability. The white channel is not sent.
pub struct SmartLedsOutput<W> {
    writer: W,
}

impl<W> SmartLedsOutput<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsOutput<W>
where
    W: SmartLedsWrite,
    W::Error: fmt::Debug,
    RGB8: Into<W::Color>,
{
    fn write(&mut self, colors: &[Color]) -> Result<(), DriverError> {
        self.writer
            .write(colors.iter().map(|color| RGB8::from(*color)))
            .map_err(|err| DriverError(format!("{err:?}")))
    }
}
