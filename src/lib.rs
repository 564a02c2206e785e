pub mod animation;
pub mod color;
pub mod command;
pub mod config;
pub mod controller;
pub mod frame_scheduler;
pub mod lifecycle;
pub mod math;
pub mod resolver;
pub mod spec;
pub mod strand;

pub use animation::{Animation, AnimationSlot};
pub use color::Color;
pub use command::{CommandQueue, LightCommand, QueueFull};
pub use config::{ConfigError, DeviceConfig};
pub use controller::{ControllerError, DeviceState, LightController};
pub use frame_scheduler::{FrameScheduler, TickReport};
pub use lifecycle::{GenerationId, GenerationInfo, GenerationManager, LifecycleError};
pub use resolver::{PixelGroup, find_ids, resolve_device};
pub use spec::{AnimationKind, AnimationSpec, LoopModifier};
pub use strand::{DriverError, NullDriver, SharedStrand, SmartLedsOutput, Strand};

pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms. Every
/// strand owns one driver and hands it the whole buffer on each flush.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[color::Color]) -> Result<(), DriverError>;
}
