//! Light controller - the main orchestrator
//!
//! Owns the device state (strands, mode, per pixel table, status) and the
//! generation manager, and turns [`LightCommand`]s into generations.

use fastrand::Rng;
use log::{info, warn};

use crate::{
    OutputDriver,
    color::{Color, pick_color},
    command::{CommandQueue, LightCommand},
    config::{DeviceConfig, IdList},
    lifecycle::{GenerationInfo, GenerationManager, LifecycleError},
    resolver::{PixelGroup, PixelInfo, find_ids, resolve_device},
    strand::{SharedStrand, Strand, lock_strand},
};

pub const STATUS_OFF: &str = "Lights are off";
pub const STATUS_CLEARING: &str = "Clearing all lights";
pub const STATUS_STOPPED: &str = "Animations stopped";

/// Group name used for animations started by a command.
const COMMAND_GROUP_NAME: &str = "command";

#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    #[error("configuration has {expected} strands but {actual} drivers were given")]
    StrandCountMismatch { expected: usize, actual: usize },
    #[error("unknown strand '{0}'")]
    UnknownStrand(String),
    #[error("unknown mode '{0}'")]
    UnknownMode(String),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Runtime state of the whole device.
#[derive(Debug)]
pub struct DeviceState {
    /// Strand registry, in configuration order
    pub strands: Vec<SharedStrand>,
    pub current_mode: String,
    pub modes: Vec<String>,
    /// Per strand, per pixel configuration for the current mode
    pub pixel_table: Vec<Vec<Option<PixelInfo>>>,
    pub status: String,
}

#[derive(Debug)]
pub struct LightController {
    config: DeviceConfig,
    state: DeviceState,
    generations: GenerationManager,
    rng: Rng,
}

impl LightController {
    /// Create a controller with one driver per configured strand, in order.
    pub fn new(
        config: DeviceConfig,
        drivers: Vec<Box<dyn OutputDriver + Send>>,
    ) -> Result<Self, ControllerError> {
        Self::with_manager(config, drivers, GenerationManager::new(), Rng::new())
    }

    /// Same as [`LightController::new`] with an explicit manager and seed
    /// source for starting colors.
    pub fn with_manager(
        config: DeviceConfig,
        drivers: Vec<Box<dyn OutputDriver + Send>>,
        generations: GenerationManager,
        rng: Rng,
    ) -> Result<Self, ControllerError> {
        if drivers.len() != config.strands.len() {
            return Err(ControllerError::StrandCountMismatch {
                expected: config.strands.len(),
                actual: drivers.len(),
            });
        }

        let strands = config
            .strands
            .iter()
            .zip(drivers)
            .map(|((name, strand), driver)| {
                Strand::new(name.as_str(), strand.pin, strand.size, driver).shared()
            })
            .collect();

        let state = DeviceState {
            strands,
            current_mode: config.default_mode.clone(),
            modes: config.mode_names(),
            pixel_table: Vec::new(),
            status: STATUS_OFF.to_owned(),
        };
        Ok(Self {
            config,
            state,
            generations,
            rng,
        })
    }

    /// Light up the configured default mode.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        let mode = self.state.current_mode.clone();
        self.start_mode(&mode)
    }

    pub fn apply(&mut self, command: LightCommand) -> Result<(), ControllerError> {
        info!("Applying command: {}", command.describe());
        match command {
            LightCommand::SetColor(color) => self.set_color(color),
            LightCommand::Animate {
                strand,
                pixels,
                spec,
            } => self.animate(&strand, pixels.as_deref(), &spec),
            LightCommand::Clear => self.clear(),
            LightCommand::SwitchMode(mode) => self.switch_mode(&mode),
            LightCommand::StopAll => self.stop_all(),
        }
    }

    /// Apply every queued command (non-blocking).
    ///
    /// Failing commands are logged and skipped. Returns how many commands
    /// were taken from the queue.
    pub fn process_pending<const N: usize>(&mut self, commands: &CommandQueue<N>) -> usize {
        let mut processed = 0;
        for command in commands.drain() {
            processed += 1;
            if let Err(err) = self.apply(command) {
                warn!("Light command failed: {err}");
            }
        }
        processed
    }

    pub fn switch_mode(&mut self, mode: &str) -> Result<(), ControllerError> {
        if mode != self.config.default_mode && !self.state.modes.iter().any(|m| m == mode) {
            return Err(ControllerError::UnknownMode(mode.to_owned()));
        }
        self.start_mode(mode)
    }

    /// Stop animations and wipe every strand to one color.
    pub fn set_color(&mut self, color: Color) -> Result<(), ControllerError> {
        self.generations.halt()?;
        self.fill_all(color);
        self.state.status = format!("Wipe: {}, {}, {}", color.r(), color.g(), color.b());
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), ControllerError> {
        self.generations.halt()?;
        self.fill_all(Color::BLACK);
        self.state.status = STATUS_CLEARING.to_owned();
        Ok(())
    }

    pub fn stop_all(&mut self) -> Result<(), ControllerError> {
        self.generations.halt()?;
        self.state.status = STATUS_STOPPED.to_owned();
        Ok(())
    }

    /// Run `spec_text` on one strand, replacing whatever runs now.
    ///
    /// Without `pixels` the whole strand is used. A spec without an animation
    /// paints its color once.
    pub fn animate(
        &mut self,
        strand_name: &str,
        pixels: Option<&[usize]>,
        spec_text: &str,
    ) -> Result<(), ControllerError> {
        let Some((strand, _, config)) = self.config.strands.get_full(strand_name) else {
            return Err(ControllerError::UnknownStrand(strand_name.to_owned()));
        };

        let ids = match pixels {
            Some(pixels) => find_ids(Some(&IdList::List(pixels.to_vec())), None, None, config.size),
            None => find_ids(None, Some(0), Some(config.size), config.size),
        };
        let group = PixelGroup::new(COMMAND_GROUP_NAME, strand, ids, spec_text);

        if group.spec.is_animated() {
            self.generations
                .replace_generation(&self.state.strands, std::slice::from_ref(&group))?;
        } else {
            self.generations.halt()?;
            let color = pick_color(&group.spec.colors, 0.0, &mut self.rng);
            let mut target = lock_strand(&self.state.strands[strand]);
            for &id in &group.pixels {
                target.set_pixel(id, color);
            }
            if let Err(err) = target.show() {
                warn!("Failed to flush strand '{strand_name}': {err}");
            }
        }

        self.state.status = format!("Animating '{spec_text}' on {strand_name}");
        Ok(())
    }

    pub fn status(&self) -> &str {
        &self.state.status
    }

    pub fn modes(&self) -> &[String] {
        &self.state.modes
    }

    pub fn current_mode(&self) -> &str {
        &self.state.current_mode
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn strands(&self) -> &[SharedStrand] {
        &self.state.strands
    }

    /// Snapshot of one strand's buffer.
    pub fn pixel_colors(&self, strand: usize) -> Option<Vec<Color>> {
        self.state
            .strands
            .get(strand)
            .map(|shared| lock_strand(shared).pixels().to_vec())
    }

    pub fn pixel_info(&self, strand: usize, id: usize) -> Option<&PixelInfo> {
        self.state.pixel_table.get(strand)?.get(id)?.as_ref()
    }

    pub fn generation(&self) -> Option<&GenerationInfo> {
        self.generations.generation()
    }

    fn start_mode(&mut self, mode: &str) -> Result<(), ControllerError> {
        self.generations.halt()?;

        let resolved = resolve_device(&self.config, mode, &mut self.rng);
        for (shared, table) in self.state.strands.iter().zip(&resolved.pixels) {
            let mut strand = lock_strand(shared);
            for info in table.iter().flatten() {
                strand.set_pixel(info.id, info.color);
            }
            if let Err(err) = strand.show() {
                warn!("Failed to flush strand '{}': {err}", strand.name());
            }
        }

        self.state.current_mode = mode.to_owned();
        self.state.pixel_table = resolved.pixels;

        let started = self
            .generations
            .replace_generation(&self.state.strands, &resolved.groups)?;
        self.state.status = match started {
            Some(_) => format!("Mode '{mode}': {} animations", resolved.groups.len()),
            None => format!("Mode '{mode}': static colors"),
        };
        info!("{}", self.state.status);
        Ok(())
    }

    fn fill_all(&self, color: Color) {
        for shared in &self.state.strands {
            let mut strand = lock_strand(shared);
            strand.fill(color);
            if let Err(err) = strand.show() {
                warn!("Failed to flush strand '{}': {err}", strand.name());
            }
        }
    }
}
