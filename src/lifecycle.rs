//! Generation lifecycle
//!
//! A generation is the full set of generators running at one time. It lives
//! on its own thread around a [`FrameScheduler`]; the thread sleeps on the
//! stop channel between ticks so a halt interrupts it right away.
//! [`GenerationManager`] makes sure at most one generation is ever running.

use std::{
    fmt,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender},
    thread::{self, JoinHandle},
    time::Instant as StdInstant,
};

use embassy_time::{Duration, Instant};
use fastrand::Rng;
use log::{debug, error, info, warn};

use crate::{
    animation::AnimationSlot,
    frame_scheduler::{ActiveAnimation, DEFAULT_FRAME_DURATION, FrameScheduler},
    resolver::PixelGroup,
    spec::AnimationKind,
    strand::{SharedStrand, lock_strand},
};

/// How long a halt waits for the generation thread to acknowledge.
pub const HALT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(thiserror::Error, Debug)]
pub enum LifecycleError {
    #[error("animation group '{group}' is bound to unknown strand {strand}")]
    UnknownStrand { group: String, strand: usize },
    #[error("failed to spawn generation thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("generation {0} did not stop in time")]
    HaltTimeout(GenerationId),
}

/// Sequential id of a generation, unique per manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationId(pub u64);

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationInfo {
    pub strand: usize,
    pub name: String,
    pub kind: AnimationKind,
    pub pixel_count: usize,
}

/// Description of the running generation.
#[derive(Debug, Clone)]
pub struct GenerationInfo {
    pub id: GenerationId,
    pub started_at: StdInstant,
    pub animations: Vec<AnimationInfo>,
}

#[derive(Debug)]
struct RunningGeneration {
    info: GenerationInfo,
    stop: Sender<()>,
    done: Receiver<()>,
    handle: JoinHandle<()>,
}

/// Owner of the single running generation.
#[derive(Debug)]
pub struct GenerationManager {
    running: Option<RunningGeneration>,
    next_id: u64,
    frame_duration: Duration,
    halt_timeout: Duration,
    rng: Rng,
}

impl Default for GenerationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationManager {
    pub fn new() -> Self {
        Self::with_rng(Rng::new())
    }

    /// Manager whose generators draw their randomness from `rng`.
    pub fn with_rng(rng: Rng) -> Self {
        Self {
            running: None,
            next_id: 1,
            frame_duration: DEFAULT_FRAME_DURATION,
            halt_timeout: HALT_TIMEOUT,
            rng,
        }
    }

    /// Change the tick quantum of generations started from now on.
    #[must_use]
    pub fn with_frame_duration(mut self, frame_duration: Duration) -> Self {
        self.frame_duration = frame_duration;
        self
    }

    #[must_use]
    pub fn with_halt_timeout(mut self, halt_timeout: Duration) -> Self {
        self.halt_timeout = halt_timeout;
        self
    }

    pub fn generation(&self) -> Option<&GenerationInfo> {
        self.running.as_ref().map(|running| &running.info)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Stop the current generation and start one running `groups`.
    ///
    /// The old generation has fully stopped before anything of the new one is
    /// built. Groups without an animation are ignored; when none is left no
    /// thread is started and `Ok(None)` is returned.
    pub fn replace_generation(
        &mut self,
        strands: &[SharedStrand],
        groups: &[PixelGroup],
    ) -> Result<Option<GenerationId>, LifecycleError> {
        self.halt()?;

        let animated: Vec<&PixelGroup> = groups
            .iter()
            .filter(|group| group.spec.is_animated())
            .collect();
        if let Some(group) = animated.iter().find(|group| group.strand >= strands.len()) {
            return Err(LifecycleError::UnknownStrand {
                group: group.name.clone(),
                strand: group.strand,
            });
        }

        let mut animations = Vec::with_capacity(animated.len());
        for group in animated {
            let mut strand = lock_strand(&strands[group.strand]);
            let slot = AnimationSlot::new(
                &group.spec,
                group.pixels.clone(),
                &mut strand,
                self.rng.fork(),
            );
            if let Some(slot) = slot {
                debug!(
                    "Prepared {} animation '{}' on strand '{}' ({} pixels, every {} ticks)",
                    slot.kind().as_str(),
                    group.name,
                    strand.name(),
                    group.pixels.len(),
                    slot.frame_interval_ticks()
                );
                animations.push(ActiveAnimation {
                    strand: group.strand,
                    name: group.name.clone(),
                    slot,
                });
            }
        }

        if animations.is_empty() {
            info!("No animations to run");
            return Ok(None);
        }

        let id = GenerationId(self.next_id);
        self.next_id += 1;
        let info = GenerationInfo {
            id,
            started_at: StdInstant::now(),
            animations: animations
                .iter()
                .map(|animation| AnimationInfo {
                    strand: animation.strand,
                    name: animation.name.clone(),
                    kind: animation.slot.kind(),
                    pixel_count: animation.slot.pixels().len(),
                })
                .collect(),
        };

        let scheduler =
            FrameScheduler::with_frame_duration(strands.to_vec(), animations, self.frame_duration);
        let (stop_tx, stop_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        let handle = thread::Builder::new()
            .name(format!("generation-{}", id.0))
            .spawn(move || run_generation(scheduler, &stop_rx, &done_tx))?;

        info!(
            "Started generation {id} with {} animations",
            info.animations.len()
        );
        self.running = Some(RunningGeneration {
            info,
            stop: stop_tx,
            done: done_rx,
            handle,
        });
        Ok(Some(id))
    }

    /// Stop the running generation, if any, and wait for its thread.
    ///
    /// Calling it with nothing running is a no-op. On timeout the generation
    /// stays recorded with its stop already signalled, so a later call can
    /// finish the job.
    pub fn halt(&mut self) -> Result<(), LifecycleError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        let id = running.info.id;

        // Fails only when the thread is already gone
        let _ = running.stop.send(());
        match running.done.recv_timeout(to_std(self.halt_timeout)) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            Err(RecvTimeoutError::Timeout) => {
                warn!("Generation {id} did not acknowledge the stop signal");
                self.running = Some(running);
                return Err(LifecycleError::HaltTimeout(id));
            }
        }

        if running.handle.join().is_err() {
            error!("Generation {id} panicked");
        }
        info!("Stopped generation {id}");
        Ok(())
    }
}

impl Drop for GenerationManager {
    fn drop(&mut self) {
        if let Err(err) = self.halt() {
            error!("Leaving a generation behind: {err}");
        }
    }
}

fn to_std(duration: Duration) -> std::time::Duration {
    std::time::Duration::from_micros(duration.as_micros())
}

fn run_generation(mut scheduler: FrameScheduler, stop: &Receiver<()>, done: &SyncSender<()>) {
    let epoch = StdInstant::now();
    loop {
        let elapsed = u64::try_from(epoch.elapsed().as_micros()).unwrap_or(u64::MAX);
        let result = scheduler.tick(Instant::from_micros(elapsed));

        match stop.recv_timeout(to_std(result.sleep_duration)) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("Generation loop exited after {} ticks", scheduler.iteration());
    let _ = done.send(());
}
