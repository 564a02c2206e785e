//! Frame scheduling and timing utilities.
//!
//! One scheduler drives every generator of a generation from a single loop.
//! Each tick it bumps the iteration counter, advances the generators whose
//! interval divides it, then flushes every strand that was written once.
//! The caller is responsible for sleeping/waiting between ticks.

use embassy_time::{Duration, Instant};
use log::{trace, warn};

use crate::{
    animation::AnimationSlot,
    strand::{SharedStrand, lock_strand},
};

/// Default tick quantum (10 ms).
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(10);

/// A generator bound to one strand of the registry.
#[derive(Debug)]
pub struct ActiveAnimation {
    /// Index into the scheduler's strand list
    pub strand: usize,
    /// Name of the configured group, for logs and status
    pub name: String,
    pub slot: AnimationSlot,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Iteration number of this tick, starting at 1
    pub tick: u64,
    /// Generators that produced a frame
    pub advanced: usize,
    /// Strands flushed to their driver
    pub flushed: usize,
}

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (may be zero if behind schedule).
    pub sleep_duration: Duration,
    pub report: TickReport,
}

/// Cooperative tick loop over a fixed set of generators.
///
/// This scheduler:
/// - Counts ticks and advances each generator on its own cadence
/// - Flushes each touched strand exactly once per tick
/// - Tracks tick timing with drift correction
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(strands, animations);
///
/// loop {
///     let result = scheduler.tick(now());
///     sleep(result.sleep_duration);
/// }
/// ```
#[derive(Debug)]
pub struct FrameScheduler {
    strands: Vec<SharedStrand>,
    animations: Vec<ActiveAnimation>,
    iteration: u64,
    next_frame: Instant,
    frame_duration: Duration,
}

impl FrameScheduler {
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (10 ms) as the tick quantum.
    pub fn new(strands: Vec<SharedStrand>, animations: Vec<ActiveAnimation>) -> Self {
        Self::with_frame_duration(strands, animations, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with a custom tick quantum.
    pub fn with_frame_duration(
        strands: Vec<SharedStrand>,
        animations: Vec<ActiveAnimation>,
        frame_duration: Duration,
    ) -> Self {
        Self {
            strands,
            animations,
            iteration: 0,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Run one tick without any timing bookkeeping.
    pub fn step(&mut self) -> TickReport {
        self.iteration = self.iteration.wrapping_add(1);
        let mut touched = vec![false; self.strands.len()];
        let mut advanced = 0;

        for animation in &mut self.animations {
            let interval = u64::from(animation.slot.frame_interval_ticks().max(1));
            if self.iteration % interval != 0 {
                continue;
            }
            let Some(shared) = self.strands.get(animation.strand) else {
                warn!(
                    "Animation '{}' is bound to missing strand {}",
                    animation.name, animation.strand
                );
                continue;
            };

            animation.slot.advance(&mut lock_strand(shared));
            touched[animation.strand] = true;
            advanced += 1;
        }

        let mut flushed = 0;
        for (shared, _) in self.strands.iter().zip(&touched).filter(|(_, t)| **t) {
            let mut strand = lock_strand(shared);
            if let Err(err) = strand.show() {
                warn!("Failed to flush strand '{}': {err}", strand.name());
            }
            flushed += 1;
        }

        trace!(
            "Tick {}: {advanced} animations advanced, {flushed} strands flushed",
            self.iteration
        );
        TickReport {
            tick: self.iteration,
            advanced,
            flushed,
        }
    }

    /// Process one tick and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Advances due generators and flushes their strands
    /// 3. Returns the deadline for the next tick
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Drift correction: if we've fallen too far behind, reset to now
        // This prevents catch-up bursts after long stalls
        let max_drift = self.frame_duration.as_millis() * 2;
        if now.as_millis() > self.next_frame.as_millis() + max_drift {
            self.next_frame = now;
        }

        let report = self.step();

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_frame.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            report,
        }
    }

    pub const fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn animations(&self) -> &[ActiveAnimation] {
        &self.animations
    }

    pub fn strands(&self) -> &[SharedStrand] {
        &self.strands
    }
}
