//! Command surface
//!
//! Requests coming from the HTTP layer or the pub/sub relay, and the queue
//! they travel through to the controller.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;
use log::{debug, warn};

use crate::color::{Color, parse_color, parse_rgb_text};

const PAYLOAD_CLEAR: &str = "clear";
const PAYLOAD_STOP: &str = "stop";
const PAYLOAD_MODE_PREFIX: &str = "mode";

/// One request to change what the lights do.
#[derive(Debug, Clone, PartialEq)]
pub enum LightCommand {
    /// Stop animations and paint every pixel of every strand
    SetColor(Color),
    /// Run a spec on one strand, on `pixels` or on the whole strand
    Animate {
        strand: String,
        pixels: Option<Vec<usize>>,
        spec: String,
    },
    /// Stop animations and paint everything black
    Clear,
    /// Start the configured animations of another mode
    SwitchMode(String),
    /// Stop animations, leaving the pixels as they are
    StopAll,
}

impl LightCommand {
    /// Decode a pub/sub payload.
    ///
    /// Understands `clear`, `stop`, `mode:<name>`, `r,g,b` (0..255 or 0..1
    /// fractions) and color names or hex codes. Anything else is logged and
    /// yields `None`.
    pub fn decode(payload: &str) -> Option<Self> {
        let payload = payload.trim();
        debug!("Decoding light command '{payload}'");

        if payload.eq_ignore_ascii_case(PAYLOAD_CLEAR) {
            return Some(Self::Clear);
        }
        if payload.eq_ignore_ascii_case(PAYLOAD_STOP) {
            return Some(Self::StopAll);
        }
        if let Some((prefix, mode)) = payload.split_once(':') {
            if prefix.trim().eq_ignore_ascii_case(PAYLOAD_MODE_PREFIX) {
                let mode = mode.trim();
                if mode.is_empty() {
                    warn!("Ignoring mode command without a mode name");
                    return None;
                }
                return Some(Self::SwitchMode(mode.to_owned()));
            }
        }

        let color = if payload.contains(',') {
            parse_rgb_text(payload)
        } else {
            parse_color(payload)
        };
        match color {
            Ok(color) => Some(Self::SetColor(color)),
            Err(err) => {
                warn!("Unrecognized light command '{payload}': {err}");
                None
            }
        }
    }

    /// Whether the command repaints every pixel of every strand.
    pub const fn is_wipe(&self) -> bool {
        matches!(self, Self::SetColor(_) | Self::Clear)
    }

    /// Short description used for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::SetColor(color) => format!("set color {color}"),
            Self::Animate { strand, spec, .. } => format!("animate '{spec}' on '{strand}'"),
            Self::Clear => "clear".to_owned(),
            Self::SwitchMode(mode) => format!("switch to mode '{mode}'"),
            Self::StopAll => "stop all".to_owned(),
        }
    }
}

/// Returned by [`CommandQueue::push`] when the queue is full.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("command queue is full, dropping '{}'", .0.describe())]
pub struct QueueFull(pub LightCommand);

/// Bounded queue between the request layers and the controller.
///
/// Safe to push from any thread. A wipe (`SetColor` or `Clear`) repaints
/// every pixel and halts the generation, so pushing one discards the queued
/// commands it overrides. Mode switches are kept since they also change the
/// current mode.
pub struct CommandQueue<const SIZE: usize> {
    queue: Mutex<RefCell<Deque<LightCommand, SIZE>>>,
}

impl<const SIZE: usize> CommandQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub fn push(&self, command: LightCommand) -> Result<(), QueueFull> {
        critical_section::with(|cs| {
            let mut queue = self.queue.borrow(cs).borrow_mut();
            if command.is_wipe() {
                let before = queue.len();
                for _ in 0..before {
                    if let Some(queued) = queue.pop_front() {
                        if matches!(queued, LightCommand::SwitchMode(_)) {
                            // Room was just freed by the pop
                            let _ = queue.push_back(queued);
                        }
                    }
                }
                if queue.len() < before {
                    debug!(
                        "'{}' overrides {} queued commands",
                        command.describe(),
                        before - queue.len()
                    );
                }
            }
            queue.push_back(command).map_err(QueueFull)
        })
    }

    /// Take the oldest queued command.
    pub fn pop(&self) -> Option<LightCommand> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().pop_front())
    }

    /// Iterate over everything queued right now without blocking.
    pub fn drain(&self) -> impl Iterator<Item = LightCommand> + '_ {
        core::iter::from_fn(|| self.pop())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}
