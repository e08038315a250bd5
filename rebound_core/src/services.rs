//! Seams to the collaborators the simulation calls into.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::entity::Sprite;
use crate::hud::TextMetrics;
use crate::types::{Controls, Sound};

/// Failure reported by an external service
///
/// None of these are fatal to the simulation; the driver logs them and moves on.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("render failed: {0}")]
    Render(String),

    #[error("audio failed: {0}")]
    Audio(String),

    #[error("input failed: {0}")]
    Input(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Draws sprites, one at a time, then shows the finished frame
pub trait Renderer: TextMetrics {
    fn draw(&mut self, sprite: &Sprite) -> Result<(), ServiceError>;

    /// Flip the frame built from the preceding `draw` calls
    fn present(&mut self) -> Result<(), ServiceError>;
}

/// Polled once per tick for the current key state
pub trait InputSource {
    fn poll(&mut self) -> Result<Controls, ServiceError>;
}

/// Fire-and-forget sound effects
pub trait AudioSink {
    fn play(&mut self, sound: Sound) -> Result<(), ServiceError>;

    /// Returns the new mute state
    fn toggle_mute(&mut self) -> bool {
        false
    }

    /// Returns the new volume in percent
    fn volume_up(&mut self) -> u8 {
        0
    }

    /// Returns the new volume in percent
    fn volume_down(&mut self) -> u8 {
        0
    }
}

/// Monotonic time source plus the loop's only suspension point
pub trait Clock {
    /// Time elapsed since the clock was created
    fn now(&self) -> Duration;

    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when slept on; makes runs instant and repeatable
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualClock {
    elapsed: Duration,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, duration: Duration) {
        self.elapsed += duration;
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.elapsed
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Mixer volume with a mute switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    level: u8,
    muted: bool,
}

impl Volume {
    pub const MAX: u8 = 128;
    pub const START: u8 = 104;
    pub const STEP: u8 = 8;

    pub fn new(muted: bool) -> Self {
        Volume {
            level: Self::START,
            muted,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether a sound played now would be heard
    pub fn is_audible(&self) -> bool {
        !self.muted && self.level > 0
    }

    pub fn percent(&self) -> u8 {
        (u16::from(self.level) * 100 / u16::from(Self::MAX)) as u8
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Raise by one step unless that would pass the maximum; returns percent
    pub fn up(&mut self) -> u8 {
        if self.level + Self::STEP <= Self::MAX {
            self.level += Self::STEP;
        }
        self.percent()
    }

    /// Lower by one step unless that would go below zero; returns percent
    pub fn down(&mut self) -> u8 {
        if let Some(level) = self.level.checked_sub(Self::STEP) {
            self.level = level;
        }
        self.percent()
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(false)
    }
}
