use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::{PacingConfig, Result, SortifyError};

/// Source of waiting. The pacing controller never sleeps on its own, it asks
/// the clock, so tests can drive pacing without real time passing.
pub trait Clock: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Clock backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Flags shared between a run and whoever controls it. Cloning yields a
/// handle to the same flags.
#[derive(Debug, Clone)]
pub struct RunSignals {
    shared: Arc<SignalState>,
}

#[derive(Debug)]
struct SignalState {
    paused: AtomicBool,
    cancelled: AtomicBool,
    speed_bits: AtomicU64,
}

impl RunSignals {
    pub fn new(speed: f64) -> Self {
        Self {
            shared: Arc::new(SignalState {
                paused: AtomicBool::new(false),
                cancelled: AtomicBool::new(false),
                speed_bits: AtomicU64::new(speed.to_bits()),
            }),
        }
    }

    /// Clears pause and cancel and installs the speed for a fresh run.
    pub(crate) fn begin_run(&self, speed: f64) {
        self.shared.paused.store(false, Ordering::SeqCst);
        self.shared.cancelled.store(false, Ordering::SeqCst);
        self.shared.speed_bits.store(speed.to_bits(), Ordering::SeqCst);
    }

    pub fn set_paused(&self, paused: bool) {
        self.shared.paused.store(paused, Ordering::SeqCst);
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&self) -> bool {
        !self.shared.paused.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    /// Requests that the current run stops at its next checkpoint.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Changes the speed multiplier; takes effect at the next checkpoint.
    pub fn set_speed(&self, speed: f64) -> Result<()> {
        validate_speed(speed)?;
        self.shared.speed_bits.store(speed.to_bits(), Ordering::SeqCst);
        Ok(())
    }

    pub fn speed(&self) -> f64 {
        f64::from_bits(self.shared.speed_bits.load(Ordering::SeqCst))
    }
}

impl Default for RunSignals {
    fn default() -> Self {
        Self::new(1.0)
    }
}

pub fn validate_speed(speed: f64) -> Result<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(SortifyError::InvalidSpeed(speed))
    }
}

/// A suspension point. Every accessor operation passes through `suspend`
/// with a scale relative to the base step delay.
pub trait Pacer {
    fn suspend(&mut self, scale: f64) -> Result<()>;

    /// Blocks while paused without waiting a step delay. Called right before
    /// a mutation that has no suspension of its own in front of it.
    fn hold(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Pacer that never waits and never stops. Used to check algorithms
/// independently of timing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn suspend(&mut self, _scale: f64) -> Result<()> {
        Ok(())
    }
}

/// Converts the speed setting into waits and gates execution on the pause
/// and cancel flags.
pub struct PacingController {
    config: PacingConfig,
    signals: RunSignals,
    clock: Arc<dyn Clock>,
    checkpoints: u64,
}

impl PacingController {
    pub fn new(config: PacingConfig, signals: RunSignals, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            signals,
            clock,
            checkpoints: 0,
        }
    }

    /// Delay for a checkpoint with scale 1.0 at the current speed.
    pub fn base_delay(&self) -> Duration {
        self.config.step_delay(self.signals.speed())
    }

    /// Number of checkpoints passed so far.
    pub fn checkpoints(&self) -> u64 {
        self.checkpoints
    }

    fn ensure_live(&self) -> Result<()> {
        if self.signals.is_cancelled() {
            Err(SortifyError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Pacer for PacingController {
    fn suspend(&mut self, scale: f64) -> Result<()> {
        self.checkpoints += 1;
        self.hold()?;

        let delay = scaled(self.base_delay(), scale);
        if !delay.is_zero() {
            self.clock.sleep(delay);
        }
        // pause may have been requested during the delay
        self.hold()
    }

    fn hold(&mut self) -> Result<()> {
        loop {
            self.ensure_live()?;
            if !self.signals.is_paused() {
                return Ok(());
            }
            self.clock.sleep(self.config.pause_poll());
        }
    }
}

fn scaled(delay: Duration, scale: f64) -> Duration {
    let nanos = (delay.as_nanos() as f64 * scale.max(0.0)).round();
    Duration::from_nanos(nanos as u64)
}

impl std::fmt::Debug for PacingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacingController")
            .field("config", &self.config)
            .field("signals", &self.signals)
            .field("checkpoints", &self.checkpoints)
            .finish()
    }
}
