use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration structure for the visualizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub pacing: PacingConfig,
    pub generation: GenerationConfig,
}

impl VisualizerConfig {
    /// Reads a JSON configuration file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Configuration for runs that should not sleep between steps.
    pub fn headless() -> Self {
        Self {
            pacing: PacingConfig {
                animate: false,
                ..PacingConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Timing parameters for the pacing controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Speed multiplier used when a run does not specify one.
    pub default_speed: f64,
    /// Lower bound for the per-step delay.
    pub min_delay_ms: u64,
    /// Delay at speed 1.0; divided by the speed multiplier.
    pub base_delay_ms: u64,
    /// How often a paused run re-checks the pause flag.
    pub pause_poll_ms: u64,
    /// When false, checkpoints still honor pause and cancel but never wait.
    pub animate: bool,
}

impl PacingConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn pause_poll(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms)
    }

    /// `max(min_delay, base_delay / speed)`.
    pub fn step_delay(&self, speed: f64) -> Duration {
        if !self.animate {
            return Duration::ZERO;
        }
        let nanos = (self.base_delay_ms as f64 * 1_000_000.0 / speed).round();
        Duration::from_nanos(nanos as u64).max(self.min_delay())
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            default_speed: 1.0,
            min_delay_ms: 50,
            base_delay_ms: 400,
            pause_poll_ms: 100,
            animate: true,
        }
    }
}

/// Parameters for random sequence generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub size: usize,
    pub min_value: u32,
    pub max_value: u32,
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            size: 30,
            min_value: 1,
            max_value: 100,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_delay_follows_speed_with_floor() {
        let pacing = PacingConfig::default();
        assert_eq!(pacing.step_delay(1.0), Duration::from_millis(400));
        assert_eq!(pacing.step_delay(4.0), Duration::from_millis(100));
        assert_eq!(pacing.step_delay(100.0), Duration::from_millis(50));
    }

    #[test]
    fn headless_has_no_step_delay() {
        let config = VisualizerConfig::headless();
        assert_eq!(config.pacing.step_delay(1.0), Duration::ZERO);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: VisualizerConfig =
            serde_json::from_str(r#"{ "generation": { "size": 12 } }"#).unwrap();
        assert_eq!(config.generation.size, 12);
        assert_eq!(config.generation.max_value, 100);
        assert_eq!(config.pacing, PacingConfig::default());
    }
}
