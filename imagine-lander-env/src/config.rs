use imagine_core::YamlConfig;
use serde::{Deserialize, Serialize};

/// Configuration of [`LanderEnv`](crate::LanderEnv) and
/// [`LanderModel`](crate::LanderModel).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LanderConfig {
    /// Episodes are truncated after this number of steps.
    pub max_steps: Option<usize>,

    /// Bound of the uniformly sampled initial velocity in m/s.
    pub initial_random: f32,
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(1000),
            initial_random: 1.0,
        }
    }
}

impl LanderConfig {
    /// Sets the maximum number of steps in an episode.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the bound of the initial velocity.
    pub fn initial_random(mut self, v: f32) -> Self {
        self.initial_random = v;
        self
    }
}

impl YamlConfig for LanderConfig {}
