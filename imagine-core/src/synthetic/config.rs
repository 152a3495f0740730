//! Configuration of [`SyntheticExperienceGenerator`](super::SyntheticExperienceGenerator).
use crate::YamlConfig;
use serde::{Deserialize, Serialize};

/// Configuration of [`SyntheticExperienceGenerator`](super::SyntheticExperienceGenerator).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct SyntheticGeneratorConfig {
    /// Initial seed of the random number generator. It is seeded from the
    /// operating system when `None`.
    pub seed: Option<u64>,
}

impl SyntheticGeneratorConfig {
    /// Sets the initial seed.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

impl YamlConfig for SyntheticGeneratorConfig {}
