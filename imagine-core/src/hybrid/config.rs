//! Configuration of [`HybridExperienceTrainer`](super::HybridExperienceTrainer).
use crate::{
    generic_replay_buffer::SimpleReplayBufferConfig, synthetic::SyntheticGeneratorConfig, YamlConfig,
};
use serde::{Deserialize, Serialize};

/// Configuration of [`HybridExperienceTrainer`](super::HybridExperienceTrainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct HybridConfig {
    /// Synthetic replay buffer. Its capacity is also the number of transitions
    /// generated at every optimization step; `0` disables the synthetic buffer.
    pub synthetic_buffer_config: SimpleReplayBufferConfig,

    /// Generator of synthetic transitions.
    pub generator_config: SyntheticGeneratorConfig,

    /// Seed given to the generator at every optimization step.
    pub synthetic_seed: Option<u64>,

    /// Number of gradient steps per optimization step and per buffer.
    pub gradient_steps: usize,

    /// Size of minibatches.
    pub batch_size: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            synthetic_buffer_config: SimpleReplayBufferConfig::default().capacity(0),
            generator_config: SyntheticGeneratorConfig::default(),
            synthetic_seed: Some(2021),
            gradient_steps: 1,
            batch_size: 64,
        }
    }
}

impl HybridConfig {
    /// Sets the capacity of the synthetic replay buffer.
    pub fn synthetic_capacity(mut self, capacity: usize) -> Self {
        self.synthetic_buffer_config.capacity = capacity;
        self
    }

    /// Sets the configuration of the synthetic replay buffer.
    pub fn synthetic_buffer_config(mut self, config: SimpleReplayBufferConfig) -> Self {
        self.synthetic_buffer_config = config;
        self
    }

    /// Sets the configuration of the generator.
    pub fn generator_config(mut self, config: SyntheticGeneratorConfig) -> Self {
        self.generator_config = config;
        self
    }

    /// Sets the seed given to the generator at every optimization step.
    pub fn synthetic_seed(mut self, seed: Option<u64>) -> Self {
        self.synthetic_seed = seed;
        self
    }

    /// Sets the number of gradient steps.
    pub fn gradient_steps(mut self, v: usize) -> Self {
        self.gradient_steps = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }
}

impl YamlConfig for HybridConfig {}
