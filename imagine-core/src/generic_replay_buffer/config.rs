//! Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
use crate::YamlConfig;
use serde::{Deserialize, Serialize};

/// Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimpleReplayBufferConfig {
    /// Maximum number of transitions. `0` disables the buffer: pushed
    /// transitions are discarded.
    pub capacity: usize,

    /// Random seed of minibatch sampling.
    pub seed: u64,
}

impl Default for SimpleReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 10000,
            seed: 42,
        }
    }
}

impl SimpleReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed of minibatch sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl YamlConfig for SimpleReplayBufferConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_serde_simple_replay_buffer_config() -> Result<()> {
        let config = SimpleReplayBufferConfig::default().capacity(100).seed(7);

        let dir = TempDir::new("simple_replay_buffer_config")?;
        let path = dir.path().join("simple_replay_buffer_config.yaml");
        config.save(&path)?;
        let config_ = SimpleReplayBufferConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
