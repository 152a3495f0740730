//! Acting and construction from configuration.
use super::Env;
use anyhow::Result;
use serde::de::DeserializeOwned;

/// Chooses the action taken in an observation of `E`.
///
/// Learners act through this trait both while collecting transitions, where
/// they may explore, and in evaluation episodes, where they act greedily.
pub trait Policy<E: Env> {
    /// Returns the action for `obs`.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}

/// Built from a serializable configuration, typically read from YAML.
pub trait Configurable: Sized {
    /// Configuration.
    type Config: Clone + DeserializeOwned;

    /// Builds the object, failing on an invalid configuration.
    fn build(config: Self::Config) -> Result<Self>;
}
