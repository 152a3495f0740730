//! Episodic environment.
use super::{Act, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// A single, non-vectorized episodic environment driven by
/// [`Trainer`](crate::Trainer) and [`DefaultEvaluator`](crate::DefaultEvaluator).
///
/// Compared with a [`DynamicsModel`](crate::DynamicsModel), an environment
/// owns its episode: it decides when an episode starts and ends, and cannot
/// be placed in an arbitrary state.
pub trait Env: Sized {
    /// Configuration.
    type Config: Clone;

    /// Observation.
    type Obs: Obs;

    /// Action.
    type Act: Act;

    /// Builds an environment whose initial states are drawn from `seed`.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>;

    /// Applies `act`. The record carries diagnostics of the step, if any.
    fn step(&mut self, act: &Self::Act) -> (Step<Self>, Record);

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Like [`Env::step`], but starts a new episode when the step ends the
    /// current one, storing the first observation in [`Step::init_obs`].
    fn step_with_reset(&mut self, act: &Self::Act) -> (Step<Self>, Record);

    /// Starts a new episode whose initial state depends only on `ix`.
    ///
    /// [`DefaultEvaluator`](crate::DefaultEvaluator) uses the episode number
    /// as `ix`, so that every evaluation sees the same initial states.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;
}
