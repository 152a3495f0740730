//! Dynamics model.
use crate::record::Record;
use anyhow::Result;
use rand::Rng;

/// Outcome of a single step of a [`DynamicsModel`].
#[derive(Clone, Debug)]
pub struct ModelStep<O> {
    /// Next state.
    pub obs: O,

    /// Reward.
    pub reward: f32,

    /// The episode reached a terminal state.
    pub is_terminated: bool,

    /// The episode was cut off by a time limit.
    pub is_truncated: bool,

    /// Auxiliary information of the step.
    pub info: Record,
}

/// A state transition function whose internal state can be set to an
/// arbitrary state.
///
/// Unlike [`Env`](crate::Env), a dynamics model does not keep track of
/// episodes: [`DynamicsModel::reset_to`] places it in the given state and
/// [`DynamicsModel::step`] advances it by one step from there. Errors are
/// reported as [`ModelInvocation`](crate::error::ImagineError::ModelInvocation).
pub trait DynamicsModel {
    /// State of the model.
    type Obs;

    /// Action of the model.
    type Act;

    /// Sets the internal state to `obs`.
    fn reset_to(&mut self, obs: &Self::Obs) -> Result<()>;

    /// Applies `act` to the current state.
    fn step(&mut self, act: &Self::Act) -> Result<ModelStep<Self::Obs>>;

    /// Samples an action uniformly from the action space.
    fn sample_action<R: Rng>(&self, rng: &mut R) -> Self::Act;
}
