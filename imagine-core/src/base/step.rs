//! Outcome of an environment step.
use super::Env;

/// What the environment returns after an action.
///
/// `obs` is the observation reached by `act`. When the step ends the episode
/// and the environment restarted it, `init_obs` holds the first observation
/// of the new episode, see [`Env::step_with_reset`].
pub struct Step<E: Env> {
    /// Action taken.
    pub act: E::Act,

    /// Observation reached by `act`.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// A terminal state was reached; the value of `obs` is not bootstrapped.
    pub is_terminated: bool,

    /// The episode was cut off by a time limit.
    pub is_truncated: bool,

    /// First observation of the next episode.
    pub init_obs: Option<E::Obs>,
}

impl<E: Env> Step<E> {
    /// A step within an episode, without `init_obs`.
    pub fn new(act: E::Act, obs: E::Obs, reward: f32, is_terminated: bool, is_truncated: bool) -> Self {
        Self {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            init_obs: None,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}

/// Turns the steps of an environment into items of a replay buffer.
///
/// Used by [`Sampler`](crate::Sampler), which pushes the output of
/// [`StepProcessor::process`] into an
/// [`ExperienceBufferBase`](crate::ExperienceBufferBase).
pub trait StepProcessor<E: Env> {
    /// Item pushed into the buffer.
    type Output;

    /// Starts an episode from `init_obs`.
    fn reset(&mut self, init_obs: E::Obs);

    /// Converts a step into a buffer item.
    fn process(&mut self, step: Step<E>) -> Self::Output;
}
