//! Transition batch.
use crate::TransitionBatch;
use anyhow::Result;

/// A container of observations or actions with random access.
///
/// It is used both as the storage of [`SimpleReplayBuffer`](super::SimpleReplayBuffer)
/// and as the minibatch sampled from it.
pub trait BatchBase {
    /// Creates an empty container for `capacity` samples.
    fn new(capacity: usize) -> Self;

    /// Writes the samples in `data` from index `ix`, wrapping around at the
    /// capacity.
    ///
    /// Fails with [`ShapeMismatch`](crate::error::ImagineError::ShapeMismatch)
    /// if the shape of a sample differs from the samples already stored.
    fn push(&mut self, ix: usize, data: Self) -> Result<()>;

    /// Gathers the samples at the given indices.
    fn sample(&self, ixs: &Vec<usize>) -> Self;
}

/// Transitions `(o_t, a_t, o_t+1, r_t)` with their episode-end flags, both as
/// they are pushed into a [`SimpleReplayBuffer`](super::SimpleReplayBuffer)
/// and as a sampled minibatch.
#[derive(Clone, Debug)]
pub struct GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Observations `o_t`.
    pub obs: O,

    /// Actions `a_t`.
    pub act: A,

    /// Observations `o_t+1`.
    pub next_obs: O,

    /// Rewards `r_t`.
    pub reward: Vec<f32>,

    /// `o_t+1` is a terminal state.
    pub is_terminated: Vec<bool>,

    /// The episode was cut off at `o_t+1` by a time limit.
    pub is_truncated: Vec<bool>,
}

impl<O, A> TransitionBatch for GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type ObsBatch = O;
    type ActBatch = A;

    fn len(&self) -> usize {
        self.reward.len()
    }

    fn into_td_parts(self) -> (O, A, O, Vec<f32>, Vec<bool>) {
        (self.obs, self.act, self.next_obs, self.reward, self.is_terminated)
    }
}

impl<O, A> GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// A batch holding one transition.
    pub fn single(
        obs: O,
        act: A,
        next_obs: O,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
    ) -> Self {
        Self {
            obs,
            act,
            next_obs,
            reward: vec![reward],
            is_terminated: vec![is_terminated],
            is_truncated: vec![is_truncated],
        }
    }
}
