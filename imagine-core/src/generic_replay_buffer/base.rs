//! Ring buffer of transitions.
use super::{BatchBase, GenericTransitionBatch, SimpleReplayBufferConfig};
use crate::{error::ImagineError, ExperienceBufferBase, ReplayBufferBase, TransitionBatch};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A fixed-capacity replay buffer.
///
/// Transitions are written at a cursor that wraps around at the capacity, so
/// that the oldest transition is overwritten once the buffer is full.
/// Minibatches are sampled uniformly with replacement from the stored
/// transitions with a random number generator owned by the buffer.
///
/// A buffer with capacity 0 is disabled: pushed transitions are discarded.
pub struct SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    capacity: usize,

    /// Position where the next transition is written.
    i: usize,

    /// Number of stored transitions.
    size: usize,

    obs: O,
    act: A,
    next_obs: O,
    reward: Vec<f32>,
    is_terminated: Vec<bool>,
    is_truncated: Vec<bool>,
    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    #[inline]
    fn push_scalars<T: Copy>(dst: &mut [T], i: usize, src: &[T]) {
        let capacity = dst.len();
        for (k, v) in src.iter().enumerate() {
            dst[(i + k) % capacity] = *v;
        }
    }

    fn sample_scalars<T: Copy>(src: &[T], ixs: &[usize]) -> Vec<T> {
        ixs.iter().map(|&ix| src[ix]).collect()
    }

    /// Returns the capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` once the number of stored transitions has reached the
    /// capacity. It stays `true` afterwards.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.size == self.capacity
    }

    /// Returns the observation `o_t` of the transition at `ix`.
    ///
    /// `ix` must be less than [`ExperienceBufferBase::len`].
    pub fn obs_at(&self, ix: usize) -> O {
        debug_assert!(ix < self.size);
        self.obs.sample(&vec![ix])
    }

    /// Returns the rewards of the stored transitions in storage order.
    pub fn rewards(&self) -> &[f32] {
        &self.reward[..self.size]
    }

    /// Returns the number of stored transitions with the termination flag.
    pub fn num_terminated_flags(&self) -> usize {
        self.is_terminated[..self.size].iter().filter(|&&f| f).count()
    }

    /// Returns the next observation `o_t+1` of the transition at `ix`.
    pub fn next_obs_at(&self, ix: usize) -> O {
        debug_assert!(ix < self.size);
        self.next_obs.sample(&vec![ix])
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Item = GenericTransitionBatch<O, A>;

    fn len(&self) -> usize {
        self.size
    }

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }

        let len = tr.len();
        self.obs.push(self.i, tr.obs)?;
        self.act.push(self.i, tr.act)?;
        self.next_obs.push(self.i, tr.next_obs)?;
        Self::push_scalars(&mut self.reward, self.i, &tr.reward);
        Self::push_scalars(&mut self.is_terminated, self.i, &tr.is_terminated);
        Self::push_scalars(&mut self.is_truncated, self.i, &tr.is_truncated);

        self.i = (self.i + len) % self.capacity;
        self.size = (self.size + len).min(self.capacity);

        Ok(())
    }
}

impl<O, A> ReplayBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Config = SimpleReplayBufferConfig;
    type Batch = GenericTransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Self {
        let capacity = config.capacity;

        Self {
            capacity,
            i: 0,
            size: 0,
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: vec![0.; capacity],
            is_terminated: vec![false; capacity],
            is_truncated: vec![false; capacity],
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        if size > self.size {
            return Err(ImagineError::InsufficientData {
                requested: size,
                available: self.size,
            }
            .into());
        }

        let ixs = (0..size)
            .map(|_| self.rng.gen_range(0..self.size))
            .collect::<Vec<_>>();

        Ok(Self::Batch {
            obs: self.obs.sample(&ixs),
            act: self.act.sample(&ixs),
            next_obs: self.next_obs.sample(&ixs),
            reward: Self::sample_scalars(&self.reward, &ixs),
            is_terminated: Self::sample_scalars(&self.is_terminated, &ixs),
            is_truncated: Self::sample_scalars(&self.is_truncated, &ixs),
        })
    }
}
