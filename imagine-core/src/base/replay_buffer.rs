//! Storage of transitions.
use anyhow::Result;

/// The side of a buffer that receives transitions.
pub trait ExperienceBufferBase {
    /// What is pushed, usually a batch of one transition.
    type Item;

    /// Stores `tr`, overwriting the oldest transitions when full.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// Number of stored transitions.
    fn len(&self) -> usize;
}

/// The side of a buffer that hands out minibatches.
pub trait ReplayBufferBase {
    /// Configuration.
    type Config: Clone;

    /// Minibatch type.
    type Batch;

    /// Builds an empty buffer.
    fn build(config: &Self::Config) -> Self;

    /// Samples `size` transitions.
    ///
    /// Fails with [`InsufficientData`](crate::error::ImagineError::InsufficientData)
    /// when fewer than `size` transitions are stored.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
