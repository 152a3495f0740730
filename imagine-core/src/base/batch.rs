//! Minibatches handed to a learner.

/// A minibatch of 1-step transitions `(o_t, a_t, o_t+1, r_t)`.
///
/// A learner only sees whether `o_t+1` is terminal: truncated transitions are
/// bootstrapped like any other, so their flag does not leave the batch.
pub trait TransitionBatch {
    /// Observations `o_t` and `o_t+1`.
    type ObsBatch;

    /// Actions `a_t`.
    type ActBatch;

    /// Number of transitions.
    fn len(&self) -> usize;

    /// Splits the batch into `(o_t, a_t, o_t+1, r_t, terminated_t)`.
    fn into_td_parts(self) -> (Self::ObsBatch, Self::ActBatch, Self::ObsBatch, Vec<f32>, Vec<bool>);
}
