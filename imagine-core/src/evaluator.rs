//! Evaluation of policies.
use crate::{record::Record, Env, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluates a policy.
pub trait Evaluator<E: Env, P: Policy<E>> {
    /// Runs evaluation episodes and returns a record with `eval_reward`, the
    /// evaluation score used by [`Trainer`](crate::Trainer) to pick the best
    /// parameters.
    ///
    /// The caller of this method needs to handle the internal state of
    /// `policy`, like training/evaluation mode.
    fn evaluate(&mut self, policy: &mut P) -> Result<Record>;
}
