//! Conversion of environment steps into transitions.
use super::{BatchBase, GenericTransitionBatch};
use crate::{Env, Obs, Step, StepProcessor};
use std::marker::PhantomData;

/// Produces 1-step transitions `(o_t, a_t, o_t+1, r_t)` from [`Step`]s.
///
/// The processor keeps the previous observation `o_t`. When the episode ends,
/// it is replaced with [`Step::init_obs`], the first observation of the next
/// episode.
pub struct SimpleStepProcessor<E, O, A> {
    prev_obs: Option<O>,
    phantom: PhantomData<(E, A)>,
}

impl<E, O, A> Default for SimpleStepProcessor<E, O, A> {
    fn default() -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }
}

impl<E, O, A> StepProcessor<E> for SimpleStepProcessor<E, O, A>
where
    E: Env,
    O: BatchBase + From<E::Obs>,
    A: BatchBase + From<E::Act>,
{
    type Output = GenericTransitionBatch<O, A>;

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs.into());
    }

    /// # Panics
    ///
    /// Panics if [`StepProcessor::reset`] has not been called, or if the step
    /// ends an episode without [`Step::init_obs`].
    fn process(&mut self, step: Step<E>) -> Self::Output {
        assert_eq!(step.obs.len(), 1);

        let is_done = step.is_done();
        let next_obs = step.obs.clone().into();
        let obs = self
            .prev_obs
            .replace(step.obs.into())
            .expect("prev_obs is not set. Forgot to call reset()?");

        if is_done {
            let init_obs = step.init_obs.expect("init_obs is required at the end of an episode");
            self.prev_obs.replace(init_obs.into());
        }

        GenericTransitionBatch::single(
            obs,
            step.act.into(),
            next_obs,
            step.reward,
            step.is_terminated,
            step.is_truncated,
        )
    }
}
