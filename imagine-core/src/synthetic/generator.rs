use super::SyntheticGeneratorConfig;
use crate::{
    error::ImagineError,
    generic_replay_buffer::{BatchBase, GenericTransitionBatch, SimpleReplayBuffer},
    DynamicsModel, ExperienceBufferBase,
};
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Fills a replay buffer with transitions obtained from a [`DynamicsModel`].
///
/// Each transition starts from a state drawn uniformly from the observations
/// `o_t` of a source buffer. The model is placed in that state, a uniformly
/// random action is applied and the outcome is pushed into the destination
/// buffer. All random draws, including the action, use the random number
/// generator owned by this struct, so that a fixed seed gives identical
/// transitions for identical inputs.
///
/// The next state is used as returned by the model. Perturbing it, for
/// example by adding noise, would go in [`Self::generate`] between the model
/// step and the push.
pub struct SyntheticExperienceGenerator<M: DynamicsModel> {
    model: M,
    rng: StdRng,
}

/// Converts an error of the model into [`ImagineError::ModelInvocation`],
/// keeping errors of this crate as they are.
fn model_error(e: anyhow::Error) -> anyhow::Error {
    match e.downcast::<ImagineError>() {
        Ok(e) => e.into(),
        Err(e) => ImagineError::ModelInvocation(format!("{:#}", e)).into(),
    }
}

impl<M: DynamicsModel> SyntheticExperienceGenerator<M> {
    /// Builds a generator owning `model`.
    pub fn build(model: M, config: &SyntheticGeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { model, rng }
    }

    /// Returns a reference to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Re-seeds the random number generator.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Appends `n` transitions generated by the model to `dest`.
    ///
    /// If `seed` is given, the random number generator is re-seeded with it
    /// before sampling; otherwise its stream continues.
    ///
    /// Does nothing when `n` is 0, even if `source` is empty. Otherwise fails
    /// with [`ImagineError::EmptySource`] if `source` is empty, in which case
    /// `dest` is left unchanged. Errors of the model are returned as
    /// [`ImagineError::ModelInvocation`] without retrying; transitions pushed
    /// before the error remain in `dest`.
    pub fn generate<O, A>(
        &mut self,
        source: &SimpleReplayBuffer<O, A>,
        dest: &mut SimpleReplayBuffer<O, A>,
        n: usize,
        seed: Option<u64>,
    ) -> Result<()>
    where
        O: BatchBase + Clone + From<M::Obs>,
        A: BatchBase + From<M::Act>,
        M::Obs: TryFrom<O, Error = anyhow::Error>,
    {
        if let Some(seed) = seed {
            self.reseed(seed);
        }

        if n == 0 {
            return Ok(());
        }
        if source.len() == 0 {
            return Err(ImagineError::EmptySource.into());
        }

        for _ in 0..n {
            let ix = self.rng.gen_range(0..source.len());
            let obs = source.obs_at(ix);
            let state = M::Obs::try_from(obs.clone())?;

            self.model.reset_to(&state).map_err(model_error)?;
            let act = self.model.sample_action(&mut self.rng);
            let step = self.model.step(&act).map_err(model_error)?;
            trace!("Synthetic transition from index {}: info={:?}", ix, step.info);

            let is_terminated = step.is_terminated;
            let is_truncated = step.is_truncated;
            dest.push(GenericTransitionBatch::single(
                obs,
                act.into(),
                step.obs.into(),
                step.reward,
                is_terminated,
                is_truncated,
            ))?;
        }

        debug!(
            "Generated {} synthetic transitions from {} source transitions",
            n,
            source.len()
        );

        Ok(())
    }
}
