use super::HybridConfig;
use crate::{
    generic_replay_buffer::{BatchBase, GenericTransitionBatch, SimpleReplayBuffer},
    record::{Record, RecordValue},
    synthetic::SyntheticExperienceGenerator,
    Agent, DynamicsModel, Env, OffPolicyLearner, Policy, ReplayBufferBase,
};
use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

/// An [`Agent`] training an [`OffPolicyLearner`] on minibatches taken from
/// two replay buffers.
///
/// The primary buffer, filled with transitions of the environment, is given
/// at every optimization step. The synthetic buffer is owned by this struct
/// and is refilled with transitions generated by a [`DynamicsModel`] from
/// states of the primary buffer before the gradient steps.
///
/// An optimization step, [`HybridExperienceTrainer::train_step`], consists of
///
/// 1. updating the learning rate of the learner,
/// 2. if the capacity of the synthetic buffer is nonzero, generating as many
///    transitions as the capacity with the configured seed,
/// 3. for each gradient step, one update on a minibatch of the primary buffer
///    followed by one update on a minibatch of the synthetic buffer,
/// 4. updating the target network of the learner.
///
/// With the synthetic buffer enabled, the learner is thus updated twice per
/// gradient step, while the update counter `n_updates` increases by the
/// number of gradient steps.
pub struct HybridExperienceTrainer<L, M, O, A>
where
    M: DynamicsModel,
    O: BatchBase,
    A: BatchBase,
{
    learner: L,
    synthetic: SimpleReplayBuffer<O, A>,
    generator: SyntheticExperienceGenerator<M>,
    synthetic_seed: Option<u64>,
    gradient_steps: usize,
    batch_size: usize,
    n_updates: usize,
}

impl<L, M, O, A> HybridExperienceTrainer<L, M, O, A>
where
    L: OffPolicyLearner<GenericTransitionBatch<O, A>>,
    M: DynamicsModel,
    O: BatchBase + Clone + From<M::Obs>,
    A: BatchBase + From<M::Act>,
    M::Obs: TryFrom<O, Error = anyhow::Error>,
{
    /// Builds the trainer.
    pub fn build(learner: L, model: M, config: &HybridConfig) -> Self {
        Self {
            learner,
            synthetic: SimpleReplayBuffer::build(&config.synthetic_buffer_config),
            generator: SyntheticExperienceGenerator::build(model, &config.generator_config),
            synthetic_seed: config.synthetic_seed,
            gradient_steps: config.gradient_steps,
            batch_size: config.batch_size,
            n_updates: 0,
        }
    }

    /// Performs an optimization step on the primary buffer and the synthetic
    /// buffer.
    ///
    /// The returned record has `train/n_updates` and `train/loss`, the mean
    /// of the losses of the learner updates in this step.
    pub fn train_step(
        &mut self,
        primary: &mut SimpleReplayBuffer<O, A>,
        gradient_steps: usize,
        batch_size: usize,
    ) -> Result<Record> {
        self.learner.update_learning_rate()?;

        let use_synthetic = self.synthetic.capacity() > 0;
        if use_synthetic {
            let n = self.synthetic.capacity();
            self.generator
                .generate(primary, &mut self.synthetic, n, self.synthetic_seed)?;
        }

        let mut losses = Vec::with_capacity(2 * gradient_steps);
        for _ in 0..gradient_steps {
            let batch = primary.batch(batch_size)?;
            losses.push(self.learner.learn(batch)?);

            if use_synthetic {
                let batch = self.synthetic.batch(batch_size)?;
                losses.push(self.learner.learn(batch)?);
            }
        }

        self.n_updates += gradient_steps;
        self.learner.sync_target()?;

        let mut record = Record::from_scalar("train/n_updates", self.n_updates as f32);
        if !losses.is_empty() {
            let loss = losses.iter().sum::<f32>() / losses.len() as f32;
            debug!("n_updates = {}, loss = {}", self.n_updates, loss);
            record.insert("train/loss", RecordValue::Scalar(loss));
        }

        Ok(record)
    }

    /// Returns the number of gradient steps done so far.
    pub fn n_updates(&self) -> usize {
        self.n_updates
    }

    /// Returns a reference to the learner.
    pub fn learner(&self) -> &L {
        &self.learner
    }

    /// Returns a reference to the synthetic replay buffer.
    pub fn synthetic_buffer(&self) -> &SimpleReplayBuffer<O, A> {
        &self.synthetic
    }

    /// Returns a reference to the generator.
    pub fn generator(&self) -> &SyntheticExperienceGenerator<M> {
        &self.generator
    }
}

impl<E, L, M, O, A> Policy<E> for HybridExperienceTrainer<L, M, O, A>
where
    E: Env,
    L: Policy<E>,
    M: DynamicsModel,
    O: BatchBase,
    A: BatchBase,
{
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        self.learner.sample(obs)
    }
}

impl<E, L, M, O, A> Agent<E, SimpleReplayBuffer<O, A>> for HybridExperienceTrainer<L, M, O, A>
where
    E: Env,
    L: Policy<E> + OffPolicyLearner<GenericTransitionBatch<O, A>>,
    M: DynamicsModel,
    O: BatchBase + Clone + From<M::Obs>,
    A: BatchBase + From<M::Act>,
    M::Obs: TryFrom<O, Error = anyhow::Error>,
{
    fn train(&mut self) {
        self.learner.train();
    }

    fn eval(&mut self) {
        self.learner.eval();
    }

    fn is_train(&self) -> bool {
        self.learner.is_train()
    }

    fn opt_with_record(&mut self, buffer: &mut SimpleReplayBuffer<O, A>) -> Result<Record> {
        self.train_step(buffer, self.gradient_steps, self.batch_size)
    }

    fn save_params(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.learner.save_params(path)
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.learner.load_params(path)
    }
}
