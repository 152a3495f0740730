//! Interaction with the environment.
use crate::{record::Record, Env, ExperienceBufferBase, Policy, StepProcessor};
use anyhow::Result;

/// Outcome of [`Sampler::sample_and_push`].
pub struct SampleOutcome {
    /// Record emitted by the environment.
    pub record: Record,

    /// Return of the episode, given when the episode ended at this step.
    pub episode_return: Option<f32>,
}

/// Runs an environment with a policy and pushes the transitions into a
/// buffer.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,
    prev_obs: Option<E::Obs>,
    step_processor: P,
    episode_return: f32,
    n_episodes: usize,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a sampler.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
            episode_return: 0.0,
            n_episodes: 0,
        }
    }

    /// Returns the number of finished episodes.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    /// Performs an environment step with an action of `policy` and pushes the
    /// resulting transition into `buffer`.
    ///
    /// The environment is reset at the first call.
    pub fn sample_and_push<A, B>(&mut self, policy: &mut A, buffer: &mut B) -> Result<SampleOutcome>
    where
        A: Policy<E>,
        B: ExperienceBufferBase<Item = P::Output>,
    {
        let prev_obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => {
                let obs = self.env.reset()?;
                self.step_processor.reset(obs.clone());
                obs
            }
        };

        let act = policy.sample(&prev_obs);
        let (step, record) = self.env.step_with_reset(&act);
        let is_done = step.is_done();
        self.episode_return += step.reward;

        let next_obs = match is_done {
            true => step.init_obs.clone(),
            false => Some(step.obs.clone()),
        };

        let transition = self.step_processor.process(step);
        buffer.push(transition)?;

        // `None` makes the next call reset the environment
        self.prev_obs = next_obs;

        let episode_return = match is_done {
            true => {
                self.n_episodes += 1;
                Some(std::mem::take(&mut self.episode_return))
            }
            false => None,
        };

        Ok(SampleOutcome {
            record,
            episode_return,
        })
    }
}
