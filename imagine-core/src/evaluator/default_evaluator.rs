use super::Evaluator;
use crate::{
    record::{Record, RecordValue},
    Env, Policy,
};
use anyhow::Result;

/// Runs a fixed number of episodes and reports the average return as
/// `eval_reward` together with the average episode length.
///
/// The `ix`-th episode starts with [`Env::reset_with_index`]`(ix)`, so that
/// every evaluation sees the same initial states.
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E, P> Evaluator<E, P> for DefaultEvaluator<E>
where
    E: Env,
    P: Policy<E>,
{
    fn evaluate(&mut self, policy: &mut P) -> Result<Record> {
        let mut r_total = 0f32;
        let mut n_steps = 0usize;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;

            loop {
                let act = policy.sample(&prev_obs);
                let (step, _) = self.env.step(&act);
                r_total += step.reward;
                n_steps += 1;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }
        }

        let n = self.n_episodes.max(1) as f32;
        Ok(Record::from_slice(&[
            ("eval_reward", RecordValue::Scalar(r_total / n)),
            ("eval_episode_length", RecordValue::Scalar(n_steps as f32 / n)),
        ]))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs an evaluator running `n_episodes` episodes on `env`.
    pub fn new(env: E, n_episodes: usize) -> Result<Self> {
        Ok(Self { n_episodes, env })
    }
}
