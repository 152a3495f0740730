//! Train [`Agent`].
mod config;
mod sampler;
use std::{
    path::Path,
    time::{Duration, SystemTime},
};

use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    Agent, Env, Evaluator, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;
pub use sampler::{SampleOutcome, Sampler};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// 1. Reset the counters `env_steps = 0`, `opt_steps = 0` and the episode counter.
/// 2. Do an environment step and push a transition into the replay buffer.
///    `env_steps += 1`. When the episode ends, `episode_return` and `episodes`
///    are recorded.
/// 3. If `env_steps >= warmup_period` and `env_steps % opt_interval == 0`:
///     1. Do an optimization step of the agent with the replay buffer,
///        `opt_steps += 1`.
///     2. If `opt_steps % eval_interval == 0`, evaluate the agent and record
///        `eval_reward`. If it is the best so far, the parameters are saved in
///        `(model_dir)/best`. If it reaches `reward_threshold`, training stops.
///     3. If `opt_steps % record_compute_cost_interval == 0`, record
///        `opt_steps_per_sec`.
///     4. If `opt_steps % save_interval == 0`, the parameters are saved in
///        `(model_dir)/(opt_steps)`.
/// 4. Training stops when `opt_steps == max_opts`, `env_steps == max_env_steps`
///    or the number of episodes reaches `max_episodes`. Otherwise back to 2.
///
/// An optimization step in progress always completes before a stop condition
/// is checked.
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|ExperienceBufferBase::Item|D[ReplayBuffer]
///     D -->|ReplayBufferBase::Batch|A
/// ```
pub struct Trainer {
    model_dir: Option<String>,
    opt_interval: usize,
    record_compute_cost_interval: usize,
    record_agent_info_interval: usize,
    flush_records_interval: usize,
    eval_interval: usize,
    save_interval: usize,
    max_opts: usize,
    max_env_steps: usize,
    max_episodes: usize,
    reward_threshold: Option<f32>,
    warmup_period: usize,

    /// Optimization steps for computing optimization steps per second.
    opt_steps_for_ops: usize,

    /// Timer for computing optimization steps per second.
    timer_for_ops: Duration,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            model_dir: config.model_dir,
            opt_interval: config.opt_interval.max(1),
            record_compute_cost_interval: config.record_compute_cost_interval.max(1),
            record_agent_info_interval: config.record_agent_info_interval.max(1),
            flush_records_interval: config.flush_record_interval.max(1),
            eval_interval: config.eval_interval,
            save_interval: config.save_interval,
            max_opts: config.max_opts,
            max_env_steps: config.max_env_steps,
            max_episodes: config.max_episodes,
            reward_threshold: config.reward_threshold,
            warmup_period: config.warmup_period,
            opt_steps_for_ops: 0,
            timer_for_ops: Duration::new(0, 0),
        }
    }

    fn save_model<E, R, A>(agent: &A, model_dir: &Path)
    where
        E: Env,
        R: ReplayBufferBase,
        A: Agent<E, R>,
    {
        match agent.save_params(model_dir) {
            Ok(_) => info!("Saved the model in {:?}", model_dir),
            Err(e) => info!("Failed to save model in {:?}: {}", model_dir, e),
        }
    }

    /// Returns optimization steps per second, then reset the internal counter.
    fn opt_steps_per_sec(&mut self) -> f32 {
        let osps = 1000. * self.opt_steps_for_ops as f32 / (self.timer_for_ops.as_millis() as f32);
        self.opt_steps_for_ops = 0;
        self.timer_for_ops = Duration::new(0, 0);
        osps
    }

    /// Performs a training step.
    ///
    /// First, it performs an environment step and pushes a transition into
    /// the given buffer with [`Sampler`]. Then, if the number of environment
    /// steps reaches the optimization interval `opt_interval`, performs an
    /// optimization step.
    ///
    /// The second return value is `true` if an optimization step was done.
    pub fn train_step<E, P, R, A>(
        &mut self,
        agent: &mut A,
        buffer: &mut R,
        sampler: &mut Sampler<E, P>,
        env_steps: &mut usize,
        opt_steps: &mut usize,
    ) -> Result<(Record, bool)>
    where
        E: Env,
        P: StepProcessor<E>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
        A: Agent<E, R>,
    {
        let outcome = sampler.sample_and_push(agent, buffer)?;
        *env_steps += 1;

        let mut record = outcome.record;
        if let Some(episode_return) = outcome.episode_return {
            record.insert("episode_return", Scalar(episode_return));
            record.insert("episodes", Scalar(sampler.n_episodes() as f32));
        }

        if *env_steps < self.warmup_period || *env_steps % self.opt_interval != 0 {
            return Ok((record, false));
        }

        let timer = SystemTime::now();
        let record_agent = agent.opt_with_record(buffer)?;
        if (*opt_steps + 1) % self.record_agent_info_interval == 0 {
            record.merge_inplace(record_agent);
        }
        *opt_steps += 1;
        self.timer_for_ops += timer.elapsed()?;
        self.opt_steps_for_ops += 1;

        Ok((record, true))
    }

    /// Train the agent.
    ///
    /// `buffer` receives the transitions of `env` processed by `step_proc`.
    pub fn train<E, P, R, A, D>(
        &mut self,
        env: E,
        step_proc: P,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut Box<dyn Recorder>,
        evaluator: &mut D,
    ) -> Result<()>
    where
        E: Env,
        P: StepProcessor<E>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
        A: Agent<E, R>,
        D: Evaluator<E, A>,
    {
        let mut sampler = Sampler::new(env, step_proc);
        let mut max_eval_reward = f32::MIN;
        let mut env_steps: usize = 0;
        let mut opt_steps: usize = 0;
        agent.train();

        loop {
            let (mut record, is_opt) =
                self.train_step(agent, buffer, &mut sampler, &mut env_steps, &mut opt_steps)?;
            let mut stop = false;

            if is_opt {
                if opt_steps % self.record_compute_cost_interval == 0 {
                    record.insert("opt_steps_per_sec", Scalar(self.opt_steps_per_sec()));
                }

                // Evaluation
                if self.eval_interval > 0 && opt_steps % self.eval_interval == 0 {
                    info!("Starts evaluation of the trained model");
                    agent.eval();
                    let record_eval = evaluator.evaluate(agent)?;
                    agent.train();
                    let eval_reward = record_eval.get_scalar("eval_reward")?;
                    record.merge_inplace(record_eval);

                    if eval_reward > max_eval_reward {
                        max_eval_reward = eval_reward;
                        if let Some(model_dir) = &self.model_dir {
                            let path = Path::new(model_dir).join("best");
                            Self::save_model::<E, R, A>(agent, &path);
                        }
                    }

                    if let Some(threshold) = self.reward_threshold {
                        if eval_reward >= threshold {
                            info!("Evaluation reward {} reached {}", eval_reward, threshold);
                            stop = true;
                        }
                    }
                }

                // Save the current model
                if self.save_interval > 0 && opt_steps % self.save_interval == 0 {
                    if let Some(model_dir) = &self.model_dir {
                        let path = Path::new(model_dir).join(opt_steps.to_string());
                        Self::save_model::<E, R, A>(agent, &path);
                    }
                }

                stop |= opt_steps >= self.max_opts;
            }

            stop |= env_steps >= self.max_env_steps || sampler.n_episodes() >= self.max_episodes;

            if is_opt || stop {
                record.insert("env_steps", Scalar(env_steps as f32));
                record.insert("opt_steps", Scalar(opt_steps as f32));
            }

            // Store record to the recorder
            if !record.is_empty() {
                recorder.store(record);
            }

            // Flush records
            if stop || (is_opt && opt_steps % self.flush_records_interval == 0) {
                recorder.flush(opt_steps as _);
            }

            if stop {
                info!(
                    "Training finished: env_steps = {}, opt_steps = {}, episodes = {}",
                    env_steps,
                    opt_steps,
                    sampler.n_episodes()
                );
                break;
            }
        }

        Ok(())
    }
}
