use anyhow::Result;
use clap::Parser;
use imagine_candle_agent::{
    dqn::{Dqn, DqnConfig, DqnExplorer, DqnModelConfig, EpsilonGreedy},
    mlp::{Mlp, MlpConfig},
    opt::OptimizerConfig,
    util::CriticLoss,
    Device, TensorBatch,
};
use imagine_core::{
    generic_replay_buffer::{
        BatchBase, GenericTransitionBatch, SimpleReplayBuffer, SimpleReplayBufferConfig,
        SimpleStepProcessor,
    },
    hybrid::{HybridConfig, HybridExperienceTrainer},
    record::Recorder,
    Configurable, DefaultEvaluator, Env as _, Evaluator as _, OffPolicyLearner,
    ReplayBufferBase, Trainer, TrainerConfig,
};
use imagine_lander_env::{LanderConfig, LanderModel, N_ACTIONS, OBS_DIM};
use imagine_tensorboard::TensorboardRecorder;
use log::info;
use serde::Serialize;
use std::path::Path;

const LR: f64 = 0.001;
const DISCOUNT_FACTOR: f64 = 0.99;
const TAU: f64 = 1.0;
const TARGET_UPDATE_INTERVAL: usize = 1;
const MAX_GRAD_NORM: f64 = 10.0;
const EPS_START: f64 = 1.0;
const EPS_FINAL: f64 = 0.05;
const EXPLORATION_FRACTION: f64 = 0.5;
const TOTAL_TIMESTEPS: usize = 100_000;
const MAX_EPISODES: usize = 1000;
const EVAL_FREQ: usize = 10_000;
const N_EPISODES_PER_EVAL: usize = 5;
const SEED: u64 = 1;
const SYNTHETIC_SEED: u64 = 2021;

mod obs_act_types {
    use super::*;
    use candle_core::Tensor;
    use imagine_core::error::ImagineError;

    pub use imagine_lander_env::{LanderAct as Act, LanderEnv as Env, LanderObs as Obs};

    #[derive(Clone, Debug)]
    pub struct ObsBatch(TensorBatch);

    impl BatchBase for ObsBatch {
        fn new(capacity: usize) -> Self {
            Self(TensorBatch::new(capacity))
        }

        fn push(&mut self, i: usize, data: Self) -> Result<()> {
            self.0.push(i, data.0)
        }

        fn sample(&self, ixs: &Vec<usize>) -> Self {
            Self(self.0.sample(ixs))
        }
    }

    impl From<Obs> for ObsBatch {
        fn from(obs: Obs) -> Self {
            Self(TensorBatch::from_tensor(obs.into()))
        }
    }

    impl From<ObsBatch> for Tensor {
        fn from(b: ObsBatch) -> Self {
            b.0.into()
        }
    }

    // Required by the generator of synthetic transitions
    impl TryFrom<ObsBatch> for Obs {
        type Error = anyhow::Error;

        fn try_from(b: ObsBatch) -> Result<Self> {
            let t = b
                .0
                .tensor()
                .ok_or_else(|| anyhow::anyhow!("ObsBatch holds no observation"))?;
            if t.dims() != [1, OBS_DIM] {
                return Err(ImagineError::ShapeMismatch {
                    expected: vec![1, OBS_DIM],
                    actual: t.dims().to_vec(),
                }
                .into());
            }
            Ok(Obs(t.flatten_all()?.to_vec1::<f32>()?))
        }
    }

    #[derive(Clone, Debug)]
    pub struct ActBatch(TensorBatch);

    impl BatchBase for ActBatch {
        fn new(capacity: usize) -> Self {
            Self(TensorBatch::new(capacity))
        }

        fn push(&mut self, i: usize, data: Self) -> Result<()> {
            self.0.push(i, data.0)
        }

        fn sample(&self, ixs: &Vec<usize>) -> Self {
            Self(self.0.sample(ixs))
        }
    }

    impl From<Act> for ActBatch {
        fn from(act: Act) -> Self {
            Self(TensorBatch::from_tensor(act.into()))
        }
    }

    // Required by Dqn
    impl From<ActBatch> for Tensor {
        fn from(act: ActBatch) -> Self {
            act.0.into()
        }
    }

    pub type EnvConfig = LanderConfig;
    pub type StepProc = SimpleStepProcessor<Env, ObsBatch, ActBatch>;
    pub type ReplayBuffer = SimpleReplayBuffer<ObsBatch, ActBatch>;
    pub type Batch = GenericTransitionBatch<ObsBatch, ActBatch>;
    pub type Learner = Dqn<Env, Mlp>;
    pub type Agent = HybridExperienceTrainer<Learner, LanderModel, ObsBatch, ActBatch>;
    pub type Evaluator = DefaultEvaluator<Env>;
}

use obs_act_types::*;

mod config {
    use super::*;

    #[derive(Serialize)]
    pub struct MbdqnLunarLanderConfig {
        pub env_config: EnvConfig,
        pub agent_config: DqnConfig<Mlp>,
        pub hybrid_config: HybridConfig,
        pub replay_buffer_config: SimpleReplayBufferConfig,
        pub trainer_config: TrainerConfig,
    }

    impl MbdqnLunarLanderConfig {
        pub fn new(args: &Args, total_timesteps: usize, eval_freq: usize, log_dir: &str) -> Self {
            let env_config = EnvConfig::default();
            let agent_config = create_agent_config(total_timesteps);
            let hybrid_config = HybridConfig::default()
                .synthetic_capacity(args.model_buffer_size)
                .synthetic_seed(Some(SYNTHETIC_SEED))
                .gradient_steps(args.gradient_steps)
                .batch_size(args.batch_size);
            let replay_buffer_config = SimpleReplayBufferConfig::default()
                .capacity(args.buffer_size)
                .seed(SEED);

            // Evaluation interval is given in environment steps
            let eval_interval = (eval_freq / args.train_freq.max(1)).max(1);
            let trainer_config = TrainerConfig::default()
                .max_env_steps(total_timesteps)
                .max_episodes(MAX_EPISODES)
                .opt_interval(args.train_freq.max(1))
                .warmup_period(args.batch_size.max(1))
                .eval_interval(eval_interval)
                .flush_record_interval(100)
                .record_compute_cost_interval(100)
                .record_agent_info_interval(1)
                .model_dir(log_dir);

            Self {
                env_config,
                agent_config,
                hybrid_config,
                replay_buffer_config,
                trainer_config,
            }
        }
    }

    pub fn create_agent_config(total_timesteps: usize) -> DqnConfig<Mlp> {
        let device = match candle_core::utils::cuda_is_available() {
            true => Device::Cuda(0),
            false => Device::Cpu,
        };
        let opt_config = OptimizerConfig::Adam { lr: LR };
        let mlp_config = MlpConfig::new(OBS_DIM, N_ACTIONS).hidden(vec![256, 256]);
        let model_config = DqnModelConfig::default()
            .q_config(mlp_config)
            .opt_config(opt_config);
        let explorer = DqnExplorer::EpsilonGreedy(EpsilonGreedy {
            n_opts: 0,
            eps_start: EPS_START,
            eps_final: EPS_FINAL,
            final_step: (EXPLORATION_FRACTION * total_timesteps as f64) as usize,
        });

        DqnConfig::default()
            .model_config(model_config)
            .discount_factor(DISCOUNT_FACTOR)
            .tau(TAU)
            .target_update_interval(TARGET_UPDATE_INTERVAL)
            .explorer(explorer)
            .critic_loss(CriticLoss::SmoothL1)
            .max_grad_norm(Some(MAX_GRAD_NORM))
            .seed(SEED)
            .device(device)
    }
}

use config::{create_agent_config, MbdqnLunarLanderConfig};

mod utils {
    use super::*;

    pub fn create_recorder(log_dir: &str) -> Box<dyn Recorder> {
        Box::new(TensorboardRecorder::new(log_dir))
    }

    pub fn log_dir(args: &Args) -> String {
        format!(
            "./tmp/gym-buffer_size{}-model_buffer_size{}-batch_size{}-train_freq{}-gradient_steps{}/",
            args.buffer_size, args.model_buffer_size, args.batch_size, args.train_freq, args.gradient_steps
        )
    }
}

/// Train DQN agent on the lunar lander with transitions generated by a
/// dynamics model
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Capacity of the replay buffer of environment transitions
    buffer_size: usize,

    /// Capacity of the replay buffer of synthetic transitions, 0 to disable
    model_buffer_size: usize,

    /// Minibatch size
    batch_size: usize,

    /// Number of environment steps between optimization steps
    train_freq: usize,

    /// Number of gradient steps per optimization step and per buffer
    gradient_steps: usize,
}

fn train(args: &Args, total_timesteps: usize, eval_freq: usize, log_dir: &str) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let config = MbdqnLunarLanderConfig::new(args, total_timesteps, eval_freq, log_dir);
    std::fs::write(
        Path::new(log_dir).join("config.yaml"),
        serde_yaml::to_string(&config)?,
    )?;
    let mut recorder = utils::create_recorder(log_dir);
    let mut trainer = Trainer::build(config.trainer_config.clone());

    let env = Env::build(&config.env_config, SEED as _)?;
    let step_proc = StepProc::default();
    let mut agent = {
        let learner = Learner::build(config.agent_config)?;
        let model = LanderModel::build(&config.env_config);
        Agent::build(learner, model, &config.hybrid_config)
    };
    let mut buffer = ReplayBuffer::build(&config.replay_buffer_config);
    let mut evaluator = {
        let env = Env::build(&config.env_config, SEED as _)?;
        Evaluator::new(env, N_EPISODES_PER_EVAL)?
    };

    trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        &mut recorder,
        &mut evaluator,
    )?;
    info!("Finished training after {} updates", agent.n_updates());

    Ok(())
}

fn eval(model_dir: &str) -> Result<f32> {
    let mut agent = {
        let mut agent = Learner::build(create_agent_config(TOTAL_TIMESTEPS))?;
        OffPolicyLearner::<Batch>::load_params(&mut agent, Path::new(model_dir))?;
        OffPolicyLearner::<Batch>::eval(&mut agent);
        agent
    };

    let record = {
        let env = Env::build(&EnvConfig::default(), SEED as _)?;
        Evaluator::new(env, N_EPISODES_PER_EVAL)?
    }
    .evaluate(&mut agent)?;
    let eval_reward = record.get_scalar("eval_reward")?;
    info!("Average return of the best model: {}", eval_reward);

    Ok(eval_reward)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let log_dir = utils::log_dir(&args);
    train(&args, TOTAL_TIMESTEPS, EVAL_FREQ, &log_dir)?;
    eval(&(log_dir + "best"))?;

    Ok(())
}
