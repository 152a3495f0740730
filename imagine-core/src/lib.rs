#![warn(missing_docs)]
//! Core components for off-policy reinforcement learning augmented with
//! transitions generated by a dynamics model.
//!
//! The crate provides:
//!
//! * Traits describing environments, policies, agents and replay buffers
//!   ([`Env`], [`Policy`], [`Agent`], [`ReplayBufferBase`], ...).
//! * A ring replay buffer, [`generic_replay_buffer::SimpleReplayBuffer`].
//! * [`DynamicsModel`], an interface of a state transition function whose
//!   internal state can be set to an arbitrary observation.
//! * [`synthetic::SyntheticExperienceGenerator`], which fills a replay buffer
//!   with transitions obtained by querying a [`DynamicsModel`] on states
//!   sampled from another replay buffer.
//! * [`hybrid::HybridExperienceTrainer`], an [`Agent`] that trains an
//!   [`OffPolicyLearner`] on minibatches drawn from both the real and the
//!   synthetic replay buffers.
//! * [`Trainer`], the training loop driving an [`Env`].
pub mod error;
pub mod generic_replay_buffer;
pub mod hybrid;
pub mod record;
pub mod synthetic;

mod base;
pub use base::{
    Act, Agent, Configurable, DynamicsModel, Env, ExperienceBufferBase, ModelStep, Obs,
    OffPolicyLearner, Policy, ReplayBufferBase, Step, StepProcessor, TransitionBatch,
};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{SampleOutcome, Sampler, Trainer, TrainerConfig};

mod yaml;
pub use yaml::YamlConfig;
