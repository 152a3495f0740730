//! A replay buffer storing transitions of generic observation and action types.
//!
//! * [`SimpleReplayBuffer`]: fixed-capacity ring buffer with uniform sampling.
//! * [`GenericTransitionBatch`]: transitions pushed into and sampled from the buffer.
//! * [`SimpleStepProcessor`]: converts [`Step`](crate::Step)s of an environment
//!   into [`GenericTransitionBatch`]es.
//!
//! Observations and actions are stored in containers implementing
//! [`BatchBase`], for example a batch of tensors.
mod base;
mod batch;
mod config;
mod step_proc;
pub use base::SimpleReplayBuffer;
pub use batch::{BatchBase, GenericTransitionBatch};
pub use config::SimpleReplayBufferConfig;
pub use step_proc::SimpleStepProcessor;
