//! Core functionalities.
mod agent;
mod batch;
mod env;
mod learner;
mod model;
mod policy;
mod replay_buffer;
mod step;
pub use agent::Agent;
pub use batch::TransitionBatch;
pub use env::Env;
pub use learner::OffPolicyLearner;
pub use model::{DynamicsModel, ModelStep};
pub use policy::{Configurable, Policy};
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
use std::fmt::Debug;
pub use step::{Step, StepProcessor};

/// A set of observations of an environment.
///
/// Vectorized environments are not supported, so [`Obs::len`] of an
/// observation emitted by an [`Env`] is expected to be 1.
pub trait Obs: Clone + Debug {
    /// Returns the number of observations in the object.
    fn len(&self) -> usize;
}

/// A set of actions of the environment.
pub trait Act: Clone + Debug {
    /// Returns the number of actions in the object.
    fn len(&self) -> usize {
        1
    }
}
