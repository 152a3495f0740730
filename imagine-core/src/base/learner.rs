//! Off-policy learner.
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Capabilities of an off-policy value learner, such as DQN, trained on
/// batches of type `B`.
///
/// The learner does not own a replay buffer. Batches are given by the caller,
/// typically [`HybridExperienceTrainer`](crate::hybrid::HybridExperienceTrainer),
/// which decides where they come from. Acting on an environment is provided
/// separately through [`Policy`](crate::Policy).
pub trait OffPolicyLearner<B> {
    /// Set the learner to training mode.
    fn train(&mut self);

    /// Set the learner to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Applies the learning rate schedule. Called once per optimization step.
    fn update_learning_rate(&mut self) -> Result<()>;

    /// Performs a gradient step on `batch` and returns the loss.
    fn learn(&mut self, batch: B) -> Result<f32>;

    /// Updates the target network. Called once per optimization step.
    fn sync_target(&mut self) -> Result<()>;

    /// Save the parameters in the given directory.
    fn save_params(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Load the parameters from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
