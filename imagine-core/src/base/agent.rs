//! Trainable policy driven by the trainer.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// What [`Trainer`](crate::Trainer) needs from the object it trains: a
/// policy acting on `E` that can take an optimization step on the
/// transitions collected in `R`.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Switches to training mode, in which actions may explore.
    fn train(&mut self);

    /// Switches to evaluation mode, in which actions are greedy.
    fn eval(&mut self);

    /// `true` in training mode.
    fn is_train(&self) -> bool;

    /// Performs one optimization step on `buffer`.
    ///
    /// The returned record holds the metrics of the step. An error aborts the
    /// step and is handed to the caller.
    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Record>;

    /// Writes the parameters into the directory `path` and returns the files
    /// written.
    fn save_params(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Reads parameters written by [`Agent::save_params`].
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
