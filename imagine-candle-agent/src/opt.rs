//! Optimizers and learning rate schedules.
use anyhow::Result;
use candle_core::{backprop::GradStore, Var};
use candle_nn::Optimizer as _;
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer of the Q-network.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam with the default betas and epsilon of [`ParamsAdam`].
    Adam {
        /// Learning rate.
        lr: f64,
    },
}

impl OptimizerConfig {
    /// Constructs an optimizer of the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::Adam { lr } => {
                let params = ParamsAdam {
                    lr: *lr,
                    ..ParamsAdam::default()
                };
                Ok(Optimizer::Adam(Adam::new(vars, params)?))
            }
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 1e-3 }
    }
}

/// Thin wrapper of the optimizers of [`candle_optimisers`].
pub enum Optimizer {
    /// Adam optimizer.
    Adam(Adam),
}

impl Optimizer {
    /// Updates the variables with precomputed gradients.
    pub fn step(&mut self, grads: &GradStore) -> Result<()> {
        match self {
            Self::Adam(opt) => Ok(opt.step(grads)?),
        }
    }

    /// Returns the current learning rate.
    pub fn learning_rate(&self) -> f64 {
        match self {
            Self::Adam(opt) => opt.learning_rate(),
        }
    }

    /// Sets the learning rate.
    pub fn set_learning_rate(&mut self, lr: f64) {
        match self {
            Self::Adam(opt) => opt.set_learning_rate(lr),
        }
    }
}

/// Learning rate as a function of the number of optimization steps.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum LrSchedule {
    /// Fixed learning rate.
    Constant(f64),

    /// Interpolates linearly from `initial` to `final` over `final_step`
    /// optimization steps and stays at `final` afterwards.
    Linear {
        initial: f64,
        #[serde(rename = "final")]
        final_: f64,
        final_step: usize,
    },
}

impl LrSchedule {
    /// Returns the learning rate after `n_opts` optimization steps.
    pub fn value(&self, n_opts: usize) -> f64 {
        match self {
            Self::Constant(lr) => *lr,
            Self::Linear {
                initial,
                final_,
                final_step,
            } => {
                if *final_step == 0 || n_opts >= *final_step {
                    *final_
                } else {
                    let frac = n_opts as f64 / *final_step as f64;
                    initial + (final_ - initial) * frac
                }
            }
        }
    }
}
