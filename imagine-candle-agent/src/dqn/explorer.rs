//! Exploration strategies of DQN.
use anyhow::Result;
use candle_core::{shape::D, DType, Tensor};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Explorers for DQN.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum DqnExplorer {
    /// Epsilon-greedy action selection.
    EpsilonGreedy(EpsilonGreedy),
}

impl Default for DqnExplorer {
    fn default() -> Self {
        Self::EpsilonGreedy(EpsilonGreedy::new())
    }
}

/// Epsilon-greedy explorer for DQN.
///
/// Epsilon decays linearly from `eps_start` to `eps_final` over the first
/// `final_step` calls of [`EpsilonGreedy::action`] and stays at `eps_final`
/// afterwards.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    pub n_opts: usize,
    pub eps_start: f64,
    pub eps_final: f64,
    pub final_step: usize,
}

#[allow(clippy::new_without_default)]
impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer.
    pub fn new() -> Self {
        Self {
            n_opts: 0,
            eps_start: 1.0,
            eps_final: 0.02,
            final_step: 100_000,
        }
    }

    /// Constructs epsilon-greedy explorer.
    pub fn with_final_step(final_step: usize) -> DqnExplorer {
        DqnExplorer::EpsilonGreedy(Self {
            final_step,
            ..Self::new()
        })
    }

    /// Returns the current value of epsilon.
    pub fn eps(&self) -> f64 {
        if self.final_step == 0 {
            return self.eps_final;
        }
        let d = (self.eps_start - self.eps_final) / (self.final_step as f64);
        (self.eps_start - d * self.n_opts as f64).max(self.eps_final)
    }

    /// Takes an action based on action values, returns i64 tensor.
    ///
    /// * `a` - action values of shape `[n_samples, n_actions]`.
    pub fn action(&mut self, a: &Tensor, rng: &mut impl Rng) -> Result<Tensor> {
        let is_random = rng.gen::<f64>() < self.eps();
        self.n_opts += 1;

        if is_random {
            let (n_samples, n_actions) = a.dims2()?;
            let data = (0..n_samples)
                .map(|_| rng.gen_range(0..n_actions) as i64)
                .collect::<Vec<_>>();
            Ok(Tensor::from_vec(data, &[n_samples], a.device())?)
        } else {
            Ok(a.argmax(D::Minus1)?.to_dtype(DType::I64)?)
        }
    }

    /// Set the epsilon value at the final step.
    pub fn eps_final(self, v: f64) -> Self {
        let mut s = self;
        s.eps_final = v;
        s
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(self, v: f64) -> Self {
        let mut s = self;
        s.eps_start = v;
        s
    }
}
