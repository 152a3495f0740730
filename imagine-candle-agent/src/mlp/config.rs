use serde::{Deserialize, Serialize};

/// Layer sizes of an [`Mlp`](super::Mlp) Q-network: an observation of
/// `in_dim` values goes through the hidden layers and comes out as one value
/// per action.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct MlpConfig {
    pub(super) in_dim: usize,
    pub(super) hidden: Vec<usize>,
    pub(super) n_actions: usize,
}

impl MlpConfig {
    /// Two hidden layers of 64 units.
    pub fn new(in_dim: usize, n_actions: usize) -> Self {
        Self {
            in_dim,
            hidden: vec![64, 64],
            n_actions,
        }
    }

    /// Sets the sizes of the hidden layers.
    pub fn hidden(mut self, hidden: Vec<usize>) -> Self {
        self.hidden = hidden;
        self
    }

    /// Sizes of all layers, input and output included.
    pub(super) fn dims(&self) -> Vec<usize> {
        std::iter::once(self.in_dim)
            .chain(self.hidden.iter().copied())
            .chain(std::iter::once(self.n_actions))
            .collect()
    }
}
