//! Configuration of DQN agent.
use super::{explorer::DqnExplorer, DqnModelConfig};
use crate::{model::SubModel1, opt::LrSchedule, util::CriticLoss, Device};
use candle_core::Tensor;
use imagine_core::YamlConfig;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;

/// Configuration of [`Dqn`](super::Dqn) agent.
#[derive(Deserialize, Serialize)]
#[serde(bound(
    serialize = "Q::Config: Serialize",
    deserialize = "Q::Config: DeserializeOwned"
))]
pub struct DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
{
    pub model_config: DqnModelConfig<Q::Config>,
    pub discount_factor: f64,
    pub tau: f64,

    /// Counted in optimization steps (calls of `sync_target`), not in
    /// environment steps. With `tau = 1` and an interval of 1 both units
    /// copy the Q-network after every update; otherwise the schedules differ.
    pub target_update_interval: usize,
    pub train: bool,
    pub explorer: DqnExplorer,
    #[serde(default = "default_critic_loss")]
    pub critic_loss: CriticLoss,
    #[serde(default)]
    pub max_grad_norm: Option<f64>,
    #[serde(default)]
    pub lr_schedule: Option<LrSchedule>,
    pub seed: u64,
    pub device: Option<Device>,
    #[serde(skip)]
    phantom: PhantomData<Q>,
}

fn default_critic_loss() -> CriticLoss {
    CriticLoss::SmoothL1
}

impl<Q> Clone for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
{
    fn clone(&self) -> Self {
        Self {
            model_config: self.model_config.clone(),
            discount_factor: self.discount_factor,
            tau: self.tau,
            target_update_interval: self.target_update_interval,
            train: self.train,
            explorer: self.explorer.clone(),
            critic_loss: self.critic_loss.clone(),
            max_grad_norm: self.max_grad_norm,
            lr_schedule: self.lr_schedule.clone(),
            seed: self.seed,
            device: self.device,
            phantom: PhantomData,
        }
    }
}

impl<Q> Default for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
{
    /// Constructs DQN builder with default parameters.
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            discount_factor: 0.99,
            tau: 1.0,
            target_update_interval: 1,
            train: false,
            explorer: DqnExplorer::default(),
            critic_loss: default_critic_loss(),
            max_grad_norm: Some(10.0),
            lr_schedule: None,
            seed: 42,
            device: None,
            phantom: PhantomData,
        }
    }
}

impl<Q> DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
{
    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Soft update coefficient of the target network.
    pub fn tau(mut self, v: f64) -> Self {
        self.tau = v;
        self
    }

    /// Number of optimization steps between target network updates.
    ///
    /// The unit is optimization steps, not environment steps: with a train
    /// frequency of `k` environment steps, an interval of `n` updates the
    /// target every `n * k` environment steps.
    pub fn target_update_interval(mut self, v: usize) -> Self {
        self.target_update_interval = v;
        self
    }

    /// Explorer.
    pub fn explorer(mut self, v: DqnExplorer) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, model_config: DqnModelConfig<Q::Config>) -> Self {
        self.model_config = model_config;
        self
    }

    /// Sets critic loss.
    pub fn critic_loss(mut self, v: CriticLoss) -> Self {
        self.critic_loss = v;
        self
    }

    /// Sets the maximum global norm of gradients; `None` disables clipping.
    pub fn max_grad_norm(mut self, v: Option<f64>) -> Self {
        self.max_grad_norm = v;
        self
    }

    /// Sets the learning rate schedule. Without a schedule, the learning rate
    /// of the optimizer configuration is kept.
    pub fn lr_schedule(mut self, v: Option<LrSchedule>) -> Self {
        self.lr_schedule = v;
        self
    }

    /// Random seed of the explorer.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }
}

impl<Q> YamlConfig for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dqn::EpsilonGreedy,
        mlp::{Mlp, MlpConfig},
    };
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_serde_dqn_config() -> Result<()> {
        let model_config = DqnModelConfig::default()
            .q_config(MlpConfig::new(8, 4).hidden(vec![64, 64]));
        let config = DqnConfig::<Mlp>::default()
            .model_config(model_config)
            .explorer(EpsilonGreedy::with_final_step(50_000))
            .max_grad_norm(Some(10.0))
            .lr_schedule(Some(LrSchedule::Constant(1e-3)))
            .device(Device::Cpu);

        let dir = TempDir::new("dqn_config")?;
        let path = dir.path().join("dqn_config.yaml");
        config.save(&path)?;
        let config_ = DqnConfig::<Mlp>::load(&path)?;
        assert_eq!(config.model_config, config_.model_config);
        assert_eq!(config.explorer, config_.explorer);
        assert_eq!(config.critic_loss, CriticLoss::SmoothL1);
        assert_eq!(config_.max_grad_norm, Some(10.0));
        assert_eq!(config_.device, Some(Device::Cpu));
        Ok(())
    }
}
