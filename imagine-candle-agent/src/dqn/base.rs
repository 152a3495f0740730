//! DQN agent implemented with candle.
use super::{config::DqnConfig, explorer::DqnExplorer, model::DqnModel};
use crate::{
    model::SubModel1,
    opt::LrSchedule,
    util::{smooth_l1_loss, track, CriticLoss},
};
use anyhow::{Context, Result};
use candle_core::{shape::D, DType, Device, Tensor};
use candle_nn::loss::mse;
use imagine_core::{Configurable, Env, OffPolicyLearner, Policy, TransitionBatch};
use log::{debug, trace};
use rand::{rngs::SmallRng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
};

#[allow(clippy::upper_case_acronyms)]
/// DQN agent implemented with candle.
///
/// The agent holds a Q-network and its target network. It does not own a
/// replay buffer: batches are given to [`OffPolicyLearner::learn`].
pub struct Dqn<E, Q>
where
    E: Env,
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
{
    qnet: DqnModel<Q>,
    qnet_tgt: DqnModel<Q>,
    target_update_interval: usize,
    target_update_counter: usize,
    discount_factor: f64,
    tau: f64,
    train: bool,
    explorer: DqnExplorer,
    critic_loss: CriticLoss,
    max_grad_norm: Option<f64>,
    lr_schedule: Option<LrSchedule>,
    device: Device,

    /// Number of optimization steps, counted by calls of `sync_target`.
    n_opts: usize,
    rng: SmallRng,
    phantom: PhantomData<E>,
}

impl<E, Q> Dqn<E, Q>
where
    E: Env,
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
{
    /// Returns the number of optimization steps.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Returns the current learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.qnet.learning_rate()
    }

    /// Returns the action values of the Q-network.
    pub fn q_values(&self, obs: &Q::Input) -> Result<Tensor> {
        self.qnet.forward(obs)
    }

    /// Returns the action values of the target network.
    pub fn q_values_tgt(&self, obs: &Q::Input) -> Result<Tensor> {
        self.qnet_tgt.forward(obs)
    }

    fn select_action(&mut self, obs: &Q::Input) -> Result<Tensor> {
        let q = self.qnet.forward(obs)?;
        if self.train {
            match &mut self.explorer {
                DqnExplorer::EpsilonGreedy(egreedy) => egreedy.action(&q, &mut self.rng),
            }
        } else {
            Ok(q.argmax(D::Minus1)?.to_dtype(DType::I64)?)
        }
    }

    /// `r + (1 - is_terminated) * gamma * max_a' Q_tgt(s', a')`, without gradient.
    ///
    /// Truncated transitions are bootstrapped.
    fn target(&self, next_obs: &Q::Input, reward: Vec<f32>, is_terminated: Vec<bool>) -> Result<Tensor> {
        let batch_size = reward.len();
        let reward = Tensor::from_vec(reward, &[batch_size], &self.device)?;
        let not_terminated = {
            let v = is_terminated
                .into_iter()
                .map(|t| if t { 0f32 } else { 1f32 })
                .collect::<Vec<_>>();
            Tensor::from_vec(v, &[batch_size], &self.device)?
        };
        let q_next = self.qnet_tgt.forward(next_obs)?.max(D::Minus1)?;
        let tgt = (reward + ((not_terminated * self.discount_factor)? * q_next)?)?;
        Ok(tgt.detach())
    }
}

impl<E, Q> Configurable for Dqn<E, Q>
where
    E: Env,
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
{
    type Config = DqnConfig<Q>;

    /// Constructs DQN agent.
    ///
    /// The target network starts as a copy of the Q-network.
    fn build(config: Self::Config) -> Result<Self> {
        let device: Device = config
            .device
            .context("No device is given for DQN agent")?
            .try_into()?;
        let qnet = DqnModel::build(config.model_config, device.clone())?;
        let qnet_tgt = qnet.clone_model()?;

        Ok(Dqn {
            qnet,
            qnet_tgt,
            target_update_interval: config.target_update_interval,
            target_update_counter: 0,
            discount_factor: config.discount_factor,
            tau: config.tau,
            train: config.train,
            explorer: config.explorer,
            critic_loss: config.critic_loss,
            max_grad_norm: config.max_grad_norm,
            lr_schedule: config.lr_schedule,
            device,
            n_opts: 0,
            rng: SmallRng::seed_from_u64(config.seed),
            phantom: PhantomData,
        })
    }
}

impl<E, Q> Policy<E> for Dqn<E, Q>
where
    E: Env,
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
{
    /// Epsilon-greedy in training mode, greedy in evaluation mode.
    ///
    /// # Panics
    ///
    /// Panics if the forward pass of the Q-network fails, for example when the
    /// observation has a shape the network does not accept.
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        let a = self
            .select_action(&obs.clone().into())
            .expect("Failed to select an action");
        a.into()
    }
}

impl<E, Q, B> OffPolicyLearner<B> for Dqn<E, Q>
where
    E: Env,
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + std::fmt::Debug + PartialEq + Clone,
    B: TransitionBatch,
    B::ObsBatch: Into<Q::Input>,
    B::ActBatch: Into<Tensor>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn update_learning_rate(&mut self) -> Result<()> {
        if let Some(schedule) = &self.lr_schedule {
            let lr = schedule.value(self.n_opts);
            self.qnet.set_learning_rate(lr);
            trace!("learning rate = {}", lr);
        }
        Ok(())
    }

    fn learn(&mut self, batch: B) -> Result<f32> {
        let (obs, act, next_obs, reward, is_terminated) = batch.into_td_parts();
        let obs = obs.into();
        let next_obs = next_obs.into();
        let act = {
            let act = act.into().to_device(&self.device)?.to_dtype(DType::I64)?;
            match act.rank() {
                1 => act.unsqueeze(D::Minus1)?,
                _ => act,
            }
        };

        let pred = self
            .qnet
            .forward(&obs)?
            .gather(&act, D::Minus1)?
            .squeeze(D::Minus1)?;
        let tgt = self.target(&next_obs, reward, is_terminated)?;

        let loss = match self.critic_loss {
            CriticLoss::Mse => mse(&pred, &tgt)?,
            CriticLoss::SmoothL1 => smooth_l1_loss(&pred, &tgt)?,
        };
        let grad_norm = self.qnet.backward_step_clipped(&loss, self.max_grad_norm)?;
        let loss = loss.to_scalar::<f32>()?;
        trace!("loss = {}, grad_norm = {}", loss, grad_norm);

        Ok(loss)
    }

    fn sync_target(&mut self) -> Result<()> {
        self.n_opts += 1;
        self.target_update_counter += 1;
        if self.target_update_counter >= self.target_update_interval {
            self.target_update_counter = 0;
            track(self.qnet_tgt.get_varmap(), self.qnet.get_varmap(), self.tau)?;
            debug!("Updated the target network after {} optimization steps", self.n_opts);
        }
        Ok(())
    }

    fn save_params(&self, path: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(path)?;
        let path_qnet = path.join("qnet.pt");
        let path_qnet_tgt = path.join("qnet_tgt.pt");
        self.qnet.save(&path_qnet)?;
        self.qnet_tgt.save(&path_qnet_tgt)?;
        Ok(vec![path_qnet, path_qnet_tgt])
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path.join("qnet.pt"))?;
        self.qnet_tgt.load(path.join("qnet_tgt.pt"))?;
        Ok(())
    }
}
