use crate::{
    model::SubModel1,
    opt::{Optimizer, OptimizerConfig},
    util::{clip_grad_norm, track},
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`DqnModel`].
pub struct DqnModelConfig<Q> {
    pub(super) q_config: Option<Q>,
    pub(super) opt_config: OptimizerConfig,
}

impl<Q> Default for DqnModelConfig<Q> {
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl<Q> DqnModelConfig<Q>
where
    Q: DeserializeOwned + Serialize,
{
    /// Sets configurations for action-value function.
    pub fn q_config(mut self, v: Q) -> Self {
        self.q_config = Some(v);
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }
}

/// Action-value function with its optimizer.
///
/// Parameters live in a [`VarMap`] owned by the model.
pub struct DqnModel<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize,
{
    device: Device,
    varmap: VarMap,

    q: Q,
    q_config: Q::Config,
    opt_config: OptimizerConfig,
    opt: Optimizer,
}

impl<Q> DqnModel<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Clone,
{
    /// Constructs [`DqnModel`].
    pub fn build(config: DqnModelConfig<Q::Config>, device: Device) -> Result<Self> {
        let q_config = config.q_config.context("q_config is not set.")?;
        Self::build_with(q_config, config.opt_config, device)
    }

    fn build_with(q_config: Q::Config, opt_config: OptimizerConfig, device: Device) -> Result<Self> {
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Q::build(vb, q_config.clone())?
        };
        let opt = opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            q,
            q_config,
            opt_config,
            opt,
        })
    }

    /// Returns a model with its own parameters, initialized with a copy of
    /// the parameters of this model.
    pub fn clone_model(&self) -> Result<Self> {
        let model = Self::build_with(
            self.q_config.clone(),
            self.opt_config.clone(),
            self.device.clone(),
        )?;
        track(&model.varmap, &self.varmap, 1.0)?;
        Ok(model)
    }

    /// Outputs the action-value given observation(s).
    pub fn forward(&self, obs: &Q::Input) -> Result<Tensor> {
        self.q.forward(obs)
    }

    /// Computes gradients of `loss`, clips their global norm to `max_grad_norm`
    /// if given, and applies an optimizer step.
    ///
    /// Returns the gradient norm before clipping.
    pub fn backward_step_clipped(&mut self, loss: &Tensor, max_grad_norm: Option<f64>) -> Result<f32> {
        let mut grads = loss.backward()?;
        let max_norm = max_grad_norm.unwrap_or(f64::INFINITY);
        let norm = clip_grad_norm(&mut grads, &self.varmap.all_vars(), max_norm)?;
        self.opt.step(&grads)?;
        Ok(norm)
    }

    /// Returns the current learning rate of the optimizer.
    pub fn learning_rate(&self) -> f64 {
        self.opt.learning_rate()
    }

    /// Sets the learning rate of the optimizer.
    pub fn set_learning_rate(&mut self, lr: f64) {
        self.opt.set_learning_rate(lr);
    }

    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save dqnmodel to {:?}", path.as_ref());
        Ok(())
    }

    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load dqnmodel from {:?}", path.as_ref());
        Ok(())
    }
}
