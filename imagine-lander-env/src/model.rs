use crate::{physics::Lander, LanderAct, LanderConfig, LanderObs, N_ACTIONS, OBS_DIM};
use anyhow::Result;
use imagine_core::{error::ImagineError, record::Record, DynamicsModel, ModelStep};
use rand::Rng;

/// Dynamics model of the lander, sharing the simulation of
/// [`LanderEnv`](crate::LanderEnv).
///
/// The model does not count steps, so that its transitions are never truncated.
pub struct LanderModel {
    lander: Option<Lander>,
}

impl LanderModel {
    /// Builds the model. The time limit in `config` does not apply.
    pub fn build(_config: &LanderConfig) -> Self {
        Self { lander: None }
    }
}

impl DynamicsModel for LanderModel {
    type Obs = LanderObs;
    type Act = LanderAct;

    fn reset_to(&mut self, obs: &LanderObs) -> Result<()> {
        let lander = Lander::from_obs(obs).ok_or_else(|| {
            ImagineError::ModelInvocation(format!(
                "expected a state of {} dimensions, got {}",
                OBS_DIM,
                obs.0.len()
            ))
        })?;
        self.lander = Some(lander);
        Ok(())
    }

    fn step(&mut self, act: &LanderAct) -> Result<ModelStep<LanderObs>> {
        let lander = self
            .lander
            .as_mut()
            .ok_or_else(|| ImagineError::ModelInvocation("state is not set".to_string()))?;
        let (reward, outcome) = lander
            .step(act)
            .ok_or_else(|| ImagineError::ModelInvocation(format!("invalid action {}", act.0)))?;

        Ok(ModelStep {
            obs: lander.obs(),
            reward,
            is_terminated: outcome.is_terminated(),
            is_truncated: false,
            info: Record::empty(),
        })
    }

    fn sample_action<R: Rng>(&self, rng: &mut R) -> LanderAct {
        LanderAct(rng.gen_range(0..N_ACTIONS as i64))
    }
}
