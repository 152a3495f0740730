use crate::{
    physics::{Lander, Outcome},
    LanderAct, LanderConfig, LanderObs,
};
use anyhow::Result;
use imagine_core::{record::Record, Env, Step};
use log::{trace, warn};
use rand::{rngs::StdRng, SeedableRng};

/// Lunar lander environment.
pub struct LanderEnv {
    config: LanderConfig,
    lander: Lander,
    rng: StdRng,
    count_steps: usize,
}

impl LanderEnv {
    /// Returns the number of steps in the current episode.
    pub fn count_steps(&self) -> usize {
        self.count_steps
    }

    fn respawn(&mut self, rng: Option<StdRng>) -> LanderObs {
        self.lander = match rng {
            Some(mut rng) => Lander::spawn(&mut rng, self.config.initial_random),
            None => Lander::spawn(&mut self.rng, self.config.initial_random),
        };
        self.count_steps = 0;
        self.lander.obs()
    }
}

impl Env for LanderEnv {
    type Config = LanderConfig;
    type Obs = LanderObs;
    type Act = LanderAct;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let lander = Lander::spawn(&mut rng, config.initial_random);

        Ok(Self {
            config: config.clone(),
            lander,
            rng,
            count_steps: 0,
        })
    }

    /// Performs a step.
    ///
    /// An action out of `0..4` is replaced with noop.
    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let (reward, outcome) = match self.lander.step(a) {
            Some(r) => r,
            None => {
                warn!("Invalid action {}, noop is taken instead", a.0);
                self.lander
                    .step(&LanderAct(0))
                    .unwrap_or((0.0, Outcome::Flying))
            }
        };
        self.count_steps += 1;

        let is_terminated = outcome.is_terminated();
        let is_truncated = !is_terminated
            && self
                .config
                .max_steps
                .map_or(false, |max_steps| self.count_steps >= max_steps);
        if is_terminated {
            trace!("Episode terminated ({:?}) after {} steps", outcome, self.count_steps);
        }

        let step = Step::new(a.clone(), self.lander.obs(), reward, is_terminated, is_truncated);
        (step, Record::empty())
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        Ok(self.respawn(None))
    }

    fn step_with_reset(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let (mut step, record) = self.step(a);
        if step.is_done() {
            step.init_obs = Some(self.respawn(None));
        }
        (step, record)
    }

    /// Starts an episode whose initial state depends only on `ix`.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        Ok(self.respawn(Some(StdRng::seed_from_u64(ix as u64))))
    }
}
