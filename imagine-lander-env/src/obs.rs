use candle_core::{Device, Tensor};
use imagine_core::Obs;

/// Dimension of [`LanderObs`].
pub const OBS_DIM: usize = 8;

/// Observation of the lander:
/// `[x, y, vx, vy, angle, angular_velocity, left_leg, right_leg]`.
#[derive(Clone, Debug, PartialEq)]
pub struct LanderObs(pub Vec<f32>);

impl Obs for LanderObs {
    fn len(&self) -> usize {
        1
    }
}

impl From<LanderObs> for Tensor {
    /// Returns a tensor of shape `[1, obs_dim]`.
    ///
    /// # Panics
    ///
    /// Panics if the tensor cannot be allocated.
    fn from(obs: LanderObs) -> Tensor {
        let n = obs.0.len();
        Tensor::from_vec(obs.0, &[1, n], &Device::Cpu).expect("Failed to create a tensor")
    }
}
