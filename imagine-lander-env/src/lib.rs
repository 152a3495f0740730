//! Lunar lander environment.
//!
//! A lander with a main engine and two orientation engines has to land on a
//! flat pad. Observations, actions and rewards follow `LunarLander-v2` of
//! Gymnasium, while the rigid-body simulation is replaced with a few lines of
//! kinematics:
//!
//! * Observation (8-dim): position `x, y`, velocity `vx, vy`, angle, angular
//!   velocity and contact flags of the left and right legs, normalized as in
//!   `LunarLander-v2`. The landing pad is at `(0, 0)`.
//! * Action: `0` noop, `1` left orientation engine, `2` main engine, `3`
//!   right orientation engine.
//! * Reward: shaping `-100 |p| - 100 |v| - 100 |angle| + 10 legs` difference
//!   between consecutive steps, fuel cost of the engines, `-100` on a crash or
//!   leaving the screen, `+100` when coming to rest.
//!
//! [`LanderEnv`] implements [`Env`](imagine_core::Env) and
//! [`LanderModel`] implements [`DynamicsModel`](imagine_core::DynamicsModel)
//! with the same simulation, so that a state observed in the environment can
//! be queried on the model.
mod act;
mod config;
mod env;
mod model;
mod obs;
mod physics;
pub use act::LanderAct;
pub use config::LanderConfig;
pub use env::LanderEnv;
pub use model::LanderModel;
pub use obs::{LanderObs, OBS_DIM};

/// Number of discrete actions.
pub const N_ACTIONS: usize = 4;
