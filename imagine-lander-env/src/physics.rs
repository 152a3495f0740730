//! Kinematics of the lander.
//!
//! The state is kept in world units (meters, seconds, radians) and converted
//! to the normalized observation with [`Lander::obs`].
use crate::{LanderAct, LanderObs, OBS_DIM};
use rand::Rng;

const FPS: f32 = 50.0;
const DT: f32 = 1.0 / FPS;
const SCALE: f32 = 30.0;
const VIEWPORT_W: f32 = 600.0;
const VIEWPORT_H: f32 = 400.0;
const W: f32 = VIEWPORT_W / SCALE;
const H: f32 = VIEWPORT_H / SCALE;
const HELIPAD_Y: f32 = H / 4.0;

/// Vertical distance from the center of the body to the leg tips.
const LEG_DOWN: f32 = 18.0 / SCALE;

/// Horizontal distance from the center of the body to the leg tips.
const LEG_SPAN: f32 = 20.0 / SCALE;

const GRAVITY: f32 = -10.0;
const MAIN_ENGINE_ACC: f32 = 18.0;
const SIDE_ENGINE_ACC: f32 = 1.2;
const SIDE_ENGINE_ANG_ACC: f32 = 2.5;
const GROUND_FRICTION: f32 = 0.1;
const GROUND_ANG_DAMPING: f32 = 0.5;

/// Touching down faster than this vertical speed breaks the lander.
const CRASH_SPEED: f32 = 4.0;

/// Touching down tilted more than this angle breaks the lander.
const CRASH_ANGLE: f32 = 0.6;

/// Speed below which a lander on both legs is at rest.
const REST_SPEED: f32 = 0.05;

const MAIN_ENGINE_FUEL: f32 = 0.3;
const SIDE_ENGINE_FUEL: f32 = 0.03;

/// Accelerations caused by an action.
struct Thrust {
    main: bool,

    /// `-1` for the left engine, `1` for the right engine, `0` otherwise.
    side: f32,
}

impl Thrust {
    fn from_act(act: &LanderAct) -> Option<Self> {
        match act.0 {
            0 => Some(Self { main: false, side: 0.0 }),
            1 => Some(Self { main: false, side: -1.0 }),
            2 => Some(Self { main: true, side: 0.0 }),
            3 => Some(Self { main: false, side: 1.0 }),
            _ => None,
        }
    }

    fn fuel(&self) -> f32 {
        let mut fuel = 0.0;
        if self.main {
            fuel += MAIN_ENGINE_FUEL;
        }
        if self.side != 0.0 {
            fuel += SIDE_ENGINE_FUEL;
        }
        fuel
    }
}

/// Result of [`Lander::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Outcome {
    Flying,
    Crashed,
    OutOfScreen,
    Resting,
}

impl Outcome {
    pub(crate) fn is_terminated(&self) -> bool {
        !matches!(self, Outcome::Flying)
    }
}

/// State of the lander in world units.
#[derive(Debug, Clone)]
pub(crate) struct Lander {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    angle: f32,
    angular_vel: f32,
    legs: [bool; 2],
    prev_shaping: f32,
}

impl Lander {
    /// Places a lander at the top center of the screen with a random velocity.
    pub(crate) fn spawn(rng: &mut impl Rng, initial_random: f32) -> Self {
        let (vx, vy) = if initial_random > 0.0 {
            (
                rng.gen_range(-initial_random..initial_random),
                rng.gen_range(-initial_random..initial_random),
            )
        } else {
            (0.0, 0.0)
        };
        let mut lander = Self {
            x: W / 2.0,
            y: H,
            vx,
            vy,
            angle: 0.0,
            angular_vel: 0.0,
            legs: [false, false],
            prev_shaping: 0.0,
        };
        lander.prev_shaping = shaping(&lander.obs());
        lander
    }

    /// Places a lander in the state of the given observation.
    ///
    /// Returns `None` if the observation is not 8-dimensional.
    pub(crate) fn from_obs(obs: &LanderObs) -> Option<Self> {
        if obs.0.len() != OBS_DIM {
            return None;
        }
        let o = &obs.0;
        Some(Self {
            x: o[0] * (W / 2.0) + W / 2.0,
            y: o[1] * (H / 2.0) + HELIPAD_Y + LEG_DOWN,
            vx: o[2] * FPS / (W / 2.0),
            vy: o[3] * FPS / (H / 2.0),
            angle: o[4],
            angular_vel: o[5] * FPS / 20.0,
            legs: [o[6] > 0.5, o[7] > 0.5],
            prev_shaping: shaping(obs),
        })
    }

    pub(crate) fn obs(&self) -> LanderObs {
        LanderObs(vec![
            (self.x - W / 2.0) / (W / 2.0),
            (self.y - (HELIPAD_Y + LEG_DOWN)) / (H / 2.0),
            self.vx * (W / 2.0) / FPS,
            self.vy * (H / 2.0) / FPS,
            self.angle,
            20.0 * self.angular_vel / FPS,
            if self.legs[0] { 1.0 } else { 0.0 },
            if self.legs[1] { 1.0 } else { 0.0 },
        ])
    }

    /// Heights of the left and right leg tips.
    fn leg_tips(&self) -> [f32; 2] {
        let (sin, cos) = self.angle.sin_cos();
        [-1.0f32, 1.0].map(|side| self.y - LEG_DOWN * cos + side * LEG_SPAN * sin)
    }

    /// Advances the lander by one frame.
    ///
    /// Returns `None` if the action is not in `0..4`.
    pub(crate) fn step(&mut self, act: &LanderAct) -> Option<(f32, Outcome)> {
        let thrust = Thrust::from_act(act)?;
        let (sin, cos) = self.angle.sin_cos();

        let (mut ax, mut ay, mut aw) = (0.0, GRAVITY, 0.0);
        if thrust.main {
            ax -= MAIN_ENGINE_ACC * sin;
            ay += MAIN_ENGINE_ACC * cos;
        }
        if thrust.side != 0.0 {
            ax -= thrust.side * SIDE_ENGINE_ACC * cos;
            ay -= thrust.side * SIDE_ENGINE_ACC * sin;
            aw += thrust.side * SIDE_ENGINE_ANG_ACC;
        }

        self.vx += ax * DT;
        self.vy += ay * DT;
        self.angular_vel += aw * DT;
        self.x += self.vx * DT;
        self.y += self.vy * DT;
        self.angle += self.angular_vel * DT;

        let outcome = self.resolve_ground_contact();
        let obs = self.obs();
        let shaping_ = shaping(&obs);
        let mut reward = shaping_ - self.prev_shaping - thrust.fuel();
        self.prev_shaping = shaping_;

        let outcome = if obs.0[0].abs() >= 1.0 {
            Outcome::OutOfScreen
        } else {
            outcome
        };
        match outcome {
            Outcome::Crashed | Outcome::OutOfScreen => reward = -100.0,
            Outcome::Resting => reward = 100.0,
            Outcome::Flying => {}
        }

        Some((reward, outcome))
    }

    /// Keeps the leg tips above the ground and updates the contact flags.
    fn resolve_ground_contact(&mut self) -> Outcome {
        let tips = self.leg_tips();
        let lowest = tips[0].min(tips[1]);
        if lowest > HELIPAD_Y {
            self.legs = [false, false];
            return Outcome::Flying;
        }

        if self.vy < -CRASH_SPEED || self.angle.abs() > CRASH_ANGLE {
            return Outcome::Crashed;
        }

        self.y += HELIPAD_Y - lowest;
        self.vy = self.vy.max(0.0);
        self.vx *= 1.0 - GROUND_FRICTION;
        self.angular_vel *= GROUND_ANG_DAMPING;

        let tips = self.leg_tips();
        let eps = 1e-3;
        self.legs = [tips[0] <= HELIPAD_Y + eps, tips[1] <= HELIPAD_Y + eps];

        let at_rest = self.legs[0]
            && self.legs[1]
            && self.vx.abs() < REST_SPEED
            && self.vy.abs() < REST_SPEED
            && self.angular_vel.abs() < REST_SPEED;
        if at_rest {
            Outcome::Resting
        } else {
            Outcome::Flying
        }
    }
}

/// Potential-based shaping term of the reward.
fn shaping(obs: &LanderObs) -> f32 {
    let o = &obs.0;
    -100.0 * (o[0] * o[0] + o[1] * o[1]).sqrt() - 100.0 * (o[2] * o[2] + o[3] * o[3]).sqrt()
        - 100.0 * o[4].abs()
        + 10.0 * o[6]
        + 10.0 * o[7]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obs_round_trip() {
        let obs = LanderObs(vec![0.1, 0.5, -0.2, 0.3, 0.05, -0.1, 0.0, 1.0]);
        let obs_ = Lander::from_obs(&obs).unwrap().obs();
        for (a, b) in obs.0.iter().zip(obs_.0.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_main_engine_counteracts_gravity() {
        let obs = LanderObs(vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let mut noop = Lander::from_obs(&obs).unwrap();
        let mut main = noop.clone();
        noop.step(&LanderAct(0)).unwrap();
        main.step(&LanderAct(2)).unwrap();
        assert!(noop.vy < 0.0);
        assert!(main.vy > 0.0);
        assert!(main.step(&LanderAct(4)).is_none());
    }
}
