//! Toy environment, dynamics model and learner shared by the tests.
#![allow(dead_code)]
use anyhow::Result;
use imagine_core::{
    error::ImagineError,
    generic_replay_buffer::{BatchBase, GenericTransitionBatch, SimpleReplayBuffer},
    record::{BufferedRecorder, Record, Recorder},
    Act, DynamicsModel, Env, ExperienceBufferBase, ModelStep, Obs, OffPolicyLearner, Policy,
    Step,
};
use rand::Rng;
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

/// Rows of `f32` stored in a ring.
#[derive(Clone, Debug, PartialEq)]
pub struct VecBatch {
    capacity: usize,
    pub rows: Vec<Vec<f32>>,
}

impl VecBatch {
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        Self {
            capacity: rows.len(),
            rows,
        }
    }
}

impl BatchBase for VecBatch {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rows: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, ix: usize, data: Self) -> Result<()> {
        for (k, row) in data.rows.into_iter().enumerate() {
            if let Some(first) = self.rows.first() {
                if first.len() != row.len() {
                    return Err(ImagineError::ShapeMismatch {
                        expected: vec![first.len()],
                        actual: vec![row.len()],
                    }
                    .into());
                }
            }
            let j = (ix + k) % self.capacity;
            if j < self.rows.len() {
                self.rows[j] = row;
            } else {
                self.rows.push(row);
            }
        }
        Ok(())
    }

    fn sample(&self, ixs: &Vec<usize>) -> Self {
        Self::from_rows(ixs.iter().map(|&ix| self.rows[ix].clone()).collect())
    }
}

pub type FlipBuffer = SimpleReplayBuffer<VecBatch, VecBatch>;
pub type FlipBatch = GenericTransitionBatch<VecBatch, VecBatch>;

/// State of the flip system, `0` or `1`.
#[derive(Clone, Debug, PartialEq)]
pub struct FlipObs(pub f32);

impl Obs for FlipObs {
    fn len(&self) -> usize {
        1
    }
}

impl From<FlipObs> for VecBatch {
    fn from(obs: FlipObs) -> Self {
        VecBatch::from_rows(vec![vec![obs.0]])
    }
}

impl TryFrom<VecBatch> for FlipObs {
    type Error = anyhow::Error;

    fn try_from(b: VecBatch) -> Result<Self> {
        match b.rows.as_slice() {
            [row] if row.len() == 1 => Ok(FlipObs(row[0])),
            _ => Err(ImagineError::ShapeMismatch {
                expected: vec![1, 1],
                actual: vec![b.rows.len(), b.rows.first().map_or(0, |r| r.len())],
            }
            .into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlipAct(pub i64);

impl Act for FlipAct {}

impl From<FlipAct> for VecBatch {
    fn from(act: FlipAct) -> Self {
        VecBatch::from_rows(vec![vec![act.0 as f32]])
    }
}

/// `next = 1 - state`, reward 1 when `next == 1`. Never terminates.
///
/// It fails at the `fail_at`-th step if given.
pub struct FlipModel {
    state: Option<f32>,
    pub n_steps: usize,
    pub fail_at: Option<usize>,
}

impl FlipModel {
    pub fn new() -> Self {
        Self {
            state: None,
            n_steps: 0,
            fail_at: None,
        }
    }

    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::new()
        }
    }
}

impl DynamicsModel for FlipModel {
    type Obs = FlipObs;
    type Act = FlipAct;

    fn reset_to(&mut self, obs: &FlipObs) -> Result<()> {
        self.state = Some(obs.0);
        Ok(())
    }

    fn step(&mut self, _act: &FlipAct) -> Result<ModelStep<FlipObs>> {
        self.n_steps += 1;
        if Some(self.n_steps) == self.fail_at {
            anyhow::bail!("simulation diverged");
        }
        let state = self
            .state
            .ok_or_else(|| ImagineError::ModelInvocation("state is not set".to_string()))?;
        let next = 1.0 - state;
        Ok(ModelStep {
            obs: FlipObs(next),
            reward: if next == 1.0 { 1.0 } else { 0.0 },
            is_terminated: false,
            is_truncated: false,
            info: Record::empty(),
        })
    }

    fn sample_action<R: Rng>(&self, rng: &mut R) -> FlipAct {
        FlipAct(rng.gen_range(0..2))
    }
}

/// Reward of the transitions pushed by [`push_primary`], distinguishing them
/// from synthetic ones.
pub const PRIMARY_REWARD: f32 = 100.0;

/// Pushes `n` transitions `(s, 0, 1 - s, PRIMARY_REWARD)` with alternating `s`.
pub fn push_primary(buffer: &mut FlipBuffer, n: usize) -> Result<()> {
    for i in 0..n {
        let s = (i % 2) as f32;
        buffer.push(FlipBatch::single(
            FlipObs(s).into(),
            FlipAct(0).into(),
            FlipObs(1.0 - s).into(),
            PRIMARY_REWARD,
            false,
            false,
        ))?;
    }
    Ok(())
}

/// Shared log of a [`MockLearner`].
#[derive(Default, Debug)]
pub struct LearnerLog {
    /// `'P'` for a batch of the primary buffer, `'S'` otherwise.
    pub sources: Vec<char>,
    pub lr_updates: usize,
    pub target_syncs: usize,
}

/// A learner logging the calls it receives. Its loss is the mean reward of
/// the batch.
pub struct MockLearner {
    pub log: Rc<RefCell<LearnerLog>>,
    train: bool,
}

impl MockLearner {
    pub fn new() -> (Self, Rc<RefCell<LearnerLog>>) {
        let log = Rc::new(RefCell::new(LearnerLog::default()));
        (
            Self {
                log: log.clone(),
                train: false,
            },
            log,
        )
    }
}

impl OffPolicyLearner<FlipBatch> for MockLearner {
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
        self.log.borrow_mut().lr_updates += 1;
        Ok(())
    }

    fn learn(&mut self, batch: FlipBatch) -> Result<f32> {
        let is_primary = batch.reward.iter().all(|&r| r == PRIMARY_REWARD);
        self.log
            .borrow_mut()
            .sources
            .push(if is_primary { 'P' } else { 'S' });
        Ok(batch.reward.iter().sum::<f32>() / batch.reward.len() as f32)
    }

    fn sync_target(&mut self) -> Result<()> {
        self.log.borrow_mut().target_syncs += 1;
        Ok(())
    }

    fn save_params(&self, path: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(path)?;
        let path = path.join("mock.txt");
        std::fs::write(&path, format!("{:?}", self.log.borrow().sources.len()))?;
        Ok(vec![path])
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

impl Policy<FlipEnv> for MockLearner {
    fn sample(&mut self, _obs: &FlipObs) -> FlipAct {
        FlipAct(0)
    }
}

#[derive(Clone, Debug)]
pub struct FlipEnvConfig {
    pub episode_len: usize,
}

/// The flip system as an environment, truncated after `episode_len` steps.
/// Its reward is [`PRIMARY_REWARD`].
pub struct FlipEnv {
    state: f32,
    t: usize,
    episode_len: usize,
}

impl Env for FlipEnv {
    type Config = FlipEnvConfig;
    type Obs = FlipObs;
    type Act = FlipAct;

    fn build(config: &Self::Config, _seed: u64) -> Result<Self> {
        Ok(Self {
            state: 0.0,
            t: 0,
            episode_len: config.episode_len,
        })
    }

    fn step(&mut self, a: &FlipAct) -> (Step<Self>, Record) {
        self.state = 1.0 - self.state;
        self.t += 1;
        let is_truncated = self.t >= self.episode_len;
        let step = Step::new(a.clone(), FlipObs(self.state), PRIMARY_REWARD, false, is_truncated);
        (step, Record::empty())
    }

    fn reset(&mut self) -> Result<FlipObs> {
        self.state = 0.0;
        self.t = 0;
        Ok(FlipObs(self.state))
    }

    fn step_with_reset(&mut self, a: &FlipAct) -> (Step<Self>, Record) {
        let (mut step, record) = self.step(a);
        if step.is_done() {
            step.init_obs = Some(FlipObs(0.0));
            self.state = 0.0;
            self.t = 0;
        }
        (step, record)
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<FlipObs> {
        self.reset()
    }
}

/// A recorder whose records can be inspected after being moved into a box.
#[derive(Clone, Default)]
pub struct SharedRecorder(pub Rc<RefCell<BufferedRecorder>>);

impl SharedRecorder {
    /// Aggregated records with the steps of the flushes.
    pub fn flushed(&self) -> Vec<(i64, Record)> {
        self.0
            .borrow()
            .flushed()
            .map(|(step, r)| (step, r.clone()))
            .collect()
    }
}

impl Recorder for SharedRecorder {
    fn write(&mut self, record: Record) {
        self.0.borrow_mut().write(record);
    }

    fn store(&mut self, record: Record) {
        self.0.borrow_mut().store(record);
    }

    fn flush(&mut self, step: i64) {
        self.0.borrow_mut().flush(step);
    }
}
