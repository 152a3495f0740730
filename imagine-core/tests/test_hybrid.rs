mod common;
use anyhow::Result;
use common::{push_primary, FlipBuffer, FlipEnv, FlipModel, MockLearner, VecBatch, PRIMARY_REWARD};
use imagine_core::{
    error::ImagineError,
    generic_replay_buffer::SimpleReplayBufferConfig,
    hybrid::{HybridConfig, HybridExperienceTrainer},
    Agent, ExperienceBufferBase, ReplayBufferBase,
};

type Hybrid = HybridExperienceTrainer<MockLearner, FlipModel, VecBatch, VecBatch>;

fn primary(n: usize) -> Result<FlipBuffer> {
    let mut b = FlipBuffer::build(&SimpleReplayBufferConfig::default().capacity(100));
    push_primary(&mut b, n)?;
    Ok(b)
}

#[test]
fn test_two_updates_per_gradient_step() -> Result<()> {
    let (learner, log) = MockLearner::new();
    let config = HybridConfig::default().synthetic_capacity(8);
    let mut hybrid = Hybrid::build(learner, FlipModel::new(), &config);
    let mut buffer = primary(10)?;

    let record = hybrid.train_step(&mut buffer, 3, 4)?;

    assert_eq!(log.borrow().sources, vec!['P', 'S', 'P', 'S', 'P', 'S']);
    assert_eq!(log.borrow().lr_updates, 1);
    assert_eq!(log.borrow().target_syncs, 1);
    assert_eq!(hybrid.n_updates(), 3);
    assert_eq!(record.get_scalar("train/n_updates")?, 3.0);
    assert!(record.get_scalar("train/loss")? < PRIMARY_REWARD);
    assert!(hybrid.synthetic_buffer().is_full());
    assert_eq!(buffer.len(), 10);
    Ok(())
}

#[test]
fn test_synthetic_buffer_is_regenerated_every_step() -> Result<()> {
    let (learner, _log) = MockLearner::new();
    let config = HybridConfig::default()
        .synthetic_capacity(8)
        .synthetic_seed(Some(2021));
    let mut hybrid = Hybrid::build(learner, FlipModel::new(), &config);
    let mut buffer = primary(10)?;

    hybrid.train_step(&mut buffer, 1, 4)?;
    let rewards = hybrid.synthetic_buffer().rewards().to_vec();
    hybrid.train_step(&mut buffer, 2, 4)?;

    // Same seed and same source give the same transitions
    assert_eq!(hybrid.synthetic_buffer().rewards(), rewards.as_slice());
    assert_eq!(hybrid.synthetic_buffer().len(), 8);
    for i in 0..8 {
        let s = hybrid.synthetic_buffer().obs_at(i).rows[0][0];
        let next = hybrid.synthetic_buffer().next_obs_at(i).rows[0][0];
        assert_eq!(next, 1.0 - s);
    }
    assert_eq!(hybrid.generator().model().n_steps, 16);
    assert_eq!(hybrid.n_updates(), 3);
    Ok(())
}

#[test]
fn test_disabled_synthetic_buffer() -> Result<()> {
    let (learner, log) = MockLearner::new();
    let config = HybridConfig::default().synthetic_capacity(0);
    let mut hybrid = Hybrid::build(learner, FlipModel::new(), &config);
    let mut buffer = primary(10)?;

    let record = hybrid.train_step(&mut buffer, 3, 4)?;

    assert_eq!(log.borrow().sources, vec!['P', 'P', 'P']);
    assert_eq!(hybrid.generator().model().n_steps, 0);
    assert_eq!(hybrid.n_updates(), 3);
    assert_eq!(record.get_scalar("train/loss")?, PRIMARY_REWARD);
    Ok(())
}

#[test]
fn test_n_updates_accumulates_gradient_steps() -> Result<()> {
    let (learner, log) = MockLearner::new();
    let config = HybridConfig::default().synthetic_capacity(4);
    let mut hybrid = Hybrid::build(learner, FlipModel::new(), &config);
    let mut buffer = primary(10)?;

    for g in [1, 2, 5] {
        hybrid.train_step(&mut buffer, g, 2)?;
    }

    assert_eq!(hybrid.n_updates(), 8);
    assert_eq!(log.borrow().sources.len(), 16);
    assert_eq!(log.borrow().lr_updates, 3);
    Ok(())
}

#[test]
fn test_insufficient_primary_data() -> Result<()> {
    let (learner, log) = MockLearner::new();
    let config = HybridConfig::default().synthetic_capacity(0);
    let mut hybrid = Hybrid::build(learner, FlipModel::new(), &config);
    let mut buffer = primary(10)?;

    let err = hybrid.train_step(&mut buffer, 1, 11).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ImagineError>(),
        Some(&ImagineError::InsufficientData {
            requested: 11,
            available: 10
        })
    );
    assert!(log.borrow().sources.is_empty());
    assert_eq!(hybrid.n_updates(), 0);
    Ok(())
}

#[test]
fn test_empty_primary_with_synthetic_buffer() -> Result<()> {
    let (learner, _log) = MockLearner::new();
    let config = HybridConfig::default().synthetic_capacity(4);
    let mut hybrid = Hybrid::build(learner, FlipModel::new(), &config);
    let mut buffer = primary(0)?;

    let err = hybrid.train_step(&mut buffer, 1, 1).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ImagineError>(),
        Some(&ImagineError::EmptySource)
    );
    assert_eq!(hybrid.synthetic_buffer().len(), 0);
    Ok(())
}

#[test]
fn test_agent_uses_configured_steps() -> Result<()> {
    let (learner, log) = MockLearner::new();
    let config = HybridConfig::default()
        .synthetic_capacity(4)
        .gradient_steps(2)
        .batch_size(3);
    let mut hybrid = Hybrid::build(learner, FlipModel::new(), &config);
    let mut buffer = primary(10)?;

    Agent::<FlipEnv, FlipBuffer>::train(&mut hybrid);
    assert!(Agent::<FlipEnv, FlipBuffer>::is_train(&hybrid));
    let record = Agent::<FlipEnv, FlipBuffer>::opt_with_record(&mut hybrid, &mut buffer)?;

    assert_eq!(record.get_scalar("train/n_updates")?, 2.0);
    assert_eq!(log.borrow().sources, vec!['P', 'S', 'P', 'S']);
    Ok(())
}
