use anyhow::Result;
use imagine_core::{error::ImagineError, DynamicsModel, Env};
use imagine_lander_env::{LanderAct, LanderConfig, LanderEnv, LanderModel, LanderObs, OBS_DIM};

fn assert_close(a: &LanderObs, b: &LanderObs) {
    assert_eq!(a.0.len(), b.0.len());
    for (x, y) in a.0.iter().zip(b.0.iter()) {
        assert!((x - y).abs() < 1e-4, "{:?} != {:?}", a, b);
    }
}

#[test]
fn test_reset() -> Result<()> {
    let mut env = LanderEnv::build(&LanderConfig::default(), 0)?;
    let obs = env.reset()?;
    assert_eq!(obs.0.len(), OBS_DIM);
    assert!((obs.0[1] - 1.41).abs() < 1e-4);
    assert_eq!(&obs.0[6..], &[0.0, 0.0]);

    // A reset starts a new episode
    env.step(&LanderAct(0));
    assert_eq!(env.count_steps(), 1);
    env.reset()?;
    assert_eq!(env.count_steps(), 0);
    Ok(())
}

#[test]
fn test_free_fall_crashes() -> Result<()> {
    let mut env = LanderEnv::build(&LanderConfig::default(), 1)?;
    env.reset()?;

    let mut last = None;
    for _ in 0..1000 {
        let (step, _) = env.step(&LanderAct(0));
        if step.is_done() {
            last = Some(step);
            break;
        }
    }
    let step = last.expect("the lander should hit the ground");
    assert!(step.is_terminated);
    assert!(!step.is_truncated);
    assert_eq!(step.reward, -100.0);
    Ok(())
}

#[test]
fn test_truncation_and_init_obs() -> Result<()> {
    let config = LanderConfig::default().max_steps(Some(3));
    let mut env = LanderEnv::build(&config, 0)?;
    env.reset()?;

    for _ in 0..2 {
        let (step, _) = env.step_with_reset(&LanderAct(2));
        assert!(!step.is_done());
        assert!(step.init_obs.is_none());
    }
    let (step, _) = env.step_with_reset(&LanderAct(2));
    assert!(!step.is_terminated);
    assert!(step.is_truncated);
    assert!(step.init_obs.is_some());
    assert_eq!(env.count_steps(), 0);
    Ok(())
}

#[test]
fn test_same_seed_same_trajectory() -> Result<()> {
    let run = |seed: u64| -> Result<Vec<f32>> {
        let mut env = LanderEnv::build(&LanderConfig::default(), seed)?;
        env.reset()?;
        let mut rewards = vec![];
        for i in 0..20 {
            rewards.push(env.step(&LanderAct(i % 4)).0.reward);
        }
        Ok(rewards)
    };
    assert_eq!(run(7)?, run(7)?);

    // Evaluation episodes depend on the index only
    let mut env1 = LanderEnv::build(&LanderConfig::default(), 1)?;
    let mut env2 = LanderEnv::build(&LanderConfig::default(), 2)?;
    assert_eq!(env1.reset_with_index(3)?, env2.reset_with_index(3)?);
    Ok(())
}

#[test]
fn test_model_teleports_to_resting_state() -> Result<()> {
    let mut model = LanderModel::build(&LanderConfig::default());
    model.reset_to(&LanderObs(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0]))?;
    let step = model.step(&LanderAct(0))?;
    assert!(step.is_terminated);
    assert!(!step.is_truncated);
    assert_eq!(step.reward, 100.0);
    Ok(())
}

#[test]
fn test_model_leaves_screen() -> Result<()> {
    let mut model = LanderModel::build(&LanderConfig::default());
    model.reset_to(&LanderObs(vec![0.999, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]))?;
    let step = model.step(&LanderAct(0))?;
    assert!(step.is_terminated);
    assert_eq!(step.reward, -100.0);
    Ok(())
}

#[test]
fn test_model_follows_env() -> Result<()> {
    let mut env = LanderEnv::build(&LanderConfig::default(), 3)?;
    let mut model = LanderModel::build(&LanderConfig::default());
    let mut obs = env.reset()?;

    for i in 0..10 {
        let act = LanderAct(i % 4);
        model.reset_to(&obs)?;
        let m = model.step(&act)?;
        let (step, _) = env.step(&act);
        assert_close(&m.obs, &step.obs);
        assert!((m.reward - step.reward).abs() < 1e-2);
        obs = step.obs;
    }
    Ok(())
}

#[test]
fn test_model_errors() {
    let mut model = LanderModel::build(&LanderConfig::default());

    let err = model.step(&LanderAct(0)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ImagineError>(),
        Some(ImagineError::ModelInvocation(_))
    ));

    let err = model.reset_to(&LanderObs(vec![0.0; 3])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ImagineError>(),
        Some(ImagineError::ModelInvocation(_))
    ));

    model
        .reset_to(&LanderObs(vec![0.0; OBS_DIM]))
        .unwrap();
    let err = model.step(&LanderAct(7)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ImagineError>(),
        Some(ImagineError::ModelInvocation(_))
    ));
}
