//! Construction-time validation and config snapshot round trip.

use backend::{MockBackend, Vec3};
use env::{
    curriculum, CommandConfig, ConfigBundle, EnvConfig, EnvError, KickerEnv, ObsConfig,
    RewardConfig, TrainConfig,
};

fn standing_backend(num_envs: usize, env_cfg: &EnvConfig) -> MockBackend {
    let mut sim = MockBackend::new(num_envs, env_cfg.num_actions);
    sim.dt = env_cfg.dt;
    sim.register_contact_link(&env_cfg.left_foot_link);
    sim.register_contact_link(&env_cfg.right_foot_link);
    sim.base_pos.fill(Vec3::new(
        env_cfg.base_init_pos[0],
        env_cfg.base_init_pos[1],
        env_cfg.base_init_pos[2],
    ));
    sim
}

fn stand_rewards() -> RewardConfig {
    RewardConfig {
        reward_scales: curriculum::reward_scales("stand").unwrap(),
    }
}

#[test]
fn declared_observation_width_must_match_composition() {
    let env_cfg = EnvConfig::default();
    let obs_cfg = ObsConfig {
        num_obs: 50,
        ..ObsConfig::default()
    };
    let sim = standing_backend(1, &env_cfg);
    let err = KickerEnv::new(
        sim,
        env_cfg,
        &obs_cfg,
        &stand_rewards(),
        &CommandConfig::default(),
        1,
    )
    .err()
    .unwrap();
    match err {
        EnvError::ObservationWidthMismatch { configured, composed } => {
            assert_eq!(configured, 50);
            assert_eq!(composed, 105);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn every_dof_needs_a_default_angle() {
    let mut env_cfg = EnvConfig::default();
    env_cfg.default_joint_angles.remove("left_knee_joint");
    let sim = standing_backend(1, &env_cfg);
    let err = KickerEnv::new(
        sim,
        env_cfg,
        &ObsConfig::default(),
        &stand_rewards(),
        &CommandConfig::default(),
        1,
    )
    .err()
    .unwrap();
    assert!(matches!(err, EnvError::MissingJoint(name) if name == "left_knee_joint"));
}

#[test]
fn unknown_reward_term_is_rejected() {
    let env_cfg = EnvConfig::default();
    let mut reward_cfg = stand_rewards();
    reward_cfg
        .reward_scales
        .insert("ball_juggling".to_string(), 1.0);
    let sim = standing_backend(1, &env_cfg);
    let err = KickerEnv::new(
        sim,
        env_cfg,
        &ObsConfig::default(),
        &reward_cfg,
        &CommandConfig::default(),
        1,
    )
    .err()
    .unwrap();
    assert!(matches!(err, EnvError::UnknownRewardTerm(name) if name == "ball_juggling"));
}

#[test]
fn backend_dof_count_must_match_config() {
    let env_cfg = EnvConfig::default();
    let sim = MockBackend::new(1, 12);
    let err = KickerEnv::new(
        sim,
        env_cfg,
        &ObsConfig::default(),
        &stand_rewards(),
        &CommandConfig::default(),
        1,
    )
    .err()
    .unwrap();
    assert!(matches!(
        err,
        EnvError::DofCountMismatch {
            backend: 12,
            configured: 29
        }
    ));
}

#[test]
fn foot_contact_curriculum_needs_tracked_links() {
    // The step curriculum carries the foot_contact term, so construction
    // must verify the backend tracks both foot links.
    let env_cfg = EnvConfig::default();
    let reward_cfg = RewardConfig {
        reward_scales: curriculum::reward_scales("step").unwrap(),
    };
    let sim = MockBackend::new(1, env_cfg.num_actions);
    let err = KickerEnv::new(
        sim,
        env_cfg,
        &ObsConfig::default(),
        &reward_cfg,
        &CommandConfig::default(),
        1,
    )
    .err()
    .unwrap();
    assert!(matches!(err, EnvError::MissingContactLink(_)));
}

#[test]
fn config_bundle_round_trips_through_json() {
    let bundle = ConfigBundle {
        env: EnvConfig::default(),
        obs: ObsConfig::default(),
        reward: stand_rewards(),
        command: CommandConfig::default(),
        train: TrainConfig::new("stand", 300),
    };

    let mut buf = Vec::new();
    bundle.snapshot(&mut buf).unwrap();
    let restored: ConfigBundle = serde_json::from_slice(&buf).unwrap();

    assert_eq!(restored.env.dof_names, bundle.env.dof_names);
    assert_eq!(restored.env.num_actions, 29);
    assert_eq!(restored.obs.num_obs, 105);
    assert_eq!(restored.reward.reward_scales, bundle.reward.reward_scales);
    assert_eq!(restored.train.runner.experiment_name, "stand");
    assert_eq!(restored.train.runner.max_iterations, 300);
}

#[test]
fn unknown_curriculum_name_fails() {
    let err = curriculum::reward_scales("cartwheel").unwrap_err();
    assert!(matches!(err, EnvError::UnknownCurriculum(name) if name == "cartwheel"));
}
