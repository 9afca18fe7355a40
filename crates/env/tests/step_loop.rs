//! Step pipeline behavior: determinism, observation layout, action
//! latency, and command resampling cadence.

mod common;

use backend::{MockBackend, Vec3};
use common::make_env;
use env::{curriculum, CommandConfig, EnvConfig, KickerEnv, ObsConfig, RewardConfig};

fn make_env_with_cfg(num_envs: usize, env_cfg: EnvConfig, seed: u64) -> KickerEnv<MockBackend> {
    let obs_cfg = ObsConfig::default();
    let command_cfg = CommandConfig::default();
    let reward_cfg = RewardConfig {
        reward_scales: curriculum::reward_scales("stand").unwrap(),
    };

    let mut sim = MockBackend::new(num_envs, env_cfg.num_actions);
    sim.dt = env_cfg.dt;
    sim.register_contact_link(&env_cfg.left_foot_link);
    sim.register_contact_link(&env_cfg.right_foot_link);
    sim.base_pos.fill(Vec3::new(
        env_cfg.base_init_pos[0],
        env_cfg.base_init_pos[1],
        env_cfg.base_init_pos[2],
    ));
    sim.target_pos.fill(Vec3::new(0.5, 0.0, 0.5));

    KickerEnv::new(sim, env_cfg, &obs_cfg, &reward_cfg, &command_cfg, seed).unwrap()
}

#[test]
fn fixed_seed_runs_are_reproducible() {
    let mut a = make_env(4, "kicker_v1", 42);
    let mut b = make_env(4, "kicker_v1", 42);
    a.reset();
    b.reset();
    assert_eq!(a.get_observations(), b.get_observations());

    let mut actions = vec![0.0; a.num_envs() * a.num_actions()];
    for step in 0..10 {
        for (i, act) in actions.iter_mut().enumerate() {
            *act = ((step * 7 + i) % 13) as f32 * 0.05 - 0.3;
        }
        let ta = a.step(&actions).unwrap();
        let tb = b.step(&actions).unwrap();
        assert_eq!(ta.obs, tb.obs, "observations diverged at step {step}");
        assert_eq!(ta.rewards, tb.rewards);
        assert_eq!(ta.resets, tb.resets);
    }
    assert_eq!(a.state.commands, b.state.commands);
    assert_eq!(a.state.ball_pos, b.state.ball_pos);
}

#[test]
fn observation_rows_follow_the_declared_layout() {
    let mut env = make_env(2, "stand", 7);
    env.reset();

    // Script a distinctive base rotation rate on environment 1 only.
    env.backend.base_ang_vel[1] = Vec3::new(0.2, -0.4, 0.6);

    let n = env.num_actions();
    let mut actions = vec![0.0; env.num_envs() * n];
    actions[n] = 0.25; // first joint of environment 1
    actions[n + 3] = 50.0; // clipped to 10.0
    let num_obs = env.num_obs();

    // Neither commands nor the resting ball change during this step.
    let cmd_row = env.state.command_row(1);
    let cmd = [cmd_row[0], cmd_row[1], cmd_row[2]];
    let ball = env.state.ball_pos[1];

    let transition = env.step(&actions).unwrap();
    let row = &transition.obs[num_obs..2 * num_obs];

    // Angular velocity, scaled by 0.5. The identity base orientation
    // makes the base frame the world frame.
    assert_eq!(&row[0..3], &[0.1, -0.2, 0.3]);
    // Projected gravity.
    assert_eq!(&row[3..6], &[0.0, 0.0, -10.0]);

    // Commands, with the angular component scaled by 0.5.
    assert_eq!(&row[6..9], &[cmd[0], cmd[1], cmd[2] * 0.5]);

    // Joint deviations: targets came from the previous (zero) action, so
    // every joint sits at its default angle.
    assert!(row[9..9 + n].iter().all(|&v| v == 0.0));
    // Joint velocities, scaled by 0.1; the scripted backend settled.
    assert!(row[9 + n..9 + 2 * n].iter().all(|&v| v == 0.0));

    // Applied (clipped) actions.
    let action_slice = &row[9 + 2 * n..9 + 3 * n];
    assert_eq!(action_slice[0], 0.25);
    assert_eq!(action_slice[3], 10.0);
    assert!(action_slice[1] == 0.0 && action_slice[2] == 0.0);

    // Base, ball, and target positions close out the row.
    let tail = &row[9 + 3 * n..];
    assert_eq!(tail.len(), 9);
    assert_eq!(&tail[0..3], &[0.0, 0.0, 0.8]);
    assert_eq!(&tail[3..6], &[ball.x, ball.y, ball.z]);
    assert_eq!(&tail[6..9], &[0.5, 0.0, 0.5]);
}

#[test]
fn latency_defers_actions_by_one_control_step() {
    let mut env = make_env(1, "stand", 5);
    env.reset();
    let n = env.num_actions();
    let default0 = env.backend.dof_pos[0];

    let mut actions = vec![0.0; n];
    actions[0] = 0.5;
    env.step(&actions).unwrap();
    // The backend executed the previous (zero) action.
    assert!((env.backend.dof_pos[0] - default0).abs() < 1e-6);

    actions[0] = 0.0;
    env.step(&actions).unwrap();
    // One step later the 0.5 offset lands.
    assert!((env.backend.dof_pos[0] - (default0 + 0.5)).abs() < 1e-6);
}

#[test]
fn without_latency_actions_apply_immediately() {
    let env_cfg = EnvConfig {
        simulate_action_latency: false,
        ..EnvConfig::default()
    };
    let mut env = make_env_with_cfg(1, env_cfg, 5);
    env.reset();
    let n = env.num_actions();
    let default0 = env.backend.dof_pos[0];

    let mut actions = vec![0.0; n];
    actions[0] = 0.5;
    env.step(&actions).unwrap();
    assert!((env.backend.dof_pos[0] - (default0 + 0.5)).abs() < 1e-6);
}

#[test]
fn commands_hold_until_the_resampling_boundary() {
    let mut env = make_env(1, "stand", 17);
    env.reset();
    let commands_after_reset = env.state.commands.clone();

    let actions = vec![0.0; env.num_actions()];
    // 4 seconds at 50 Hz is 200 steps; the draw happens when the counter
    // hits the boundary.
    for step in 1..200 {
        env.step(&actions).unwrap();
        assert_eq!(
            env.state.commands, commands_after_reset,
            "command changed early at step {step}"
        );
    }
    env.step(&actions).unwrap();
    assert_ne!(env.state.commands, commands_after_reset);
}
