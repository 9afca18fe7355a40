use backend::{MockBackend, Vec3};
use env::{curriculum, CommandConfig, EnvConfig, KickerEnv, ObsConfig, RewardConfig};

/// Build a kicker environment over a scripted backend standing at its
/// spawn pose, with the named curriculum's reward weights.
pub fn make_env(num_envs: usize, exp_name: &str, seed: u64) -> KickerEnv<MockBackend> {
    let env_cfg = EnvConfig::default();
    let obs_cfg = ObsConfig::default();
    let command_cfg = CommandConfig::default();
    let reward_cfg = RewardConfig {
        reward_scales: curriculum::reward_scales(exp_name).unwrap(),
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
