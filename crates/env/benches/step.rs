use criterion::{criterion_group, criterion_main, Criterion};

use backend::{MockBackend, Vec3};
use env::{curriculum, CommandConfig, EnvConfig, KickerEnv, ObsConfig, RewardConfig};

fn make_env(num_envs: usize, exp_name: &str) -> KickerEnv<MockBackend> {
    let env_cfg = EnvConfig::default();
    let reward_cfg = RewardConfig {
        reward_scales: curriculum::reward_scales(exp_name).unwrap(),
    };

    let mut sim = MockBackend::new(num_envs, env_cfg.num_actions);
    sim.dt = env_cfg.dt;
    sim.register_contact_link(&env_cfg.left_foot_link);
    sim.register_contact_link(&env_cfg.right_foot_link);
    sim.base_pos.fill(Vec3::new(0.0, 0.0, 0.8));
    sim.target_pos.fill(Vec3::new(0.5, 0.0, 0.5));

    KickerEnv::new(
        sim,
        env_cfg,
        &ObsConfig::default(),
        &reward_cfg,
        &CommandConfig::default(),
        1,
    )
    .unwrap()
}

fn bench_step(c: &mut Criterion) {
    for num_envs in [64_usize, 1024] {
        let mut env = make_env(num_envs, "kicker_v1");
        env.reset();
        let actions = vec![0.0; env.num_envs() * env.num_actions()];
        c.bench_function(&format!("step_{num_envs}_envs"), |b| {
            b.iter(|| env.step(&actions).unwrap().rewards[0])
        });
    }
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
