//! # Kicker runner
//!
//! Headless entry point for the vectorized kicker environment. Picks a
//! curriculum, snapshots the full configuration bundle for reproducibility,
//! and drives the environment against the scripted mock backend with a
//! zero-action policy. That is enough to exercise the whole
//! step/reset/reward pipeline and report per-curriculum reward statistics
//! without a trainer attached.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use backend::{MockBackend, Vec3};
use env::{curriculum, CommandConfig, ConfigBundle, EnvConfig, KickerEnv, ObsConfig, RewardConfig, TrainConfig};

#[derive(Parser)]
#[command(about = "Run the vectorized kicker environment headless")]
struct Args {
    /// Curriculum name (stand, step, kicker_v1).
    #[arg(short = 'e', long, default_value = "stand")]
    exp_name: String,

    /// Number of parallel environments.
    #[arg(short = 'B', long, default_value_t = 256)]
    num_envs: usize,

    /// Control steps to run.
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    /// RNG seed for command resampling and ball placement.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Directory for the config snapshot.
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let env_cfg = EnvConfig::default();
    let obs_cfg = ObsConfig::default();
    let command_cfg = CommandConfig::default();
    let reward_cfg = RewardConfig {
        reward_scales: curriculum::reward_scales(&args.exp_name)?,
    };

    let run_dir = args.log_dir.join(&args.exp_name);
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating log dir {}", run_dir.display()))?;
    let snapshot_path = run_dir.join("cfgs.json");
    let bundle = ConfigBundle {
        env: env_cfg.clone(),
        obs: obs_cfg.clone(),
        reward: reward_cfg.clone(),
        command: command_cfg.clone(),
        train: TrainConfig::new(&args.exp_name, args.steps),
    };
    let file = fs::File::create(&snapshot_path)
        .with_context(|| format!("creating {}", snapshot_path.display()))?;
    bundle.snapshot(file)?;
    tracing::info!("config snapshot written to {}", snapshot_path.display());

    let mut sim = MockBackend::new(args.num_envs, env_cfg.num_actions);
    sim.register_contact_link(&env_cfg.left_foot_link);
    sim.register_contact_link(&env_cfg.right_foot_link);
    // Stand the robot at its spawn height so the scripted backend does not
    // trip the height termination on every step.
    let init = Vec3::new(
        env_cfg.base_init_pos[0],
        env_cfg.base_init_pos[1],
        env_cfg.base_init_pos[2],
    );
    sim.base_pos.fill(init);
    sim.target_pos.fill(Vec3::new(0.5, 0.0, 0.5));
    sim.dt = env_cfg.dt;

    let mut env = KickerEnv::new(sim, env_cfg, &obs_cfg, &reward_cfg, &command_cfg, args.seed)?;
    let (_obs, _privileged) = env.reset();

    let actions = vec![0.0; env.num_envs() * env.num_actions()];
    let mut reward_acc = 0.0_f64;
    for step in 0..args.steps {
        let transition = env.step(&actions)?;
        let batch_mean = f64::from(transition.rewards.iter().sum::<f32>())
            / transition.rewards.len() as f64;
        reward_acc += batch_mean;

        if let Some(episode) = &transition.extras.episode {
            tracing::debug!(step, ?episode, "episode summary");
        }
        if (step + 1) % 50 == 0 {
            tracing::info!(
                step = step + 1,
                mean_reward = reward_acc / (step + 1) as f64,
                "progress"
            );
        }
    }

    tracing::info!(
        steps = args.steps,
        mean_reward = reward_acc / args.steps as f64,
        "run finished"
    );
    Ok(())
}
