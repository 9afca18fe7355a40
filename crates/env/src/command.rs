//! Command sampler.
//!
//! Target velocity commands are re-drawn on a fixed cadence (every
//! `resampling_time_s` worth of steps) and unconditionally for every
//! environment being reset. Each environment draws independently from the
//! configured uniform ranges.

use crate::config::{CommandConfig, EnvConfig};
use crate::state::EnvState;

pub struct CommandSampler {
    lin_vel_x_range: [f32; 2],
    lin_vel_y_range: [f32; 2],
    ang_vel_range: [f32; 2],
    resample_interval: u32,
}

fn rand_uniform(rng: &mut fastrand::Rng, range: [f32; 2]) -> f32 {
    range[0] + rng.f32() * (range[1] - range[0])
}

impl CommandSampler {
    #[must_use]
    pub fn new(command_cfg: &CommandConfig, env_cfg: &EnvConfig) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let resample_interval = (env_cfg.resampling_time_s / env_cfg.dt) as u32;
        Self {
            lin_vel_x_range: command_cfg.lin_vel_x_range,
            lin_vel_y_range: command_cfg.lin_vel_y_range,
            ang_vel_range: command_cfg.ang_vel_range,
            resample_interval: resample_interval.max(1),
        }
    }

    /// Environments whose step counter has hit the resampling cadence.
    #[must_use]
    pub fn due_envs(&self, state: &EnvState) -> Vec<usize> {
        (0..state.num_envs)
            .filter(|&env| state.episode_length[env] % self.resample_interval == 0)
            .collect()
    }

    /// Overwrite the command vectors of the selected environments with
    /// fresh uniform draws.
    pub fn resample(&self, envs: &[usize], state: &mut EnvState, rng: &mut fastrand::Rng) {
        for &env in envs {
            let row = env * state.num_commands;
            state.commands[row] = rand_uniform(rng, self.lin_vel_x_range);
            state.commands[row + 1] = rand_uniform(rng, self.lin_vel_y_range);
            state.commands[row + 2] = rand_uniform(rng, self.ang_vel_range);
        }
    }
}
