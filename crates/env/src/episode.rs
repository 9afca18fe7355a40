//! Episode/termination manager.
//!
//! Per environment the lifecycle is a two-state machine: `ALIVE` until the
//! termination predicate fires, then an immediate indexed reset in the same
//! step, so a terminated environment never survives into the next
//! observation. The reset writes exactly the indices being reset; the only
//! externally visible artifacts are the returned reset flags and the
//! episode reward summary.

use std::collections::BTreeMap;

use backend::{Body, Quat, SimBackend, Vec3};

use crate::config::EnvConfig;
use crate::rewards::RewardTerm;
use crate::state::EnvState;

pub struct EpisodeManager {
    max_episode_length: u32,
    episode_length_s: f32,
    roll_limit: f32,
    pitch_limit: f32,
    min_base_height: f32,
    base_init_pos: Vec3,
    base_init_quat: Quat,
}

impl EpisodeManager {
    #[must_use]
    pub fn new(cfg: &EnvConfig) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let max_episode_length = (cfg.episode_length_s / cfg.dt).ceil() as u32;
        Self {
            max_episode_length,
            episode_length_s: cfg.episode_length_s,
            roll_limit: cfg.termination_if_roll_greater_than,
            pitch_limit: cfg.termination_if_pitch_greater_than,
            min_base_height: cfg.termination_base_height,
            base_init_pos: Vec3::new(
                cfg.base_init_pos[0],
                cfg.base_init_pos[1],
                cfg.base_init_pos[2],
            ),
            base_init_quat: Quat::new(
                cfg.base_init_quat[0],
                cfg.base_init_quat[1],
                cfg.base_init_quat[2],
                cfg.base_init_quat[3],
            ),
        }
    }

    #[must_use]
    pub fn max_episode_length(&self) -> u32 {
        self.max_episode_length
    }

    /// Evaluate the termination predicate for every environment.
    ///
    /// Sets `state.reset_flags`, fills the time-out mask, and returns the
    /// indices that must be reset. Time-out and hard-failure conditions are
    /// evaluated independently; the mask reports only terminations
    /// attributable purely to step-count exhaustion, so the trainer can
    /// bootstrap those and treat everything else as failure.
    pub fn check_termination(&self, state: &mut EnvState, time_outs: &mut [f32]) -> Vec<usize> {
        let mut reset_envs = Vec::new();
        for env in 0..state.num_envs {
            let timed_out = state.episode_length[env] > self.max_episode_length;
            let euler = state.base_euler[env];
            let failed = euler.y.abs() > self.pitch_limit
                || euler.x.abs() > self.roll_limit
                || state.base_pos[env].z < self.min_base_height;

            let reset = timed_out || failed;
            state.reset_flags[env] = reset;
            time_outs[env] = if timed_out && !failed { 1.0 } else { 0.0 };
            if reset {
                reset_envs.push(env);
            }
        }
        reset_envs
    }

    /// Reset the given environments in place: default pose with zero
    /// velocity, spawn base pose, cleared action/step history. Flushes the
    /// per-term episode accumulators into a summary (mean accumulated
    /// value over nominal episode duration) before zeroing them.
    ///
    /// Writes never touch an index outside `envs`.
    pub fn reset_envs<B: SimBackend>(
        &self,
        envs: &[usize],
        state: &mut EnvState,
        backend: &mut B,
        default_dof_pos: &[f32],
        terms: &[(RewardTerm, f32)],
    ) -> BTreeMap<String, f32> {
        let num_dofs = state.num_dofs;

        // Joint state back to the default pose, joints at rest.
        let mut dof_rows = Vec::with_capacity(envs.len() * num_dofs);
        for &env in envs {
            let row = env * num_dofs;
            state.dof_pos[row..row + num_dofs].copy_from_slice(default_dof_pos);
            state.dof_vel[row..row + num_dofs].fill(0.0);
            dof_rows.extend_from_slice(default_dof_pos);
        }
        backend.set_dof_positions(&dof_rows, envs, true);

        // Base back to the spawn pose, base at rest.
        for &env in envs {
            state.base_pos[env] = self.base_init_pos;
            state.base_quat[env] = self.base_init_quat;
            state.base_lin_vel[env] = Vec3::ZERO;
            state.base_ang_vel[env] = Vec3::ZERO;
        }
        let init_pos = vec![self.base_init_pos; envs.len()];
        let init_quat = vec![self.base_init_quat; envs.len()];
        backend.set_positions(Body::Base, &init_pos, envs, true);
        backend.set_orientations(Body::Base, &init_quat, envs, false);
        backend.zero_dof_velocities(envs);

        // Clear step history.
        for &env in envs {
            let row = env * num_dofs;
            state.last_actions[row..row + num_dofs].fill(0.0);
            state.last_dof_vel[row..row + num_dofs].fill(0.0);
            state.episode_length[env] = 0;
            state.reset_flags[env] = true;
        }

        // Flush episode statistics for the reset subset.
        let mut summary = BTreeMap::new();
        #[allow(clippy::cast_precision_loss)]
        let count = envs.len() as f32;
        for (term_idx, &(term, _)) in terms.iter().enumerate() {
            let sums = &mut state.episode_sums[term_idx];
            let mean = envs.iter().map(|&env| sums[env]).sum::<f32>() / count;
            summary.insert(format!("rew_{}", term.name()), mean / self.episode_length_s);
            for &env in envs {
                sums[env] = 0.0;
            }
        }
        summary
    }
}
