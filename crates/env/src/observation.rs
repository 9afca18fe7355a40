//! Observation composer.
//!
//! Builds the fixed-order policy input from cached state: scaled base
//! angular velocity, projected gravity, scaled commands, scaled joint
//! deviations and velocities, the last applied action, then base, ball,
//! and target positions. The declared width is checked once at
//! construction; a mismatch is a configuration error, not something to
//! recover from at step time.

use crate::config::{CommandConfig, ObsConfig};
use crate::error::EnvError;
use crate::state::EnvState;

pub struct ObservationComposer {
    num_obs: usize,
    ang_vel_scale: f32,
    dof_pos_scale: f32,
    dof_vel_scale: f32,
    /// Per-command scaling: lin_vel, lin_vel, ang_vel.
    commands_scale: Vec<f32>,
    default_dof_pos: Vec<f32>,
}

impl ObservationComposer {
    /// # Errors
    ///
    /// [`EnvError::ObservationWidthMismatch`] when the configured
    /// `num_obs` differs from the composed concatenation length.
    pub fn new(
        obs_cfg: &ObsConfig,
        command_cfg: &CommandConfig,
        default_dof_pos: Vec<f32>,
    ) -> Result<Self, EnvError> {
        let num_dofs = default_dof_pos.len();
        let composed = 3 + 3 + command_cfg.num_commands + 3 * num_dofs + 9;
        if obs_cfg.num_obs != composed {
            return Err(EnvError::ObservationWidthMismatch {
                configured: obs_cfg.num_obs,
                composed,
            });
        }

        let scales = &obs_cfg.obs_scales;
        let mut commands_scale = vec![scales.lin_vel; command_cfg.num_commands];
        if let Some(last) = commands_scale.last_mut() {
            *last = scales.ang_vel;
        }

        Ok(Self {
            num_obs: obs_cfg.num_obs,
            ang_vel_scale: scales.ang_vel,
            dof_pos_scale: scales.dof_pos,
            dof_vel_scale: scales.dof_vel,
            commands_scale,
            default_dof_pos,
        })
    }

    #[must_use]
    pub fn num_obs(&self) -> usize {
        self.num_obs
    }

    /// Fill `obs_buf` (`[num_envs, num_obs]`, row-major) from cached state.
    pub fn compose(&self, state: &EnvState, obs_buf: &mut [f32]) {
        for env in 0..state.num_envs {
            let row = &mut obs_buf[env * self.num_obs..(env + 1) * self.num_obs];
            let mut at = 0;
            let mut push = |row: &mut [f32], v: f32| {
                row[at] = v;
                at += 1;
            };

            let ang = state.base_ang_vel[env];
            push(row, ang.x * self.ang_vel_scale);
            push(row, ang.y * self.ang_vel_scale);
            push(row, ang.z * self.ang_vel_scale);

            let grav = state.projected_gravity[env];
            push(row, grav.x);
            push(row, grav.y);
            push(row, grav.z);

            for (i, &cmd) in state.command_row(env).iter().enumerate() {
                push(row, cmd * self.commands_scale[i]);
            }

            let dof_pos = state.dof_row(&state.dof_pos, env);
            for (i, &pos) in dof_pos.iter().enumerate() {
                push(row, (pos - self.default_dof_pos[i]) * self.dof_pos_scale);
            }
            for &vel in state.dof_row(&state.dof_vel, env) {
                push(row, vel * self.dof_vel_scale);
            }
            for &action in state.dof_row(&state.actions, env) {
                push(row, action);
            }

            for v in [state.base_pos[env], state.ball_pos[env], state.target_pos[env]] {
                push(row, v.x);
                push(row, v.y);
                push(row, v.z);
            }

            debug_assert_eq!(at, self.num_obs);
        }
    }
}
