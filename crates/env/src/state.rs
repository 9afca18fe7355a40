//! Batched per-environment state.
//!
//! Every buffer has leading dimension `num_envs`; DOF and command buffers
//! are flat row-major `[num_envs, dim]`. All buffers are allocated once at
//! construction and mutated in place by index afterwards; nothing here is
//! ever resized during a run.

use backend::{Quat, Vec3};

pub struct EnvState {
    pub num_envs: usize,
    pub num_dofs: usize,
    pub num_commands: usize,

    // Pose state, overwritten from the backend each step.
    pub base_pos: Vec<Vec3>,
    pub base_quat: Vec<Quat>,
    /// Roll/pitch/yaw relative to the spawn orientation, degrees.
    pub base_euler: Vec<Vec3>,
    /// Linear velocity in the base frame.
    pub base_lin_vel: Vec<Vec3>,
    /// Angular velocity in the base frame.
    pub base_ang_vel: Vec<Vec3>,
    /// Gravity direction in the base frame.
    pub projected_gravity: Vec<Vec3>,

    // Joint state, `[num_envs, num_dofs]`.
    pub dof_pos: Vec<f32>,
    pub dof_vel: Vec<f32>,
    pub last_dof_vel: Vec<f32>,

    // Action state, `[num_envs, num_dofs]`.
    pub actions: Vec<f32>,
    pub last_actions: Vec<f32>,

    // Command state, `[num_envs, num_commands]`.
    pub commands: Vec<f32>,

    // Task object state, read back from the backend each step.
    pub ball_pos: Vec<Vec3>,
    pub ball_vel: Vec<Vec3>,
    pub target_pos: Vec<Vec3>,
    pub left_foot_contact: Vec<bool>,
    pub right_foot_contact: Vec<bool>,

    // Episode state.
    pub episode_length: Vec<u32>,
    pub reset_flags: Vec<bool>,
    /// Cumulative scaled reward per active term, `[num_terms][num_envs]`.
    pub episode_sums: Vec<Vec<f32>>,
}

impl EnvState {
    #[must_use]
    pub fn new(num_envs: usize, num_dofs: usize, num_commands: usize, num_terms: usize) -> Self {
        Self {
            num_envs,
            num_dofs,
            num_commands,
            base_pos: vec![Vec3::ZERO; num_envs],
            base_quat: vec![Quat::IDENTITY; num_envs],
            base_euler: vec![Vec3::ZERO; num_envs],
            base_lin_vel: vec![Vec3::ZERO; num_envs],
            base_ang_vel: vec![Vec3::ZERO; num_envs],
            projected_gravity: vec![Vec3::ZERO; num_envs],
            dof_pos: vec![0.0; num_envs * num_dofs],
            dof_vel: vec![0.0; num_envs * num_dofs],
            last_dof_vel: vec![0.0; num_envs * num_dofs],
            actions: vec![0.0; num_envs * num_dofs],
            last_actions: vec![0.0; num_envs * num_dofs],
            commands: vec![0.0; num_envs * num_commands],
            ball_pos: vec![Vec3::ZERO; num_envs],
            ball_vel: vec![Vec3::ZERO; num_envs],
            target_pos: vec![Vec3::ZERO; num_envs],
            left_foot_contact: vec![false; num_envs],
            right_foot_contact: vec![false; num_envs],
            episode_length: vec![0; num_envs],
            reset_flags: vec![false; num_envs],
            episode_sums: vec![vec![0.0; num_envs]; num_terms],
        }
    }

    /// One environment's row of a `[num_envs, num_dofs]` buffer.
    #[must_use]
    pub fn dof_row<'a>(&self, buf: &'a [f32], env: usize) -> &'a [f32] {
        &buf[env * self.num_dofs..(env + 1) * self.num_dofs]
    }

    /// One environment's command row.
    #[must_use]
    pub fn command_row(&self, env: usize) -> &[f32] {
        &self.commands[env * self.num_commands..(env + 1) * self.num_commands]
    }
}
