//! Deterministic scripted backend for tests and headless runs.
//!
//! The mock applies position targets ideally (DOFs jump to their target on
//! [`advance`], with a finite-difference velocity estimate), integrates the
//! ball ballistically, and leaves every other quantity wherever it was last
//! written. All state fields are public so a test can place the robot or the
//! ball into any configuration before stepping.
//!
//! [`advance`]: crate::SimBackend::advance

use std::collections::HashMap;

use crate::backend::{BackendError, Body, SimBackend};
use crate::types::{Quat, Vec3};

pub struct MockBackend {
    num_envs: usize,
    num_dofs: usize,
    pub dt: f32,
    pub steps: u64,

    pub base_pos: Vec<Vec3>,
    pub base_quat: Vec<Quat>,
    pub base_lin_vel: Vec<Vec3>,
    pub base_ang_vel: Vec<Vec3>,

    pub ball_pos: Vec<Vec3>,
    pub ball_quat: Vec<Quat>,
    pub ball_lin_vel: Vec<Vec3>,
    pub ball_ang_vel: Vec<Vec3>,

    pub target_pos: Vec<Vec3>,
    pub target_quat: Vec<Quat>,
    pub target_lin_vel: Vec<Vec3>,
    pub target_ang_vel: Vec<Vec3>,

    pub dof_pos: Vec<f32>,
    pub dof_vel: Vec<f32>,
    pub dof_targets: Vec<f32>,

    pub contacts: HashMap<String, Vec<bool>>,
}

impl MockBackend {
    #[must_use]
    pub fn new(num_envs: usize, num_dofs: usize) -> Self {
        Self {
            num_envs,
            num_dofs,
            dt: 0.02,
            steps: 0,
            base_pos: vec![Vec3::ZERO; num_envs],
            base_quat: vec![Quat::IDENTITY; num_envs],
            base_lin_vel: vec![Vec3::ZERO; num_envs],
            base_ang_vel: vec![Vec3::ZERO; num_envs],
            ball_pos: vec![Vec3::ZERO; num_envs],
            ball_quat: vec![Quat::IDENTITY; num_envs],
            ball_lin_vel: vec![Vec3::ZERO; num_envs],
            ball_ang_vel: vec![Vec3::ZERO; num_envs],
            target_pos: vec![Vec3::ZERO; num_envs],
            target_quat: vec![Quat::IDENTITY; num_envs],
            target_lin_vel: vec![Vec3::ZERO; num_envs],
            target_ang_vel: vec![Vec3::ZERO; num_envs],
            dof_pos: vec![0.0; num_envs * num_dofs],
            dof_vel: vec![0.0; num_envs * num_dofs],
            dof_targets: vec![0.0; num_envs * num_dofs],
            contacts: HashMap::new(),
        }
    }

    /// Start tracking contacts for a named link (all environments clear).
    pub fn register_contact_link(&mut self, link: &str) {
        self.contacts
            .entry(link.to_string())
            .or_insert_with(|| vec![false; self.num_envs]);
    }

    /// Script the contact state of one link in one environment.
    pub fn set_contact(&mut self, link: &str, env: usize, in_contact: bool) {
        let mask = self
            .contacts
            .entry(link.to_string())
            .or_insert_with(|| vec![false; self.num_envs]);
        mask[env] = in_contact;
    }

    fn pos_buf(&self, body: Body) -> &Vec<Vec3> {
        match body {
            Body::Base => &self.base_pos,
            Body::Ball => &self.ball_pos,
            Body::Target => &self.target_pos,
        }
    }

    fn pos_buf_mut(&mut self, body: Body) -> &mut Vec<Vec3> {
        match body {
            Body::Base => &mut self.base_pos,
            Body::Ball => &mut self.ball_pos,
            Body::Target => &mut self.target_pos,
        }
    }
}

impl SimBackend for MockBackend {
    fn num_envs(&self) -> usize {
        self.num_envs
    }

    fn num_dofs(&self) -> usize {
        self.num_dofs
    }

    fn advance(&mut self) -> Result<(), BackendError> {
        for i in 0..self.dof_pos.len() {
            self.dof_vel[i] = (self.dof_targets[i] - self.dof_pos[i]) / self.dt;
            self.dof_pos[i] = self.dof_targets[i];
        }
        for env in 0..self.num_envs {
            self.ball_pos[env] += self.ball_lin_vel[env] * self.dt;
        }
        self.steps += 1;
        Ok(())
    }

    fn positions(&self, body: Body) -> &[Vec3] {
        self.pos_buf(body)
    }

    fn orientations(&self, body: Body) -> &[Quat] {
        match body {
            Body::Base => &self.base_quat,
            Body::Ball => &self.ball_quat,
            Body::Target => &self.target_quat,
        }
    }

    fn linear_velocities(&self, body: Body) -> &[Vec3] {
        match body {
            Body::Base => &self.base_lin_vel,
            Body::Ball => &self.ball_lin_vel,
            Body::Target => &self.target_lin_vel,
        }
    }

    fn angular_velocities(&self, body: Body) -> &[Vec3] {
        match body {
            Body::Base => &self.base_ang_vel,
            Body::Ball => &self.ball_ang_vel,
            Body::Target => &self.target_ang_vel,
        }
    }

    fn dof_positions(&self) -> &[f32] {
        &self.dof_pos
    }

    fn dof_velocities(&self) -> &[f32] {
        &self.dof_vel
    }

    fn set_dof_position_targets(&mut self, targets: &[f32]) {
        self.dof_targets.copy_from_slice(targets);
    }

    fn set_dof_positions(&mut self, positions: &[f32], envs: &[usize], zero_velocity: bool) {
        for (row, &env) in envs.iter().enumerate() {
            let src = &positions[row * self.num_dofs..(row + 1) * self.num_dofs];
            let base = env * self.num_dofs;
            self.dof_pos[base..base + self.num_dofs].copy_from_slice(src);
            self.dof_targets[base..base + self.num_dofs].copy_from_slice(src);
            if zero_velocity {
                self.dof_vel[base..base + self.num_dofs].fill(0.0);
            }
        }
    }

    fn set_positions(&mut self, body: Body, positions: &[Vec3], envs: &[usize], zero_velocity: bool) {
        for (row, &env) in envs.iter().enumerate() {
            self.pos_buf_mut(body)[env] = positions[row];
        }
        if zero_velocity {
            for &env in envs {
                match body {
                    Body::Base => {
                        self.base_lin_vel[env] = Vec3::ZERO;
                        self.base_ang_vel[env] = Vec3::ZERO;
                    }
                    Body::Ball => {
                        self.ball_lin_vel[env] = Vec3::ZERO;
                        self.ball_ang_vel[env] = Vec3::ZERO;
                    }
                    Body::Target => {
                        self.target_lin_vel[env] = Vec3::ZERO;
                        self.target_ang_vel[env] = Vec3::ZERO;
                    }
                }
            }
        }
    }

    fn set_orientations(&mut self, body: Body, orientations: &[Quat], envs: &[usize], _zero_velocity: bool) {
        let buf = match body {
            Body::Base => &mut self.base_quat,
            Body::Ball => &mut self.ball_quat,
            Body::Target => &mut self.target_quat,
        };
        for (row, &env) in envs.iter().enumerate() {
            buf[env] = orientations[row];
        }
    }

    fn zero_dof_velocities(&mut self, envs: &[usize]) {
        for &env in envs {
            let base = env * self.num_dofs;
            self.dof_vel[base..base + self.num_dofs].fill(0.0);
        }
    }

    fn contact_mask(&self, link: &str) -> Option<&[bool]> {
        self.contacts.get(link).map(Vec::as_slice)
    }
}
