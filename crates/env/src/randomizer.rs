//! Domain randomizer.
//!
//! On every reset the ball is re-placed at a small uniform perturbation
//! around its nominal offset, at rest on the ground (z fixed at the ball
//! radius). Each environment re-rolls independently, and only the
//! environments being reset are touched.

use backend::{Body, SimBackend, Vec3};

use crate::config::EnvConfig;
use crate::state::EnvState;

pub struct DomainRandomizer {
    ball_spawn_x_range: [f32; 2],
    ball_spawn_y_range: [f32; 2],
    ball_radius: f32,
}

impl DomainRandomizer {
    #[must_use]
    pub fn new(cfg: &EnvConfig) -> Self {
        Self {
            ball_spawn_x_range: cfg.ball_spawn_x_range,
            ball_spawn_y_range: cfg.ball_spawn_y_range,
            ball_radius: cfg.ball_radius,
        }
    }

    /// Re-roll the ball placement for the selected environments, writing
    /// both the backend and the cached task-object state.
    pub fn randomize_ball<B: SimBackend>(
        &self,
        envs: &[usize],
        state: &mut EnvState,
        backend: &mut B,
        rng: &mut fastrand::Rng,
    ) {
        let mut positions = Vec::with_capacity(envs.len());
        for _ in envs {
            let x = self.ball_spawn_x_range[0]
                + rng.f32() * (self.ball_spawn_x_range[1] - self.ball_spawn_x_range[0]);
            let y = self.ball_spawn_y_range[0]
                + rng.f32() * (self.ball_spawn_y_range[1] - self.ball_spawn_y_range[0]);
            positions.push(Vec3::new(x, y, self.ball_radius));
        }
        backend.set_positions(Body::Ball, &positions, envs, true);
        for (row, &env) in envs.iter().enumerate() {
            state.ball_pos[env] = positions[row];
            state.ball_vel[env] = Vec3::ZERO;
        }
    }
}
