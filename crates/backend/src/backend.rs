//! Capability interface for the batched physics backend.
//!
//! The environment layer never integrates dynamics itself. It talks to an
//! opaque backend that owns the authoritative physical state of all
//! environments and exposes batched pose/velocity queries, a position-control
//! primitive, index-selective pose writes for resets, and a single
//! synchronous [`advance`] that steps every environment in lockstep.
//!
//! [`advance`]: SimBackend::advance

use crate::types::{Quat, Vec3};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A batched buffer did not match the backend's expected shape.
    #[error("buffer shape mismatch: {0}")]
    ShapeMismatch(&'static str),
    /// The backend failed to advance the simulation.
    #[error("backend failure: {0}")]
    Failure(String),
}

/// Entities the environment layer can query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// The robot's floating base link.
    Base,
    /// The task object the robot must kick.
    Ball,
    /// The fixed target volume the ball should reach.
    Target,
}

/// Batched simulation backend.
///
/// All query methods return slices of length `num_envs`; DOF buffers are
/// row-major `[num_envs, num_dofs]`. Indexed setters write exactly the
/// environments named in `envs` and must never touch any other index.
pub trait SimBackend {
    fn num_envs(&self) -> usize;
    fn num_dofs(&self) -> usize;

    /// Advance every environment by one physics step. Synchronous: all
    /// state queried afterwards reflects the completed step.
    ///
    /// # Errors
    ///
    /// [`BackendError::Failure`] when the underlying engine cannot
    /// complete the step; the run is expected to abort.
    fn advance(&mut self) -> Result<(), BackendError>;

    fn positions(&self, body: Body) -> &[Vec3];
    fn orientations(&self, body: Body) -> &[Quat];
    fn linear_velocities(&self, body: Body) -> &[Vec3];
    fn angular_velocities(&self, body: Body) -> &[Vec3];

    fn dof_positions(&self) -> &[f32];
    fn dof_velocities(&self) -> &[f32];

    /// Set PD position targets for every actuated DOF of every environment.
    fn set_dof_position_targets(&mut self, targets: &[f32]);

    /// Overwrite DOF positions for the selected environments.
    /// `positions` holds one `num_dofs` row per entry in `envs`.
    fn set_dof_positions(&mut self, positions: &[f32], envs: &[usize], zero_velocity: bool);

    /// Overwrite an entity's position for the selected environments.
    fn set_positions(&mut self, body: Body, positions: &[Vec3], envs: &[usize], zero_velocity: bool);

    /// Overwrite an entity's orientation for the selected environments.
    fn set_orientations(&mut self, body: Body, orientations: &[Quat], envs: &[usize], zero_velocity: bool);

    /// Zero every DOF velocity of the selected environments.
    fn zero_dof_velocities(&mut self, envs: &[usize]);

    /// Per-environment contact mask for a named robot link against the
    /// world. `None` if the backend does not track that link.
    fn contact_mask(&self, link: &str) -> Option<&[bool]>;
}
