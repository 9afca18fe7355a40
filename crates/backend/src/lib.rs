#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Simulation backend boundary
//!
//! This crate defines the capability interface between the vectorized RL
//! environment and whatever physics engine drives it. The environment layer
//! only ever sees batched pose/velocity/DOF queries, index-selective reset
//! writes, and a synchronous step primitive. Rigid-body integration,
//! contacts, and actuation live behind [`SimBackend`].
//!
//! The `mock` feature adds [`MockBackend`], a deterministic scripted
//! implementation used by the environment's integration tests and the
//! headless runner.

pub mod backend;
#[cfg(feature = "mock")]
pub mod mock;
pub mod transform;
pub mod types;

pub use backend::{BackendError, Body, SimBackend};
#[cfg(feature = "mock")]
pub use mock::MockBackend;
pub use transform::{inv_quat, quat_mul, quat_to_euler_deg, transform_by_quat};
pub use types::{Quat, Vec3};
