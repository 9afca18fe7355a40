#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Vectorized kicker environment
//!
//! The episodic simulation harness between a batched physics backend and an
//! on-policy trainer. `num_envs` environments run in lockstep; each call to
//! [`KickerEnv::step`] clips and forwards one action batch, advances the
//! backend once, then evaluates termination, command resampling, the
//! curriculum-weighted reward, and the fixed-layout observation, returning
//! everything the trainer needs for one transition.
//!
//! ## Key components
//!
//! - [`curriculum`]: static tables mapping an experiment name to reward
//!   weights.
//! - [`RewardEngine`]: the closed set of reward terms, resolved and
//!   timestep-scaled at construction.
//! - [`ObservationComposer`]: fixed-order feature concatenation with
//!   startup width validation.
//! - [`EpisodeManager`]: termination predicate, time-out mask, and
//!   index-exact resets.
//! - [`KickerEnv`]: the driver tying it all together over any
//!   [`backend::SimBackend`].

pub mod command;
pub mod config;
pub mod curriculum;
pub mod driver;
pub mod episode;
pub mod error;
pub mod observation;
pub mod randomizer;
pub mod rewards;
pub mod state;

pub use command::CommandSampler;
pub use config::{CommandConfig, ConfigBundle, EnvConfig, ObsConfig, RewardConfig, TrainConfig};
pub use driver::{KickerEnv, StepExtras, Transition};
pub use episode::EpisodeManager;
pub use error::EnvError;
pub use observation::ObservationComposer;
pub use randomizer::DomainRandomizer;
pub use rewards::{RewardEngine, RewardTerm};
pub use state::EnvState;
