//! Simulation driver.
//!
//! [`KickerEnv`] orchestrates one control step: clip the raw action, pick
//! the executed action (previous step's when latency simulation is on),
//! convert to joint-position targets, advance the backend, refresh every
//! cached buffer, then run termination, command resampling, reward, and
//! observation composition in that exact order. The backend advance is
//! synchronous; nothing downstream runs until it completes.

use std::collections::BTreeMap;

use backend::{inv_quat, quat_mul, quat_to_euler_deg, transform_by_quat};
use backend::{Body, Quat, SimBackend, Vec3};

use crate::command::CommandSampler;
use crate::config::{CommandConfig, EnvConfig, ObsConfig, RewardConfig};
use crate::episode::EpisodeManager;
use crate::error::EnvError;
use crate::observation::ObservationComposer;
use crate::randomizer::DomainRandomizer;
use crate::rewards::{RewardEngine, RewardTerm};
use crate::state::EnvState;

/// Side information returned alongside every step.
pub struct StepExtras {
    /// 1.0 where an environment terminated purely by step-count
    /// exhaustion this step, 0.0 everywhere else.
    pub time_outs: Vec<f32>,
    /// Mean per-term episode reward over the environments reset this step,
    /// keyed `rew_<term>`; `None` when nothing reset.
    pub episode: Option<BTreeMap<String, f32>>,
}

/// Result of one control step, borrowed from the environment's buffers.
pub struct Transition<'a> {
    /// `[num_envs, num_obs]`, row-major.
    pub obs: &'a [f32],
    /// Reserved; this environment exposes no privileged observations.
    pub privileged_obs: Option<&'a [f32]>,
    pub rewards: &'a [f32],
    pub resets: &'a [bool],
    pub extras: &'a StepExtras,
}

pub struct KickerEnv<B: SimBackend> {
    pub backend: B,
    pub state: EnvState,
    pub rewards: RewardEngine,
    pub extras: StepExtras,

    cfg: EnvConfig,
    composer: ObservationComposer,
    episodes: EpisodeManager,
    sampler: CommandSampler,
    randomizer: DomainRandomizer,
    rng: fastrand::Rng,

    num_envs: usize,
    num_actions: usize,
    num_obs: usize,
    default_dof_pos: Vec<f32>,
    inv_base_init_quat: Quat,
    global_gravity: Vec3,
    track_contacts: bool,

    obs_buf: Vec<f32>,
    rew_buf: Vec<f32>,
    target_buf: Vec<f32>,
}

impl<B: SimBackend> KickerEnv<B> {
    /// Build the environment around a backend.
    ///
    /// All configuration validation happens here: DOF/default-pose
    /// coverage, reward-term resolution, observation width, and (when the
    /// foot-contact term is active) backend contact tracking for the
    /// configured foot links. Any failure is fatal; there is no partial
    /// construction.
    ///
    /// # Errors
    ///
    /// See [`EnvError`]; every variant other than `Backend` can surface
    /// here.
    pub fn new(
        backend: B,
        cfg: EnvConfig,
        obs_cfg: &ObsConfig,
        reward_cfg: &RewardConfig,
        command_cfg: &CommandConfig,
        seed: u64,
    ) -> Result<Self, EnvError> {
        if backend.num_dofs() != cfg.num_actions {
            return Err(EnvError::DofCountMismatch {
                backend: backend.num_dofs(),
                configured: cfg.num_actions,
            });
        }

        let mut default_dof_pos = Vec::with_capacity(cfg.dof_names.len());
        for name in &cfg.dof_names {
            let angle = cfg
                .default_joint_angles
                .get(name)
                .ok_or_else(|| EnvError::MissingJoint(name.clone()))?;
            default_dof_pos.push(*angle);
        }

        let rewards = RewardEngine::new(&reward_cfg.reward_scales, &cfg)?;
        let composer = ObservationComposer::new(obs_cfg, command_cfg, default_dof_pos.clone())?;

        let track_contacts = rewards
            .terms()
            .iter()
            .any(|(t, _)| *t == RewardTerm::FootContact);
        if track_contacts {
            for link in [&cfg.left_foot_link, &cfg.right_foot_link] {
                if backend.contact_mask(link).is_none() {
                    return Err(EnvError::MissingContactLink(link.clone()));
                }
            }
        }

        let num_envs = backend.num_envs();
        let num_actions = cfg.num_actions;
        let num_obs = composer.num_obs();
        let state = EnvState::new(
            num_envs,
            num_actions,
            command_cfg.num_commands,
            rewards.terms().len(),
        );

        let episodes = EpisodeManager::new(&cfg);
        let sampler = CommandSampler::new(command_cfg, &cfg);
        let randomizer = DomainRandomizer::new(&cfg);
        let inv_base_init_quat = inv_quat(Quat::new(
            cfg.base_init_quat[0],
            cfg.base_init_quat[1],
            cfg.base_init_quat[2],
            cfg.base_init_quat[3],
        ));

        tracing::info!(
            num_envs,
            num_actions,
            num_obs,
            terms = rewards.terms().len(),
            max_episode_length = episodes.max_episode_length(),
            "kicker environment ready"
        );

        Ok(Self {
            backend,
            state,
            rewards,
            extras: StepExtras {
                time_outs: vec![0.0; num_envs],
                episode: None,
            },
            cfg,
            composer,
            episodes,
            sampler,
            randomizer,
            rng: fastrand::Rng::with_seed(seed),
            num_envs,
            num_actions,
            num_obs,
            default_dof_pos,
            inv_base_init_quat,
            global_gravity: Vec3::new(0.0, 0.0, -10.0),
            track_contacts,
            obs_buf: vec![0.0; num_envs * num_obs],
            rew_buf: vec![0.0; num_envs],
            target_buf: vec![0.0; num_envs * num_actions],
        })
    }

    #[must_use]
    pub fn num_envs(&self) -> usize {
        self.num_envs
    }

    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    #[must_use]
    pub fn num_obs(&self) -> usize {
        self.num_obs
    }

    #[must_use]
    pub fn max_episode_length(&self) -> u32 {
        self.episodes.max_episode_length()
    }

    /// Current observation batch without advancing the simulation.
    #[must_use]
    pub fn get_observations(&self) -> &[f32] {
        &self.obs_buf
    }

    /// Advance every environment by one control step.
    ///
    /// `actions` is `[num_envs, num_actions]`, row-major.
    ///
    /// # Errors
    ///
    /// Only [`EnvError::Backend`] once construction has succeeded; the
    /// run is expected to abort on it.
    ///
    /// # Panics
    ///
    /// If `actions` has the wrong length.
    pub fn step(&mut self, actions: &[f32]) -> Result<Transition<'_>, EnvError> {
        assert_eq!(
            actions.len(),
            self.num_envs * self.num_actions,
            "action batch must be num_envs * num_actions"
        );

        // Clip, then pick the executed action. With latency simulation on,
        // the backend sees the previous step's action, matching the
        // one-step control delay of the real robot.
        let clip = self.cfg.clip_actions;
        for (dst, &src) in self.state.actions.iter_mut().zip(actions) {
            *dst = src.clamp(-clip, clip);
        }
        let exec = if self.cfg.simulate_action_latency {
            &self.state.last_actions
        } else {
            &self.state.actions
        };
        for (i, target) in self.target_buf.iter_mut().enumerate() {
            *target = exec[i] * self.cfg.action_scale + self.default_dof_pos[i % self.num_actions];
        }
        self.backend.set_dof_position_targets(&self.target_buf);
        self.backend.advance()?;

        for len in &mut self.state.episode_length {
            *len += 1;
        }
        self.refresh_state();

        let due = self.sampler.due_envs(&self.state);
        self.sampler.resample(&due, &mut self.state, &mut self.rng);

        let reset_envs = self
            .episodes
            .check_termination(&mut self.state, &mut self.extras.time_outs);
        self.extras.episode = if reset_envs.is_empty() {
            None
        } else {
            Some(self.reset_idx(&reset_envs))
        };

        self.rewards.accumulate(&mut self.state, &mut self.rew_buf);
        self.composer.compose(&self.state, &mut self.obs_buf);

        // Roll history for the next step's latency selection and
        // smoothness terms.
        self.state.last_actions.copy_from_slice(&self.state.actions);
        self.state.last_dof_vel.copy_from_slice(&self.state.dof_vel);

        Ok(Transition {
            obs: &self.obs_buf,
            privileged_obs: None,
            rewards: &self.rew_buf,
            resets: &self.state.reset_flags,
            extras: &self.extras,
        })
    }

    /// Force a reset of every environment and return the cached
    /// observation batch.
    pub fn reset(&mut self) -> (&[f32], Option<&[f32]>) {
        for flag in &mut self.state.reset_flags {
            *flag = true;
        }
        let all: Vec<usize> = (0..self.num_envs).collect();
        let summary = self.reset_idx(&all);
        self.extras.episode = Some(summary);
        (&self.obs_buf, None)
    }

    /// Reset exactly the given environment indices.
    fn reset_idx(&mut self, envs: &[usize]) -> BTreeMap<String, f32> {
        let summary = self.episodes.reset_envs(
            envs,
            &mut self.state,
            &mut self.backend,
            &self.default_dof_pos,
            self.rewards.terms(),
        );
        self.randomizer
            .randomize_ball(envs, &mut self.state, &mut self.backend, &mut self.rng);
        self.sampler.resample(envs, &mut self.state, &mut self.rng);
        tracing::debug!(count = envs.len(), "environments reset");
        summary
    }

    /// Refresh every cached buffer from the backend's post-step state.
    fn refresh_state(&mut self) {
        let state = &mut self.state;
        state.base_pos.copy_from_slice(self.backend.positions(Body::Base));
        state
            .base_quat
            .copy_from_slice(self.backend.orientations(Body::Base));

        let lin = self.backend.linear_velocities(Body::Base);
        let ang = self.backend.angular_velocities(Body::Base);
        for env in 0..state.num_envs {
            let quat = state.base_quat[env];
            let inv = inv_quat(quat);
            state.base_euler[env] = quat_to_euler_deg(quat_mul(self.inv_base_init_quat, quat));
            state.base_lin_vel[env] = transform_by_quat(lin[env], inv);
            state.base_ang_vel[env] = transform_by_quat(ang[env], inv);
            state.projected_gravity[env] = transform_by_quat(self.global_gravity, inv);
        }

        state.dof_pos.copy_from_slice(self.backend.dof_positions());
        state.dof_vel.copy_from_slice(self.backend.dof_velocities());

        state.ball_pos.copy_from_slice(self.backend.positions(Body::Ball));
        state
            .ball_vel
            .copy_from_slice(self.backend.linear_velocities(Body::Ball));
        state
            .target_pos
            .copy_from_slice(self.backend.positions(Body::Target));

        if self.track_contacts {
            if let Some(mask) = self.backend.contact_mask(&self.cfg.left_foot_link) {
                state.left_foot_contact.copy_from_slice(mask);
            }
            if let Some(mask) = self.backend.contact_mask(&self.cfg.right_foot_link) {
                state.right_foot_contact.copy_from_slice(mask);
            }
        }
    }
}
