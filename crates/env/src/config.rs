//! Configuration bundle for the kicker environment.
//!
//! All structs are plain serde data. The environment treats them as
//! immutable input; the only processing it does is validation at
//! construction (see [`crate::driver::KickerEnv::new`]). A [`ConfigBundle`]
//! is serialized once per run so a training result can always be traced
//! back to the exact configuration that produced it.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

/// Robot geometry, limits, and episode parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Number of actuated DOFs (one action per DOF).
    pub num_actions: usize,
    /// Actuated joint names, in DOF order.
    pub dof_names: Vec<String>,
    /// Default joint angle per joint name; must cover every entry of
    /// `dof_names`.
    pub default_joint_angles: BTreeMap<String, f32>,
    /// PD proportional gain, shared by all DOFs.
    pub kp: f32,
    /// PD derivative gain, shared by all DOFs.
    pub kd: f32,
    /// Symmetric actuator force limit.
    pub force_range: f32,
    /// Terminate when base height drops below this (meters).
    pub termination_base_height: f32,
    /// Terminate when |roll| exceeds this (degrees).
    pub termination_if_roll_greater_than: f32,
    /// Terminate when |pitch| exceeds this (degrees).
    pub termination_if_pitch_greater_than: f32,
    /// Base spawn position.
    pub base_init_pos: [f32; 3],
    /// Base spawn orientation, scalar-first.
    pub base_init_quat: [f32; 4],
    /// Episode length in seconds; the step cap is `ceil(this / dt)`.
    pub episode_length_s: f32,
    /// Command resampling period in seconds.
    pub resampling_time_s: f32,
    /// Linear scale from action to joint-position offset.
    pub action_scale: f32,
    /// Execute the previous step's action to emulate one-step control
    /// latency on the real robot.
    pub simulate_action_latency: bool,
    /// Symmetric action clip bound.
    pub clip_actions: f32,
    /// Control timestep in seconds (50 Hz on the real robot).
    pub dt: f32,
    /// Robot link names whose world contact marks a foot touchdown.
    pub left_foot_link: String,
    pub right_foot_link: String,
    /// Ball radius (meters).
    pub ball_radius: f32,
    /// Ball spawn ranges around the nominal offset; z is fixed at
    /// `ball_radius`.
    pub ball_spawn_x_range: [f32; 2],
    pub ball_spawn_y_range: [f32; 2],
    /// Target box half-extents.
    pub target_half_extents: [f32; 3],
}

impl Default for EnvConfig {
    fn default() -> Self {
        let dof_names: Vec<String> = [
            "left_hip_pitch_joint",
            "left_hip_roll_joint",
            "left_hip_yaw_joint",
            "left_knee_joint",
            "left_ankle_pitch_joint",
            "left_ankle_roll_joint",
            "right_hip_pitch_joint",
            "right_hip_roll_joint",
            "right_hip_yaw_joint",
            "right_knee_joint",
            "right_ankle_pitch_joint",
            "right_ankle_roll_joint",
            "waist_yaw_joint",
            "waist_roll_joint",
            "waist_pitch_joint",
            "left_shoulder_pitch_joint",
            "left_shoulder_roll_joint",
            "left_shoulder_yaw_joint",
            "left_elbow_joint",
            "left_wrist_roll_joint",
            "left_wrist_pitch_joint",
            "left_wrist_yaw_joint",
            "right_shoulder_pitch_joint",
            "right_shoulder_roll_joint",
            "right_shoulder_yaw_joint",
            "right_elbow_joint",
            "right_wrist_roll_joint",
            "right_wrist_pitch_joint",
            "right_wrist_yaw_joint",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();

        let mut default_joint_angles = BTreeMap::new();
        for name in &dof_names {
            let angle = match name.as_str() {
                "left_hip_pitch_joint" | "right_hip_pitch_joint" | "left_knee_joint"
                | "right_knee_joint" => 0.1,
                "left_ankle_pitch_joint" | "right_ankle_pitch_joint" => -0.1,
                _ => 0.0,
            };
            default_joint_angles.insert(name.clone(), angle);
        }

        Self {
            num_actions: dof_names.len(),
            dof_names,
            default_joint_angles,
            kp: 50.0,
            kd: 2.5,
            force_range: 40.0,
            termination_base_height: 0.4,
            termination_if_roll_greater_than: 60.0,
            termination_if_pitch_greater_than: 60.0,
            base_init_pos: [0.0, 0.0, 0.8],
            base_init_quat: [1.0, 0.0, 0.0, 0.0],
            episode_length_s: 10.0,
            resampling_time_s: 4.0,
            action_scale: 1.0,
            simulate_action_latency: true,
            clip_actions: 10.0,
            dt: 0.02,
            left_foot_link: "left_ankle_roll_link".to_string(),
            right_foot_link: "right_ankle_roll_link".to_string(),
            ball_radius: 0.1,
            ball_spawn_x_range: [0.10, 0.11],
            ball_spawn_y_range: [-0.16, -0.15],
            target_half_extents: [0.005, 0.5, 0.5],
        }
    }
}

/// Per-field observation scaling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObsScales {
    pub lin_vel: f32,
    pub ang_vel: f32,
    pub dof_pos: f32,
    pub dof_vel: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObsConfig {
    /// Declared observation width; must equal the composed concatenation
    /// length or construction fails.
    pub num_obs: usize,
    pub obs_scales: ObsScales,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            num_obs: 105,
            obs_scales: ObsScales {
                lin_vel: 1.0,
                ang_vel: 0.5,
                dof_pos: 1.0,
                dof_vel: 0.1,
            },
        }
    }
}

/// Raw reward weights keyed by term name, before dt pre-multiplication.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RewardConfig {
    pub reward_scales: BTreeMap<String, f32>,
}

/// Velocity command sampling ranges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandConfig {
    pub num_commands: usize,
    pub lin_vel_x_range: [f32; 2],
    pub lin_vel_y_range: [f32; 2],
    pub ang_vel_range: [f32; 2],
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            num_commands: 3,
            lin_vel_x_range: [-1.0, 1.0],
            lin_vel_y_range: [-1.0, 1.0],
            ang_vel_range: [-3.14, 3.14],
        }
    }
}

/// Trainer hyperparameters. Opaque to the environment; carried in the
/// snapshot so a run records the full recipe, not just the env side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainConfig {
    pub algorithm: AlgorithmConfig,
    pub policy: PolicyConfig,
    pub runner: RunnerConfig,
    pub seed: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    pub clip_param: f32,
    pub desired_kl: f32,
    pub entropy_coef: f32,
    pub gamma: f32,
    pub lam: f32,
    pub learning_rate: f32,
    pub max_grad_norm: f32,
    pub num_learning_epochs: usize,
    pub num_mini_batches: usize,
    pub value_loss_coef: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub activation: String,
    pub actor_hidden_dims: Vec<usize>,
    pub critic_hidden_dims: Vec<usize>,
    pub init_noise_std: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub experiment_name: String,
    pub max_iterations: usize,
    pub num_steps_per_env: usize,
    pub save_interval: usize,
}

impl TrainConfig {
    #[must_use]
    pub fn new(experiment_name: &str, max_iterations: usize) -> Self {
        Self {
            algorithm: AlgorithmConfig {
                clip_param: 0.2,
                desired_kl: 0.01,
                entropy_coef: 0.01,
                gamma: 0.99,
                lam: 0.95,
                learning_rate: 1e-3,
                max_grad_norm: 1.0,
                num_learning_epochs: 5,
                num_mini_batches: 4,
                value_loss_coef: 1.0,
            },
            policy: PolicyConfig {
                activation: "elu".to_string(),
                actor_hidden_dims: vec![512, 256, 128],
                critic_hidden_dims: vec![512, 256, 128],
                init_noise_std: 1.0,
            },
            runner: RunnerConfig {
                experiment_name: experiment_name.to_string(),
                max_iterations,
                num_steps_per_env: 64,
                save_interval: 50,
            },
            seed: 1,
        }
    }
}

/// Everything a run needs to be reproduced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigBundle {
    pub env: EnvConfig,
    pub obs: ObsConfig,
    pub reward: RewardConfig,
    pub command: CommandConfig,
    pub train: TrainConfig,
}

impl ConfigBundle {
    /// Serialize the bundle as pretty JSON into `writer`.
    ///
    /// # Errors
    ///
    /// Propagates I/O and serialization failures from `serde_json`.
    pub fn snapshot<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}
