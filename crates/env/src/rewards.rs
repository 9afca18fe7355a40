//! Reward engine.
//!
//! Reward terms form a closed enumeration. A curriculum's string-keyed
//! weight table is resolved against [`RewardTerm`] once at construction, so
//! a typo in a curriculum fails fast instead of at first use. Scales are
//! pre-multiplied by the control timestep at that point; term evaluation at
//! step time applies each weight exactly once and never mutates state
//! beyond the per-term episode accumulators.

use std::collections::BTreeMap;

use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::state::EnvState;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RewardTerm {
    BaseHeight,
    SurvivalTime,
    EnergyEfficiency,
    Stability,
    FootContact,
    LegSwing,
    BallHitTarget,
    BallDistanceFromTarget,
    ForwardVelocity,
    EpisodeLength,
}

impl RewardTerm {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "base_height" => Self::BaseHeight,
            "survival_time" => Self::SurvivalTime,
            "energy_efficiency" => Self::EnergyEfficiency,
            "stability" => Self::Stability,
            "foot_contact" => Self::FootContact,
            "leg_swing" => Self::LegSwing,
            "ball_hit_target" => Self::BallHitTarget,
            "ball_distance_from_target" => Self::BallDistanceFromTarget,
            "forward_velocity" => Self::ForwardVelocity,
            "episode_length" => Self::EpisodeLength,
            _ => return None,
        })
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BaseHeight => "base_height",
            Self::SurvivalTime => "survival_time",
            Self::EnergyEfficiency => "energy_efficiency",
            Self::Stability => "stability",
            Self::FootContact => "foot_contact",
            Self::LegSwing => "leg_swing",
            Self::BallHitTarget => "ball_hit_target",
            Self::BallDistanceFromTarget => "ball_distance_from_target",
            Self::ForwardVelocity => "forward_velocity",
            Self::EpisodeLength => "episode_length",
        }
    }
}

/// DOF indices the leg-swing term reads, resolved from joint names once.
#[derive(Copy, Clone, Debug)]
struct LegSwingDofs {
    left_hip: usize,
    right_hip: usize,
    left_knee: usize,
    right_knee: usize,
}

pub struct RewardEngine {
    /// Active terms with their dt-premultiplied weights, in deterministic
    /// curriculum-table order.
    terms: Vec<(RewardTerm, f32)>,
    leg_swing_dofs: Option<LegSwingDofs>,
    ball_radius: f32,
    target_half_extents: [f32; 3],
}

impl RewardEngine {
    /// Resolve a curriculum weight table against the closed term set.
    ///
    /// # Errors
    ///
    /// [`EnvError::UnknownRewardTerm`] for a weight keyed by no known term;
    /// [`EnvError::UnknownJoint`] when the leg-swing term is enabled but
    /// the configured DOF list is missing a hip or knee joint.
    pub fn new(scales: &BTreeMap<String, f32>, cfg: &EnvConfig) -> Result<Self, EnvError> {
        let mut terms = Vec::with_capacity(scales.len());
        for (name, scale) in scales {
            let term = RewardTerm::from_name(name)
                .ok_or_else(|| EnvError::UnknownRewardTerm(name.clone()))?;
            terms.push((term, scale * cfg.dt));
        }

        let leg_swing_dofs = if terms.iter().any(|(t, _)| *t == RewardTerm::LegSwing) {
            let dof_index = |joint: &str| {
                cfg.dof_names
                    .iter()
                    .position(|n| n == joint)
                    .ok_or_else(|| EnvError::UnknownJoint(joint.to_string()))
            };
            Some(LegSwingDofs {
                left_hip: dof_index("left_hip_pitch_joint")?,
                right_hip: dof_index("right_hip_pitch_joint")?,
                left_knee: dof_index("left_knee_joint")?,
                right_knee: dof_index("right_knee_joint")?,
            })
        } else {
            None
        };

        Ok(Self {
            terms,
            leg_swing_dofs,
            ball_radius: cfg.ball_radius,
            target_half_extents: cfg.target_half_extents,
        })
    }

    /// Active terms and their timestep-scaled weights.
    #[must_use]
    pub fn terms(&self) -> &[(RewardTerm, f32)] {
        &self.terms
    }

    /// Compute the weighted total reward into `rew_buf` and fold each
    /// term's contribution into the matching episode accumulator.
    pub fn accumulate(&self, state: &mut EnvState, rew_buf: &mut [f32]) {
        rew_buf.fill(0.0);
        for (term_idx, &(term, scale)) in self.terms.iter().enumerate() {
            for env in 0..state.num_envs {
                let rew = self.raw(term, state, env) * scale;
                rew_buf[env] += rew;
                state.episode_sums[term_idx][env] += rew;
            }
        }
    }

    /// Unweighted value of one term for one environment.
    #[must_use]
    pub fn raw(&self, term: RewardTerm, state: &EnvState, env: usize) -> f32 {
        match term {
            RewardTerm::BaseHeight => -state.base_pos[env].z,
            RewardTerm::SurvivalTime => 1.0,
            RewardTerm::EnergyEfficiency => {
                let actions = state.dof_row(&state.actions, env);
                -actions.iter().map(|a| a * a).sum::<f32>()
            }
            RewardTerm::Stability => {
                let euler = state.base_euler[env];
                (-(euler.x * euler.x + euler.y * euler.y)).exp()
            }
            RewardTerm::FootContact => {
                if state.left_foot_contact[env] && state.right_foot_contact[env] {
                    -1.0
                } else {
                    0.0
                }
            }
            RewardTerm::LegSwing => {
                let Some(dofs) = self.leg_swing_dofs else {
                    unreachable!("leg_swing DOFs are resolved at construction");
                };
                let actions = state.dof_row(&state.actions, env);
                let (lh, rh) = (actions[dofs.left_hip], actions[dofs.right_hip]);
                let (lk, rk) = (actions[dofs.left_knee], actions[dofs.right_knee]);
                let magnitude = lh.abs() + rh.abs() + lk.abs() + rk.abs();
                let symmetry_penalty = (lh + rh).abs() + (lk + rk).abs();
                magnitude - symmetry_penalty
            }
            RewardTerm::BallHitTarget => {
                if self.ball_hits_target(state, env) {
                    state.ball_vel[env].length()
                } else {
                    0.0
                }
            }
            RewardTerm::BallDistanceFromTarget => {
                -(state.ball_pos[env] - state.target_pos[env]).length()
            }
            RewardTerm::ForwardVelocity => state.base_lin_vel[env].x,
            RewardTerm::EpisodeLength => -1.0,
        }
    }

    /// Axis-aligned overlap test between the ball (by radius) and the
    /// target volume (by half-extents); a hit requires overlap on all
    /// three axes.
    #[must_use]
    pub fn ball_hits_target(&self, state: &EnvState, env: usize) -> bool {
        let ball = state.ball_pos[env];
        let target = state.target_pos[env];
        let he = self.target_half_extents;
        (ball.x - target.x).abs() <= self.ball_radius + he[0]
            && (ball.y - target.y).abs() <= self.ball_radius + he[1]
            && (ball.z - target.z).abs() <= self.ball_radius + he[2]
    }
}
