//! Curriculum registry.
//!
//! A curriculum is a named, fixed selection and weighting of reward terms.
//! The registry is a static read-only table; the only thing that varies
//! between curricula is which terms are enabled and how heavily.

use std::collections::BTreeMap;

use crate::error::EnvError;

/// Standing balance: keep the base low-ish, stay alive, spend little
/// energy, stay level.
fn stand() -> BTreeMap<String, f32> {
    [
        ("base_height", 0.2),
        ("survival_time", 2.0),
        ("energy_efficiency", 1.0),
        ("stability", 0.4),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_string(), *v))
    .collect()
}

/// Stepping gait: adds foot-contact and leg-swing shaping, drops the
/// energy penalty so the policy is free to move.
fn step() -> BTreeMap<String, f32> {
    [
        ("base_height", 0.2),
        ("survival_time", 1.2),
        ("stability", 0.2),
        ("foot_contact", 0.5),
        ("leg_swing", 0.5),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_string(), *v))
    .collect()
}

/// Ball kicking: the hit reward dominates; everything else is near-zero
/// regularization.
fn kicker_v1() -> BTreeMap<String, f32> {
    [
        ("ball_hit_target", 50_000.0),
        ("base_height", 0.001),
        ("survival_time", 0.4),
        ("energy_efficiency", 0.001),
        ("stability", 0.001),
        ("foot_contact", 0.1),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_string(), *v))
    .collect()
}

/// Look up the reward weights for a named experiment.
///
/// # Errors
///
/// Returns [`EnvError::UnknownCurriculum`] for unrecognized names.
pub fn reward_scales(exp_name: &str) -> Result<BTreeMap<String, f32>, EnvError> {
    match exp_name {
        "stand" => Ok(stand()),
        "step" => Ok(step()),
        "kicker_v1" => Ok(kicker_v1()),
        other => Err(EnvError::UnknownCurriculum(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_curricula_resolve() {
        assert_eq!(reward_scales("stand").unwrap().len(), 4);
        assert_eq!(reward_scales("step").unwrap().len(), 5);
        let kicker = reward_scales("kicker_v1").unwrap();
        assert_eq!(kicker["ball_hit_target"], 50_000.0);
    }

    #[test]
    fn unknown_curriculum_is_an_error() {
        let err = reward_scales("moonwalk").unwrap_err();
        assert!(matches!(err, EnvError::UnknownCurriculum(name) if name == "moonwalk"));
    }
}
