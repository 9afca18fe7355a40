use backend::BackendError;

/// Environment error taxonomy.
///
/// Every configuration variant is fatal at construction time; nothing here
/// is recovered at step time. Termination conditions are not errors.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("unknown curriculum: {0}")]
    UnknownCurriculum(String),

    #[error("unknown reward term in curriculum: {0}")]
    UnknownRewardTerm(String),

    #[error("observation width mismatch: configured {configured}, composed {composed}")]
    ObservationWidthMismatch { configured: usize, composed: usize },

    #[error("joint {0} has no entry in the configured default pose")]
    MissingJoint(String),

    #[error("joint {0} is not among the configured DOF names")]
    UnknownJoint(String),

    #[error("backend tracks no contacts for link {0}")]
    MissingContactLink(String),

    #[error("backend exposes {backend} DOFs but the config names {configured}")]
    DofCountMismatch { backend: usize, configured: usize },

    #[error(transparent)]
    Backend(#[from] BackendError),
}
