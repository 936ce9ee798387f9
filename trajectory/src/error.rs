use kinematics::KinematicsError;
use thiserror::Error;

/// Everything that can abort a trajectory generation request.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("invalid trajectory parameters: {0}")]
    InvalidParameters(String),

    #[error("no inverse kinematics solution for pose {index}")]
    NoIkSolution { index: usize },

    #[error("seed pose has {found} joint values, robot has {expected}")]
    SeedDimension { expected: usize, found: usize },

    #[error("trajectory has no points")]
    EmptyTrajectory,

    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}

impl PlanError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameters(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
