use nalgebra::Isometry3;
use thiserror::Error;

pub type Pose = Isometry3<f64>;

pub mod opw_kinematics;

#[derive(Debug, Clone, Copy)]
pub struct JointState {
    pub angle: f64,
    pub velocity: f64,
    pub effort: f64,
}

impl Default for JointState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            velocity: 0.0,
            effort: 0.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum KinematicsError {
    #[error("expected {expected} joint names, found {found}")]
    JointNameCount { expected: usize, found: usize },

    #[error("expected {expected} joint values, found {found}")]
    DofMismatch { expected: usize, found: usize },
}

/// Capability the planners need from a robot model. Implemented by analytic
/// solvers here and by mocks in tests.
pub trait KinematicsProvider {
    fn dof(&self) -> usize;

    fn joint_names(&self) -> Vec<String>;

    /// All joint configurations reaching `pose`. Empty when unreachable.
    fn all_ik(&self, pose: &Pose) -> Vec<Vec<f64>>;

    fn forward_kinematics(&self, joints: &[f64]) -> Result<Pose, KinematicsError>;

    /// The preferred IK solution for `pose` given `seed`.
    fn nominal_joint_pose(&self, seed: &[f64], pose: &Pose) -> Option<Vec<f64>> {
        nominal_solution(seed, self.all_ik(pose))
    }
}

/// Picks the solution closest to `seed` (squared joint distance). An empty
/// seed carries no preference, so the first-ranked solution wins.
pub fn nominal_solution(seed: &[f64], solutions: Vec<Vec<f64>>) -> Option<Vec<f64>> {
    if seed.is_empty() {
        return solutions.into_iter().next();
    }

    solutions
        .into_iter()
        .map(|joints| (joint_distance(seed, &joints), joints))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, joints)| joints)
}

fn joint_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_without_seed_takes_first() {
        let solutions = vec![vec![1.0, 2.0], vec![0.0, 0.0]];
        assert_eq!(nominal_solution(&[], solutions), Some(vec![1.0, 2.0]));
    }

    #[test]
    fn test_nominal_prefers_closest_to_seed() {
        let solutions = vec![vec![3.0, 3.0], vec![0.1, -0.1], vec![-2.0, 1.0]];
        assert_eq!(nominal_solution(&[0.0, 0.0], solutions), Some(vec![0.1, -0.1]));
    }

    #[test]
    fn test_nominal_of_nothing() {
        assert_eq!(nominal_solution(&[0.0], Vec::new()), None);
        assert_eq!(nominal_solution(&[], Vec::new()), None);
    }
}
