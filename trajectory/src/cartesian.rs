use kinematics::Pose;

/// Angular step (rad) used when sampling rotation about the free axis.
pub const ORIENTATION_INCREMENT: f64 = 0.5;

/// Upper bound (s) on the time to reach a point from its predecessor.
pub const DEFAULT_TIMING_UPPER: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeAxis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConstraint {
    pub upper: f64,
}

impl Default for TimingConstraint {
    fn default() -> Self {
        Self { upper: DEFAULT_TIMING_UPPER }
    }
}

/// A cartesian waypoint the tool may reach with any rotation about
/// `free_axis`.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianPoint {
    pub pose: Pose,
    pub free_axis: FreeAxis,
    pub orientation_increment: f64,
    pub timing: TimingConstraint,
}

impl CartesianPoint {
    /// Point free to spin about the tool approach axis.
    pub fn axial_symmetric(pose: Pose) -> Self {
        Self {
            pose,
            free_axis: FreeAxis::Z,
            orientation_increment: ORIENTATION_INCREMENT,
            timing: TimingConstraint::default(),
        }
    }
}

pub type CartTrajectory = Vec<CartesianPoint>;

pub fn to_cart_trajectory(poses: &[Pose]) -> CartTrajectory {
    poses.iter().copied().map(CartesianPoint::axial_symmetric).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axial_symmetric_defaults() {
        let pt = CartesianPoint::axial_symmetric(Pose::translation(0.1, 0.2, 0.3));
        assert_eq!(pt.free_axis, FreeAxis::Z);
        assert_eq!(pt.orientation_increment, ORIENTATION_INCREMENT);
        assert_eq!(pt.timing.upper, 0.5);
        assert_eq!(pt.pose.translation.vector.y, 0.2);
    }

    #[test]
    fn test_to_cart_trajectory_keeps_order() {
        let poses = [Pose::translation(0.0, 0.0, 1.0), Pose::translation(0.0, 0.0, 2.0)];
        let traj = to_cart_trajectory(&poses);
        assert_eq!(traj.len(), 2);
        assert_eq!(traj[1].pose, poses[1]);
        assert!(traj.iter().all(|pt| pt.free_axis == FreeAxis::Z));
    }
}
