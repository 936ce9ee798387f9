use std::time::Instant;

use kinematics::{KinematicsProvider, Pose};
use log::{debug, info};
use nalgebra::Vector3;

use crate::cartesian::{CartTrajectory, CartesianPoint, to_cart_trajectory};
use crate::config::{Anchor, TrajectoryConfig};
use crate::error::{PlanError, Result};
use crate::joint_trajectory::{JointTrajectory, to_joint_trajectory};
use crate::lemniscate::{LemniscateParams, create_lemniscate_curve};

/// Distance (m) the sphere center sits below the start pose.
pub const CENTER_DROP: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPath {
    pub poses: Vec<Pose>,
    pub trajectory: JointTrajectory,
}

/// Turns a start pose into a lemniscate joint trajectory for one robot.
pub struct CartPathPlanner<K> {
    robot: K,
    config: TrajectoryConfig,
    world_frame: String,
}

impl<K: KinematicsProvider> CartPathPlanner<K> {
    pub fn new(robot: K, config: TrajectoryConfig, world_frame: impl Into<String>) -> Result<Self> {
        config.validate()?;
        if !config.seed_pose.is_empty() && config.seed_pose.len() != robot.dof() {
            return Err(PlanError::SeedDimension {
                expected: robot.dof(),
                found: config.seed_pose.len(),
            });
        }
        info!("CartPathPlanner ready for {} joints", robot.dof());
        Ok(Self {
            robot,
            config,
            world_frame: world_frame.into(),
        })
    }

    pub fn robot(&self) -> &K {
        &self.robot
    }

    pub fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    /// Tool pose of the configured seed joints.
    pub fn seed_start_pose(&self) -> Result<Pose> {
        Ok(self.robot.forward_kinematics(&self.config.seed_pose)?)
    }

    pub fn curve_center(&self, start_pose: &Pose) -> Vector3<f64> {
        match self.config.anchor {
            Anchor::StartPose => start_pose.translation.vector - Vector3::z() * CENTER_DROP,
            Anchor::Center => self.config.center(),
        }
    }

    pub fn generate_poses(&self, start_pose: &Pose) -> Result<Vec<Pose>> {
        let params = LemniscateParams {
            foci_distance: self.config.foci_distance,
            sphere_radius: self.config.radius,
            num_points: self.config.num_points,
            num_lemniscates: self.config.num_lemniscates,
            center: self.curve_center(start_pose),
        };
        let mut poses = create_lemniscate_curve(&params)?;
        debug!("Trajectory with {} points was generated", poses.len());

        if let Some(max) = self.config.max_points {
            if max < poses.len() {
                debug!("Truncating trajectory to {} points", max);
                poses.truncate(max);
            }
        }
        Ok(poses)
    }

    pub fn generate_cart_trajectory(&self, start_pose: &Pose) -> Result<CartTrajectory> {
        Ok(to_cart_trajectory(&self.generate_poses(start_pose)?))
    }

    pub fn run_path(&self, path: &[CartesianPoint]) -> Result<JointTrajectory> {
        to_joint_trajectory(
            path,
            &self.robot,
            &self.config.seed_pose,
            self.config.time_step()?,
            &self.world_frame,
        )
    }

    /// Full pipeline keeping the intermediate poses for display.
    pub fn plan(&self, start_pose: &Pose) -> Result<PlannedPath> {
        let started = Instant::now();
        let poses = self.generate_poses(start_pose)?;
        let trajectory = self.run_path(&to_cart_trajectory(&poses))?;
        info!(
            "Joint trajectory with {} points generated in {:.3} seconds",
            trajectory.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(PlannedPath { poses, trajectory })
    }

    /// Curve around `start_pose`, then IK for every point.
    pub fn generate_trajectory(&self, start_pose: &Pose) -> Result<JointTrajectory> {
        Ok(self.plan(start_pose)?.trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use crate::joint_trajectory::tests::MockRobot;
    use kinematics::KinematicsError;
    use std::time::Duration;

    fn six_dof_robot() -> MockRobot {
        let mut robot = MockRobot::new();
        robot.expect_dof().return_const(6usize);
        robot
            .expect_joint_names()
            .returning(|| (1..=6).map(|i| format!("joint_{}", i)).collect());
        robot
    }

    #[test]
    fn test_rejects_invalid_setup() {
        let mut config = sample_config();
        config.seed_pose = vec![0.0; 4];
        let result = CartPathPlanner::new(six_dof_robot(), config, "world");
        assert!(matches!(result, Err(PlanError::SeedDimension { expected: 6, found: 4 })));

        let mut config = sample_config();
        config.time_delay = -1.0;
        assert!(CartPathPlanner::new(six_dof_robot(), config, "world").is_err());
    }

    #[test]
    fn test_center_anchor() {
        let start = Pose::translation(0.5, 0.1, 0.7);

        let planner = CartPathPlanner::new(six_dof_robot(), sample_config(), "world").unwrap();
        assert!((planner.curve_center(&start) - Vector3::new(0.5, 0.1, 0.6)).norm() < 1e-12);

        let mut config = sample_config();
        config.anchor = Anchor::Center;
        let planner = CartPathPlanner::new(six_dof_robot(), config, "world").unwrap();
        assert_eq!(planner.curve_center(&start), Vector3::new(0.6, 0.0, 0.5));
    }

    #[test]
    fn test_generate_trajectory() {
        let mut robot = six_dof_robot();
        robot.expect_all_ik().times(40).returning(|_| vec![vec![0.1; 6]]);
        let planner = CartPathPlanner::new(robot, sample_config(), "world").unwrap();

        let traj = planner.generate_trajectory(&Pose::translation(0.5, 0.0, 0.6)).unwrap();
        assert_eq!(traj.len(), 40);
        assert_eq!(traj.frame_id, "world");
        assert_eq!(traj.joint_names.len(), 6);
        assert_eq!(traj.duration(), Duration::from_secs_f64(0.1) * 39);
    }

    #[test]
    fn test_max_points_truncates() {
        let mut config = sample_config();
        config.max_points = Some(5);
        let mut robot = six_dof_robot();
        robot.expect_all_ik().times(5).returning(|_| vec![vec![0.0; 6]]);
        let planner = CartPathPlanner::new(robot, config, "world").unwrap();

        let start = Pose::translation(0.5, 0.0, 0.6);
        assert_eq!(planner.generate_poses(&start).unwrap().len(), 5);
        assert_eq!(planner.generate_trajectory(&start).unwrap().len(), 5);
    }

    #[test]
    fn test_plan_keeps_poses_and_trajectory_in_step() {
        let mut robot = six_dof_robot();
        robot.expect_all_ik().times(40).returning(|_| vec![vec![0.2; 6]]);
        let planner = CartPathPlanner::new(robot, sample_config(), "world").unwrap();

        let start = Pose::translation(0.5, 0.0, 0.6);
        let planned = planner.plan(&start).unwrap();
        assert_eq!(planned.poses.len(), planned.trajectory.len());
        assert_eq!(planned.poses, planner.generate_poses(&start).unwrap());
    }

    #[test]
    fn test_huge_time_delay_fails_instead_of_overflowing() {
        let mut config = sample_config();
        config.time_delay = 1e18;
        let mut robot = six_dof_robot();
        robot.expect_all_ik().returning(|_| vec![vec![0.0; 6]]);
        let planner = CartPathPlanner::new(robot, config, "world").unwrap();

        let result = planner.generate_trajectory(&Pose::translation(0.5, 0.0, 0.6));
        assert!(matches!(result, Err(PlanError::InvalidParameters(_))));
    }

    #[test]
    fn test_unreachable_curve_fails() {
        let mut robot = six_dof_robot();
        robot.expect_all_ik().times(1).returning(|_| Vec::new());
        let planner = CartPathPlanner::new(robot, sample_config(), "world").unwrap();

        let result = planner.generate_trajectory(&Pose::identity());
        assert_eq!(result, Err(PlanError::NoIkSolution { index: 0 }));
    }

    #[test]
    fn test_bad_curve_parameters_fail_before_ik() {
        let mut config = sample_config();
        config.num_points = 5;
        let mut robot = six_dof_robot();
        robot.expect_all_ik().never();
        let planner = CartPathPlanner::new(robot, config, "world").unwrap();

        let result = planner.generate_trajectory(&Pose::identity());
        assert!(matches!(result, Err(PlanError::InvalidParameters(_))));
    }

    #[test]
    fn test_seed_start_pose_uses_forward_kinematics() {
        let mut robot = six_dof_robot();
        robot
            .expect_forward_kinematics()
            .returning(|joints| Ok(Pose::translation(joints[1], 0.0, 0.0)));
        let planner = CartPathPlanner::new(robot, sample_config(), "world").unwrap();
        assert_eq!(planner.seed_start_pose().unwrap().translation.vector.x, 0.3);

        let mut robot = six_dof_robot();
        robot
            .expect_forward_kinematics()
            .returning(|joints| Err(KinematicsError::DofMismatch { expected: 6, found: joints.len() }));
        let mut config = sample_config();
        config.seed_pose.clear();
        let planner = CartPathPlanner::new(robot, config, "world").unwrap();
        assert!(matches!(planner.seed_start_pose(), Err(PlanError::Kinematics(_))));
    }
}
