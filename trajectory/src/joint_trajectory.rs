use std::time::Duration;

use kinematics::{KinematicsProvider, nominal_solution};
use log::{debug, error, info};

use crate::cartesian::CartesianPoint;
use crate::error::{PlanError, Result};

/// One joint-space sample. Velocities, accelerations and efforts are left at
/// zero for the controller to fill in.
#[derive(Debug, Clone, PartialEq)]
pub struct JointTrajectoryPoint {
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
    pub accelerations: Vec<f64>,
    pub effort: Vec<f64>,
    pub time_from_start: Duration,
}

impl JointTrajectoryPoint {
    pub fn at_rest(positions: Vec<f64>, time_from_start: Duration) -> Self {
        let n = positions.len();
        Self {
            positions,
            velocities: vec![0.0; n],
            accelerations: vec![0.0; n],
            effort: vec![0.0; n],
            time_from_start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JointTrajectory {
    pub frame_id: String,
    pub joint_names: Vec<String>,
    pub points: Vec<JointTrajectoryPoint>,
}

impl JointTrajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn duration(&self) -> Duration {
        self.points.last().map(|p| p.time_from_start).unwrap_or_default()
    }
}

/// Resolves every cartesian point through IK. Aborts on the first point
/// without a solution; there is no partial result.
///
/// `seed` biases the first point only. Each later point takes the solution
/// closest to the one chosen before it. An empty seed leaves the first point
/// to the solver's first-ranked solution.
pub fn to_joint_trajectory<K: KinematicsProvider>(
    points: &[CartesianPoint],
    robot: &K,
    seed: &[f64],
    time_delay: Duration,
    frame_id: &str,
) -> Result<JointTrajectory> {
    info!("Converting {} cartesian points to a joint trajectory", points.len());
    if points.is_empty() {
        return Err(PlanError::EmptyTrajectory);
    }
    if !seed.is_empty() && seed.len() != robot.dof() {
        return Err(PlanError::SeedDimension {
            expected: robot.dof(),
            found: seed.len(),
        });
    }

    let mut out = JointTrajectory {
        frame_id: frame_id.to_string(),
        joint_names: robot.joint_names(),
        points: Vec::with_capacity(points.len()),
    };

    let mut elapsed = Duration::ZERO;
    for (index, point) in points.iter().enumerate() {
        if index > 0 {
            elapsed = elapsed.checked_add(time_delay).ok_or_else(|| {
                PlanError::invalid(format!("time from start overflows at point {}", index))
            })?;
        }

        let solutions = robot.all_ik(&point.pose);
        debug!("Pose {} has {} IK solutions", index, solutions.len());

        let previous = out.points.last().map_or(seed, |p| p.positions.as_slice());
        let Some(joints) = nominal_solution(previous, solutions) else {
            error!("No IK solutions for pose {}", index);
            return Err(PlanError::NoIkSolution { index });
        };

        out.points.push(JointTrajectoryPoint::at_rest(joints, elapsed));
    }
    Ok(out)
}
