mod communication;
mod config;
mod messages;

use communication::CommunicationLayer;
use config::{DEFAULT_CONFIG_PATH, DemoConfig};
use kinematics::opw_kinematics::OpwKinematicsSolver;
use kinematics::{JointState, KinematicsProvider};
use log::{error, info, warn};
use messages::{JointTrajectoryMsg, MarkerArray};
use tokio::sync::watch;
use trajectory::{CartPathPlanner, PlannedPath, path_markers};

type Planner = CartPathPlanner<OpwKinematicsSolver>;

/// Shows the path and publishes its joint trajectory.
async fn publish(
    comms: &CommunicationLayer,
    config: &DemoConfig,
    planned: &PlannedPath,
) -> Result<(), Box<dyn std::error::Error>> {
    let markers = path_markers(&planned.poses, config.visualization.min_point_distance);
    comms
        .publish_markers(&MarkerArray::from_path(&markers, &config.world_frame))
        .await?;

    info!(
        "Publishing {} point trajectory lasting {:.2} s",
        planned.trajectory.len(),
        planned.trajectory.duration().as_secs_f64()
    );
    comms.publish_trajectory(&JointTrajectoryMsg::from(&planned.trajectory)).await?;
    Ok(())
}

/// Replans from a received joint state. States that don't fit the robot or
/// lead to an unreachable path are logged and skipped.
fn follow_step(planner: &Planner, joints: &[JointState]) -> Option<PlannedPath> {
    let positions: Vec<f64> = joints.iter().map(|j| j.angle).collect();
    let start_pose = match planner.robot().forward_kinematics(&positions) {
        Ok(pose) => pose,
        Err(e) => {
            warn!("Ignoring joint state: {}", e);
            return None;
        }
    };

    match planner.plan(&start_pose) {
        Ok(planned) => Some(planned),
        Err(e) => {
            error!("Failed to generate full cart trajectory: {}", e);
            None
        }
    }
}

/// Subscriber callback plus the receiving end. Only the newest joint state is
/// kept; states arriving while a plan is in progress overwrite each other.
fn joint_state_feed() -> (impl Fn(Vec<JointState>) + Send + Sync + 'static, watch::Receiver<Vec<JointState>>) {
    let (tx, rx) = watch::channel(Vec::new());
    let callback = move |joints: Vec<JointState>| {
        tx.send_replace(joints);
    };
    (callback, rx)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    info!("Loading configuration from {}", path);
    let config = DemoConfig::load(&path)?;
    info!(
        "Planning group '{}' ({} -> {}) in frame '{}'",
        config.group_name, config.base_link, config.tip_link, config.world_frame
    );

    let solver = config.robot.build_solver(config.controller_joint_names.clone())?;
    let planner = CartPathPlanner::new(solver, config.trajectory.clone(), config.world_frame.clone())?;
    let comms = CommunicationLayer::new(&config.topics).await?;

    let start_pose = planner.seed_start_pose()?;
    publish(&comms, &config, &planner.plan(&start_pose)?).await?;

    if !config.follow_joint_states {
        info!("Trajectory published.");
        return Ok(());
    }

    let (on_joint_state, mut rx) = joint_state_feed();
    comms.subscribe_joint_state(on_joint_state).await?;
    info!("Following joint states on {}", config.topics.joint_states);

    while rx.changed().await.is_ok() {
        let joints = rx.borrow_and_update().clone();
        let Some(planned) = follow_step(&planner, &joints) else {
            continue;
        };
        if let Err(e) = publish(&comms, &config, &planned).await {
            error!("Failed to publish trajectory: {}", e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    use trajectory::planner::CENTER_DROP;

    const SAMPLE: &str = include_str!("../config/cart_path_planner.yaml");

    // Elbow bent at 90 degrees keeps the small test curve well inside reach.
    const BENT_ARM: [f64; 6] = [0.0, 0.0, FRAC_PI_2, 0.0, 0.5, 0.0];

    fn planner() -> Planner {
        let config = DemoConfig::parse(SAMPLE).unwrap();
        let mut trajectory = config.trajectory.clone();
        trajectory.foci_distance = 0.02;
        trajectory.radius = 0.05;
        trajectory.num_points = 10;
        trajectory.num_lemniscates = 1;
        trajectory.seed_pose = BENT_ARM.to_vec();

        let solver = config.robot.build_solver(config.controller_joint_names.clone()).unwrap();
        CartPathPlanner::new(solver, trajectory, "world").unwrap()
    }

    fn joint_states(angles: &[f64]) -> Vec<JointState> {
        angles.iter().map(|&angle| JointState { angle, ..Default::default() }).collect()
    }

    #[test]
    fn test_joint_state_feed_keeps_only_newest() {
        let (on_joint_state, mut rx) = joint_state_feed();
        assert!(!rx.has_changed().unwrap());

        for angle in [0.1, 0.2, 0.3] {
            on_joint_state(joint_states(&[angle; 6]));
        }
        assert!(rx.has_changed().unwrap());
        let joints = rx.borrow_and_update().clone();
        assert_eq!(joints.len(), 6);
        assert_eq!(joints[0].angle, 0.3);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_follow_skips_wrong_dof() {
        assert!(follow_step(&planner(), &joint_states(&[0.0, 0.1, 0.2])).is_none());
        assert!(follow_step(&planner(), &[]).is_none());
    }

    #[test]
    fn test_follow_plans_below_current_tool_pose() {
        let planner = planner();
        let tool = planner.robot().forward_kinematics(&BENT_ARM).unwrap();
        let center = tool.translation.vector - nalgebra::Vector3::z() * CENTER_DROP;

        let planned = follow_step(&planner, &joint_states(&BENT_ARM)).unwrap();
        assert_eq!(planned.poses.len(), 10);
        assert_eq!(planned.trajectory.len(), 10);
        for pose in &planned.poses {
            let dist = (pose.translation.vector - center).norm();
            assert!((dist - 0.05).abs() < 1e-9);
        }
        assert!(planned.trajectory.points.iter().all(|p| p.positions.len() == 6));
    }
}
