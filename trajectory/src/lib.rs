//! Lemniscate test paths and their conversion into joint trajectories.

pub mod cartesian;
pub mod config;
pub mod error;
pub mod joint_trajectory;
pub mod lemniscate;
pub mod planner;
pub mod visualization;

pub use cartesian::{CartTrajectory, CartesianPoint, FreeAxis, TimingConstraint, to_cart_trajectory};
pub use config::{Anchor, TrajectoryConfig};
pub use error::{PlanError, Result};
pub use joint_trajectory::{JointTrajectory, JointTrajectoryPoint, to_joint_trajectory};
pub use lemniscate::{LemniscateParams, create_lemniscate_curve};
pub use planner::{CartPathPlanner, PlannedPath};
pub use visualization::{PathMarkers, path_markers};
