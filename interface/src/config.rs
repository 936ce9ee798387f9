use std::path::Path;

use kinematics::KinematicsError;
use kinematics::opw_kinematics::OpwKinematicsSolver;
use serde::Deserialize;
use thiserror::Error;
use trajectory::TrajectoryConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/cart_path_planner.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// OPW geometry of the arm, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RobotConfig {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub a1: f64,
    pub a2: f64,
    pub b: f64,
}

impl RobotConfig {
    pub fn build_solver(&self, joint_names: Vec<String>) -> Result<OpwKinematicsSolver, KinematicsError> {
        OpwKinematicsSolver::new(self.c1, self.c2, self.c3, self.c4, self.a1, self.a2, self.b)
            .with_joint_names(joint_names)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VisualizationConfig {
    pub min_point_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topics {
    pub markers: String,
    pub trajectory: String,
    pub joint_states: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            markers: "rt/cart_path_planner/cartesian_trajectory".to_string(),
            trajectory: "rt/cart_path_planner/display_trajectory".to_string(),
            joint_states: "rt/robot/joint_states".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DemoConfig {
    pub group_name: String,
    pub tip_link: String,
    pub base_link: String,
    pub world_frame: String,
    pub controller_joint_names: Vec<String>,
    pub trajectory: TrajectoryConfig,
    pub visualization: VisualizationConfig,
    pub robot: RobotConfig,
    #[serde(default)]
    pub topics: Topics,
    #[serde(default)]
    pub follow_joint_states: bool,
}

impl DemoConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_yaml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.world_frame.is_empty() {
            return Err(ConfigError::Invalid("world_frame is empty".to_string()));
        }
        if self.controller_joint_names.is_empty() {
            return Err(ConfigError::Invalid("controller_joint_names is empty".to_string()));
        }
        if self.visualization.min_point_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_point_distance must not be negative, got {}",
                self.visualization.min_point_distance
            )));
        }
        self.trajectory
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
