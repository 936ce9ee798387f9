use std::time::Duration;

use nalgebra::Vector3;
use serde::Deserialize;

use crate::error::{PlanError, Result};

/// Where the lemniscate sphere is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Just below the tool position of the start pose.
    #[default]
    StartPose,
    /// At the configured `center`.
    Center,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrajectoryConfig {
    /// Seconds between consecutive trajectory points.
    pub time_delay: f64,
    pub foci_distance: f64,
    pub radius: f64,
    pub num_points: usize,
    pub num_lemniscates: usize,
    pub center: [f64; 3],
    #[serde(default)]
    pub seed_pose: Vec<f64>,
    #[serde(default)]
    pub anchor: Anchor,
    /// Keep only the first `max_points` poses. Unset keeps the whole curve.
    #[serde(default)]
    pub max_points: Option<usize>,
}

impl TrajectoryConfig {
    pub fn validate(&self) -> Result<()> {
        self.time_step()?;
        if self.max_points == Some(0) {
            return Err(PlanError::invalid("max_points must keep at least one point"));
        }
        Ok(())
    }

    /// `time_delay` as a non-zero `Duration`.
    pub fn time_step(&self) -> Result<Duration> {
        match Duration::try_from_secs_f64(self.time_delay) {
            Ok(step) if !step.is_zero() => Ok(step),
            _ => Err(PlanError::invalid(format!(
                "time delay must be a positive number of seconds, got {}",
                self.time_delay
            ))),
        }
    }

    pub fn center(&self) -> Vector3<f64> {
        Vector3::from(self.center)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_config() -> TrajectoryConfig {
        TrajectoryConfig {
            time_delay: 0.1,
            foci_distance: 0.07,
            radius: 0.08,
            num_points: 20,
            num_lemniscates: 2,
            center: [0.6, 0.0, 0.5],
            seed_pose: vec![0.0, 0.3, 0.1, 0.0, 0.5, 0.0],
            anchor: Anchor::StartPose,
            max_points: None,
        }
    }

    #[test]
    fn test_validate() {
        assert!(sample_config().validate().is_ok());

        let mut config = sample_config();
        config.time_delay = 0.0;
        assert!(matches!(config.validate(), Err(PlanError::InvalidParameters(_))));

        let mut config = sample_config();
        config.max_points = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unrepresentable_time_delay() {
        for delay in [1e20, f64::INFINITY, f64::NAN, -0.5, 1e-12] {
            let mut config = sample_config();
            config.time_delay = delay;
            assert!(matches!(config.validate(), Err(PlanError::InvalidParameters(_))), "accepted {}", delay);
        }
    }

    #[test]
    fn test_time_step() {
        assert_eq!(sample_config().time_step(), Ok(Duration::from_millis(100)));
        assert_eq!(sample_config().center(), Vector3::new(0.6, 0.0, 0.5));
    }
}
