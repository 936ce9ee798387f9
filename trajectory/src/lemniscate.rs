//! Figure-eight test paths drawn on the surface of a sphere.
//!
//! Each lobe is a planar lemniscate `r = a * sqrt(cos 2θ)` wrapped onto a
//! sphere of radius `ρ`. Successive lobes are rotated about the sphere's
//! vertical axis by `π / m`. Every pose has its approach axis aimed at the
//! sphere center.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use kinematics::Pose;
use log::debug;
use nalgebra::{Matrix3, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::error::{PlanError, Result};

/// Keeps samples off the interval edges where `cos 2θ` reaches zero.
pub const THETA_EPSILON: f64 = 1e-4;

/// Rotation about the local Y axis turning the tool's x axis onto the
/// approach direction.
pub const TOOL_CORRECTION_ANGLE: f64 = -FRAC_PI_2;

pub const MIN_POINTS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct LemniscateParams {
    pub foci_distance: f64,
    pub sphere_radius: f64,
    pub num_points: usize,
    pub num_lemniscates: usize,
    pub center: Vector3<f64>,
}

impl LemniscateParams {
    pub fn validate(&self) -> Result<()> {
        if self.foci_distance.is_nan() || self.foci_distance <= 0.0 {
            return Err(PlanError::invalid(format!(
                "foci distance must be positive, got {}",
                self.foci_distance
            )));
        }
        if self.sphere_radius.is_nan() || self.sphere_radius <= 0.0 {
            return Err(PlanError::invalid(format!(
                "sphere radius must be positive, got {}",
                self.sphere_radius
            )));
        }
        if self.num_points < MIN_POINTS {
            return Err(PlanError::invalid(format!(
                "at least {} points per lemniscate required, got {}",
                MIN_POINTS, self.num_points
            )));
        }
        if self.num_lemniscates < 1 {
            return Err(PlanError::invalid("at least one lemniscate required"));
        }
        Ok(())
    }
}

/// Polar angles for one lobe: half the samples from -π/4, the rest from
/// 3π/4, all spaced `π / (n - 1)` apart. An odd count puts the extra sample
/// in the second interval.
pub fn sample_angles(num_points: usize) -> Vec<f64> {
    let first = num_points / 2;
    let second = num_points - first;
    let step = PI / (num_points.max(2) - 1) as f64;

    let mut theta = Vec::with_capacity(num_points);
    theta.extend(interval(-FRAC_PI_4, step, first));
    theta.extend(interval(3.0 * FRAC_PI_4, step, second));
    theta
}

fn interval(start: f64, step: f64, count: usize) -> Vec<f64> {
    let mut theta: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
    if let Some(first) = theta.first_mut() {
        *first += THETA_EPSILON;
    }
    if let Some(last) = theta.last_mut() {
        *last -= THETA_EPSILON;
    }
    theta
}

/// Generates `num_points * num_lemniscates` poses, lobe by lobe.
pub fn create_lemniscate_curve(params: &LemniscateParams) -> Result<Vec<Pose>> {
    params.validate()?;
    debug!(
        "Creating lemniscate curve: a={} rho={} n={} m={}",
        params.foci_distance, params.sphere_radius, params.num_points, params.num_lemniscates
    );

    let theta = sample_angles(params.num_points);
    let d_omega = PI / params.num_lemniscates as f64;
    let correction = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), TOOL_CORRECTION_ANGLE);

    let mut poses = Vec::with_capacity(params.num_points * params.num_lemniscates);
    for j in 0..params.num_lemniscates {
        let omega = j as f64 * d_omega;
        for &t in &theta {
            let offset = sphere_point(params.foci_distance, params.sphere_radius, t, omega);
            let translation = Translation3::from(params.center + offset);
            poses.push(Pose::from_parts(translation, surface_frame(&offset) * correction));
        }
    }
    Ok(poses)
}

fn sphere_point(a: f64, rho: f64, theta: f64, omega: f64) -> Vector3<f64> {
    let r = a * (2.0 * theta).cos().max(0.0).sqrt();
    let phi = if r < rho {
        (r / rho).asin()
    } else {
        PI - ((2.0 * rho - r) / rho).clamp(-1.0, 1.0).asin()
    };

    let azimuth = theta + omega;
    rho * Vector3::new(azimuth.cos() * phi.sin(), azimuth.sin() * phi.sin(), phi.cos())
}

/// Frame at `offset` (relative to the sphere center) whose z axis points at
/// the center and whose x axis is perpendicular to world Y.
fn surface_frame(offset: &Vector3<f64>) -> UnitQuaternion<f64> {
    let unit_z = (-offset).normalize();
    let unit_x = Vector3::y()
        .cross(&unit_z)
        .try_normalize(1e-9)
        .unwrap_or_else(Vector3::x);
    let unit_y = unit_z.cross(&unit_x).normalize();

    let rot = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[unit_x, unit_y, unit_z]));
    UnitQuaternion::from_rotation_matrix(&rot)
}
