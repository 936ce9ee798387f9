use kinematics::Pose;
use nalgebra::{Point3, Vector3};

/// Length (m) of the axis segments drawn at each displayed pose.
pub const AXIS_LINE_LENGTH: f64 = 0.01;

pub type Segment = (Point3<f64>, Point3<f64>);

/// Geometry for displaying a cartesian path: the path polyline plus short
/// x/y/z axis segments at a thinned-out subset of poses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathMarkers {
    pub x_axes: Vec<Segment>,
    pub y_axes: Vec<Segment>,
    pub z_axes: Vec<Segment>,
    pub line: Vec<Point3<f64>>,
}

impl PathMarkers {
    pub fn axes_count(&self) -> usize {
        self.x_axes.len()
    }
}

/// Axes are only drawn for poses further than `min_point_distance` from the
/// last pose that got axes. The first pose only seeds that reference.
pub fn path_markers(poses: &[Pose], min_point_distance: f64) -> PathMarkers {
    let mut markers = PathMarkers {
        x_axes: Vec::with_capacity(poses.len()),
        y_axes: Vec::with_capacity(poses.len()),
        z_axes: Vec::with_capacity(poses.len()),
        line: Vec::with_capacity(poses.len()),
    };

    let Some(first) = poses.first() else {
        return markers;
    };

    let mut prev = first.translation.vector;
    for pose in poses {
        let start = Point3::from(pose.translation.vector);
        let distance = (pose.translation.vector - prev).norm();

        if distance > min_point_distance {
            let tip = |axis: Vector3<f64>| pose * Point3::from(axis * AXIS_LINE_LENGTH);
            markers.x_axes.push((start, tip(Vector3::x())));
            markers.y_axes.push((start, tip(Vector3::y())));
            markers.z_axes.push((start, tip(Vector3::z())));
            prev = pose.translation.vector;
        }
        markers.line.push(start);
    }
    markers
}
