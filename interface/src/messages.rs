//! ROS 2 message layouts carried over zenoh as CDR.

use edgefirst_schemas::builtin_interfaces::Time;
use edgefirst_schemas::std_msgs::Header;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use trajectory::{JointTrajectory, PathMarkers};

pub const AXIS_LINE_WIDTH: f64 = 0.001;
pub const LINE_WIDTH: f64 = 0.005;

pub const LINE_STRIP: i32 = 4;
pub const LINE_LIST: i32 = 5;
pub const ADD: i32 = 0;

pub fn stamped(frame_id: &str) -> Header {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    Header {
        stamp: Time::new(now.as_secs() as i32, now.subsec_nanos()),
        frame_id: frame_id.to_string(),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct RosDuration {
    pub sec: i32,
    pub nanosec: u32,
}

/// Saturates at the largest representable duration.
impl From<Duration> for RosDuration {
    fn from(d: Duration) -> Self {
        match i32::try_from(d.as_secs()) {
            Ok(sec) => Self { sec, nanosec: d.subsec_nanos() },
            Err(_) => Self { sec: i32::MAX, nanosec: 999_999_999 },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<&Point3<f64>> for Point {
    fn from(p: &Point3<f64>) -> Self {
        Self { x: p.x, y: p.y, z: p.z }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseMsg {
    pub position: Point,
    pub orientation: Quaternion,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3Msg {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorRGBA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRGBA {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// `visualization_msgs/Marker`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Marker {
    pub header: Header,
    pub ns: String,
    pub id: i32,
    #[serde(rename = "type")]
    pub marker_type: i32,
    pub action: i32,
    pub pose: PoseMsg,
    pub scale: Vector3Msg,
    pub color: ColorRGBA,
    pub lifetime: RosDuration,
    pub frame_locked: bool,
    pub points: Vec<Point>,
    pub colors: Vec<ColorRGBA>,
    pub text: String,
    pub mesh_resource: String,
    pub mesh_use_embedded_materials: bool,
}

impl Marker {
    fn lines(header: &Header, ns: &str, id: i32, marker_type: i32, width: f64, color: ColorRGBA) -> Self {
        Self {
            header: header.clone(),
            ns: ns.to_string(),
            id,
            marker_type,
            action: ADD,
            pose: PoseMsg::default(),
            scale: Vector3Msg { x: width, ..Default::default() },
            color,
            lifetime: RosDuration::default(),
            frame_locked: false,
            points: Vec::new(),
            colors: Vec::new(),
            text: String::new(),
            mesh_resource: String::new(),
            mesh_use_embedded_materials: false,
        }
    }
}

/// `visualization_msgs/MarkerArray`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MarkerArray {
    pub markers: Vec<Marker>,
}

impl MarkerArray {
    /// x, y and z axis line lists followed by the path line strip.
    pub fn from_path(path: &PathMarkers, frame_id: &str) -> Self {
        let header = stamped(frame_id);
        let axes = |id, color, segments: &[trajectory::visualization::Segment]| {
            let mut marker = Marker::lines(&header, "axes", id, LINE_LIST, AXIS_LINE_WIDTH, color);
            marker.points = segments
                .iter()
                .flat_map(|(start, end)| [Point::from(start), Point::from(end)])
                .collect();
            marker
        };

        let x_axes = axes(2, ColorRGBA::rgb(1.0, 0.0, 0.0), &path.x_axes);
        let y_axes = axes(1, ColorRGBA::rgb(0.0, 1.0, 0.0), &path.y_axes);
        let z_axes = axes(0, ColorRGBA::rgb(0.0, 0.0, 1.0), &path.z_axes);

        let mut line = Marker::lines(&header, "line", 0, LINE_STRIP, LINE_WIDTH, ColorRGBA::rgb(1.0, 1.0, 0.0));
        line.points = path.line.iter().map(Point::from).collect();

        Self {
            markers: vec![x_axes, y_axes, z_axes, line],
        }
    }
}

/// `trajectory_msgs/JointTrajectoryPoint`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JointTrajectoryPointMsg {
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
    pub accelerations: Vec<f64>,
    pub effort: Vec<f64>,
    pub time_from_start: RosDuration,
}

/// `trajectory_msgs/JointTrajectory`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JointTrajectoryMsg {
    pub header: Header,
    pub joint_names: Vec<String>,
    pub points: Vec<JointTrajectoryPointMsg>,
}

impl From<&JointTrajectory> for JointTrajectoryMsg {
    fn from(traj: &JointTrajectory) -> Self {
        Self {
            header: stamped(&traj.frame_id),
            joint_names: traj.joint_names.clone(),
            points: traj
                .points
                .iter()
                .map(|p| JointTrajectoryPointMsg {
                    positions: p.positions.clone(),
                    velocities: p.velocities.clone(),
                    accelerations: p.accelerations.clone(),
                    effort: p.effort.clone(),
                    time_from_start: p.time_from_start.into(),
                })
                .collect(),
        }
    }
}

/// `sensor_msgs/JointState`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JointState {
    pub header: Header,
    pub name: Vec<String>,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub effort: Vec<f64>,
}

impl Default for JointState {
    fn default() -> Self {
        Self {
            header: Header {
                stamp: Time::new(0, 0),
                frame_id: String::new(),
            },
            name: Vec::new(),
            position: Vec::new(),
            velocity: Vec::new(),
            effort: Vec::new(),
        }
    }
}
