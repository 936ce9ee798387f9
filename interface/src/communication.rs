use kinematics::JointState as KinematicsJointState;
use serde::Serialize;
use serde::de::DeserializeOwned;
use zenoh::Session;

use crate::config::Topics;
use crate::messages::{JointState, JointTrajectoryMsg, MarkerArray};

pub struct CommunicationLayer {
    session: Session,
    markers_key: String,
    trajectory_key: String,
    joint_state_key: String,
}

/// CDR little-endian, including the 4-byte encapsulation header.
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    Ok(cdr::serialize::<_, _, cdr::CdrLe>(msg, cdr::Infinite)?)
}

pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, Box<dyn std::error::Error>> {
    if payload.len() <= 4 {
        return Err("payload too short for a ROS 2 message".into());
    }
    Ok(cdr::deserialize(payload)?)
}

impl CommunicationLayer {
    pub async fn new(topics: &Topics) -> Result<Self, Box<dyn std::error::Error>> {
        let config = zenoh::config::Config::default();
        let session = zenoh::open(config).await.map_err(|e| e.to_string())?;

        Ok(Self {
            session,
            markers_key: topics.markers.clone(),
            trajectory_key: topics.trajectory.clone(),
            joint_state_key: topics.joint_states.clone(),
        })
    }

    pub async fn publish_markers(&self, markers: &MarkerArray) -> Result<(), Box<dyn std::error::Error>> {
        let payload = encode(markers)?;
        self.session.put(&self.markers_key, payload).await.map_err(|e| e.to_string())?;
        Ok(())
    }

    pub async fn publish_trajectory(&self, trajectory: &JointTrajectoryMsg) -> Result<(), Box<dyn std::error::Error>> {
        let payload = encode(trajectory)?;
        self.session.put(&self.trajectory_key, payload).await.map_err(|e| e.to_string())?;
        Ok(())
    }

    pub async fn subscribe_joint_state<F>(&self, callback: F) -> Result<(), Box<dyn std::error::Error>>
    where F: Fn(Vec<KinematicsJointState>) + Send + Sync + 'static
    {
        let subscriber = self.session.declare_subscriber(&self.joint_state_key).await.map_err(|e| e.to_string())?;

        tokio::spawn(async move {
            while let Ok(sample) = subscriber.recv_async().await {
                let payload = sample.payload().to_bytes();
                match decode::<JointState>(&payload) {
                    Ok(msg) => callback(convert_from_ros_joint_state(&msg)),
                    Err(e) => log::warn!("Dropping joint state: {}", e),
                }
            }
        });
        Ok(())
    }
}

pub fn convert_from_ros_joint_state(msg: &JointState) -> Vec<KinematicsJointState> {
    msg.position
        .iter()
        .enumerate()
        .map(|(i, &angle)| KinematicsJointState {
            angle,
            velocity: msg.velocity.get(i).copied().unwrap_or(0.0),
            effort: msg.effort.get(i).copied().unwrap_or(0.0),
        })
        .collect()
}
