use nalgebra::Isometry3;
use rs_opw_kinematics::kinematic_traits::Kinematics;
use rs_opw_kinematics::kinematics_impl::OPWKinematics;
use rs_opw_kinematics::parameters::opw_kinematics::Parameters;

use crate::{KinematicsError, KinematicsProvider, Pose};

const OPW_DOF: usize = 6;

/// Analytic IK for 6-axis arms with an ortho-parallel base and spherical wrist.
pub struct OpwKinematicsSolver {
    parameters: Parameters,
    joint_names: Vec<String>,
}

impl OpwKinematicsSolver {
    pub fn new(c1: f64, c2: f64, c3: f64, c4: f64, a1: f64, a2: f64, b: f64) -> Self {
        let parameters = Parameters {
            c1, c2, c3, c4, a1, a2, b,
            offsets: [0.0; 6],
            sign_corrections: [1; 6],
            dof: 6,
        };
        let joint_names = (1..=OPW_DOF).map(|i| format!("joint_{}", i)).collect();
        Self { parameters, joint_names }
    }

    pub fn with_joint_names(mut self, joint_names: Vec<String>) -> Result<Self, KinematicsError> {
        if joint_names.len() != OPW_DOF {
            return Err(KinematicsError::JointNameCount {
                expected: OPW_DOF,
                found: joint_names.len(),
            });
        }
        self.joint_names = joint_names;
        Ok(self)
    }

    pub fn inverse_kinematics(&self, pose: &Isometry3<f64>) -> Vec<[f64; 6]> {
        let solver = OPWKinematics::new(self.parameters);
        solver.inverse(pose)
    }

    pub fn forward(&self, joints: &[f64; 6]) -> Isometry3<f64> {
        let solver = OPWKinematics::new(self.parameters);
        solver.forward(joints)
    }

    /// Checks that FK of `solution` lands on `target_pose`.
    pub fn verify_solution(&self, target_pose: &Isometry3<f64>, solution: &[f64; 6]) -> bool {
        let fk_pose = self.forward(solution);
        let translation_diff = (target_pose.translation.vector - fk_pose.translation.vector).norm();
        let rotation_diff = target_pose.rotation.angle_to(&fk_pose.rotation);

        translation_diff < 1e-4 && rotation_diff < 1e-4
    }
}

impl KinematicsProvider for OpwKinematicsSolver {
    fn dof(&self) -> usize {
        OPW_DOF
    }

    fn joint_names(&self) -> Vec<String> {
        self.joint_names.clone()
    }

    fn all_ik(&self, pose: &Pose) -> Vec<Vec<f64>> {
        self.inverse_kinematics(pose)
            .into_iter()
            .filter(|joints| joints.iter().all(|q| q.is_finite()))
            .map(|joints| joints.to_vec())
            .collect()
    }

    fn forward_kinematics(&self, joints: &[f64]) -> Result<Pose, KinematicsError> {
        let joints: [f64; 6] = joints.try_into().map_err(|_| KinematicsError::DofMismatch {
            expected: OPW_DOF,
            found: joints.len(),
        })?;
        Ok(self.forward(&joints))
    }
}
