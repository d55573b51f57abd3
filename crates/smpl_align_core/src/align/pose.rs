use log::{error, info};
use nalgebra as na;
use smpl_utils::{numerical::rodrigues_vec_to_quat, vector::is_finite_v3f, vector::Vector3f};
use strum::IntoEnumIterator;

use crate::{
    common::{
        body_model::BodyModel,
        joints::{SmplXJoint, NUM_JOINTS},
    },
    errors::AlignError,
};

/// Converts per-joint axis-angle vectors into local rotations, checking the
/// whole batch before anything is returned.
///
/// Entry 0 is the global orientation of the body and is placed on the model
/// transform, so the root joint itself is reset to identity here.
pub fn pose_to_joint_rotations(rotation_vector: &[Vector3f]) -> Result<Vec<(SmplXJoint, na::UnitQuaternion<f32>)>, AlignError> {
    if rotation_vector.len() != NUM_JOINTS {
        return Err(AlignError::PoseTopologyMismatch {
            expected: NUM_JOINTS,
            actual: rotation_vector.len(),
        });
    }
    SmplXJoint::iter()
        .zip(rotation_vector)
        .map(|(joint, rod)| {
            if !is_finite_v3f(rod) {
                return Err(AlignError::NonFiniteRotation { joint: joint.to_string() });
            }
            if joint == SmplXJoint::ROOT {
                return Ok((joint, na::UnitQuaternion::identity()));
            }
            Ok((joint, rodrigues_vec_to_quat(rod)))
        })
        .collect()
}

/// Sets every joint below the root from its axis-angle vector, resets the
/// root joint and then turns on the pose correctives.
///
/// Either all joints are written or none: a wrong joint count or a non-finite
/// entry leaves the model untouched.
pub fn apply_pose<M: BodyModel>(model: &mut M, rotation_vector: &[Vector3f]) -> Result<(), AlignError> {
    let rotations = match pose_to_joint_rotations(rotation_vector) {
        Ok(rotations) => rotations,
        Err(e) => {
            error!("pose not applied: {e}");
            return Err(e);
        }
    };

    for (joint, rotation) in rotations {
        model.set_local_joint_rotation(joint, rotation);
    }
    model.enable_pose_correctives(true);

    info!("applied pose to {NUM_JOINTS} joints");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::smpl_x::smpl_x_rig::SmplXRig;
    use approx::assert_relative_eq;
    use rstest::rstest;

    /// Model that only counts what is done to it
    pub(crate) struct CountingModel {
        pub joint_writes: usize,
        pub correctives_enabled: bool,
        pub betas: Vec<f32>,
        pub expressions: Vec<f32>,
        pub beta_triggers: usize,
        pub expression_triggers: usize,
        pub position: na::Point3<f32>,
        pub rotation: na::UnitQuaternion<f32>,
    }
    impl CountingModel {
        pub(crate) fn new() -> Self {
            Self {
                joint_writes: 0,
                correctives_enabled: false,
                betas: vec![0.0; Self::NUM_BETAS],
                expressions: vec![0.0; Self::NUM_EXPRESSIONS],
                beta_triggers: 0,
                expression_triggers: 0,
                position: na::Point3::origin(),
                rotation: na::UnitQuaternion::identity(),
            }
        }
    }
    impl BodyModel for CountingModel {
        const NUM_BETAS: usize = 10;
        const NUM_EXPRESSIONS: usize = 10;
        fn set_local_joint_rotation(&mut self, _joint: SmplXJoint, _rotation: na::UnitQuaternion<f32>) {
            self.joint_writes += 1;
        }
        fn local_joint_rotation(&self, _joint: SmplXJoint) -> na::UnitQuaternion<f32> {
            na::UnitQuaternion::identity()
        }
        fn betas_mut(&mut self) -> &mut [f32] {
            &mut self.betas
        }
        fn expressions_mut(&mut self) -> &mut [f32] {
            &mut self.expressions
        }
        fn set_beta_shapes(&mut self) {
            self.beta_triggers += 1;
        }
        fn set_expressions(&mut self) {
            self.expression_triggers += 1;
        }
        fn enable_pose_correctives(&mut self, enabled: bool) {
            self.correctives_enabled = enabled;
        }
        fn set_world_position(&mut self, position: na::Point3<f32>) {
            self.position = position;
        }
        fn world_position(&self) -> na::Point3<f32> {
            self.position
        }
        fn set_world_rotation(&mut self, rotation: na::UnitQuaternion<f32>) {
            self.rotation = rotation;
        }
        fn world_rotation(&self) -> na::UnitQuaternion<f32> {
            self.rotation
        }
    }

    #[rstest]
    #[case(0)]
    #[case(51)]
    #[case(53)]
    #[case(55)]
    fn wrong_joint_count_writes_nothing(#[case] len: usize) {
        let mut model = CountingModel::new();
        let err = apply_pose(&mut model, &vec![Vector3f::new(0.1, 0.0, 0.0); len]).unwrap_err();
        match err {
            AlignError::PoseTopologyMismatch { expected, actual } => {
                assert_eq!(expected, 52);
                assert_eq!(actual, len);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(model.joint_writes, 0);
        assert!(!model.correctives_enabled);
    }

    #[test]
    fn non_finite_entry_writes_nothing() {
        let mut model = CountingModel::new();
        let mut pose = vec![Vector3f::zeros(); NUM_JOINTS];
        pose[30] = Vector3f::new(0.0, f32::NAN, 0.0);
        let err = apply_pose(&mut model, &pose).unwrap_err();
        assert!(matches!(err, AlignError::NonFiniteRotation { ref joint } if joint == SmplXJoint::from_index(30).unwrap().name()));
        assert_eq!(model.joint_writes, 0);
    }

    #[test]
    fn every_joint_is_written_then_correctives_enabled() {
        let mut model = CountingModel::new();
        apply_pose(&mut model, &vec![Vector3f::zeros(); NUM_JOINTS]).unwrap();
        assert_eq!(model.joint_writes, NUM_JOINTS);
        assert!(model.correctives_enabled);
    }

    #[test]
    fn joint_rotations_land_on_the_matching_joint() {
        let mut rig = SmplXRig::new("test");
        let mut pose = vec![Vector3f::zeros(); NUM_JOINTS];
        pose[SmplXJoint::LeftElbow.index()] = Vector3f::new(0.0, 0.0, 1.2);
        apply_pose(&mut rig, &pose).unwrap();

        let elbow = rig.local_joint_rotation(SmplXJoint::LeftElbow);
        assert_relative_eq!(elbow.angle(), 1.2, epsilon = 1e-5);
        assert_relative_eq!(elbow.axis().unwrap().into_inner(), na::Vector3::z(), epsilon = 1e-5);
        assert_relative_eq!(rig.local_joint_rotation(SmplXJoint::RightElbow).angle(), 0.0);
    }

    #[test]
    fn root_entry_does_not_reach_the_root_joint() {
        let mut rig = SmplXRig::new("test");
        rig.set_local_joint_rotation(SmplXJoint::ROOT, rodrigues_vec_to_quat(&Vector3f::new(0.3, 0.0, 0.0)));
        let mut pose = vec![Vector3f::zeros(); NUM_JOINTS];
        pose[0] = Vector3f::new(0.0, 0.7, 0.0);
        pose[SmplXJoint::Spine1.index()] = Vector3f::new(0.2, 0.0, 0.0);
        apply_pose(&mut rig, &pose).unwrap();
        assert_relative_eq!(rig.local_joint_rotation(SmplXJoint::ROOT).angle(), 0.0);
        assert_relative_eq!(rig.local_joint_rotation(SmplXJoint::Spine1).angle(), 0.2, epsilon = 1e-5);
    }
}
