use enum_map::EnumMap;
use log::debug;
use nalgebra as na;
use ndarray as nd;
use smpl_utils::{
    numerical::{batch_quat_to_matrices, quat_to_rodrigues},
    vector::Vector3f,
};
use strum::IntoEnumIterator;

use crate::common::{
    betas::{Betas, NUM_BETAS},
    body_model::{BodyModel, BodyModelFactory},
    expression::{Expression, NUM_EXPRESSIONS},
    joints::{SmplXJoint, NUM_JOINTS},
};

/// Length of the pose feature that drives the pose correctives: a flattened
/// `R - I` for every joint except the root
pub const NUM_POSE_FEATURES: usize = (NUM_JOINTS - 1) * 9;

/// In-memory SMPL-X rig.
///
/// Mirrors what the engine-side runtime keeps per instance: coefficient slots
/// that are only picked up by the blendshapes once the matching recompute
/// trigger runs, local joint rotations and a world placement.
#[derive(Clone, Debug)]
pub struct SmplXRig {
    pub name: String,
    joint_rotations: EnumMap<SmplXJoint, na::UnitQuaternion<f32>>,
    betas: Betas,
    expression: Expression,
    blend_betas: Betas,
    blend_expression: Expression,
    shape_revision: u32,
    expression_revision: u32,
    pose_correctives: bool,
    position: na::Point3<f32>,
    rotation: na::UnitQuaternion<f32>,
}

impl SmplXRig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            joint_rotations: EnumMap::from_fn(|_| na::UnitQuaternion::identity()),
            betas: Betas::new_empty(NUM_BETAS),
            expression: Expression::new_empty(NUM_EXPRESSIONS),
            blend_betas: Betas::new_empty(NUM_BETAS),
            blend_expression: Expression::new_empty(NUM_EXPRESSIONS),
            shape_revision: 0,
            expression_revision: 0,
            pose_correctives: false,
            position: na::Point3::origin(),
            rotation: na::UnitQuaternion::identity(),
        }
    }

    /// Betas currently baked into the shape blendshapes
    pub fn blend_betas(&self) -> &Betas {
        &self.blend_betas
    }

    /// Expression currently baked into the expression blendshapes
    pub fn blend_expression(&self) -> &Expression {
        &self.blend_expression
    }

    pub fn shape_revision(&self) -> u32 {
        self.shape_revision
    }

    pub fn expression_revision(&self) -> u32 {
        self.expression_revision
    }

    pub fn pose_correctives_enabled(&self) -> bool {
        self.pose_correctives
    }

    /// True when every joint sits at its rest rotation
    pub fn is_rest_pose(&self, epsilon: f32) -> bool {
        self.joint_rotations.values().all(|q| q.angle() <= epsilon)
    }

    /// Current pose as one axis-angle vector per joint, root first
    pub fn rotation_vector(&self) -> Vec<Vector3f> {
        self.joint_rotations.values().map(quat_to_rodrigues).collect()
    }

    /// Input of the pose correctives, `None` while they are disabled
    pub fn pose_feature(&self) -> Option<nd::Array1<f32>> {
        if !self.pose_correctives {
            return None;
        }
        let rotations: Vec<na::UnitQuaternion<f32>> = SmplXJoint::iter().skip(1).map(|j| self.joint_rotations[j]).collect();
        let mut rot_mats = batch_quat_to_matrices(&rotations);
        let identity = nd::Array2::<f32>::eye(3);
        rot_mats -= &identity;
        Some(rot_mats.iter().copied().collect())
    }
}

impl BodyModel for SmplXRig {
    const NUM_BETAS: usize = NUM_BETAS;
    const NUM_EXPRESSIONS: usize = NUM_EXPRESSIONS;

    fn set_local_joint_rotation(&mut self, joint: SmplXJoint, rotation: na::UnitQuaternion<f32>) {
        self.joint_rotations[joint] = rotation;
    }
    fn local_joint_rotation(&self, joint: SmplXJoint) -> na::UnitQuaternion<f32> {
        self.joint_rotations[joint]
    }

    fn betas_mut(&mut self) -> &mut [f32] {
        self.betas.as_slice_mut()
    }
    fn expressions_mut(&mut self) -> &mut [f32] {
        self.expression.as_slice_mut()
    }
    fn set_beta_shapes(&mut self) {
        self.blend_betas = self.betas.clone();
        self.shape_revision += 1;
        debug!("{}: shape blendshapes updated (rev {})", self.name, self.shape_revision);
    }
    fn set_expressions(&mut self) {
        self.blend_expression = self.expression.clone();
        self.expression_revision += 1;
        debug!("{}: expression blendshapes updated (rev {})", self.name, self.expression_revision);
    }
    fn enable_pose_correctives(&mut self, enabled: bool) {
        self.pose_correctives = enabled;
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

/// Hands out a fresh [`SmplXRig`] per detected human
#[derive(Clone, Debug)]
pub struct SmplXRigFactory {
    pub name_prefix: String,
}
impl Default for SmplXRigFactory {
    fn default() -> Self {
        Self {
            name_prefix: "smplx".to_string(),
        }
    }
}
impl BodyModelFactory for SmplXRigFactory {
    type Model = SmplXRig;
    fn create_body_model(&mut self, human_idx: usize) -> SmplXRig {
        SmplXRig::new(&format!("{}_{human_idx}", self.name_prefix))
    }
}
