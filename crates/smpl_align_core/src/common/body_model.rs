use nalgebra as na;

use super::joints::SmplXJoint;

/// Capability surface of a SMPL-X body model living in some host engine.
///
/// The alignment code only ever talks to a model through this trait. Skinning,
/// blendshape bases and rendering stay on the other side.
pub trait BodyModel {
    /// Size of the shape coefficient space
    const NUM_BETAS: usize;
    /// Size of the expression coefficient space
    const NUM_EXPRESSIONS: usize;

    fn set_local_joint_rotation(&mut self, joint: SmplXJoint, rotation: na::UnitQuaternion<f32>);
    fn local_joint_rotation(&self, joint: SmplXJoint) -> na::UnitQuaternion<f32>;

    /// Writable shape slots, `NUM_BETAS` long
    fn betas_mut(&mut self) -> &mut [f32];
    /// Writable expression slots, `NUM_EXPRESSIONS` long
    fn expressions_mut(&mut self) -> &mut [f32];
    /// Recompute the shape blendshapes from the current betas
    fn set_beta_shapes(&mut self);
    /// Recompute the expression blendshapes from the current coefficients
    fn set_expressions(&mut self);
    fn enable_pose_correctives(&mut self, enabled: bool);

    fn set_world_position(&mut self, position: na::Point3<f32>);
    fn world_position(&self) -> na::Point3<f32>;
    fn set_world_rotation(&mut self, rotation: na::UnitQuaternion<f32>);
    fn world_rotation(&self) -> na::UnitQuaternion<f32>;
}

/// Creates one body model instance per detected human
pub trait BodyModelFactory {
    type Model: BodyModel;
    fn create_body_model(&mut self, human_idx: usize) -> Self::Model;
}
