use log::{debug, warn};
use nalgebra as na;
use smpl_utils::{
    numerical::rodrigues_vec_to_quat,
    vector::{p3f_from_v3f, Vector2f, Vector3f},
};

use crate::{
    camera::viewing::ViewingCamera,
    common::{body_model::BodyModel, frame::DetectedHuman, types::ImageResolution, types::RootConvention},
};

/// Global orientation of a body: its root axis-angle followed by the
/// convention correction. No root entry means identity.
pub fn root_orientation(human: &DetectedHuman, convention: RootConvention) -> na::UnitQuaternion<f32> {
    let root = human.root_rotation().map_or_else(na::UnitQuaternion::identity, rodrigues_vec_to_quat);
    root * convention.correction()
}

/// Puts the model at the human's translation, oriented by the root joint
pub fn place_root<M: BodyModel>(model: &mut M, human: &DetectedHuman, convention: RootConvention) {
    model.set_world_position(p3f_from_v3f(&human.translation));
    model.set_world_rotation(root_orientation(human, convention));
}

/// Adds one of the pelvis offset candidates to the current placement.
/// Returns whether an offset was applied.
pub fn apply_pelvis_offset<M: BodyModel>(model: &mut M, offsets: &[Vector3f], candidate: usize) -> bool {
    let Some(offset) = offsets.get(candidate) else {
        if !offsets.is_empty() {
            warn!("pelvis offset candidate {candidate} requested but only {} present", offsets.len());
        }
        return false;
    };
    model.set_world_position(model.world_position() + offset);
    true
}

/// Pixel to viewport coordinates: normalised to [0,1] with y flipped so that
/// the viewport origin is the bottom-left corner
#[allow(clippy::cast_precision_loss)]
pub fn pixel_to_viewport(pixel: &Vector2f, resolution: ImageResolution) -> Vector2f {
    Vector2f::new(
        pixel.x / resolution.width as f32,
        1.0 - pixel.y / resolution.height as f32,
    )
}

/// Moves the model onto the camera ray through its 2D reference joint,
/// keeping `depth` as the distance along that ray.
///
/// The depth is taken as given; only the lateral placement comes from the
/// detection.
pub fn refine_with_joint_2d<M: BodyModel, C: ViewingCamera + ?Sized>(
    model: &mut M,
    joint_2d: &Vector2f,
    resolution: ImageResolution,
    depth: f32,
    camera: &C,
) -> na::Point3<f32> {
    let viewport = pixel_to_viewport(joint_2d, resolution);
    let ray = camera.viewport_point_to_ray(&viewport);
    let on_ray = ray.point_at(depth);

    let current = model.world_position();
    let offset = on_ray - current;
    model.set_world_position(current + offset);
    debug!("2d refinement moved body by {:.4}", offset.norm());
    on_ray
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::viewing::PinholeCamera;
    use crate::smpl_x::smpl_x_rig::SmplXRig;
    use approx::assert_relative_eq;

    #[test]
    fn root_entry_sets_global_orientation() {
        let human = DetectedHuman::new(Vector3f::new(1.0, 2.0, 3.0))
            .with_rotation_vector(vec![Vector3f::new(0.0, 0.7, 0.0), Vector3f::new(1.0, 0.0, 0.0)]);
        let mut rig = SmplXRig::new("test");
        place_root(&mut rig, &human, RootConvention::AsIs);
        assert_eq!(rig.world_position(), na::Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(rig.world_rotation().angle(), 0.7, epsilon = 1e-6);
        assert_relative_eq!(rig.world_rotation().axis().unwrap().into_inner(), na::Vector3::y(), epsilon = 1e-6);
    }

    #[test]
    fn flip_convention_turns_body_around() {
        let human = DetectedHuman::new(Vector3f::zeros()).with_rotation_vector(vec![Vector3f::zeros()]);
        let as_is = root_orientation(&human, RootConvention::AsIs);
        let flipped = root_orientation(&human, RootConvention::FlipY180);
        assert_relative_eq!(as_is.angle(), 0.0);
        assert_relative_eq!(flipped.angle_to(&as_is), std::f32::consts::PI, epsilon = 1e-5);
        // the body's forward (+z) now faces -z
        assert_relative_eq!(flipped * na::Vector3::z(), -na::Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn missing_root_rotation_is_identity() {
        let human = DetectedHuman::new(Vector3f::zeros());
        assert_eq!(root_orientation(&human, RootConvention::AsIs), na::UnitQuaternion::identity());
    }

    #[test]
    fn pelvis_offset_is_additive() {
        let mut rig = SmplXRig::new("test");
        rig.set_world_position(na::Point3::new(1.0, 1.0, 1.0));
        let offsets = vec![Vector3f::new(0.0, -0.5, 0.25), Vector3f::new(9.0, 9.0, 9.0)];
        assert!(apply_pelvis_offset(&mut rig, &offsets, 0));
        assert_relative_eq!(rig.world_position(), na::Point3::new(1.0, 0.5, 1.25));
        assert!(!apply_pelvis_offset(&mut rig, &offsets, 5));
        assert!(!apply_pelvis_offset(&mut rig, &[], 0));
        assert_relative_eq!(rig.world_position(), na::Point3::new(1.0, 0.5, 1.25));
    }

    #[test]
    fn viewport_flips_vertical_axis() {
        let res = ImageResolution::new(200, 100);
        assert_eq!(pixel_to_viewport(&Vector2f::new(0.0, 0.0), res), Vector2f::new(0.0, 1.0));
        assert_eq!(pixel_to_viewport(&Vector2f::new(200.0, 100.0), res), Vector2f::new(1.0, 0.0));
        assert_eq!(pixel_to_viewport(&Vector2f::new(50.0, 25.0), res), Vector2f::new(0.25, 0.75));
    }

    #[test]
    fn centred_joint_snaps_onto_forward_ray() {
        let cam = PinholeCamera::default();
        let mut rig = SmplXRig::new("test");
        rig.set_world_position(na::Point3::new(0.3, -0.2, 5.0));
        let res = ImageResolution::new(640, 480);
        refine_with_joint_2d(&mut rig, &Vector2f::new(320.0, 240.0), res, 5.0, &cam);
        let expected = cam.position() + cam.forward().into_inner() * 5.0;
        assert_relative_eq!(rig.world_position(), expected, epsilon = 1e-5);
    }

    #[test]
    fn off_centre_joint_stays_at_requested_distance() {
        let cam = PinholeCamera {
            fov_y_deg: 50.0,
            aspect: 4.0 / 3.0,
            ..Default::default()
        };
        let mut rig = SmplXRig::new("test");
        let res = ImageResolution::new(640, 480);
        let p = refine_with_joint_2d(&mut rig, &Vector2f::new(100.0, 400.0), res, 4.0, &cam);
        assert_relative_eq!((p - cam.position()).norm(), 4.0, epsilon = 1e-5);
        // left and below the image centre
        assert!(p.x < 0.0 && p.y < 0.0);
        assert_eq!(rig.world_position(), p);
    }
}
