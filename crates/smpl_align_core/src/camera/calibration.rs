use log::{info, warn};
use serde::Serialize;

use super::viewing::ViewingCamera;
use crate::{
    common::{frame::CameraIntrinsics, types::ImageResolution},
    errors::AlignError,
};

/// Largest principal point offset, as a fraction of the image size, that is
/// dropped without a warning
pub const PRINCIPAL_POINT_TOLERANCE: f32 = 0.05;

/// Virtual camera settings matching the camera that took the photo.
///
/// Only the vertical field of view and the aspect ratio are transferred to the
/// viewing camera. The principal point is kept here for inspection but is not
/// applied, so a photo whose principal point is off-centre will be slightly
/// misregistered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CameraCalibration {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub cx: f32,
    pub cy: f32,
    pub resolution: ImageResolution,
}

impl CameraCalibration {
    /// Back-projects the image height through the focal length:
    /// `fov_y = 2 * atan(height / (2 * fy))`
    #[allow(clippy::cast_precision_loss)]
    pub fn from_intrinsics(intrinsics: &CameraIntrinsics, resolution: ImageResolution) -> Result<Self, AlignError> {
        let fy = intrinsics.fy();
        if !fy.is_finite() || fy <= 0.0 {
            return Err(AlignError::InvalidIntrinsics(format!("focal length fy must be positive, found {fy}")));
        }
        if resolution.width == 0 || resolution.height == 0 {
            return Err(AlignError::InvalidIntrinsics(format!(
                "degenerate image resolution {}x{}",
                resolution.width, resolution.height
            )));
        }
        let height = resolution.height as f32;
        let fov_y_deg = (2.0 * (height / (2.0 * fy)).atan()).to_degrees();
        Ok(Self {
            fov_y_deg,
            aspect: resolution.aspect(),
            cx: intrinsics.cx(),
            cy: intrinsics.cy(),
            resolution,
        })
    }

    /// Offset of the principal point from the image centre as a fraction of
    /// the image size. Zero means the dropped offset costs nothing.
    #[allow(clippy::cast_precision_loss)]
    pub fn principal_point_offset(&self) -> (f32, f32) {
        let w = self.resolution.width as f32;
        let h = self.resolution.height as f32;
        (self.cx / w - 0.5, self.cy / h - 0.5)
    }

    pub fn is_principal_point_off_centre(&self) -> bool {
        let (off_x, off_y) = self.principal_point_offset();
        off_x.abs() > PRINCIPAL_POINT_TOLERANCE || off_y.abs() > PRINCIPAL_POINT_TOLERANCE
    }

    /// Sets field of view and aspect on the camera, nothing else
    pub fn apply_to<C: ViewingCamera + ?Sized>(&self, camera: &mut C) {
        camera.set_field_of_view(self.fov_y_deg);
        camera.set_aspect(self.aspect);
    }
}

/// Derives the calibration from the intrinsics and configures the camera
pub fn calibrate_camera<C: ViewingCamera + ?Sized>(
    camera: &mut C,
    intrinsics: &CameraIntrinsics,
    resolution: ImageResolution,
) -> Result<CameraCalibration, AlignError> {
    let calibration = CameraCalibration::from_intrinsics(intrinsics, resolution)?;
    calibration.apply_to(camera);

    if calibration.is_principal_point_off_centre() {
        warn!(
            "principal point ({}, {}) is far from the image centre, it is not applied to the camera",
            calibration.cx, calibration.cy
        );
    }
    info!(
        "camera calibrated: fov_y {:.2} deg, aspect {:.3}",
        calibration.fov_y_deg, calibration.aspect
    );
    Ok(calibration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::viewing::PinholeCamera;
    use approx::assert_relative_eq;
    use nalgebra as na;
    use rstest::rstest;
    use smpl_utils::vector::Vector2f;

    #[rstest]
    #[case(480, 640)]
    #[case(896, 896)]
    #[case(1080, 1920)]
    fn sixty_degree_focal_length(#[case] height: u32, #[case] width: u32) {
        let fy = height as f32 / (2.0 * 30f32.to_radians().tan());
        let intr = CameraIntrinsics::from_focal_and_center(fy, fy, width as f32 / 2.0, height as f32 / 2.0);
        let mut cam = PinholeCamera::default();
        let calib = calibrate_camera(&mut cam, &intr, ImageResolution::new(width, height)).unwrap();
        assert_relative_eq!(calib.fov_y_deg, 60.0, epsilon = 1e-3);
        assert_relative_eq!(cam.field_of_view(), 60.0, epsilon = 1e-3);
        assert_relative_eq!(cam.aspect(), width as f32 / height as f32, epsilon = 1e-6);
        assert_eq!(calib.principal_point_offset(), (0.0, 0.0));
    }

    #[test]
    fn calibration_leaves_camera_pose_alone() {
        let mut cam = PinholeCamera {
            position: na::Point3::new(0.0, 1.0, -2.0),
            ..Default::default()
        };
        let intr = CameraIntrinsics::from_focal_and_center(800.0, 800.0, 100.0, 400.0);
        calibrate_camera(&mut cam, &intr, ImageResolution::new(640, 480)).unwrap();
        assert_eq!(cam.position, na::Point3::new(0.0, 1.0, -2.0));
        assert_eq!(cam.orientation, na::UnitQuaternion::identity());
    }

    #[test]
    fn off_centre_principal_point_is_reported_but_not_applied() {
        let intr = CameraIntrinsics::from_focal_and_center(800.0, 800.0, 100.0, 400.0);
        let mut cam = PinholeCamera::default();
        let calib = calibrate_camera(&mut cam, &intr, ImageResolution::new(640, 480)).unwrap();
        let (off_x, off_y) = calib.principal_point_offset();
        assert_relative_eq!(off_x, 100.0 / 640.0 - 0.5, epsilon = 1e-6);
        assert_relative_eq!(off_y, 400.0 / 480.0 - 0.5, epsilon = 1e-6);
        assert!(calib.is_principal_point_off_centre());
        // the viewing ray through the image centre is unchanged
        assert_relative_eq!(cam.viewport_point_to_ray(&Vector2f::new(0.5, 0.5)).direction.into_inner(), cam.forward().into_inner());
    }

    #[rstest]
    #[case(320.0, 240.0)]
    #[case(340.0, 228.0)]
    fn near_centre_principal_point_is_accepted(#[case] cx: f32, #[case] cy: f32) {
        let intr = CameraIntrinsics::from_focal_and_center(800.0, 800.0, cx, cy);
        let calib = CameraCalibration::from_intrinsics(&intr, ImageResolution::new(640, 480)).unwrap();
        assert!(!calib.is_principal_point_off_centre());
    }

    #[test]
    fn non_positive_focal_length_is_rejected() {
        let intr = CameraIntrinsics::from_focal_and_center(500.0, 0.0, 320.0, 240.0);
        let mut cam = PinholeCamera::default();
        let err = calibrate_camera(&mut cam, &intr, ImageResolution::new(640, 480)).unwrap_err();
        assert!(matches!(err, AlignError::InvalidIntrinsics(_)));
        assert_relative_eq!(cam.field_of_view(), 60.0);
    }
}
