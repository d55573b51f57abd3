use nalgebra as na;
use ndarray as nd;
use smpl_utils::vector::{Vector2f, Vector3f};

use super::types::ImageResolution;

/// Pinhole intrinsics stored as a row-major 3x3 matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraIntrinsics {
    pub matrix: na::Matrix3<f32>,
}
impl CameraIntrinsics {
    pub fn new(matrix: na::Matrix3<f32>) -> Self {
        Self { matrix }
    }
    pub fn from_focal_and_center(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self::new(na::Matrix3::new(fx, 0.0, cx, 0.0, fy, cy, 0.0, 0.0, 1.0))
    }
    pub fn fx(&self) -> f32 {
        self.matrix[(0, 0)]
    }
    pub fn fy(&self) -> f32 {
        self.matrix[(1, 1)]
    }
    pub fn cx(&self) -> f32 {
        self.matrix[(0, 2)]
    }
    pub fn cy(&self) -> f32 {
        self.matrix[(1, 2)]
    }
}

/// One person found in the image together with the parameters estimated for
/// them. Optional fields are empty when the producer did not emit them.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedHuman {
    /// Root placement
    pub translation: Vector3f,
    /// Candidate offsets of the pelvis relative to the root placement
    pub translation_pelvis: Vec<Vector3f>,
    /// Axis-angle rotation per joint, root first
    pub rotation_vector: Option<Vec<Vector3f>>,
    pub shape: Option<nd::Array1<f32>>,
    pub expression: Option<nd::Array1<f32>>,
    /// Image-space joint detections in pixels
    pub joints_2d: Vec<Vector2f>,
    pub joints_3d: Vec<Vector3f>,
}
impl DetectedHuman {
    pub fn new(translation: Vector3f) -> Self {
        Self {
            translation,
            translation_pelvis: Vec::new(),
            rotation_vector: None,
            shape: None,
            expression: None,
            joints_2d: Vec::new(),
            joints_3d: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rotation_vector(mut self, rotation_vector: Vec<Vector3f>) -> Self {
        self.rotation_vector = Some(rotation_vector);
        self
    }
    #[must_use]
    pub fn with_shape(mut self, shape: nd::Array1<f32>) -> Self {
        self.shape = Some(shape);
        self
    }
    #[must_use]
    pub fn with_expression(mut self, expression: nd::Array1<f32>) -> Self {
        self.expression = Some(expression);
        self
    }
    #[must_use]
    pub fn with_translation_pelvis(mut self, translation_pelvis: Vec<Vector3f>) -> Self {
        self.translation_pelvis = translation_pelvis;
        self
    }
    #[must_use]
    pub fn with_joints_2d(mut self, joints_2d: Vec<Vector2f>) -> Self {
        self.joints_2d = joints_2d;
        self
    }

    /// Axis-angle of the root joint, which is the global orientation of the body
    pub fn root_rotation(&self) -> Option<&Vector3f> {
        self.rotation_vector.as_ref().and_then(|r| r.first())
    }
}

/// Everything estimated for a single frame. Loaded once, read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameParameters {
    pub resolution: ImageResolution,
    pub camera_intrinsics: Option<CameraIntrinsics>,
    pub humans: Vec<DetectedHuman>,
}
impl FrameParameters {
    pub fn new(resolution: ImageResolution, camera_intrinsics: Option<CameraIntrinsics>, humans: Vec<DetectedHuman>) -> Self {
        Self {
            resolution,
            camera_intrinsics,
            humans,
        }
    }
}
