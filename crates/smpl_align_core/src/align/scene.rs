use log::{debug, error, info, warn};
use nalgebra as na;
use serde::Serialize;
use std::path::Path;

use super::{
    pose::apply_pose,
    shape::{apply_expression, apply_shape},
    spatial::{apply_pelvis_offset, place_root, refine_with_joint_2d},
};
use crate::{
    camera::{
        calibration::{calibrate_camera, CameraCalibration},
        viewing::ViewingCamera,
    },
    common::{
        align_config::AlignConfig,
        body_model::{BodyModel, BodyModelFactory},
        frame::{DetectedHuman, FrameParameters},
    },
    errors::AlignError,
};

/// Pixel size of the photo shown behind the bodies. The texture itself is
/// owned by the host.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BackgroundImage {
    pub width: u32,
    pub height: u32,
    pub source: Option<String>,
}
impl BackgroundImage {
    /// Width over height, `None` for an image with a zero side
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f32 / self.height as f32)
    }
}

/// Quad placed behind the scene that exactly fills the view at its depth
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BackgroundPlane {
    pub center: na::Point3<f32>,
    /// Same orientation as the camera so the quad faces it
    pub rotation: na::UnitQuaternion<f32>,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub image: Option<BackgroundImage>,
}

impl BackgroundPlane {
    /// Size of the frustum cross-section at `depth`:
    /// `height = 2 * depth * tan(fov_y / 2)`, `width = height * aspect`
    pub fn frustum_extent(fov_y_deg: f32, aspect: f32, depth: f32) -> (f32, f32) {
        let height = 2.0 * depth * (0.5 * fov_y_deg.to_radians()).tan();
        (height * aspect, height)
    }

    /// Sizes the plane from the camera's current field of view, so the camera
    /// has to be calibrated first
    pub fn fit_to_camera<C: ViewingCamera + ?Sized>(camera: &C, depth: f32, aspect: f32, image: Option<BackgroundImage>) -> Self {
        let (width, height) = Self::frustum_extent(camera.field_of_view(), aspect, depth);
        Self {
            center: camera.position() + camera.forward().into_inner() * depth,
            rotation: camera.orientation(),
            width,
            height,
            depth,
            image,
        }
    }
}

/// One body model together with what went wrong while driving it
#[derive(Debug)]
pub struct AlignedHuman<M: BodyModel> {
    pub human_idx: usize,
    pub model: M,
    /// Validation errors of the individual steps, the remaining steps still ran
    pub issues: Vec<AlignError>,
    pub pelvis_offset_applied: bool,
    pub refined_with_joint_2d: bool,
}
impl<M: BodyModel> AlignedHuman<M> {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Everything a run of the pipeline produced for one frame
#[derive(Debug)]
pub struct AlignmentResult<M: BodyModel> {
    /// `None` when the frame carried no usable intrinsics
    pub calibration: Option<CameraCalibration>,
    pub humans: Vec<AlignedHuman<M>>,
    pub background: BackgroundPlane,
}
impl<M: BodyModel> AlignmentResult<M> {
    pub fn num_issues(&self) -> usize {
        self.humans.iter().map(|h| h.issues.len()).sum()
    }
}

/// Drives one body model per detected human from a frame's parameters and
/// lays out the scene around the calibrated camera
#[derive(Clone, Debug, Default)]
pub struct AlignmentPipeline {
    pub config: AlignConfig,
    pub background_image: Option<BackgroundImage>,
}

impl AlignmentPipeline {
    pub fn new(config: AlignConfig) -> Self {
        Self {
            config,
            background_image: None,
        }
    }

    #[must_use]
    pub fn with_background_image(mut self, image: BackgroundImage) -> Self {
        self.background_image = Some(image);
        self
    }

    /// Loads the parameter file and runs the pipeline on it. A file that
    /// cannot be loaded is logged and the whole frame is skipped.
    pub fn run_from_file<C, F>(&self, path: impl AsRef<Path>, camera: &mut C, factory: &mut F) -> Option<AlignmentResult<F::Model>>
    where
        C: ViewingCamera + ?Sized,
        F: BodyModelFactory,
    {
        let path = path.as_ref();
        match FrameParameters::from_file(path) {
            Ok(frame) => Some(self.run(&frame, camera, factory)),
            Err(e) => {
                error!("skipping alignment, could not load {}: {e}", path.display());
                None
            }
        }
    }

    /// Calibrates the camera, builds and aligns one model per human, then
    /// fits the background plane to the calibrated view
    pub fn run<C, F>(&self, frame: &FrameParameters, camera: &mut C, factory: &mut F) -> AlignmentResult<F::Model>
    where
        C: ViewingCamera + ?Sized,
        F: BodyModelFactory,
    {
        let calibration = match &frame.camera_intrinsics {
            Some(intrinsics) => match calibrate_camera(camera, intrinsics, frame.resolution) {
                Ok(calibration) => Some(calibration),
                Err(e) => {
                    warn!("keeping the current camera settings: {e}");
                    None
                }
            },
            None => {
                warn!("frame has no camera intrinsics, keeping the current camera settings");
                None
            }
        };

        info!("aligning {} humans", frame.humans.len());
        let humans = frame
            .humans
            .iter()
            .enumerate()
            .map(|(idx, human)| self.align_human(idx, human, frame, &*camera, factory))
            .collect();

        let aspect = match &self.background_image {
            Some(image) => image.aspect().unwrap_or_else(|| {
                warn!(
                    "background image is {}x{}, using the frame aspect instead",
                    image.width, image.height
                );
                frame.resolution.aspect()
            }),
            None => frame.resolution.aspect(),
        };
        let background = BackgroundPlane::fit_to_camera(&*camera, self.config.background_depth, aspect, self.background_image.clone());
        debug!(
            "background plane {:.3}x{:.3} at depth {}",
            background.width, background.height, background.depth
        );

        AlignmentResult {
            calibration,
            humans,
            background,
        }
    }

    /// placement, pose, shape, expression, pelvis offset, 2D refinement.
    /// Each step is its own failure domain.
    fn align_human<C, F>(&self, idx: usize, human: &DetectedHuman, frame: &FrameParameters, camera: &C, factory: &mut F) -> AlignedHuman<F::Model>
    where
        C: ViewingCamera + ?Sized,
        F: BodyModelFactory,
    {
        let mut model = factory.create_body_model(idx);
        let mut issues = Vec::new();

        place_root(&mut model, human, self.config.root_convention);

        if let Some(rotation_vector) = &human.rotation_vector {
            if let Err(e) = apply_pose(&mut model, rotation_vector) {
                issues.push(e);
            }
        }
        if let Some(shape) = &human.shape {
            if let Err(e) = apply_shape(&mut model, &shape.to_vec()) {
                issues.push(e);
            }
        }
        if let Some(expression) = &human.expression {
            if let Err(e) = apply_expression(&mut model, &expression.to_vec()) {
                issues.push(e);
            }
        }

        let pelvis_offset_applied = apply_pelvis_offset(&mut model, &human.translation_pelvis, self.config.pelvis_candidate);

        let reference_joint = human.joints_2d.get(self.config.reference_joint_2d);
        let refined_with_joint_2d = match reference_joint {
            Some(joint_2d) if self.config.refine_with_joints_2d => {
                refine_with_joint_2d(&mut model, joint_2d, frame.resolution, human.translation.z, camera);
                true
            }
            _ => {
                debug!("human {idx}: no 2d refinement");
                false
            }
        };

        if issues.is_empty() {
            info!("human {idx} aligned at {:?}", model.world_position());
        } else {
            warn!("human {idx} aligned with {} skipped steps", issues.len());
        }

        AlignedHuman {
            human_idx: idx,
            model,
            issues,
            pelvis_offset_applied,
            refined_with_joint_2d,
        }
    }
}
