use log::{info, warn};
use nalgebra as na;
use ndarray as nd;
use serde::Deserialize;
use smpl_utils::vector::{vec2_from_slice, vec3_from_slice, Vector2f, Vector3f};
use std::path::Path;

use crate::{
    common::{
        frame::{CameraIntrinsics, DetectedHuman, FrameParameters},
        types::ImageResolution,
    },
    errors::AlignError,
};

/// A numeric field the producer emits either nested (one array per joint or
/// per matrix row) or flattened into a single array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawArray {
    Nested(Vec<Vec<f32>>),
    Flat(Vec<f32>),
}
impl RawArray {
    /// Splits the field into rows of `width` values. Nested rows may carry
    /// trailing extras (e.g. a confidence), which are dropped.
    fn into_rows(self, width: usize, field: &str) -> Result<Vec<Vec<f32>>, AlignError> {
        match self {
            Self::Nested(rows) => rows
                .into_iter()
                .enumerate()
                .map(|(idx, row)| {
                    if row.len() < width {
                        return Err(AlignError::Malformed(format!(
                            "{field}[{idx}] has {} values, expected at least {width}",
                            row.len()
                        )));
                    }
                    Ok(row[..width].to_vec())
                })
                .collect(),
            Self::Flat(values) => {
                if values.len() % width != 0 {
                    return Err(AlignError::Malformed(format!(
                        "{field} has {} values which is not a multiple of {width}",
                        values.len()
                    )));
                }
                Ok(values.chunks(width).map(<[f32]>::to_vec).collect())
            }
        }
    }

    fn into_flat(self) -> Vec<f32> {
        match self {
            Self::Nested(rows) => rows.into_iter().flatten().collect(),
            Self::Flat(values) => values,
        }
    }

    fn into_intrinsics(self) -> Result<CameraIntrinsics, AlignError> {
        let values: Vec<f32> = match self {
            Self::Nested(rows) => {
                if rows.len() < 3 || rows.iter().take(3).any(|r| r.len() < 3) {
                    return Err(AlignError::Malformed("camera_intrinsics must be at least 3x3".to_string()));
                }
                rows.iter().take(3).flat_map(|r| r[..3].iter().copied()).collect()
            }
            Self::Flat(values) => {
                if values.len() != 9 {
                    return Err(AlignError::Malformed(format!(
                        "flat camera_intrinsics must have 9 values, found {}",
                        values.len()
                    )));
                }
                values
            }
        };
        Ok(CameraIntrinsics::new(na::Matrix3::from_row_slice(&values)))
    }
}

/// One entry of `humans` exactly as the producer writes it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HumanRecord {
    pub location: Option<Vec<f32>>,
    pub translation: Option<Vec<f32>>,
    pub translation_pelvis: Option<RawArray>,
    pub rotation_vector: Option<RawArray>,
    pub expression: Option<RawArray>,
    pub shape: Option<RawArray>,
    pub joints_2d: Option<RawArray>,
    pub joints_3d: Option<RawArray>,
}

/// The parameter file as it comes off the estimation pipeline.
///
/// Field shapes changed between producer versions, so everything loose is
/// accepted here and [`ParamsCodec::to_frame_parameters`] is the only place
/// that knows about it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamsCodec {
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub resized_width: Option<u32>,
    pub resized_height: Option<u32>,
    pub checkpoint_resolution: Option<u32>,
    pub camera_intrinsics: Option<RawArray>,
    #[serde(default)]
    pub humans: Vec<HumanRecord>,
}

impl ParamsCodec {
    pub fn from_json_str(json: &str) -> Result<Self, AlignError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AlignError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AlignError::NotFound(path.to_path_buf()));
        }
        info!("reading frame parameters from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|source| AlignError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn resolution(&self) -> Result<ImageResolution, AlignError> {
        let (width, height) = match (self.image_width, self.image_height, self.resized_width, self.resized_height) {
            (Some(w), Some(h), _, _) | (_, _, Some(w), Some(h)) => (w, h),
            _ => match self.checkpoint_resolution {
                Some(res) => (res, res),
                None => return Err(AlignError::Malformed("no image resolution in frame parameters".to_string())),
            },
        };
        if width == 0 || height == 0 {
            return Err(AlignError::Malformed(format!("degenerate image resolution {width}x{height}")));
        }
        Ok(ImageResolution::new(width, height))
    }

    /// Converts into the canonical representation used by the alignment code.
    ///
    /// A single malformed human record fails the whole frame: the error is a
    /// load failure, not one scoped to that human.
    pub fn to_frame_parameters(&self) -> Result<FrameParameters, AlignError> {
        let resolution = self.resolution()?;
        let camera_intrinsics = self.camera_intrinsics.clone().map(RawArray::into_intrinsics).transpose()?;
        let humans = self
            .humans
            .iter()
            .enumerate()
            .map(|(idx, human)| human_from_record(idx, human))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FrameParameters::new(resolution, camera_intrinsics, humans))
    }
}

fn rows_to_vec3(raw: Option<&RawArray>, field: &str) -> Result<Vec<Vector3f>, AlignError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    Ok(raw
        .clone()
        .into_rows(3, field)?
        .iter()
        .filter_map(|r| vec3_from_slice(r))
        .collect())
}

fn rows_to_vec2(raw: Option<&RawArray>, field: &str) -> Result<Vec<Vector2f>, AlignError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    Ok(raw
        .clone()
        .into_rows(2, field)?
        .iter()
        .filter_map(|r| vec2_from_slice(r))
        .collect())
}

fn human_from_record(idx: usize, record: &HumanRecord) -> Result<DetectedHuman, AlignError> {
    let translation = match (&record.translation, &record.location) {
        (Some(t), _) => t,
        (None, Some(l)) => {
            warn!("human {idx} has no translation, using its location instead");
            l
        }
        (None, None) => return Err(AlignError::Malformed(format!("human {idx} has neither translation nor location"))),
    };
    let translation = vec3_from_slice(translation)
        .ok_or_else(|| AlignError::Malformed(format!("human {idx} translation needs 3 values, found {}", translation.len())))?;

    let rotation_vector = record
        .rotation_vector
        .as_ref()
        .map(|raw| rows_to_vec3(Some(raw), "rotation_vector"))
        .transpose()?;

    Ok(DetectedHuman {
        translation,
        translation_pelvis: rows_to_vec3(record.translation_pelvis.as_ref(), "translation_pelvis")?,
        rotation_vector,
        shape: record.shape.clone().map(|s| nd::Array1::from_vec(s.into_flat())),
        expression: record.expression.clone().map(|e| nd::Array1::from_vec(e.into_flat())),
        joints_2d: rows_to_vec2(record.joints_2d.as_ref(), "joints_2d")?,
        joints_3d: rows_to_vec3(record.joints_3d.as_ref(), "joints_3d")?,
    })
}

impl FrameParameters {
    pub fn from_json_str(json: &str) -> Result<Self, AlignError> {
        ParamsCodec::from_json_str(json)?.to_frame_parameters()
    }

    /// Reads and validates a parameter file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AlignError> {
        ParamsCodec::from_file(path)?.to_frame_parameters()
    }
}
