use nalgebra as na;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Correction composed onto the root orientation before it is assigned to a
/// body model.
///
/// Producers and engines disagree on which way a body faces at identity.
/// Some exports have needed a 180 degree turn about the up axis on top of the
/// root rotation. It is kept as an explicit switch rather than baked in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootConvention {
    #[default]
    AsIs,
    FlipY180,
}
impl RootConvention {
    /// Rotation right-multiplied onto the root orientation
    pub fn correction(self) -> na::UnitQuaternion<f32> {
        match self {
            Self::AsIs => na::UnitQuaternion::identity(),
            Self::FlipY180 => na::UnitQuaternion::from_axis_angle(&na::Vector3::y_axis(), std::f32::consts::PI),
        }
    }
}

/// Width and height of the image the parameters were estimated on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResolution {
    pub width: u32,
    pub height: u32,
}
impl ImageResolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
