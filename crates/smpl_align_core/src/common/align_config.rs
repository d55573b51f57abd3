use serde::{Deserialize, Serialize};
use std::path::Path;

use super::types::RootConvention;
use crate::errors::AlignError;

/// Options for a run of the alignment pipeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Distance along the camera forward axis at which the background plate sits
    pub background_depth: f32,
    pub root_convention: RootConvention,
    /// Snap each body onto the camera ray through one of its 2D joints
    pub refine_with_joints_2d: bool,
    /// Which 2D joint the ray is cast through, 0 is the pelvis
    pub reference_joint_2d: usize,
    /// Which entry of `translation_pelvis` is added to the placement
    pub pelvis_candidate: usize,
}
impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            background_depth: 10.0,
            root_convention: RootConvention::AsIs,
            refine_with_joints_2d: true,
            reference_joint_2d: 0,
            pelvis_candidate: 0,
        }
    }
}
impl AlignConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AlignError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AlignError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AlignError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = AlignConfig::from_json_str(r#"{ "background_depth": 4.0, "root_convention": "flip_y180" }"#).unwrap();
        assert_eq!(config.background_depth, 4.0);
        assert_eq!(config.root_convention, RootConvention::FlipY180);
        assert!(config.refine_with_joints_2d);
        assert_eq!(config.pelvis_candidate, 0);
    }

    #[test]
    fn unknown_convention_is_rejected() {
        let err = AlignConfig::from_json_str(r#"{ "root_convention": "upside_down" }"#).unwrap_err();
        assert!(matches!(err, AlignError::Parse(_)));
    }
}
