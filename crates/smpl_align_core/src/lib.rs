//! Drives SMPL-X body models from per-frame estimated parameters and aligns
//! them with the photo the parameters were estimated on.
pub mod align;
pub mod camera;
pub mod codec;
pub mod common;
pub mod errors;
pub mod smpl_x;

pub use errors::AlignError;
