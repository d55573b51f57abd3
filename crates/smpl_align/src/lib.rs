#![deny(missing_docs)]
//! ## Crate Items Overview
//!
//! smpl-align takes the output of a monocular human mesh recovery pipeline
//! (camera intrinsics plus per-person pose, shape and expression) and uses it
//! to pose SMPL-X body models so that they line up with the source photo.
//!
//! ### Modules
//! - [`smpl_align_core`](crate::smpl_align_core) - Parameter loading, joint
//!   topology, pose/shape appliers, camera calibration and scene assembly.
//! - [`smpl_utils`](crate::smpl_utils) - Rotation conversions and small
//!   vector helpers.
//!
//! ## Usage
//! ```no_run
//! use smpl_align::smpl_align_core::{
//!     align::scene::AlignmentPipeline, camera::viewing::PinholeCamera, common::align_config::AlignConfig,
//!     smpl_x::smpl_x_rig::SmplXRigFactory,
//! };
//!
//! let pipeline = AlignmentPipeline::new(AlignConfig::default());
//! let mut camera = PinholeCamera::default();
//! let mut factory = SmplXRigFactory::default();
//! if let Some(result) = pipeline.run_from_file("frame.json", &mut camera, &mut factory) {
//!     println!("{} bodies, {} issues", result.humans.len(), result.num_issues());
//! }
//! ```
pub use smpl_align_core;
pub use smpl_utils;
