// #![warn(
//     clippy::all,
//     clippy::pedantic,
// )]
// #![allow(clippy::must_use_candidate)]

pub mod numerical;
pub mod vector;
