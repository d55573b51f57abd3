pub mod align_config;
pub mod betas;
pub mod body_model;
pub mod expression;
pub mod frame;
pub mod joints;
pub mod types;
