pub mod pose;
pub mod scene;
pub mod shape;
pub mod spatial;
