pub mod calibration;
pub mod viewing;
