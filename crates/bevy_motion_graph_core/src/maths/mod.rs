pub mod shaping;
pub mod slope;
pub mod spring;
