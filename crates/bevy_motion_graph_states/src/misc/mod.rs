//! Utility states that do not belong to a locomotion family.

pub mod dash;
pub mod frozen;
pub mod grapple;
pub mod null;
pub mod repulse;
