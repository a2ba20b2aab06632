//! Water locomotion. Surface states track the water height through the
//! environment query and smooth over per-tick surface deltas so waves do
//! not snap the character.

pub mod stroke_swim;
pub mod surface_swim;
pub mod tread_water;
pub mod underwater_swim;
