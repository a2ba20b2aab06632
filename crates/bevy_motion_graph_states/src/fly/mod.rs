//! Free-flight states. All of them suppress gravity and grounding.

pub mod fly;
pub mod fly_down;
pub mod fly_up;
