//! Grounded locomotion states.

pub mod crouch_movement;
pub mod dodge;
pub mod idle;
pub mod movement;
pub mod push_off;
pub mod push_off_extended;
pub mod slide;
