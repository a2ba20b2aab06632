//! Climbing states anchored to ladder geometry.

pub mod contact_ladder;
pub mod ladder_climb;
