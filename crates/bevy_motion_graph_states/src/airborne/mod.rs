//! States for characters without ground contact.

pub mod falling;
pub mod glide;
pub mod impulse;
pub mod jetpack;
pub mod jump;
