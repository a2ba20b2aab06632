//! States that track a wall surface. All of them re-cast against the wall
//! every tick so curved surfaces are followed, and complete the moment the
//! cast misses.

pub mod mantle;
pub mod wall_cling;
pub mod wall_dash;
pub mod wall_run;
