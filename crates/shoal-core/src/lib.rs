//! Shoal Core Engine
//!
//! Fish school simulation: steering fields, static AABB obstacles and the
//! per-instance transforms a renderer needs to draw the school.

pub mod instancing;
pub mod sim;

// Re-export main types
pub use instancing::*;
pub use sim::*;

// Re-export params from shoal-params
pub use shoal_params::*;
