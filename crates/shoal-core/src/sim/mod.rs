pub mod aabb;
pub mod fish;
pub mod flock;
pub mod forces;
pub mod stats;

pub use aabb::*;
pub use fish::*;
pub use flock::*;
pub use forces::*;
pub use stats::*;
