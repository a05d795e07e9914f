pub mod arbiter;
pub mod fab;
pub mod frame;
pub mod geometry;
pub mod magnetic;
pub mod proximity;
pub mod resize;
pub mod swipe;
