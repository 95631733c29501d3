//! Common utilities for the toybox binaries
//!
//! Window/GPU setup and the pixel-space camera shared by the bouncing
//! mascot and the physics playground.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
