//! Vector math and drawable geometry shared by the runtime and smoke tests.
//!
//! Simulation space is normalized device coordinates:
//! - origin at the surface centre
//! - +X right, +Y up
//! - Y spans [-1, 1]; X spans [-aspect, aspect] and is divided by the aspect
//!   ratio in the vertex shader

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
