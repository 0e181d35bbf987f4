//! Ember engine crate.
//!
//! Scope-owned GPU resource wrappers plus the platform pieces the smoke tests
//! run on: window runtime, device context, frame timing, and logging.

pub mod coords;
pub mod core;
pub mod device;
pub mod gl;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
