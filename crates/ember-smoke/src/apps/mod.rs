//! Smoke tests, one [`App`](ember_engine::core::App) per subcommand.

mod buffer;
mod clear;
mod particles;

pub use buffer::BufferApp;
pub use clear::ClearApp;
pub use particles::ParticleApp;
