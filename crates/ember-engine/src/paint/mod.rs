//! Color representation shared by clear passes and shader uniforms.

mod color;

pub use color::Color;
