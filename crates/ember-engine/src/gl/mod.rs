//! Scope-owned wrappers over GPU resources.
//!
//! Every wrapper acquires its native handle on construction and releases it
//! on drop. Failures are reported through [`Error`] rather than device
//! panics:
//! - [`Buffer`] / [`VertexBuffer`]: sized allocations checked against device limits
//! - [`VertexBufferMap`]: scoped write view, committed exactly once on unmap
//! - [`Shader`]: WGSL compiled per stage, with the compiler log on failure
//! - [`Program`]: vertex + fragment stages linked into a pipeline
//! - [`Uniform`]: uniform buffer bound at a reflected location

mod buffer;
mod error;
mod map;
mod program;
mod reflect;
mod shader;
mod uniform;
mod vertex_buffer;

pub use buffer::{Buffer, COPY_ALIGNMENT};
pub use error::{Error, Result};
pub use map::VertexBufferMap;
pub use program::{LinkOptions, Program, ProgramBuilder, UniformLocation};
pub use shader::{load_shader, Shader, ShaderStage};
pub use uniform::Uniform;
pub use vertex_buffer::{stride, Vertex, VertexBuffer};
