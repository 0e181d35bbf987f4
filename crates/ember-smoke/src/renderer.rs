use std::path::Path;

use anyhow::{Context, Result};
use ember_engine::device::Gpu;
use ember_engine::gl::{
    load_shader, LinkOptions, Program, ShaderStage, Uniform, Vertex, VertexBuffer, VertexBufferMap,
};
use ember_engine::paint::Color;
use ember_engine::render::RenderTarget;

use crate::particles::Particle;

pub const VERTEX_SHADER: &str = "particle_vs.wgsl";
pub const FRAGMENT_SHADER: &str = "particle_fs.wgsl";

/// Mirrors `struct Params` in the particle vertex shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleParams {
    pub tint: Color,
    pub aspect: f32,
    _pad: [f32; 3],
}

impl ParticleParams {
    pub fn new(tint: Color, aspect: f32) -> Self {
        Self {
            tint,
            aspect,
            _pad: [0.0; 3],
        }
    }
}

/// Program, uniform and vertex storage for drawing particles as points.
pub struct ParticleRenderer {
    program: Program,
    params: Uniform<ParticleParams>,
    current: ParticleParams,
    vertices: VertexBuffer<Particle>,
}

impl ParticleRenderer {
    /// Loads the particle shaders from `shader_dir` and links them.
    pub fn new(gpu: &Gpu<'_>, shader_dir: &Path, capacity: usize, tint: Color) -> Result<Self> {
        let device = gpu.device();

        let vs = load_shader(device, ShaderStage::Vertex, shader_dir.join(VERTEX_SHADER))?;
        let fs = load_shader(device, ShaderStage::Fragment, shader_dir.join(FRAGMENT_SHADER))?;

        let layouts = [Particle::layout()];
        let options = LinkOptions::new(gpu.surface_format())
            .vertex_buffers(&layouts)
            .blend(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING)
            .topology(wgpu::PrimitiveTopology::PointList);
        let program = Program::builder("particles")
            .attach(&vs)
            .attach(&fs)
            .link(device, &options)
            .context("particle program failed to link")?;

        let location = program.uniform_location("params")?;
        let current = ParticleParams::new(tint, gpu.aspect_ratio());
        let params = Uniform::new(
            device,
            gpu.queue(),
            &program,
            location,
            "particle params",
            &current,
        )?;

        let vertices =
            VertexBuffer::new(device, "particles", capacity, wgpu::BufferUsages::empty())?;

        log::info!(
            "particle renderer ready: {capacity} points, uniform at group {} binding {}",
            location.group,
            location.binding
        );

        Ok(Self {
            program,
            params,
            current,
            vertices,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.vertices.capacity()
    }

    pub fn set_aspect(&mut self, queue: &wgpu::Queue, aspect: f32) {
        if self.current.aspect == aspect {
            return;
        }
        self.current.aspect = aspect;
        self.params.write(queue, &self.current);
    }

    /// Maps every particle vertex for writing.
    pub fn map<'a>(&'a mut self, queue: &'a wgpu::Queue) -> VertexBufferMap<'a, Particle> {
        self.vertices.map(queue)
    }

    /// Draws the first `count` particles over the current target.
    pub fn draw(&self, target: &mut RenderTarget<'_>, count: usize) {
        let count = count.min(self.capacity()) as u32;
        let mut rpass = target.begin_pass("particles");
        self.program.use_program(&mut rpass);
        self.params.bind(&mut rpass);
        self.vertices.bind(&mut rpass, 0);
        rpass.draw(0..count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_match_wgsl_struct_size() {
        // vec4<f32> + f32, rounded up to the struct's 16-byte alignment.
        assert_eq!(std::mem::size_of::<ParticleParams>(), 32);
    }

    #[test]
    fn bundled_shaders_compile() {
        use ember_engine::gl::Shader;

        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        for (stage, file) in [
            (ShaderStage::Vertex, VERTEX_SHADER),
            (ShaderStage::Fragment, FRAGMENT_SHADER),
        ] {
            let source = std::fs::read_to_string(dir.join(file)).unwrap();
            if let Err(err) = Shader::check(stage, file, &source) {
                panic!("{file}: {err}");
            }
        }
    }
}
