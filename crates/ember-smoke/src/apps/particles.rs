use std::path::PathBuf;

use anyhow::Result;
use ember_engine::coords::Viewport;
use ember_engine::core::{App, AppControl, FrameCtx};
use ember_engine::device::Gpu;
use ember_engine::paint::Color;

use crate::particles::{Particle, SimParams, Simulation};
use crate::renderer::ParticleRenderer;

/// Steps the particle simulation on the mapped vertex buffer each frame.
pub struct ParticleApp {
    shader_dir: PathBuf,
    count: usize,
    sim: Simulation,
    renderer: Option<ParticleRenderer>,
}

impl ParticleApp {
    pub fn new(shader_dir: PathBuf, count: usize, seed: u64) -> Self {
        Self {
            shader_dir,
            count,
            sim: Simulation::new(SimParams::default(), seed),
            renderer: None,
        }
    }
}

impl App for ParticleApp {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let mut renderer = ParticleRenderer::new(
            gpu,
            &self.shader_dir,
            self.count,
            Color::from_srgb_u8(255, 120, 40, 255),
        )?;

        self.sim.set_aspect(gpu.aspect_ratio());
        let mut view = renderer.map(gpu.queue());
        self.sim.seed(&mut view);
        view.unmap();

        self.renderer = Some(renderer);
        Ok(())
    }

    fn on_resize(&mut self, gpu: &Gpu<'_>, viewport: Viewport) {
        let aspect = viewport.aspect_ratio();
        self.sim.set_aspect(aspect);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_aspect(gpu.queue(), aspect);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };

        {
            let mut view = renderer.map(ctx.gpu.queue());
            let particles: &mut [Particle] = &mut view;
            self.sim.step(particles, ctx.time.dt);
        }

        let count = self.count;
        let renderer = &*renderer;
        ctx.render(Color::from_srgb_u8(8, 8, 16, 255), |_, target| {
            renderer.draw(target, count)
        })
    }
}
