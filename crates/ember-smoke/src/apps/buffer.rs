use std::path::PathBuf;

use anyhow::Result;
use ember_engine::coords::{Vec2, Viewport};
use ember_engine::core::{App, AppControl, FrameCtx};
use ember_engine::device::Gpu;
use ember_engine::paint::Color;

use crate::particles::Particle;
use crate::renderer::ParticleRenderer;

/// Fills a vertex buffer once through a mapped view and draws it every frame.
pub struct BufferApp {
    shader_dir: PathBuf,
    count: usize,
    renderer: Option<ParticleRenderer>,
}

impl BufferApp {
    pub fn new(shader_dir: PathBuf, count: usize) -> Self {
        Self {
            shader_dir,
            count,
            renderer: None,
        }
    }
}

/// `count` motionless points evenly spaced on a circle of radius 0.75.
fn ring(count: usize) -> impl Iterator<Item = Particle> {
    (0..count).map(move |i| {
        let angle = i as f32 / count as f32 * std::f32::consts::TAU;
        Particle {
            pos: Vec2::new(angle.cos(), angle.sin()) * 0.75,
            vel: Vec2::zero(),
            age: 0.0,
            life: 1.0,
        }
    })
}

impl App for BufferApp {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let mut renderer = ParticleRenderer::new(
            gpu,
            &self.shader_dir,
            self.count,
            Color::from_srgb_u8(120, 200, 255, 255),
        )?;

        let mut view = renderer.map(gpu.queue());
        for (slot, p) in view.iter_mut().zip(ring(self.count)) {
            *slot = p;
        }
        view.unmap();

        self.renderer = Some(renderer);
        Ok(())
    }

    fn on_resize(&mut self, gpu: &Gpu<'_>, viewport: Viewport) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_aspect(gpu.queue(), viewport.aspect_ratio());
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(renderer) = self.renderer.as_ref() else {
            return AppControl::Continue;
        };
        let count = self.count;
        ctx.render(Color::BLACK, |_, target| renderer.draw(target, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_points_sit_on_radius() {
        let points: Vec<_> = ring(12).collect();
        assert_eq!(points.len(), 12);
        for p in &points {
            assert!((p.pos.length() - 0.75).abs() < 1e-5);
            assert_eq!(p.vel, Vec2::zero());
        }
        assert!((points[3].pos - Vec2::new(0.0, 0.75)).length() < 1e-5);
    }
}
