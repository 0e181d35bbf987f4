use winit::event::WindowEvent;

use crate::coords::Viewport;
use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by smoke tests.
pub trait App {
    /// Called once the window and GPU context exist, before the first frame.
    ///
    /// Create GPU resources here. An error ends the run and is returned from
    /// [`Runtime::run`](crate::window::Runtime::run).
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let _ = gpu;
        Ok(())
    }

    /// Called after the surface is resized, and once before the first frame.
    ///
    /// `viewport.aspect_ratio()` is the value shaders should correct for.
    fn on_resize(&mut self, gpu: &Gpu<'_>, viewport: Viewport) {
        let _ = (gpu, viewport);
    }

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
