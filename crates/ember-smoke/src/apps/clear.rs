use ember_engine::core::{App, AppControl, FrameCtx};
use ember_engine::paint::Color;

/// Opens the window and clears it with a slowly cycling color.
///
/// Exercises context setup, surface resize and frame pacing without any
/// `gl` resources.
#[derive(Debug, Default)]
pub struct ClearApp {
    elapsed: f32,
    frames_this_second: u32,
    second: f32,
}

impl ClearApp {
    fn clear_color(&self) -> Color {
        let t = self.elapsed * 0.5;
        Color::from_straight(
            0.1 + 0.1 * t.sin(),
            0.1 + 0.1 * (t + 2.0).sin(),
            0.15 + 0.1 * (t + 4.0).sin(),
            1.0,
        )
    }
}

impl App for ClearApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let dt = ctx.time.dt;
        self.elapsed += dt;

        self.frames_this_second += 1;
        self.second += dt;
        if self.second >= 1.0 {
            log::info!("{} fps", self.frames_this_second);
            self.frames_this_second = 0;
            self.second -= 1.0;
        }

        ctx.render(self.clear_color(), |_, _| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_is_opaque_and_finite() {
        let mut app = ClearApp::default();
        for step in 0..100 {
            app.elapsed = step as f32 * 0.37;
            let c = app.clear_color();
            assert!(c.is_finite());
            assert_eq!(c.a, 1.0);
        }
    }
}
