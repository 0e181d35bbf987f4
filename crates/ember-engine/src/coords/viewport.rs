/// Drawable size in physical pixels.
///
/// Renderers use the aspect ratio to keep NDC geometry square on non-square
/// surfaces.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width divided by height. Degenerate viewports (minimized windows) report 1.0.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_of_landscape() {
        assert_eq!(Viewport::new(640.0, 480.0).aspect_ratio(), 640.0 / 480.0);
    }

    #[test]
    fn zero_height_reports_unit_aspect() {
        // Minimized windows report 0x0 on most platforms.
        assert_eq!(Viewport::new(640.0, 0.0).aspect_ratio(), 1.0);
        assert_eq!(Viewport::default().aspect_ratio(), 1.0);
    }
}
