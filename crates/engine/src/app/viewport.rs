use super::Viewport;

/// Tracks the logical size and pixel ratio reported by the host for one widget.
///
/// Every resize is applied, including repeats of the current size, so a
/// widget created at zero size still seeds its entities on the first report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportAdapter {
    viewport: Viewport,
}

impl ViewportAdapter {
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) -> Viewport {
        self.viewport = Viewport::new(width, height, pixel_ratio);
        self.viewport
    }
}
