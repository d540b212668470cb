use crate::sim::{Bounds, Vec2};

/// Logical drawing size plus the physical-pixels-per-logical-unit ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// Builds a viewport from host-reported values. Invalid extents become 0 and an
    /// invalid ratio becomes 1.
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        let bounds = Bounds::new(width, height);
        Self {
            width: bounds.width,
            height: bounds.height,
            pixel_ratio: sanitize_pixel_ratio(pixel_ratio),
        }
    }

    /// Viewport that exactly covers a physical surface at `pixel_ratio`.
    pub fn from_physical(width: u32, height: u32, pixel_ratio: f32) -> Self {
        let ratio = sanitize_pixel_ratio(pixel_ratio);
        Self::new(width as f32 / ratio, height as f32 / ratio, ratio)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }

    pub fn physical_to_logical(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(x as f32 / self.pixel_ratio, y as f32 / self.pixel_ratio)
    }
}

pub(crate) fn sanitize_pixel_ratio(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}
