use std::ops::{Add, AddAssign, Mul, Sub};

use rand::Rng;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Heading of this vector in radians, measured from +x towards +y.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Unit vector in the same direction. A zero vector divides by 1 and stays zero.
    pub fn normalized_or_zero(self) -> Vec2 {
        let length = self.length();
        let length = if length > 0.0 { length } else { 1.0 };
        Vec2 {
            x: self.x / length,
            y: self.y / length,
        }
    }

    pub fn rotated(self, radians: f32) -> Vec2 {
        let (sin, cos) = radians.sin_cos();
        Vec2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Logical drawing bounds of a simulation surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Clamps `point` into the bounds inset by `margin`. Degenerate extents pin the
    /// point to the margin instead of panicking on an inverted range.
    pub fn clamp_inset(&self, point: Vec2, margin: f32) -> Vec2 {
        Vec2 {
            x: clamp_lenient(point.x, margin, self.width - margin),
            y: clamp_lenient(point.y, margin, self.height - margin),
        }
    }

    /// Uniform random point inside the bounds inset by `padding`. The random span
    /// never drops below `min_span`, so zero-sized surfaces still produce finite
    /// coordinates.
    pub fn random_point(&self, rng: &mut impl Rng, padding: f32, min_span: f32) -> Vec2 {
        let span_x = (self.width - padding * 2.0).max(min_span);
        let span_y = (self.height - padding * 2.0).max(min_span);
        Vec2 {
            x: padding + rng.gen::<f32>() * span_x,
            y: padding + rng.gen::<f32>() * span_y,
        }
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn clamp_lenient(value: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(value))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(Vec2::ZERO.normalized_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn rotation_by_quarter_turn_swaps_axes() {
        let rotated = Vec2::new(1.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        assert!(rotated.x.abs() < 1e-6);
        assert!((rotated.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clamp_inset_pins_to_margin_on_degenerate_bounds() {
        let bounds = Bounds::new(10.0, 0.0);
        let clamped = bounds.clamp_inset(Vec2::new(500.0, -40.0), 18.0);
        assert_eq!(clamped, Vec2::new(18.0, 18.0));
    }

    #[test]
    fn random_point_stays_finite_for_zero_area() {
        let bounds = Bounds::new(0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let point = bounds.random_point(&mut rng, 28.0, 10.0);
            assert!(point.is_finite());
            assert!(point.x >= 28.0 && point.x <= 38.0);
        }
    }

    #[test]
    fn non_finite_extents_collapse_to_zero() {
        let bounds = Bounds::new(f32::NAN, f32::INFINITY);
        assert!(bounds.is_degenerate());
        assert_eq!(bounds.width, 0.0);
        assert_eq!(bounds.height, 0.0);
    }
}
