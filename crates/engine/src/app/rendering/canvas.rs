use crate::sim::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with alpha replaced by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: unit_to_byte(alpha),
            ..self
        }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let byte = |index: usize| u8::from_str_radix(digits.get(index..index + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    pub fn lerp(self, to: Rgba, t: f32) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, to.r),
            g: mix(self.g, to.g),
            b: mix(self.b, to.b),
            a: mix(self.a, to.a),
        }
    }
}

fn unit_to_byte(value: f32) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Page color behind every widget; `clear` with it stands in for a transparent surface.
pub const SURFACE_BACKDROP: Rgba = Rgba::rgb(11, 16, 32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

pub const fn stop(offset: f32, color: Rgba) -> ColorStop {
    ColorStop { offset, color }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientShape {
    Linear { from: Vec2, to: Vec2 },
    /// Two-circle falloff: offset 0 on the inner circle, 1 on the outer one.
    /// Points no interpolated circle passes through are left transparent.
    Radial {
        inner_center: Vec2,
        inner_radius: f32,
        outer_center: Vec2,
        outer_radius: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub shape: GradientShape,
    pub stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn linear(from: Vec2, to: Vec2, stops: &[ColorStop]) -> Self {
        Self {
            shape: GradientShape::Linear { from, to },
            stops: stops.to_vec(),
        }
    }

    pub fn radial(center: Vec2, inner_radius: f32, outer_radius: f32, stops: &[ColorStop]) -> Self {
        Self::two_circle(center, inner_radius, center, outer_radius, stops)
    }

    pub fn two_circle(
        inner_center: Vec2,
        inner_radius: f32,
        outer_center: Vec2,
        outer_radius: f32,
        stops: &[ColorStop],
    ) -> Self {
        Self {
            shape: GradientShape::Radial {
                inner_center,
                inner_radius,
                outer_center,
                outer_radius,
            },
            stops: stops.to_vec(),
        }
    }

    /// Color at a logical point.
    pub fn sample(&self, point: Vec2) -> Rgba {
        let t = match self.shape {
            GradientShape::Linear { from, to } => {
                let axis = to - from;
                let length_sq = axis.x * axis.x + axis.y * axis.y;
                if length_sq > 0.0 {
                    let offset = point - from;
                    (offset.x * axis.x + offset.y * axis.y) / length_sq
                } else {
                    0.0
                }
            }
            GradientShape::Radial {
                inner_center,
                inner_radius,
                outer_center,
                outer_radius,
            } => match two_circle_offset(
                point,
                inner_center,
                inner_radius,
                outer_center,
                outer_radius,
            ) {
                Some(t) => t,
                None => return Rgba::TRANSPARENT,
            },
        };
        self.color_at(t)
    }

    fn color_at(&self, t: f32) -> Rgba {
        let Some(first) = self.stops.first() else {
            return Rgba::TRANSPARENT;
        };
        if !(t > first.offset) {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if t <= end.offset {
                let span = end.offset - start.offset;
                let local = if span > 0.0 {
                    (t - start.offset) / span
                } else {
                    1.0
                };
                return start.color.lerp(end.color, local);
            }
        }
        self.stops.last().map(|stop| stop.color).unwrap_or(first.color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgba,
    /// `[on, off]` lengths along the outline, in logical units.
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub const fn solid(width: f32, color: Rgba) -> Self {
        Self {
            width,
            color,
            dash: None,
        }
    }

    pub const fn dashed(width: f32, color: Rgba, dash: [f32; 2]) -> Self {
        Self {
            width,
            color,
            dash: Some(dash),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Largest `t` whose interpolated circle passes through `point` with a
/// non-negative radius. Concentric circles with equal radii fall back to 0.
fn two_circle_offset(
    point: Vec2,
    inner_center: Vec2,
    inner_radius: f32,
    outer_center: Vec2,
    outer_radius: f32,
) -> Option<f32> {
    let dc = outer_center - inner_center;
    let dr = outer_radius - inner_radius;
    let dp = point - inner_center;
    let a = dc.x * dc.x + dc.y * dc.y - dr * dr;
    let b = dp.x * dc.x + dp.y * dc.y + inner_radius * dr;
    let c = dp.x * dp.x + dp.y * dp.y - inner_radius * inner_radius;
    let radius_ok = |t: f32| inner_radius + t * dr >= 0.0;

    if a.abs() <= f32::EPSILON {
        if b.abs() <= f32::EPSILON {
            return (dc == Vec2::ZERO && dr == 0.0).then_some(0.0);
        }
        let t = c / (2.0 * b);
        return radius_ok(t).then_some(t);
    }

    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let (low, high) = {
        let first = (b - root) / a;
        let second = (b + root) / a;
        (first.min(second), first.max(second))
    };
    [high, low].into_iter().find(|t| t.is_finite() && radius_ok(*t))
}

/// Immediate-mode 2D drawing surface in logical coordinates.
pub trait Canvas {
    /// Logical width and height.
    fn size(&self) -> (f32, f32);
    fn clear(&mut self, color: Rgba);
    /// Paints the whole surface with `gradient`, blended over existing content.
    fn fill_gradient(&mut self, gradient: &Gradient);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, start: Rgba, end: Rgba);
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);
    /// Draws `text` with its top edge at `anchor.y`.
    fn fill_text(&mut self, anchor: Vec2, text: &str, color: Rgba, align: TextAlign);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_with_optional_alpha() {
        assert_eq!(Rgba::from_hex("#3b82f6"), Some(Rgba::rgb(0x3b, 0x82, 0xf6)));
        assert_eq!(
            Rgba::from_hex("#3b82f655"),
            Some(Rgba::new(0x3b, 0x82, 0xf6, 0x55))
        );
        assert_eq!(Rgba::from_hex("3b82f6"), None);
        assert_eq!(Rgba::from_hex("#3b82"), None);
        assert_eq!(Rgba::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn linear_gradient_interpolates_between_stops() {
        let gradient = Gradient::linear(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            &[stop(0.0, Rgba::rgb(0, 0, 0)), stop(1.0, Rgba::rgb(200, 100, 0))],
        );
        assert_eq!(gradient.sample(Vec2::new(-5.0, 0.0)), Rgba::rgb(0, 0, 0));
        assert_eq!(gradient.sample(Vec2::new(5.0, 3.0)), Rgba::rgb(100, 50, 0));
        assert_eq!(gradient.sample(Vec2::new(50.0, 0.0)), Rgba::rgb(200, 100, 0));
    }

    #[test]
    fn radial_gradient_uses_distance_from_center() {
        let gradient = Gradient::radial(
            Vec2::new(0.0, 0.0),
            10.0,
            20.0,
            &[stop(0.0, Rgba::rgb(0, 0, 0)), stop(1.0, Rgba::rgb(0, 0, 250))],
        );
        assert_eq!(gradient.sample(Vec2::new(3.0, 4.0)), Rgba::rgb(0, 0, 0));
        assert_eq!(gradient.sample(Vec2::new(15.0, 0.0)), Rgba::rgb(0, 0, 125));
    }

    #[test]
    fn two_circle_gradient_follows_the_moving_center() {
        let gradient = Gradient::two_circle(
            Vec2::new(0.0, 0.0),
            0.0,
            Vec2::new(0.0, 10.0),
            20.0,
            &[stop(0.0, Rgba::rgb(0, 0, 0)), stop(1.0, Rgba::rgb(0, 0, 200))],
        );
        assert_eq!(gradient.sample(Vec2::new(0.0, 30.0)), Rgba::rgb(0, 0, 200));
        assert_eq!(gradient.sample(Vec2::new(0.0, -10.0)), Rgba::rgb(0, 0, 200));
        assert_eq!(gradient.sample(Vec2::new(0.0, 15.0)), Rgba::rgb(0, 0, 100));
        assert_eq!(gradient.sample(Vec2::new(0.0, -5.0)), Rgba::rgb(0, 0, 100));
    }

    #[test]
    fn two_circle_gradient_leaves_uncovered_points_transparent() {
        let gradient = Gradient::two_circle(
            Vec2::new(0.0, 0.0),
            5.0,
            Vec2::new(40.0, 0.0),
            5.0,
            &[stop(0.0, Rgba::rgb(9, 9, 9)), stop(1.0, Rgba::rgb(9, 9, 9))],
        );
        assert_eq!(gradient.sample(Vec2::new(20.0, 3.0)), Rgba::rgb(9, 9, 9));
        assert_eq!(gradient.sample(Vec2::new(20.0, 30.0)), Rgba::TRANSPARENT);
    }

    #[test]
    fn degenerate_gradients_fall_back_to_first_stop() {
        let gradient = Gradient::linear(
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 1.0),
            &[stop(0.0, Rgba::rgb(9, 9, 9)), stop(1.0, Rgba::rgb(1, 1, 1))],
        );
        assert_eq!(gradient.sample(Vec2::new(4.0, 4.0)), Rgba::rgb(9, 9, 9));
        let empty = Gradient::linear(Vec2::ZERO, Vec2::new(1.0, 0.0), &[]);
        assert_eq!(empty.sample(Vec2::ZERO), Rgba::TRANSPARENT);
    }
}
