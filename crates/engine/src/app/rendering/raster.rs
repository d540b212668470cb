use crate::sim::Vec2;

use super::canvas::{Canvas, Gradient, Rgba, Stroke, TextAlign};
use super::text::{glyph_for, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::transform::sanitize_pixel_ratio;

/// Logical size of one font cell edge before the pixel-ratio scale.
const TEXT_CELL_LOGICAL: f32 = 2.0;
const TEXT_TRACKING_CELLS: i32 = 1;
const MIN_STROKE_PX: f32 = 1.0;

/// Software rasterizer over an RGBA8 frame. Logical coordinates are multiplied by
/// `scale` (the viewport pixel ratio) before hitting the frame.
pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    scale: f32,
}

impl<'a> PixelCanvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            frame,
            width,
            height,
            scale: sanitize_pixel_ratio(pixel_ratio),
        }
    }

    fn to_px(&self, point: Vec2) -> Vec2 {
        point * self.scale
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgba) {
        blend_pixel_clipped(self.frame, self.width, self.height, x, y, color);
    }

    /// Inclusive-exclusive pixel rows/cols overlapping the physical box.
    fn pixel_span(&self, min: Vec2, max: Vec2) -> Option<(i32, i32, i32, i32)> {
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        let left = (min.x.floor() as i32).max(0);
        let top = (min.y.floor() as i32).max(0);
        let right = (max.x.ceil() as i32).min(self.width as i32);
        let bottom = (max.y.ceil() as i32).min(self.height as i32);
        if left >= right || top >= bottom {
            return None;
        }
        Some((left, top, right, bottom))
    }

    fn text_width_px(&self, text: &str) -> f32 {
        let cell = self.text_cell_px() as f32;
        let count = text.chars().count() as f32;
        if count == 0.0 {
            return 0.0;
        }
        count * (GLYPH_WIDTH + TEXT_TRACKING_CELLS) as f32 * cell - TEXT_TRACKING_CELLS as f32 * cell
    }

    fn text_cell_px(&self) -> i32 {
        (TEXT_CELL_LOGICAL * self.scale).round().max(1.0) as i32
    }
}

impl Canvas for PixelCanvas<'_> {
    fn size(&self) -> (f32, f32) {
        (
            self.width as f32 / self.scale,
            self.height as f32 / self.scale,
        )
    }

    fn clear(&mut self, color: Rgba) {
        let bytes = [color.r, color.g, color.b, color.a];
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&bytes);
        }
    }

    fn fill_gradient(&mut self, gradient: &Gradient) {
        let inv_scale = self.scale.recip();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let logical = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * inv_scale;
                let color = gradient.sample(logical);
                self.blend(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(radius > 0.0) || color.a == 0 {
            return;
        }
        let center = self.to_px(center);
        let radius = radius * self.scale;
        let extent = Vec2::new(radius, radius);
        let Some((left, top, right, bottom)) = self.pixel_span(center - extent, center + extent)
        else {
            return;
        };
        let radius_sq = radius * radius;
        for y in top..bottom {
            for x in left..right {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= radius_sq {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke) {
        if !(radius > 0.0) || stroke.color.a == 0 {
            return;
        }
        let center_px = self.to_px(center);
        let radius_px = radius * self.scale;
        let half_width = (stroke.width * self.scale).max(MIN_STROKE_PX) * 0.5;
        let outer = radius_px + half_width;
        let extent = Vec2::new(outer, outer);
        let Some((left, top, right, bottom)) =
            self.pixel_span(center_px - extent, center_px + extent)
        else {
            return;
        };
        let dash = stroke.dash.filter(|[on, off]| *on > 0.0 && *off >= 0.0);
        for y in top..bottom {
            for x in left..right {
                let offset = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center_px;
                if (offset.length() - radius_px).abs() > half_width {
                    continue;
                }
                if let Some([on, off]) = dash {
                    let angle = offset.angle().rem_euclid(std::f32::consts::TAU);
                    let arc_length = angle * radius;
                    if arc_length.rem_euclid(on + off) >= on {
                        continue;
                    }
                }
                self.blend(x, y, stroke.color);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, start: Rgba, end: Rgba) {
        if start.a == 0 && end.a == 0 {
            return;
        }
        let a = self.to_px(from);
        let b = self.to_px(to);
        let half_width = (width * self.scale).max(MIN_STROKE_PX) * 0.5;
        let min = Vec2::new(a.x.min(b.x) - half_width, a.y.min(b.y) - half_width);
        let max = Vec2::new(a.x.max(b.x) + half_width, a.y.max(b.y) + half_width);
        let Some((left, top, right, bottom)) = self.pixel_span(min, max) else {
            return;
        };
        let axis = b - a;
        let length_sq = axis.x * axis.x + axis.y * axis.y;
        for y in top..bottom {
            for x in left..right {
                let point = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let offset = point - a;
                let t = if length_sq > 0.0 {
                    ((offset.x * axis.x + offset.y * axis.y) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let nearest = a + axis * t;
                if point.distance(nearest) <= half_width {
                    self.blend(x, y, start.lerp(end, t));
                }
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 || color.a == 0 {
            return;
        }
        let physical: Vec<Vec2> = points.iter().map(|point| self.to_px(*point)).collect();
        let mut min = physical[0];
        let mut max = physical[0];
        for point in &physical[1..] {
            min = Vec2::new(min.x.min(point.x), min.y.min(point.y));
            max = Vec2::new(max.x.max(point.x), max.y.max(point.y));
        }
        let Some((left, top, right, bottom)) = self.pixel_span(min, max) else {
            return;
        };
        for y in top..bottom {
            for x in left..right {
                if contains_even_odd(&physical, Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn fill_text(&mut self, anchor: Vec2, text: &str, color: Rgba, align: TextAlign) {
        if text.is_empty() || color.a == 0 {
            return;
        }
        let anchor = self.to_px(anchor);
        if !anchor.is_finite() {
            return;
        }
        let cell = self.text_cell_px();
        let start_x = match align {
            TextAlign::Left => anchor.x,
            TextAlign::Center => anchor.x - self.text_width_px(text) * 0.5,
        };
        let mut glyph_x = start_x.round() as i32;
        let glyph_y = anchor.y.round() as i32;
        for ch in text.chars() {
            let glyph = glyph_for(ch);
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if !glyph.is_set(col, row) {
                        continue;
                    }
                    for sy in 0..cell {
                        for sx in 0..cell {
                            self.blend(glyph_x + col * cell + sx, glyph_y + row * cell + sy, color);
                        }
                    }
                }
            }
            glyph_x += (GLYPH_WIDTH + TEXT_TRACKING_CELLS) * cell;
        }
    }
}

fn contains_even_odd(polygon: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    let mut previous = polygon[polygon.len() - 1];
    for current in polygon {
        if (current.y > point.y) != (previous.y > point.y) {
            let crossing_x = (previous.x - current.x) * (point.y - current.y)
                / (previous.y - current.y)
                + current.x;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
        previous = *current;
    }
    inside
}

fn blend_pixel_clipped(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: Rgba) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 || color.a == 0 {
        return;
    }
    let Some(byte_offset) = (y as usize)
        .checked_mul(width as usize)
        .and_then(|row| row.checked_add(x as usize))
        .and_then(|pixel| pixel.checked_mul(4))
    else {
        return;
    };
    let Some(pixel) = frame.get_mut(byte_offset..byte_offset + 4) else {
        return;
    };
    if color.a == 255 {
        pixel.copy_from_slice(&[color.r, color.g, color.b, 255]);
        return;
    }
    let alpha = color.a as f32 / 255.0;
    let mix = |dst: u8, src: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8;
    pixel[0] = mix(pixel[0], color.r);
    pixel[1] = mix(pixel[1], color.g);
    pixel[2] = mix(pixel[2], color.b);
    pixel[3] = (color.a as f32 + pixel[3] as f32 * (1.0 - alpha)).round().min(255.0) as u8;
}
