use crate::app::{stop, Canvas, Gradient, Rgba, Stroke, TextSink, SURFACE_BACKDROP};

use super::{ConfigError, SeekConfig, SeekingFrame, SeekingRenderer, SeekingSim, Vec2};

/// Single autonomous agent hopping between six targets, with sparkles on capture.
pub type SeekingAgentSim = SeekingSim<SparkRenderer>;

const GRID_SPACING: f32 = 32.0;
const GRID_COLOR: Rgba = Rgba::new(148, 163, 255, 20);
const TARGET_COLOR: Rgba = Rgba::new(59, 130, 246, 128);
const ACTIVE_TARGET_COLOR: Rgba = Rgba::new(20, 184, 166, 191);
const ACTIVE_RING_COLOR: Rgba = Rgba::new(20, 184, 166, 128);
const TRAIL_RGB: Rgba = Rgba::rgb(139, 92, 246);
const AGENT_COLOR: Rgba = Rgba::new(236, 72, 153, 230);
const AGENT_DOT_COLOR: Rgba = Rgba::new(255, 255, 255, 217);
const SPARKLE_RGB: Rgba = Rgba::rgb(56, 189, 248);

const AGENT_SHAPE: [Vec2; 3] = [
    Vec2::new(10.0, 0.0),
    Vec2::new(-6.0, 6.0),
    Vec2::new(-6.0, -6.0),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SparkRenderer;

impl SeekingAgentSim {
    pub fn spark(
        config: SeekConfig,
        score_sink: Option<Box<dyn TextSink>>,
    ) -> Result<Self, ConfigError> {
        SeekingSim::new(config, SparkRenderer, score_sink)
    }
}

impl SeekingRenderer for SparkRenderer {
    fn name(&self) -> &'static str {
        "spark"
    }

    fn draw(&self, frame: &SeekingFrame<'_>, canvas: &mut dyn Canvas) {
        let (width, height) = canvas.size();
        canvas.clear(SURFACE_BACKDROP);
        canvas.fill_gradient(&Gradient::linear(
            Vec2::ZERO,
            Vec2::new(width, height),
            &[
                stop(0.0, Rgba::new(59, 130, 246, 64)),
                stop(1.0, Rgba::new(14, 116, 144, 89)),
            ],
        ));
        draw_grid(canvas, width, height, GRID_SPACING, GRID_COLOR);

        for (index, target) in frame.targets.iter().enumerate() {
            if frame.active == Some(index) {
                canvas.fill_circle(target.position, 7.0, ACTIVE_TARGET_COLOR);
                canvas.stroke_circle(
                    target.position,
                    13.0,
                    Stroke::solid(2.0, ACTIVE_RING_COLOR),
                );
            } else {
                canvas.fill_circle(target.position, 5.0, TARGET_COLOR);
            }
        }

        let trail_len = frame.trail.len() as f32;
        for (index, node) in frame.trail.iter().enumerate() {
            let opacity = index as f32 / trail_len * 0.5;
            canvas.fill_circle(node.position, 5.0 * node.life, TRAIL_RGB.with_alpha(opacity));
        }

        let agent = frame.agent;
        let hull: Vec<Vec2> = AGENT_SHAPE
            .iter()
            .map(|point| agent.position + point.rotated(agent.heading))
            .collect();
        canvas.fill_polygon(&hull, AGENT_COLOR);
        canvas.fill_circle(
            agent.position + Vec2::new(3.0, 0.0).rotated(agent.heading),
            2.0,
            AGENT_DOT_COLOR,
        );

        for sparkle in frame.sparkles {
            canvas.stroke_circle(
                sparkle.position,
                sparkle.radius,
                Stroke::solid(1.5, SPARKLE_RGB.with_alpha(sparkle.life)),
            );
        }
    }
}

/// Evenly spaced hairlines offset by half a cell, shared by the grid backdrops.
pub(crate) fn draw_grid(
    canvas: &mut dyn Canvas,
    width: f32,
    height: f32,
    spacing: f32,
    color: Rgba,
) {
    let mut x = spacing / 2.0;
    while x < width {
        canvas.stroke_line(Vec2::new(x, 0.0), Vec2::new(x, height), 1.0, color, color);
        x += spacing;
    }
    let mut y = spacing / 2.0;
    while y < height {
        canvas.stroke_line(Vec2::new(0.0, y), Vec2::new(width, y), 1.0, color, color);
        y += spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{PixelCanvas, Viewport};
    use crate::sim::Simulation;

    #[test]
    fn spark_preset_drives_the_simulation() {
        let sim = SeekingAgentSim::spark(SeekConfig::spark().with_seed(1), None).expect("valid");
        assert_eq!(sim.name(), "spark");
        assert_eq!(sim.config().reward, 7);
    }

    #[test]
    fn draw_marks_agent_pixels() {
        let mut sim =
            SeekingAgentSim::spark(SeekConfig::spark().with_seed(3), None).expect("valid");
        sim.resize(&Viewport::new(64.0, 48.0, 1.0));
        let mut frame = vec![0u8; 64 * 48 * 4];
        {
            let mut canvas = PixelCanvas::new(&mut frame, 64, 48, 1.0);
            Simulation::draw(&sim, &mut canvas);
        }
        let center = ((24 * 64 + 32) * 4) as usize;
        assert!(frame[center] > 150, "agent body is pink at the center");
        assert!(frame.chunks_exact(4).all(|px| px[3] > 0));
    }
}
