use rand::rngs::StdRng;
use rand::Rng;

use crate::app::{stop, Canvas, Gradient, Rgba, Stroke, TextSink, SURFACE_BACKDROP};

use super::{
    Bounds, ConfigError, ModeIndicator, SeekConfig, SeekingFrame, SeekingRenderer, SeekingSim,
    Vec2,
};

/// Agent that flies itself or follows keys and clicks, collecting pulsing rings
/// while the autonomous speed ramps up.
pub type DualModeAgentSim = SeekingSim<OrbitRenderer>;

const ORBIT_RADII: [f32; 3] = [80.0, 120.0, 160.0];
const ORBIT_COLOR: Rgba = Rgba::new(148, 163, 255, 26);
const RING_STROKE: Rgba = Rgba::new(56, 189, 248, 153);
const RING_FILL: Rgba = Rgba::new(59, 130, 246, 179);
const TRAIL_RGB: Rgba = Rgba::rgb(139, 92, 246);
const HERO_COLOR: Rgba = Rgba::new(236, 72, 153, 235);
const HERO_DOT_COLOR: Rgba = Rgba::new(255, 255, 255, 217);

const HERO_SHAPE: [Vec2; 4] = [
    Vec2::new(12.0, 0.0),
    Vec2::new(-10.0, 6.0),
    Vec2::new(-6.0, 0.0),
    Vec2::new(-10.0, -6.0),
];

/// Background star with position normalized to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub twinkle: f32,
}

impl Star {
    fn random(rng: &mut StdRng) -> Self {
        Self {
            x: rng.gen(),
            y: rng.gen(),
            radius: rng.gen::<f32>() * 1.4 + 0.2,
            twinkle: rng.gen::<f32>() * 0.6 + 0.2,
        }
    }

    /// Opacity at `elapsed` seconds.
    pub fn alpha(&self, elapsed: f32) -> f32 {
        0.4 + (self.twinkle + elapsed * 1.5).sin().abs() * 0.4
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrbitRenderer {
    star_count: usize,
    stars: Vec<Star>,
}

impl OrbitRenderer {
    pub fn new(star_count: usize) -> Self {
        Self {
            star_count,
            stars: Vec::with_capacity(star_count),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}

impl DualModeAgentSim {
    pub fn orbit(
        config: SeekConfig,
        score_sink: Option<Box<dyn TextSink>>,
        indicator: ModeIndicator,
    ) -> Result<Self, ConfigError> {
        let renderer = OrbitRenderer::new(config.star_count);
        Ok(SeekingSim::new(config, renderer, score_sink)?.with_mode_indicator(indicator))
    }
}

impl SeekingRenderer for OrbitRenderer {
    fn name(&self) -> &'static str {
        "orbit"
    }

    fn resize(&mut self, _bounds: Bounds, rng: &mut StdRng) {
        // Normalized coordinates: generated once, kept across resizes.
        while self.stars.len() < self.star_count {
            self.stars.push(Star::random(rng));
        }
    }

    fn draw(&self, frame: &SeekingFrame<'_>, canvas: &mut dyn Canvas) {
        let (width, height) = canvas.size();
        canvas.clear(SURFACE_BACKDROP);
        canvas.fill_gradient(&Gradient::two_circle(
            Vec2::new(width * 0.5, height * 0.25),
            width * 0.1,
            Vec2::new(width * 0.5, height * 0.5),
            width * 0.8,
            &[
                stop(0.0, Rgba::new(59, 130, 246, 64)),
                stop(0.6, Rgba::new(20, 184, 166, 31)),
                stop(1.0, Rgba::new(11, 16, 32, 230)),
            ],
        ));

        for star in &self.stars {
            canvas.fill_circle(
                Vec2::new(star.x * width, star.y * height),
                star.radius,
                Rgba::rgb(255, 255, 255).with_alpha(star.alpha(frame.elapsed)),
            );
        }

        let center = Vec2::new(width / 2.0, height / 2.0);
        for (index, radius) in ORBIT_RADII.iter().enumerate() {
            let gap = 6.0 + index as f32 * 2.0;
            canvas.stroke_circle(center, *radius, Stroke::dashed(1.0, ORBIT_COLOR, [4.0, gap]));
        }

        for ring in frame.targets {
            let pulse = ((ring.pulse * 3.0).sin() + 1.0) * 0.5;
            canvas.stroke_circle(
                ring.position,
                10.0 + pulse * 6.0,
                Stroke::solid(2.0, RING_STROKE),
            );
            canvas.fill_circle(ring.position, 4.0 + pulse * 2.0, RING_FILL);
        }

        let trail_len = frame.trail.len() as f32;
        for (index, node) in frame.trail.iter().enumerate() {
            let opacity = index as f32 / trail_len * 0.6;
            canvas.fill_circle(node.position, 6.0 * node.life, TRAIL_RGB.with_alpha(opacity));
        }

        let hero = frame.agent;
        let hull: Vec<Vec2> = HERO_SHAPE
            .iter()
            .map(|point| hero.position + point.rotated(hero.heading))
            .collect();
        canvas.fill_polygon(&hull, HERO_COLOR);
        canvas.fill_circle(
            hero.position + Vec2::new(2.0, 0.0).rotated(hero.heading),
            2.2,
            HERO_DOT_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{SharedModeButton, SharedText, Viewport};
    use crate::sim::Mode;

    #[test]
    fn stars_are_created_once_on_first_resize() {
        let config = SeekConfig::orbit().with_seed(9);
        let mut sim =
            DualModeAgentSim::orbit(config, None, ModeIndicator::default()).expect("valid");
        assert!(sim.renderer().stars().is_empty());

        sim.resize(&Viewport::new(320.0, 200.0, 1.0));
        let first: Vec<Star> = sim.renderer().stars().to_vec();
        assert_eq!(first.len(), 38);

        sim.resize(&Viewport::new(640.0, 400.0, 1.0));
        assert_eq!(sim.renderer().stars(), first.as_slice());
    }

    #[test]
    fn star_alpha_stays_in_range() {
        let star = Star {
            x: 0.5,
            y: 0.5,
            radius: 1.0,
            twinkle: 0.3,
        };
        for step in 0..100 {
            let alpha = star.alpha(step as f32 * 0.37);
            assert!((0.4..=0.8).contains(&alpha));
        }
    }

    #[test]
    fn construction_shows_auto_on_indicator() {
        let label = SharedText::default();
        let auto = SharedModeButton::new(Some(Mode::Auto));
        let manual = SharedModeButton::new(Some(Mode::Manual));
        let indicator = ModeIndicator::new(
            Some(Box::new(label.clone())),
            vec![Box::new(auto.clone()), Box::new(manual.clone())],
        );
        let mut sim = DualModeAgentSim::orbit(SeekConfig::orbit().with_seed(2), None, indicator)
            .expect("valid");
        assert_eq!(label.get(), "Auto pilot");
        assert!(auto.is_pressed());

        sim.set_mode(Mode::Manual);
        assert_eq!(label.get(), "Manual pilot");
        assert!(manual.is_pressed());
        assert!(!auto.is_pressed());
    }
}
