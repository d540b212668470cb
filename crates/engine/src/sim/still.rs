use crate::app::{stop, Canvas, Gradient, Rgba, SimCommand, Viewport, SURFACE_BACKDROP};

use super::{Simulation, Vec2};

/// Motion-free stand-in for a seeking widget: a single diagonal gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StillFrame {
    name: &'static str,
    from: Rgba,
    to: Rgba,
}

impl StillFrame {
    pub const fn new(name: &'static str, from: Rgba, to: Rgba) -> Self {
        Self { name, from, to }
    }

    pub const fn spark() -> Self {
        Self::new(
            "spark",
            Rgba::new(59, 130, 246, 77),
            Rgba::new(20, 184, 166, 64),
        )
    }

    pub const fn orbit() -> Self {
        Self::new(
            "orbit",
            Rgba::new(59, 130, 246, 102),
            Rgba::new(20, 184, 166, 64),
        )
    }
}

impl Simulation for StillFrame {
    fn name(&self) -> &'static str {
        self.name
    }

    fn resize(&mut self, _viewport: &Viewport) {}

    fn apply(&mut self, _command: SimCommand) {}

    fn update(&mut self, _dt: f32) {}

    fn draw(&self, canvas: &mut dyn Canvas) {
        let (width, height) = canvas.size();
        canvas.clear(SURFACE_BACKDROP);
        canvas.fill_gradient(&Gradient::linear(
            Vec2::ZERO,
            Vec2::new(width, height),
            &[stop(0.0, self.from), stop(1.0, self.to)],
        ));
    }

    fn animates(&self) -> bool {
        false
    }
}
