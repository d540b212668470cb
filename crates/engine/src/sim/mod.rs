mod config;
mod flow;
mod geometry;
mod mode;
mod orbit;
mod score;
mod seeking;
mod selector;
mod spark;
mod still;
mod trail;

use crate::app::{Canvas, SimCommand, Viewport};

pub use config::{
    ConfigError, DifficultyRamp, FlowConfig, FlowNodeSpec, ManualConfig, SeekConfig,
    SparkleConfig, TrailConfig,
};
pub use flow::{FlowNode, NetworkFlowSim, Packet};
pub use geometry::{Bounds, Vec2};
pub use mode::{Mode, ModeIndicator, UnknownMode, STATIC_VIEW_LABEL};
pub use orbit::{DualModeAgentSim, OrbitRenderer, Star};
pub use score::ScoreTracker;
pub use seeking::{Agent, Capture, SeekingFrame, SeekingRenderer, SeekingSim, Sparkle, Target};
pub use selector::nearest_index;
pub use spark::{SeekingAgentSim, SparkRenderer};
pub use still::StillFrame;
pub use trail::{TrailBuffer, TrailNode};

/// A frame-driven visual simulation hosted by a [`crate::app::Widget`].
///
/// The host drains queued [`SimCommand`]s through `apply`, then calls `update`
/// with the elapsed seconds, then `draw`. Resizes arrive through `resize` after
/// the viewport has been recomputed.
pub trait Simulation {
    fn name(&self) -> &'static str;

    fn resize(&mut self, viewport: &Viewport);

    fn apply(&mut self, command: SimCommand);

    /// Advances the simulation by `dt` seconds. Non-positive or non-finite
    /// values do nothing.
    fn update(&mut self, dt: f32);

    fn draw(&self, canvas: &mut dyn Canvas);

    /// Whether the widget should run its frame clock. Static frames return false.
    fn animates(&self) -> bool {
        true
    }
}

pub(crate) fn is_usable_dt(dt: f32) -> bool {
    dt.is_finite() && dt > 0.0
}
