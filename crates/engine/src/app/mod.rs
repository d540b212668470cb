mod clock;
mod deck;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod sinks;
mod viewport;
mod widget;

pub use clock::{FrameClock, RunHandle, DEFAULT_MAX_FRAME_DELTA};
pub use deck::WidgetDeck;
pub use input::{ControlKey, HeldKeys, InputRouter, SimCommand};
pub use loop_runner::{run_showcase, run_showcase_with_metrics, AppError, LoopConfig};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{
    stop, Canvas, ColorStop, Gradient, GradientShape, PixelCanvas, Renderer, Rgba, Stroke,
    TextAlign, Viewport, SURFACE_BACKDROP,
};
pub use sinks::{ModeControl, SharedModeButton, SharedText, TextSink};
pub use viewport::ViewportAdapter;
pub use widget::{FrameTiming, Widget};
