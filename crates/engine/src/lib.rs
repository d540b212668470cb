pub mod app;
pub mod sim;

pub use app::{
    run_showcase, run_showcase_with_metrics, AppError, Canvas, ControlKey, FrameClock,
    FrameTiming, InputRouter, LoopConfig, LoopMetricsSnapshot, MetricsHandle, ModeControl,
    PixelCanvas, Rgba, RunHandle, SharedModeButton, SharedText, SimCommand, TextSink, Viewport,
    ViewportAdapter, Widget, WidgetDeck,
};
pub use sim::{
    Bounds, ConfigError, DualModeAgentSim, FlowConfig, Mode, ModeIndicator, NetworkFlowSim,
    SeekConfig, SeekingAgentSim, Simulation, StillFrame, Vec2,
};
