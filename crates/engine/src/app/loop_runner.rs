use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::sim::{Mode, Vec2};

use super::clock::DEFAULT_MAX_FRAME_DELTA;
use super::deck::WidgetDeck;
use super::metrics::MetricsAccumulator;
use super::widget::Widget;
use super::{
    Canvas, ControlKey, LoopMetricsSnapshot, MetricsHandle, Renderer, Rgba, SimCommand, TextAlign,
    Viewport,
};

const HUD_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);
const HUD_LINE_HEIGHT: f32 = 14.0;
const HUD_COLOR: Rgba = Rgba::new(238, 242, 255, 220);
const HUD_KEY_HINT: &str = "[tab] next [1] auto [2] manual";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Upper bound on the elapsed time a widget sees in one frame.
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
    pub show_hud: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Simulation Showcase".to_string(),
            window_width: 960,
            window_height: 540,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: Some(60),
            show_hud: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_showcase(config: LoopConfig, deck: WidgetDeck) -> Result<(), AppError> {
    let metrics_handle = MetricsHandle::default();
    run_showcase_with_metrics(config, deck, metrics_handle)
}

pub fn run_showcase_with_metrics(
    config: LoopConfig,
    mut deck: WidgetDeck,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, DEFAULT_MAX_FRAME_DELTA);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);

    let (physical_width, physical_height) = renderer.physical_size();
    let mut viewport = Viewport::from_physical(
        physical_width,
        physical_height,
        window.scale_factor() as f32,
    );
    deck.set_max_frame_delta(max_frame_delta);
    deck.resize_all(viewport);
    deck.start_active();

    info!(
        widget_count = deck.len(),
        active = deck.active().map(Widget::name).unwrap_or("none"),
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut hud_visible = config.show_hud;
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                        return;
                    }
                    if size.width > 0 && size.height > 0 {
                        viewport = Viewport::from_physical(
                            size.width,
                            size.height,
                            window.scale_factor() as f32,
                        );
                        deck.resize_all(viewport);
                    }
                }
                WindowEvent::Focused(false) => {
                    deck.push_active(SimCommand::Blur);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.set_cursor_position_px(position.x, position.y);
                }
                WindowEvent::CursorLeft { .. } => {
                    input_collector.clear_cursor_position();
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let pointer = input_collector.handle_mouse_input(button, state, &viewport);
                    if let Some(command) = pointer {
                        deck.push_active(command);
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    match input_collector.handle_key(event.physical_key, event.state) {
                        Some(HostAction::Forward(command)) => deck.push_active(command),
                        Some(HostAction::CycleWidget) => {
                            deck.cycle();
                        }
                        Some(HostAction::ToggleHud) => {
                            hud_visible = !hud_visible;
                            info!(hud_visible, "hud_toggled");
                        }
                        Some(HostAction::Quit) => {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                        None => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    // Single authoritative FPS cap sleep point for render pacing.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let now = Instant::now();
                    let metrics = metrics_handle.snapshot();
                    let mut canvas = renderer.canvas(viewport.pixel_ratio);
                    let Some(widget) = deck.active_mut() else {
                        return;
                    };
                    let timing = widget.frame(now, &mut canvas);
                    if hud_visible {
                        draw_hud(&mut canvas, &hud_lines(widget, &metrics));
                    }
                    let widget_name = widget.name();

                    if let Err(error) = renderer.present() {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();
                    metrics_accumulator.record_frame(timing);

                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        metrics_handle.publish(snapshot);
                        info!(
                            fps = snapshot.fps,
                            update_ms = snapshot.update_ms,
                            draw_ms = snapshot.draw_ms,
                            widget = widget_name,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                deck.shutdown_all();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// What a window event asks of the host loop.
#[derive(Debug, Clone, Copy, PartialEq)]
enum HostAction {
    Forward(SimCommand),
    CycleWidget,
    ToggleHud,
    Quit,
}

#[derive(Debug, Default)]
struct InputCollector {
    tab_is_down: bool,
    hud_toggle_is_down: bool,
    left_mouse_is_down: bool,
    cursor_position_px: Option<(f64, f64)>,
}

impl InputCollector {
    fn handle_key(&mut self, key: PhysicalKey, state: ElementState) -> Option<HostAction> {
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        let pressed = state == ElementState::Pressed;
        if let Some(control) = control_key_for(code) {
            return Some(HostAction::Forward(SimCommand::Key {
                key: control,
                pressed,
            }));
        }
        match code {
            KeyCode::Tab => {
                edge_pressed(&mut self.tab_is_down, pressed).then_some(HostAction::CycleWidget)
            }
            KeyCode::F3 => edge_pressed(&mut self.hud_toggle_is_down, pressed)
                .then_some(HostAction::ToggleHud),
            KeyCode::Digit1 if pressed => {
                Some(HostAction::Forward(SimCommand::SetMode(Mode::Auto)))
            }
            KeyCode::Digit2 if pressed => {
                Some(HostAction::Forward(SimCommand::SetMode(Mode::Manual)))
            }
            KeyCode::Escape if pressed => Some(HostAction::Quit),
            _ => None,
        }
    }

    fn set_cursor_position_px(&mut self, x: f64, y: f64) {
        self.cursor_position_px = Some((x, y));
    }

    fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }

    /// A fresh left press over the window becomes a pointer command in
    /// logical coordinates.
    fn handle_mouse_input(
        &mut self,
        button: MouseButton,
        state: ElementState,
        viewport: &Viewport,
    ) -> Option<SimCommand> {
        if button != MouseButton::Left {
            return None;
        }
        let pressed = edge_pressed(&mut self.left_mouse_is_down, state == ElementState::Pressed);
        if !pressed {
            return None;
        }
        let (x, y) = self.cursor_position_px?;
        Some(SimCommand::Pointer(viewport.physical_to_logical(x, y)))
    }
}

/// Tracks held state for `is_down` and reports only the press edge.
fn edge_pressed(is_down: &mut bool, pressed: bool) -> bool {
    let edge = pressed && !*is_down;
    *is_down = pressed;
    edge
}

fn control_key_for(code: KeyCode) -> Option<ControlKey> {
    match code {
        KeyCode::ArrowUp => Some(ControlKey::ArrowUp),
        KeyCode::ArrowDown => Some(ControlKey::ArrowDown),
        KeyCode::ArrowLeft => Some(ControlKey::ArrowLeft),
        KeyCode::ArrowRight => Some(ControlKey::ArrowRight),
        KeyCode::KeyW => Some(ControlKey::KeyW),
        KeyCode::KeyA => Some(ControlKey::KeyA),
        KeyCode::KeyS => Some(ControlKey::KeyS),
        KeyCode::KeyD => Some(ControlKey::KeyD),
        _ => None,
    }
}

fn hud_lines(widget: &Widget, metrics: &LoopMetricsSnapshot) -> Vec<String> {
    let mut lines = vec![widget.name().to_string()];
    lines.extend(widget.hud_lines());
    lines.push(HUD_KEY_HINT.to_string());
    lines.push(format!("fps {:.1}", metrics.fps));
    lines
}

fn draw_hud(canvas: &mut dyn Canvas, lines: &[String]) {
    for (index, line) in lines.iter().enumerate() {
        let anchor = HUD_ORIGIN + Vec2::new(0.0, index as f32 * HUD_LINE_HEIGHT);
        canvas.fill_text(anchor, line, HUD_COLOR, TextAlign::Left);
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::widget::tests::RecordingSim;
    use crate::app::{SharedText, TextSink};

    fn press(input: &mut InputCollector, code: KeyCode) -> Option<HostAction> {
        input.handle_key(PhysicalKey::Code(code), ElementState::Pressed)
    }

    fn release(input: &mut InputCollector, code: KeyCode) -> Option<HostAction> {
        input.handle_key(PhysicalKey::Code(code), ElementState::Released)
    }

    #[test]
    fn held_tab_does_not_spam_widget_cycles() {
        let mut input = InputCollector::default();

        assert_eq!(press(&mut input, KeyCode::Tab), Some(HostAction::CycleWidget));
        assert_eq!(press(&mut input, KeyCode::Tab), None);
        assert_eq!(release(&mut input, KeyCode::Tab), None);
        assert_eq!(press(&mut input, KeyCode::Tab), Some(HostAction::CycleWidget));
    }

    #[test]
    fn f3_toggle_is_edge_triggered() {
        let mut input = InputCollector::default();

        assert_eq!(press(&mut input, KeyCode::F3), Some(HostAction::ToggleHud));
        assert_eq!(press(&mut input, KeyCode::F3), None);
        release(&mut input, KeyCode::F3);
        assert_eq!(press(&mut input, KeyCode::F3), Some(HostAction::ToggleHud));
    }

    #[test]
    fn wasd_and_arrow_keys_forward_press_and_release() {
        let mut input = InputCollector::default();

        assert_eq!(
            press(&mut input, KeyCode::KeyW),
            Some(HostAction::Forward(SimCommand::Key {
                key: ControlKey::KeyW,
                pressed: true
            }))
        );
        assert_eq!(
            release(&mut input, KeyCode::ArrowLeft),
            Some(HostAction::Forward(SimCommand::Key {
                key: ControlKey::ArrowLeft,
                pressed: false
            }))
        );
    }

    #[test]
    fn digit_keys_request_modes_and_escape_quits() {
        let mut input = InputCollector::default();

        assert_eq!(
            press(&mut input, KeyCode::Digit1),
            Some(HostAction::Forward(SimCommand::SetMode(Mode::Auto)))
        );
        assert_eq!(
            press(&mut input, KeyCode::Digit2),
            Some(HostAction::Forward(SimCommand::SetMode(Mode::Manual)))
        );
        assert_eq!(release(&mut input, KeyCode::Digit2), None);
        assert_eq!(press(&mut input, KeyCode::Escape), Some(HostAction::Quit));
        assert_eq!(press(&mut input, KeyCode::KeyQ), None);
    }

    #[test]
    fn left_click_maps_cursor_to_logical_pointer_once() {
        let mut input = InputCollector::default();
        let viewport = Viewport::from_physical(800, 600, 2.0);
        input.set_cursor_position_px(120.0, 80.0);

        let first = input.handle_mouse_input(MouseButton::Left, ElementState::Pressed, &viewport);
        let held = input.handle_mouse_input(MouseButton::Left, ElementState::Pressed, &viewport);

        assert_eq!(first, Some(SimCommand::Pointer(Vec2::new(60.0, 40.0))));
        assert_eq!(held, None);
    }

    #[test]
    fn click_without_cursor_or_with_other_button_is_ignored() {
        let mut input = InputCollector::default();
        let viewport = Viewport::new(100.0, 100.0, 1.0);

        assert_eq!(
            input.handle_mouse_input(MouseButton::Left, ElementState::Pressed, &viewport),
            None
        );
        input.set_cursor_position_px(5.0, 5.0);
        assert_eq!(
            input.handle_mouse_input(MouseButton::Right, ElementState::Pressed, &viewport),
            None
        );
        input.clear_cursor_position();
        input.handle_mouse_input(MouseButton::Left, ElementState::Released, &viewport);
        assert_eq!(
            input.handle_mouse_input(MouseButton::Left, ElementState::Pressed, &viewport),
            None
        );
    }

    #[test]
    fn hud_lists_name_captions_hint_and_fps() {
        let (sim, _log) = RecordingSim::new("orbit");
        let mut score = SharedText::default();
        score.set_text("30");
        let widget = Widget::create(Box::new(sim))
            .with_caption("Score:", score);
        let metrics = LoopMetricsSnapshot {
            fps: 59.94,
            update_ms: 0.1,
            draw_ms: 2.0,
        };

        assert_eq!(
            hud_lines(&widget, &metrics),
            vec![
                "orbit".to_string(),
                "Score: 30".to_string(),
                HUD_KEY_HINT.to_string(),
                "fps 59.9".to_string(),
            ]
        );
    }

    #[test]
    fn target_frame_duration_none_when_cap_off() {
        assert_eq!(target_frame_duration(None), None);
    }

    #[test]
    fn target_frame_duration_for_60hz_is_expected() {
        let duration = target_frame_duration(Some(60)).expect("duration");
        assert!((duration.as_secs_f64() - (1.0 / 60.0)).abs() < 0.000_001);
    }

    #[test]
    fn compute_cap_sleep_zero_when_over_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(20), target_frame_duration(Some(60)));
        assert_eq!(sleep, Duration::ZERO);
    }

    #[test]
    fn compute_cap_sleep_positive_when_under_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(5), target_frame_duration(Some(60)));
        assert!(sleep > Duration::ZERO);
    }

    #[test]
    fn normalize_render_fps_cap_disables_zero() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(60)), Some(60));
    }

    #[test]
    fn zero_durations_fall_back() {
        assert_eq!(
            normalize_non_zero_duration(Duration::ZERO, Duration::from_secs(1)),
            Duration::from_secs(1)
        );
        assert_eq!(format_render_cap(None), "off");
    }
}
