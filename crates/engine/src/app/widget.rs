use std::time::{Duration, Instant};

use tracing::info;

use crate::sim::Simulation;

use super::clock::{FrameClock, RunHandle, DEFAULT_MAX_FRAME_DELTA};
use super::sinks::SharedText;
use super::viewport::ViewportAdapter;
use super::{Canvas, InputRouter, SimCommand, Viewport};

/// Time spent in one widget frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    pub update: Duration,
    pub draw: Duration,
    pub updated: bool,
}

/// A simulation bound to its own frame clock, command queue and viewport.
///
/// Widgets are created idle. [`Widget::start`] begins ticking; a stopped
/// widget still applies queued commands and draws, but never updates.
pub struct Widget {
    sim: Box<dyn Simulation>,
    clock: FrameClock,
    input: InputRouter,
    viewport: ViewportAdapter,
    captions: Vec<(&'static str, SharedText)>,
}

impl Widget {
    pub fn create(sim: Box<dyn Simulation>) -> Self {
        Self {
            sim,
            clock: FrameClock::new(DEFAULT_MAX_FRAME_DELTA),
            input: InputRouter::new(),
            viewport: ViewportAdapter::default(),
            captions: Vec::new(),
        }
    }

    /// Adds a HUD line showing `text` after `prefix`.
    pub fn with_caption(mut self, prefix: &'static str, text: SharedText) -> Self {
        self.captions.push((prefix, text));
        self
    }

    pub fn name(&self) -> &'static str {
        self.sim.name()
    }

    pub fn input(&mut self) -> &mut InputRouter {
        &mut self.input
    }

    pub fn push(&mut self, command: SimCommand) {
        self.input.push(command);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn set_max_frame_delta(&mut self, max_frame_delta: Duration) {
        self.clock.set_max_frame_delta(max_frame_delta);
    }

    /// Starts the frame clock. Simulations that do not animate stay idle and
    /// return `None`.
    pub fn start(&mut self) -> Option<RunHandle> {
        if !self.sim.animates() {
            return None;
        }
        let handle = self.clock.start();
        info!(widget = self.name(), "widget_started");
        Some(handle)
    }

    pub fn stop(&mut self) {
        if self.clock.is_running() {
            self.clock.stop();
            info!(widget = self.name(), "widget_stopped");
        }
    }

    /// Drains queued commands, advances the simulation if running, then draws.
    pub fn frame(&mut self, now: Instant, canvas: &mut dyn Canvas) -> FrameTiming {
        let commands: Vec<SimCommand> = self.input.drain().collect();
        for command in commands {
            match command {
                SimCommand::Resize {
                    width,
                    height,
                    pixel_ratio,
                } => {
                    let viewport = self.viewport.resize(width, height, pixel_ratio);
                    self.sim.resize(&viewport);
                    info!(
                        widget = self.name(),
                        width = viewport.width,
                        height = viewport.height,
                        pixel_ratio = viewport.pixel_ratio,
                        "viewport_resized"
                    );
                }
                other => self.sim.apply(other),
            }
        }

        let mut timing = FrameTiming::default();
        if let Some(dt) = self.clock.tick(now) {
            let update_start = Instant::now();
            self.sim.update(dt);
            timing.update = update_start.elapsed();
            timing.updated = true;
        }

        let draw_start = Instant::now();
        self.sim.draw(canvas);
        timing.draw = draw_start.elapsed();
        timing
    }

    pub fn hud_lines(&self) -> Vec<String> {
        self.captions
            .iter()
            .filter_map(|(prefix, text)| {
                let value = text.get();
                (!value.is_empty()).then(|| format!("{prefix} {value}"))
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::app::{PixelCanvas, Rgba, TextSink};

    #[derive(Debug, Default)]
    pub(crate) struct Recorded {
        pub(crate) updates: Vec<f32>,
        pub(crate) applied: Vec<SimCommand>,
        pub(crate) resizes: Vec<Viewport>,
        pub(crate) draws: usize,
    }

    pub(crate) struct RecordingSim {
        pub(crate) name: &'static str,
        pub(crate) animates: bool,
        pub(crate) log: Rc<RefCell<Recorded>>,
    }

    impl RecordingSim {
        pub(crate) fn new(name: &'static str) -> (Self, Rc<RefCell<Recorded>>) {
            let log = Rc::new(RefCell::new(Recorded::default()));
            let sim = Self {
                name,
                animates: true,
                log: Rc::clone(&log),
            };
            (sim, log)
        }
    }

    impl Simulation for RecordingSim {
        fn name(&self) -> &'static str {
            self.name
        }

        fn resize(&mut self, viewport: &Viewport) {
            self.log.borrow_mut().resizes.push(*viewport);
        }

        fn apply(&mut self, command: SimCommand) {
            self.log.borrow_mut().applied.push(command);
        }

        fn update(&mut self, dt: f32) {
            self.log.borrow_mut().updates.push(dt);
        }

        fn draw(&self, canvas: &mut dyn Canvas) {
            canvas.clear(Rgba::rgb(1, 2, 3));
            self.log.borrow_mut().draws += 1;
        }

        fn animates(&self) -> bool {
            self.animates
        }
    }

    fn draw_frame(widget: &mut Widget, now: Instant) -> FrameTiming {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 4, 4, 1.0);
        widget.frame(now, &mut canvas)
    }

    #[test]
    fn created_widget_is_idle_but_draws() {
        let (sim, log) = RecordingSim::new("probe");
        let mut widget = Widget::create(Box::new(sim));

        let timing = draw_frame(&mut widget, Instant::now());

        assert!(!timing.updated);
        assert!(log.borrow().updates.is_empty());
        assert_eq!(log.borrow().draws, 1);
    }

    #[test]
    fn started_widget_updates_with_clock_elapsed() {
        let (sim, log) = RecordingSim::new("probe");
        let mut widget = Widget::create(Box::new(sim));
        let base = Instant::now();

        let handle = widget.start().expect("animated widget starts");
        draw_frame(&mut widget, base);
        draw_frame(&mut widget, base + Duration::from_millis(50));
        handle.stop();
        draw_frame(&mut widget, base + Duration::from_millis(100));

        let updates = log.borrow().updates.clone();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0], 0.0);
        assert!((updates[1] - 0.05).abs() < 1e-6);
        assert!(!widget.is_running());
    }

    #[test]
    fn static_simulation_never_starts() {
        let (mut sim, _log) = RecordingSim::new("still");
        sim.animates = false;
        let mut widget = Widget::create(Box::new(sim));
        assert!(widget.start().is_none());
        assert!(!widget.is_running());
    }

    #[test]
    fn resize_goes_through_adapter_and_other_commands_reach_sim() {
        let (sim, log) = RecordingSim::new("probe");
        let mut widget = Widget::create(Box::new(sim));
        widget.push(SimCommand::Blur);
        widget.push(SimCommand::Resize {
            width: 200.0,
            height: 100.0,
            pixel_ratio: -1.0,
        });

        draw_frame(&mut widget, Instant::now());

        let recorded = log.borrow();
        assert_eq!(recorded.applied, vec![SimCommand::Blur]);
        assert_eq!(recorded.resizes, vec![Viewport::new(200.0, 100.0, 1.0)]);
        assert_eq!(widget.viewport(), Viewport::new(200.0, 100.0, 1.0));
        assert_eq!(widget.input().pending(), 0);
    }

    #[test]
    fn hud_lines_skip_empty_captions() {
        let (sim, _log) = RecordingSim::new("probe");
        let score = SharedText::default();
        let mode = SharedText::default();
        let widget = Widget::create(Box::new(sim))
            .with_caption("score", score.clone())
            .with_caption("mode", mode);

        assert!(widget.hud_lines().is_empty());
        score.clone().set_text("14");
        assert_eq!(widget.hud_lines(), vec!["score 14".to_string()]);
    }
}
