use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::app::{Canvas, ControlKey, HeldKeys, SimCommand, TextSink, Viewport};

use super::{
    is_usable_dt, nearest_index, Bounds, ConfigError, Mode, ModeIndicator, ScoreTracker,
    SeekConfig, Simulation, TrailBuffer, Vec2,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    pub position: Vec2,
    /// Radians, from the last movement direction.
    pub heading: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Vec2,
    pub captured: bool,
    pub pulse: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    pub position: Vec2,
    pub radius: f32,
    pub life: f32,
}

/// A capture that happened during the most recent `update`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capture {
    /// Population slot the target occupied; it now holds the replacement.
    pub slot: usize,
    /// The captured target, with `captured` set.
    pub target: Target,
    pub score: u32,
}

/// Read-only view of a seeking simulation handed to its renderer.
#[derive(Debug, Clone, Copy)]
pub struct SeekingFrame<'a> {
    pub bounds: Bounds,
    pub agent: &'a Agent,
    pub targets: &'a [Target],
    pub active: Option<usize>,
    pub trail: &'a TrailBuffer,
    pub sparkles: &'a [Sparkle],
    pub mode: Mode,
    pub elapsed: f32,
}

/// Scenario-specific presentation of a [`SeekingSim`].
pub trait SeekingRenderer {
    fn name(&self) -> &'static str;

    fn resize(&mut self, _bounds: Bounds, _rng: &mut StdRng) {}

    fn draw(&self, frame: &SeekingFrame<'_>, canvas: &mut dyn Canvas);
}

/// Agent-chases-targets simulation shared by the seeking scenarios. Behavior
/// comes from [`SeekConfig`]; presentation from `R`.
pub struct SeekingSim<R> {
    config: SeekConfig,
    renderer: R,
    rng: StdRng,
    bounds: Bounds,
    agent: Agent,
    targets: Vec<Target>,
    active: Option<usize>,
    trail: TrailBuffer,
    sparkles: Vec<Sparkle>,
    score: ScoreTracker,
    mode: Mode,
    keys: HeldKeys,
    pointer: Option<Vec2>,
    auto_speed: f32,
    difficulty_timer: f32,
    elapsed: f32,
    captures: Vec<Capture>,
    indicator: ModeIndicator,
}

impl<R: SeekingRenderer> SeekingSim<R> {
    pub fn new(
        config: SeekConfig,
        renderer: R,
        score_sink: Option<Box<dyn TextSink>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            renderer,
            rng,
            bounds: Bounds::default(),
            agent: Agent {
                position: Vec2::ZERO,
                heading: 0.0,
                speed: config.auto_speed,
            },
            targets: Vec::with_capacity(config.population),
            active: None,
            trail: TrailBuffer::new(config.trail.cap),
            sparkles: Vec::new(),
            score: ScoreTracker::new(score_sink),
            mode: Mode::Auto,
            keys: HeldKeys::default(),
            pointer: None,
            auto_speed: config.auto_speed,
            difficulty_timer: 0.0,
            elapsed: 0.0,
            captures: Vec::new(),
            indicator: ModeIndicator::default(),
            config,
        })
    }

    pub fn with_mode_indicator(mut self, indicator: ModeIndicator) -> Self {
        self.indicator = indicator;
        self.indicator.show(self.mode);
        self
    }

    pub fn config(&self) -> &SeekConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_target(&self) -> Option<&Target> {
        self.active.and_then(|index| self.targets.get(index))
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn sparkles(&self) -> &[Sparkle] {
        &self.sparkles
    }

    pub fn score(&self) -> u32 {
        self.score.value()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn held_keys(&self) -> &HeldKeys {
        &self.keys
    }

    pub fn pointer_destination(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn auto_speed(&self) -> f32 {
        self.auto_speed
    }

    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    pub fn frame(&self) -> SeekingFrame<'_> {
        SeekingFrame {
            bounds: self.bounds,
            agent: &self.agent,
            targets: &self.targets,
            active: self.active,
            trail: &self.trail,
            sparkles: &self.sparkles,
            mode: self.mode,
            elapsed: self.elapsed,
        }
    }

    pub fn place_agent(&mut self, position: Vec2) {
        if position.is_finite() {
            self.agent.position = position;
        }
    }

    /// Moves the live target in `slot`. Returns false for unknown slots or
    /// non-finite positions.
    pub fn place_target(&mut self, slot: usize, position: Vec2) -> bool {
        match self.targets.get_mut(slot) {
            Some(target) if position.is_finite() => {
                target.position = position;
                true
            }
            _ => false,
        }
    }

    pub fn select_nearest(&mut self) -> Option<usize> {
        self.active = nearest_index(
            self.agent.position,
            self.targets.iter().map(|target| target.position),
        );
        self.active
    }

    /// Switches control source. Returns false when the scenario has no manual
    /// controls and `mode` is [`Mode::Manual`].
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode == Mode::Manual && self.config.manual.is_none() {
            return false;
        }
        if mode == self.mode {
            self.indicator.show(mode);
            return true;
        }

        self.mode = mode;
        self.difficulty_timer = 0.0;
        self.auto_speed = self.config.auto_speed;
        self.agent.speed = self.mode_speed();
        match mode {
            Mode::Auto => {
                self.pointer = None;
                self.keys.clear();
                self.select_nearest();
            }
            Mode::Manual => self.active = None,
        }
        self.indicator.show(mode);
        info!(widget = self.renderer.name(), mode = %mode, "mode_changed");
        true
    }

    pub fn key(&mut self, key: ControlKey, pressed: bool) {
        if !pressed {
            self.keys.set(key, false);
            return;
        }
        if self.mode != Mode::Manual && !self.set_mode(Mode::Manual) {
            return;
        }
        self.keys.set(key, true);
        self.pointer = None;
    }

    /// Pointer press at a surface-local position. Only recorded as a destination
    /// once the simulation is in manual mode.
    pub fn pointer(&mut self, position: Vec2) {
        if self.mode != Mode::Manual {
            self.set_mode(Mode::Manual);
        }
        if self.mode != Mode::Manual || !position.is_finite() {
            return;
        }
        self.pointer = Some(position);
    }

    pub fn blur(&mut self) {
        self.keys.clear();
        self.pointer = None;
    }

    pub fn resize(&mut self, viewport: &Viewport) {
        let previous = self.bounds;
        let next = viewport.bounds();
        self.bounds = next;

        if self.targets.is_empty() {
            for _ in 0..self.config.population {
                let target = self.spawn_target(self.config.spawn_padding);
                self.targets.push(target);
            }
        } else if previous.is_degenerate() {
            for slot in 0..self.targets.len() {
                self.targets[slot] = self.spawn_target(self.config.spawn_padding);
            }
        } else {
            let padding = self.config.spawn_padding;
            for target in &mut self.targets {
                let scaled = Vec2::new(
                    target.position.x / previous.width * next.width,
                    target.position.y / previous.height * next.height,
                );
                target.position = next.clamp_inset(scaled, padding);
            }
        }

        if self.agent.position == Vec2::ZERO {
            self.agent.position = next.center();
        } else {
            let margin = self.config.bounds_margin.unwrap_or(0.0);
            self.agent.position = next.clamp_inset(self.agent.position, margin);
        }

        if self.mode == Mode::Auto {
            self.select_nearest();
        }
        self.renderer.resize(next, &mut self.rng);
    }

    pub fn update(&mut self, dt: f32) {
        self.captures.clear();
        if !is_usable_dt(dt) {
            return;
        }

        self.elapsed += dt;
        let pulse_step = (dt * self.config.pulse_rate).min(f32::MAX);
        for target in &mut self.targets {
            target.pulse = (target.pulse + pulse_step).rem_euclid(TAU);
            if !target.pulse.is_finite() {
                target.pulse = 0.0;
            }
        }

        self.advance_difficulty(dt);

        let moved = match self.mode {
            Mode::Manual => self.steer_manual(dt),
            Mode::Auto => self.seek_target(dt),
        };
        if moved {
            if let Some(margin) = self.config.bounds_margin {
                self.agent.position = self.bounds.clamp_inset(self.agent.position, margin);
            }
        }

        self.trail.push(self.agent.position);
        self.trail
            .decay(dt * self.config.trail.decay_per_second);

        self.sweep_captures();
        self.advance_sparkles(dt);
    }

    fn mode_speed(&self) -> f32 {
        match (self.mode, self.config.manual) {
            (Mode::Manual, Some(manual)) => manual.speed,
            _ => self.auto_speed,
        }
    }

    fn advance_difficulty(&mut self, dt: f32) {
        let Some(ramp) = self.config.difficulty else {
            return;
        };
        self.difficulty_timer += dt;
        if self.difficulty_timer > ramp.interval_seconds {
            self.difficulty_timer = 0.0;
            self.auto_speed = (self.auto_speed + ramp.increment).min(ramp.max_speed);
            self.agent.speed = self.mode_speed();
        }
    }

    fn steer_manual(&mut self, dt: f32) -> bool {
        let Some(manual) = self.config.manual else {
            return false;
        };
        let step = step_length(manual.speed, dt);

        let direction = self.keys.direction();
        if direction != Vec2::ZERO {
            let next = self.agent.position + direction.normalized_or_zero() * step;
            if !next.is_finite() {
                return false;
            }
            self.agent.position = next;
            self.agent.heading = direction.angle();
            self.pointer = None;
            return true;
        }

        let Some(destination) = self.pointer else {
            return false;
        };
        let offset = destination - self.agent.position;
        let distance = offset.length();
        if distance > manual.pointer_arrival {
            let ratio = (step / distance).min(1.0);
            self.agent.position += offset * ratio;
            self.agent.heading = offset.angle();
            true
        } else {
            self.pointer = None;
            false
        }
    }

    fn seek_target(&mut self, dt: f32) -> bool {
        let needs_target = self
            .active_target()
            .map_or(true, |target| target.captured);
        if needs_target {
            self.select_nearest();
        }
        let Some(target) = self.active_target().copied() else {
            return false;
        };

        let offset = target.position - self.agent.position;
        let distance = offset.length();
        if !(distance > self.config.arrival_epsilon) {
            return false;
        }
        let ratio = (step_length(self.agent.speed, dt) / distance).min(1.0);
        self.agent.position += offset * ratio;
        self.agent.heading = offset.angle();
        ratio > 0.0
    }

    fn sweep_captures(&mut self) {
        for slot in 0..self.targets.len() {
            let distance = self.targets[slot].position.distance(self.agent.position);
            if distance < self.config.capture_radius {
                self.capture(slot);
            }
        }
    }

    fn capture(&mut self, slot: usize) {
        let mut captured = self.targets[slot];
        captured.captured = true;
        self.score.award(self.config.reward);

        if let Some(sparkle) = self.config.sparkles {
            self.sparkles.push(Sparkle {
                position: captured.position,
                radius: sparkle.initial_radius,
                life: 1.0,
            });
        }

        self.targets[slot] = self.spawn_target(self.config.respawn_padding);
        self.captures.push(Capture {
            slot,
            target: captured,
            score: self.score.value(),
        });
        info!(
            widget = self.renderer.name(),
            slot,
            score = self.score.value(),
            "capture"
        );

        if self.mode == Mode::Auto {
            self.select_nearest();
        }
    }

    fn advance_sparkles(&mut self, dt: f32) {
        let Some(config) = self.config.sparkles else {
            return;
        };
        for sparkle in &mut self.sparkles {
            sparkle.life -= dt * config.decay_per_second;
            sparkle.radius = (sparkle.radius + dt * config.growth_per_second).min(f32::MAX);
        }
        self.sparkles.retain(|sparkle| sparkle.life > 0.0);
    }

    fn spawn_target(&mut self, padding: f32) -> Target {
        let position = self
            .bounds
            .random_point(&mut self.rng, padding, self.config.min_spawn_span);
        Target {
            position,
            captured: false,
            pulse: self.rng.gen::<f32>() * TAU,
        }
    }
}

impl<R: SeekingRenderer> Simulation for SeekingSim<R> {
    fn name(&self) -> &'static str {
        self.renderer.name()
    }

    fn resize(&mut self, viewport: &Viewport) {
        SeekingSim::resize(self, viewport);
    }

    fn apply(&mut self, command: SimCommand) {
        match command {
            SimCommand::Key { key, pressed } => self.key(key, pressed),
            SimCommand::Pointer(position) => self.pointer(position),
            SimCommand::SetMode(mode) => {
                self.set_mode(mode);
            }
            SimCommand::Blur => self.blur(),
            SimCommand::Resize {
                width,
                height,
                pixel_ratio,
            } => SeekingSim::resize(self, &Viewport::new(width, height, pixel_ratio)),
        }
    }

    fn update(&mut self, dt: f32) {
        SeekingSim::update(self, dt);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        self.renderer.draw(&self.frame(), canvas);
    }
}

fn step_length(speed: f32, dt: f32) -> f32 {
    (speed * dt).min(f32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SharedText;

    struct NullRenderer;

    impl SeekingRenderer for NullRenderer {
        fn name(&self) -> &'static str {
            "null"
        }

        fn draw(&self, _frame: &SeekingFrame<'_>, _canvas: &mut dyn Canvas) {}
    }

    fn seeded(config: SeekConfig) -> SeekingSim<NullRenderer> {
        let mut sim = SeekingSim::new(config.with_seed(11), NullRenderer, None).expect("valid");
        sim.resize(&Viewport::new(400.0, 300.0, 1.0));
        sim
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = SeekConfig {
            population: 0,
            ..SeekConfig::spark()
        };
        assert!(SeekingSim::new(config, NullRenderer, None).is_err());
    }

    #[test]
    fn first_resize_seeds_population_and_centers_agent() {
        let sim = seeded(SeekConfig::spark());
        assert_eq!(sim.targets().len(), 6);
        assert_eq!(sim.agent().position, Vec2::new(200.0, 150.0));
        assert!(sim.active_index().is_some());
        for target in sim.targets() {
            assert!(target.position.x >= 28.0 && target.position.x <= 372.0);
            assert!(target.position.y >= 28.0 && target.position.y <= 272.0);
        }
    }

    #[test]
    fn auto_step_never_overshoots_target() {
        let mut sim = seeded(SeekConfig::spark());
        let target = sim.active_target().copied().expect("target");
        sim.update(1_000.0);
        assert!(sim.agent().position.distance(target.position) < 0.001);
    }

    #[test]
    fn zero_and_invalid_dt_do_nothing() {
        let mut sim = seeded(SeekConfig::spark());
        let before = *sim.agent();
        sim.update(0.0);
        sim.update(-1.0);
        sim.update(f32::NAN);
        sim.update(f32::INFINITY);
        assert_eq!(*sim.agent(), before);
        assert!(sim.trail().is_empty());
    }

    #[test]
    fn spark_scenario_ignores_manual_input() {
        let mut sim = seeded(SeekConfig::spark());
        assert!(!sim.set_mode(Mode::Manual));
        sim.key(ControlKey::KeyD, true);
        sim.pointer(Vec2::new(5.0, 5.0));
        assert_eq!(sim.mode(), Mode::Auto);
        assert!(sim.held_keys().is_empty());
        assert_eq!(sim.pointer_destination(), None);
    }

    #[test]
    fn key_press_enters_manual_and_clears_pointer() {
        let mut sim = seeded(SeekConfig::orbit());
        sim.pointer(Vec2::new(10.0, 10.0));
        assert_eq!(sim.mode(), Mode::Manual);
        assert_eq!(sim.pointer_destination(), Some(Vec2::new(10.0, 10.0)));

        sim.key(ControlKey::ArrowUp, true);
        assert!(sim.held_keys().is_down(ControlKey::ArrowUp));
        assert_eq!(sim.pointer_destination(), None);
        assert_eq!(sim.active_index(), None);
    }

    #[test]
    fn manual_keys_move_at_manual_speed() {
        let mut sim = seeded(SeekConfig::orbit());
        sim.key(ControlKey::KeyD, true);
        let start = sim.agent().position;
        sim.update(0.1);
        let moved = sim.agent().position - start;
        assert!((moved.x - 13.0).abs() < 1e-3);
        assert_eq!(moved.y, 0.0);
        assert_eq!(sim.agent().heading, 0.0);
    }

    #[test]
    fn opposing_keys_fall_through_to_pointer() {
        let mut sim = seeded(SeekConfig::orbit());
        sim.key(ControlKey::ArrowLeft, true);
        sim.key(ControlKey::ArrowRight, true);
        sim.pointer(Vec2::new(300.0, 150.0));
        sim.update(0.1);
        assert!(sim.agent().position.x > 200.0);
        assert!(!sim.held_keys().is_empty());
    }

    #[test]
    fn pointer_destination_clears_on_arrival() {
        let mut sim = seeded(SeekConfig::orbit());
        sim.pointer(Vec2::new(210.0, 150.0));
        sim.update(0.1);
        assert_eq!(sim.pointer_destination(), Some(Vec2::new(210.0, 150.0)));
        sim.update(0.1);
        assert_eq!(sim.pointer_destination(), None);
    }

    #[test]
    fn manual_movement_is_clamped_to_margin() {
        let mut sim = seeded(SeekConfig::orbit());
        sim.key(ControlKey::KeyA, true);
        for _ in 0..100 {
            sim.update(0.1);
        }
        assert_eq!(sim.agent().position.x, 18.0);
    }

    #[test]
    fn difficulty_ramp_caps_and_resets_on_mode_change() {
        let mut sim = seeded(SeekConfig::orbit());
        for _ in 0..200 {
            sim.update(1.0);
        }
        assert_eq!(sim.auto_speed(), 180.0);
        assert_eq!(sim.agent().speed, 180.0);

        sim.set_mode(Mode::Manual);
        assert_eq!(sim.agent().speed, 130.0);
        assert_eq!(sim.auto_speed(), 95.0);
    }

    #[test]
    fn ramp_needs_interval_to_be_exceeded() {
        let mut sim = seeded(SeekConfig::orbit());
        for _ in 0..8 {
            sim.update(1.0);
        }
        assert_eq!(sim.auto_speed(), 95.0);
        sim.update(0.5);
        assert_eq!(sim.auto_speed(), 103.0);
    }

    #[test]
    fn capture_awards_reward_and_keeps_population() {
        let text = SharedText::default();
        let mut sim = SeekingSim::new(
            SeekConfig::spark().with_seed(5),
            NullRenderer,
            Some(Box::new(text.clone())),
        )
        .expect("valid");
        sim.resize(&Viewport::new(400.0, 300.0, 1.0));
        let before = sim.targets()[2];
        sim.place_agent(before.position);
        sim.update(0.016);

        let captured = sim
            .captures()
            .iter()
            .find(|capture| capture.slot == 2)
            .expect("slot 2 captured");
        assert!(captured.target.captured);
        assert_eq!(captured.target.position, before.position);
        assert_eq!(sim.targets().len(), 6);
        assert!(!sim.targets()[2].captured);
        assert_eq!(sim.score(), 7 * sim.captures().len() as u32);
        assert_eq!(text.get(), sim.score().to_string());
        assert!(!sim.sparkles().is_empty());
    }

    #[test]
    fn sparkles_grow_then_fade_out() {
        let mut sim = seeded(SeekConfig::spark());
        let target = sim.targets()[0];
        sim.place_agent(target.position);
        sim.update(0.01);
        let sparkle = sim.sparkles().first().copied().expect("sparkle");
        assert!(sparkle.radius > 6.0);
        assert!(sparkle.life < 1.0);

        sim.update(1.2);
        assert!(sim.sparkles().is_empty());
    }

    #[test]
    fn resize_rescales_targets_proportionally() {
        let mut sim = seeded(SeekConfig::orbit());
        sim.place_target(0, Vec2::new(200.0, 150.0));
        sim.resize(&Viewport::new(800.0, 600.0, 2.0));
        assert_eq!(sim.targets()[0].position, Vec2::new(400.0, 300.0));
        assert_eq!(sim.bounds(), Bounds::new(800.0, 600.0));
    }

    #[test]
    fn pulse_stays_wrapped() {
        let mut sim = seeded(SeekConfig::orbit());
        for _ in 0..50 {
            sim.update(0.25);
        }
        for target in sim.targets() {
            assert!((0.0..TAU).contains(&target.pulse));
        }
    }
}
