use std::f32::consts::{FRAC_PI_2, TAU};

use crate::app::{
    stop, Canvas, Gradient, Rgba, SimCommand, Stroke, TextAlign, Viewport, SURFACE_BACKDROP,
};

use super::spark::draw_grid;
use super::{is_usable_dt, Bounds, ConfigError, FlowConfig, Simulation, Vec2};

const GRID_SPACING: f32 = 42.0;
const GRID_COLOR: Rgba = Rgba::new(148, 163, 255, 20);
const LINK_START: Rgba = Rgba::new(59, 130, 246, 102);
const LINK_END: Rgba = Rgba::new(244, 114, 182, 102);
const PACKET_RGB: Rgba = Rgba::rgb(236, 72, 153);
const LABEL_COLOR: Rgba = Rgba::new(238, 242, 255, 230);
const UNKNOWN_NODE_COLOR: Rgba = Rgba::rgb(148, 163, 184);
const NODE_RADIUS: f32 = 12.0;
const LABEL_OFFSET: f32 = 16.0;
const PACKET_RADIUS: f32 = 8.0;
const PACKET_HALO_RADIUS: f32 = 14.0;
const PACKET_TRAIL_RADIUS: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub label: String,
    pub color: Rgba,
    pub position: Vec2,
    /// Placement angle on the layout circle, radians.
    pub angle: f32,
}

/// The travelling token: hop from `from` to `to`, `progress` in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packet {
    pub from: usize,
    pub to: usize,
    pub progress: f32,
}

/// Fixed node graph on a circle with one packet cycling through the nodes in
/// index order. Takes no input.
#[derive(Debug, Clone)]
pub struct NetworkFlowSim {
    config: FlowConfig,
    nodes: Vec<FlowNode>,
    packet: Packet,
    time: f32,
    bounds: Bounds,
    reduced_motion: bool,
}

impl NetworkFlowSim {
    /// With `reduced_motion` the widget draws a still graph without packet trail
    /// and never starts its clock.
    pub fn new(config: FlowConfig, reduced_motion: bool) -> Result<Self, ConfigError> {
        config.validate()?;
        let nodes = config
            .nodes
            .iter()
            .map(|spec| FlowNode {
                label: spec.label.clone(),
                color: Rgba::from_hex(&spec.color).unwrap_or(UNKNOWN_NODE_COLOR),
                position: Vec2::ZERO,
                angle: 0.0,
            })
            .collect();
        let mut sim = Self {
            config,
            nodes,
            packet: Packet {
                from: 0,
                to: 1,
                progress: 0.0,
            },
            time: 0.0,
            bounds: Bounds::default(),
            reduced_motion,
        };
        sim.resize(&Viewport::default());
        Ok(sim)
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[[usize; 2]] {
        &self.config.links
    }

    pub fn packet(&self) -> Packet {
        self.packet
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Layout radius for the current bounds.
    pub fn radius(&self) -> f32 {
        let shorter = self.bounds.width.min(self.bounds.height);
        (shorter / 2.0 - self.config.radius_inset).max(self.config.min_radius)
    }

    pub fn packet_position(&self) -> Vec2 {
        self.position_at(self.packet.progress)
    }

    /// Lays the nodes out on a circle for the new size. A zero extent falls back
    /// to the configured default surface size.
    pub fn resize(&mut self, viewport: &Viewport) {
        let width = if viewport.width > 0.0 {
            viewport.width
        } else {
            self.config.fallback_width
        };
        let height = if viewport.height > 0.0 {
            viewport.height
        } else {
            self.config.fallback_height
        };
        self.bounds = Bounds::new(width, height);

        let radius = self.radius();
        let center = self.bounds.center();
        let count = self.nodes.len() as f32;
        for (index, node) in self.nodes.iter_mut().enumerate() {
            let angle = TAU * index as f32 / count - FRAC_PI_2;
            node.angle = angle;
            node.position = center + Vec2::new(angle.cos(), angle.sin()) * radius;
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !is_usable_dt(dt) {
            return;
        }
        self.time = (self.time + dt).rem_euclid(TAU);
        self.packet.progress += dt * self.config.speed;
        if self.packet.progress >= 1.0 {
            self.packet.from = self.packet.to;
            self.packet.to = (self.packet.to + 1) % self.nodes.len();
            self.packet.progress = 0.0;
        }
    }

    fn position_at(&self, t: f32) -> Vec2 {
        let from = self.nodes[self.packet.from].position;
        let to = self.nodes[self.packet.to].position;
        from.lerp(to, t)
    }

    fn draw_packet_trail(&self, canvas: &mut dyn Canvas) {
        let steps = self.config.trail_steps;
        for step in 0..steps {
            let t = (self.packet.progress - step as f32 / steps as f32).max(0.0);
            let alpha = (0.4 - step as f32 * 0.015).max(0.0);
            canvas.fill_circle(
                self.position_at(t),
                PACKET_TRAIL_RADIUS,
                PACKET_RGB.with_alpha(alpha),
            );
        }
    }
}

impl Simulation for NetworkFlowSim {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn resize(&mut self, viewport: &Viewport) {
        NetworkFlowSim::resize(self, viewport);
    }

    fn apply(&mut self, command: SimCommand) {
        if let SimCommand::Resize {
            width,
            height,
            pixel_ratio,
        } = command
        {
            NetworkFlowSim::resize(self, &Viewport::new(width, height, pixel_ratio));
        }
    }

    fn update(&mut self, dt: f32) {
        NetworkFlowSim::update(self, dt);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let (width, height) = canvas.size();
        canvas.clear(SURFACE_BACKDROP);
        canvas.fill_gradient(&Gradient::linear(
            Vec2::ZERO,
            Vec2::new(width, height),
            &[
                stop(0.0, Rgba::new(15, 23, 42, 242)),
                stop(1.0, Rgba::new(30, 27, 75, 217)),
            ],
        ));
        draw_grid(canvas, width, height, GRID_SPACING, GRID_COLOR);

        for [from, to] in &self.config.links {
            canvas.stroke_line(
                self.nodes[*from].position,
                self.nodes[*to].position,
                2.0,
                LINK_START,
                LINK_END,
            );
        }

        if !self.reduced_motion {
            self.draw_packet_trail(canvas);
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let pulse = 12.0 + (self.time * 2.0 + index as f32).sin() * 3.0;
            canvas.stroke_circle(
                node.position,
                pulse + 6.0,
                Stroke::solid(2.0, Rgba { a: 0x55, ..node.color }),
            );
            canvas.fill_circle(node.position, NODE_RADIUS, node.color);
            canvas.fill_text(
                node.position + Vec2::new(0.0, LABEL_OFFSET),
                &node.label,
                LABEL_COLOR,
                TextAlign::Center,
            );
        }

        let packet = self.packet_position();
        canvas.fill_circle(packet, PACKET_RADIUS, PACKET_RGB.with_alpha(0.95));
        canvas.stroke_circle(
            packet,
            PACKET_HALO_RADIUS,
            Stroke::solid(2.0, PACKET_RGB.with_alpha(0.4)),
        );
    }

    fn animates(&self) -> bool {
        !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FlowNodeSpec;

    fn flow() -> NetworkFlowSim {
        NetworkFlowSim::new(FlowConfig::default(), false).expect("valid")
    }

    #[test]
    fn construction_lays_out_with_fallback_size() {
        let sim = flow();
        assert_eq!(sim.bounds(), Bounds::new(600.0, 260.0));
        assert_eq!(sim.radius(), 82.0);
        let top = sim.nodes()[0].position;
        assert!((top.x - 300.0).abs() < 1e-3);
        assert!((top.y - 48.0).abs() < 1e-3);
    }

    #[test]
    fn small_surfaces_keep_minimum_radius() {
        let mut sim = flow();
        sim.resize(&Viewport::new(200.0, 150.0, 1.0));
        assert_eq!(sim.radius(), 80.0);
    }

    #[test]
    fn crossing_advances_to_next_node_in_index_order() {
        let mut sim = flow();
        sim.update(1.0);
        assert_eq!(sim.packet().from, 0);
        assert!((sim.packet().progress - 0.35).abs() < 1e-6);

        sim.update(2.0);
        assert_eq!(
            sim.packet(),
            Packet {
                from: 1,
                to: 2,
                progress: 0.0
            }
        );
    }

    #[test]
    fn zero_dt_keeps_packet_still() {
        let mut sim = flow();
        sim.update(0.0);
        sim.update(f32::NAN);
        assert_eq!(sim.packet().progress, 0.0);
    }

    #[test]
    fn unparsable_node_color_draws_grey() {
        let config = FlowConfig {
            nodes: vec![
                FlowNodeSpec {
                    label: "In".to_string(),
                    color: "blue".to_string(),
                },
                FlowNodeSpec {
                    label: "Out".to_string(),
                    color: "#ffffff".to_string(),
                },
            ],
            links: vec![[0, 1]],
            ..FlowConfig::default()
        };
        let sim = NetworkFlowSim::new(config, true).expect("valid");
        assert_eq!(sim.nodes()[0].color, UNKNOWN_NODE_COLOR);
        assert_eq!(sim.nodes()[1].color, Rgba::rgb(255, 255, 255));
        assert!(!sim.animates());
    }

    #[test]
    fn too_few_nodes_are_rejected() {
        let config = FlowConfig {
            nodes: Vec::new(),
            links: Vec::new(),
            ..FlowConfig::default()
        };
        assert!(matches!(
            NetworkFlowSim::new(config, false),
            Err(ConfigError::TooFewNodes { count: 0 })
        ));
    }
}
