use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be a non-negative finite number, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
    #[error("difficulty.max_speed ({max_speed}) is below auto_speed ({auto_speed})")]
    RampBelowBase { auto_speed: f32, max_speed: f32 },
    #[error("arrival_epsilon ({arrival_epsilon}) must be below capture_radius ({capture_radius})")]
    ArrivalOutsideCapture {
        arrival_epsilon: f32,
        capture_radius: f32,
    },
    #[error("flow graph needs at least 2 nodes, got {count}")]
    TooFewNodes { count: usize },
    #[error("link {index} ({from}, {to}) references a node outside 0..{node_count}")]
    LinkOutOfRange {
        index: usize,
        from: usize,
        to: usize,
        node_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrailConfig {
    pub cap: usize,
    pub decay_per_second: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SparkleConfig {
    pub initial_radius: f32,
    pub growth_per_second: f32,
    pub decay_per_second: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManualConfig {
    pub speed: f32,
    /// Pointer destinations closer than this are considered reached.
    pub pointer_arrival: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DifficultyRamp {
    pub interval_seconds: f32,
    pub increment: f32,
    pub max_speed: f32,
}

/// Tunables of a seeking simulation. `spark()` and `orbit()` are the two shipped
/// scenarios; missing JSON fields fall back to the spark values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeekConfig {
    pub population: usize,
    pub spawn_padding: f32,
    pub respawn_padding: f32,
    pub min_spawn_span: f32,
    pub capture_radius: f32,
    pub reward: u32,
    pub auto_speed: f32,
    pub arrival_epsilon: f32,
    pub trail: TrailConfig,
    pub bounds_margin: Option<f32>,
    pub sparkles: Option<SparkleConfig>,
    pub manual: Option<ManualConfig>,
    pub difficulty: Option<DifficultyRamp>,
    /// Cosmetic ring pulse phase advance, radians per second.
    pub pulse_rate: f32,
    pub star_count: usize,
    pub seed: Option<u64>,
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self::spark()
    }
}

impl SeekConfig {
    pub fn spark() -> Self {
        Self {
            population: 6,
            spawn_padding: 28.0,
            respawn_padding: 24.0,
            min_spawn_span: 10.0,
            capture_radius: 10.0,
            reward: 7,
            auto_speed: 120.0,
            arrival_epsilon: 0.1,
            trail: TrailConfig {
                cap: 40,
                decay_per_second: 1.3,
            },
            bounds_margin: None,
            sparkles: Some(SparkleConfig {
                initial_radius: 6.0,
                growth_per_second: 24.0,
                decay_per_second: 0.9,
            }),
            manual: None,
            difficulty: None,
            pulse_rate: 0.0,
            star_count: 0,
            seed: None,
        }
    }

    pub fn orbit() -> Self {
        Self {
            population: 4,
            spawn_padding: 38.0,
            respawn_padding: 32.0,
            min_spawn_span: 10.0,
            capture_radius: 20.0,
            reward: 15,
            auto_speed: 95.0,
            arrival_epsilon: 0.1,
            trail: TrailConfig {
                cap: 60,
                decay_per_second: 0.9,
            },
            bounds_margin: Some(18.0),
            sparkles: None,
            manual: Some(ManualConfig {
                speed: 130.0,
                pointer_arrival: 1.0,
            }),
            difficulty: Some(DifficultyRamp {
                interval_seconds: 8.0,
                increment: 8.0,
                max_speed: 180.0,
            }),
            pulse_rate: 1.0,
            star_count: 38,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        count("population", self.population)?;
        count("trail.cap", self.trail.cap)?;
        non_negative("spawn_padding", self.spawn_padding)?;
        non_negative("respawn_padding", self.respawn_padding)?;
        positive("min_spawn_span", self.min_spawn_span)?;
        positive("capture_radius", self.capture_radius)?;
        positive("auto_speed", self.auto_speed)?;
        non_negative("arrival_epsilon", self.arrival_epsilon)?;
        if self.arrival_epsilon >= self.capture_radius {
            return Err(ConfigError::ArrivalOutsideCapture {
                arrival_epsilon: self.arrival_epsilon,
                capture_radius: self.capture_radius,
            });
        }
        non_negative("trail.decay_per_second", self.trail.decay_per_second)?;
        non_negative("pulse_rate", self.pulse_rate)?;
        if let Some(margin) = self.bounds_margin {
            non_negative("bounds_margin", margin)?;
        }
        if let Some(sparkles) = &self.sparkles {
            non_negative("sparkles.initial_radius", sparkles.initial_radius)?;
            non_negative("sparkles.growth_per_second", sparkles.growth_per_second)?;
            positive("sparkles.decay_per_second", sparkles.decay_per_second)?;
        }
        if let Some(manual) = &self.manual {
            positive("manual.speed", manual.speed)?;
            non_negative("manual.pointer_arrival", manual.pointer_arrival)?;
        }
        if let Some(ramp) = &self.difficulty {
            positive("difficulty.interval_seconds", ramp.interval_seconds)?;
            non_negative("difficulty.increment", ramp.increment)?;
            positive("difficulty.max_speed", ramp.max_speed)?;
            if ramp.max_speed < self.auto_speed {
                return Err(ConfigError::RampBelowBase {
                    auto_speed: self.auto_speed,
                    max_speed: ramp.max_speed,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowNodeSpec {
    pub label: String,
    /// `#rrggbb`; unparsable values draw in a neutral grey.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlowConfig {
    /// Packet progress per second along the current hop.
    pub speed: f32,
    pub fallback_width: f32,
    pub fallback_height: f32,
    pub min_radius: f32,
    pub radius_inset: f32,
    pub trail_steps: usize,
    pub nodes: Vec<FlowNodeSpec>,
    pub links: Vec<[usize; 2]>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        let node = |label: &str, color: &str| FlowNodeSpec {
            label: label.to_string(),
            color: color.to_string(),
        };
        Self {
            speed: 0.35,
            fallback_width: 600.0,
            fallback_height: 260.0,
            min_radius: 80.0,
            radius_inset: 48.0,
            trail_steps: 24,
            nodes: vec![
                node("Signal", "#3b82f6"),
                node("Design", "#a855f7"),
                node("Build", "#14b8a6"),
                node("Ops", "#f97316"),
            ],
            links: vec![[0, 1], [1, 2], [2, 3], [3, 0], [0, 2], [1, 3]],
        }
    }
}

impl FlowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("speed", self.speed)?;
        positive("fallback_width", self.fallback_width)?;
        positive("fallback_height", self.fallback_height)?;
        non_negative("min_radius", self.min_radius)?;
        non_negative("radius_inset", self.radius_inset)?;
        if self.nodes.len() < 2 {
            return Err(ConfigError::TooFewNodes {
                count: self.nodes.len(),
            });
        }
        let node_count = self.nodes.len();
        for (index, [from, to]) in self.links.iter().copied().enumerate() {
            if from >= node_count || to >= node_count {
                return Err(ConfigError::LinkOutOfRange {
                    index,
                    from,
                    to,
                    node_count,
                });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn count(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroCount { field })
    } else {
        Ok(())
    }
}
