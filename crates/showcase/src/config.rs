use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sim_engine::{ConfigError, FlowConfig, LoopConfig, SeekConfig};
use thiserror::Error;

pub(crate) const CONFIG_ENV_VAR: &str = "SHOWCASE_CONFIG";
pub(crate) const REDUCED_MOTION_ENV_VAR: &str = "SHOWCASE_REDUCED_MOTION";

#[derive(Debug, Error)]
pub(crate) enum ShowcaseConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config json: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("invalid config at {path}: {source}")]
    Field {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {section} settings: {source}")]
    Invalid {
        section: &'static str,
        #[source]
        source: ConfigError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) max_frame_delta_ms: u64,
    pub(crate) metrics_log_interval_ms: u64,
    pub(crate) max_render_fps: Option<u32>,
    pub(crate) show_hud: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let defaults = LoopConfig::default();
        Self {
            title: defaults.window_title,
            width: defaults.window_width,
            height: defaults.window_height,
            max_frame_delta_ms: defaults.max_frame_delta.as_millis() as u64,
            metrics_log_interval_ms: defaults.metrics_log_interval.as_millis() as u64,
            max_render_fps: defaults.max_render_fps,
            show_hud: defaults.show_hud,
        }
    }
}

impl WindowConfig {
    pub(crate) fn to_loop_config(&self) -> LoopConfig {
        LoopConfig {
            window_title: self.title.clone(),
            window_width: self.width,
            window_height: self.height,
            max_frame_delta: Duration::from_millis(self.max_frame_delta_ms),
            metrics_log_interval: Duration::from_millis(self.metrics_log_interval_ms),
            max_render_fps: self.max_render_fps,
            show_hud: self.show_hud,
        }
    }
}

/// Everything the showcase reads from its JSON file. Sections present in the
/// file are merged over the built-in scenario presets field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ShowcaseConfig {
    pub(crate) window: WindowConfig,
    pub(crate) reduced_motion: bool,
    pub(crate) spark: SeekConfig,
    pub(crate) orbit: SeekConfig,
    pub(crate) flow: FlowConfig,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            reduced_motion: false,
            spark: SeekConfig::spark(),
            orbit: SeekConfig::orbit(),
            flow: FlowConfig::default(),
        }
    }
}

impl ShowcaseConfig {
    pub(crate) fn validate(&self) -> Result<(), ShowcaseConfigError> {
        self.spark.validate().map_err(invalid("spark"))?;
        self.orbit.validate().map_err(invalid("orbit"))?;
        self.flow.validate().map_err(invalid("flow"))?;
        Ok(())
    }
}

/// Loads the file named by `SHOWCASE_CONFIG` (defaults when unset), then
/// applies the reduced-motion override.
pub(crate) fn load_from_env() -> Result<ShowcaseConfig, ShowcaseConfigError> {
    let mut config = match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => load_from_path(Path::new(&path))?,
        None => ShowcaseConfig::default(),
    };
    let forced = std::env::var(REDUCED_MOTION_ENV_VAR).ok();
    if reduced_motion_requested(forced.as_deref()) {
        config.reduced_motion = true;
    }
    Ok(config)
}

pub(crate) fn load_from_path(path: &Path) -> Result<ShowcaseConfig, ShowcaseConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ShowcaseConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw)
}

pub(crate) fn parse_config(raw: &str) -> Result<ShowcaseConfig, ShowcaseConfigError> {
    let overrides: Value = serde_json::from_str(raw).map_err(ShowcaseConfigError::Syntax)?;
    let mut merged = serde_json::to_value(ShowcaseConfig::default())
        .map_err(ShowcaseConfigError::Syntax)?;
    merge_json(&mut merged, overrides);

    let config: ShowcaseConfig = serde_path_to_error::deserialize(merged).map_err(|error| {
        let path = error.path().to_string();
        ShowcaseConfigError::Field {
            path,
            source: error.into_inner(),
        }
    })?;
    config.validate()?;
    Ok(config)
}

fn invalid(section: &'static str) -> impl FnOnce(ConfigError) -> ShowcaseConfigError {
    move |source| ShowcaseConfigError::Invalid { section, source }
}

fn reduced_motion_requested(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}

/// Objects merge key by key; any other override replaces the base value.
fn merge_json(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overrides) => *base = overrides,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn empty_object_yields_presets() {
        let config = parse_config("{}").expect("defaults");
        assert_eq!(config, ShowcaseConfig::default());
        assert_eq!(config.orbit.reward, 15);
        assert_eq!(config.spark.reward, 7);
    }

    #[test]
    fn partial_section_keeps_its_own_preset() {
        let config =
            parse_config(r#"{ "orbit": { "auto_speed": 110.0, "seed": 4 } }"#).expect("valid");

        assert_eq!(config.orbit.auto_speed, 110.0);
        assert_eq!(config.orbit.seed, Some(4));
        assert_eq!(config.orbit.population, 4);
        assert_eq!(config.orbit.bounds_margin, Some(18.0));
        assert_eq!(config.spark, SeekConfig::spark());
    }

    #[test]
    fn nested_option_can_be_disabled_with_null() {
        let config = parse_config(r#"{ "spark": { "sparkles": null } }"#).expect("valid");
        assert!(config.spark.sparkles.is_none());
    }

    #[test]
    fn unknown_field_reports_its_path() {
        let error = parse_config(r#"{ "orbit": { "manual": { "sped": 3.0 } } }"#)
            .expect_err("unknown field");
        match error {
            ShowcaseConfigError::Field { path, .. } => {
                assert!(path.starts_with("orbit.manual"), "{path}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrong_type_reports_its_path() {
        let error = parse_config(r#"{ "window": { "width": "wide" } }"#).expect_err("type");
        assert!(error.to_string().contains("window.width"), "{error}");
    }

    #[test]
    fn invalid_values_name_the_section() {
        let error = parse_config(r#"{ "flow": { "links": [[0, 9]] } }"#).expect_err("range");
        assert!(matches!(
            error,
            ShowcaseConfigError::Invalid {
                section: "flow",
                source: ConfigError::LinkOutOfRange { .. }
            }
        ));
    }

    #[test]
    fn malformed_json_is_a_syntax_error() {
        assert!(matches!(
            parse_config("{ not json"),
            Err(ShowcaseConfigError::Syntax(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "reduced_motion": true, "window": {{ "title": "Demo", "max_render_fps": null }} }}"#
        )
        .expect("write config");

        let config = load_from_path(file.path()).expect("load");
        assert!(config.reduced_motion);
        let loop_config = config.window.to_loop_config();
        assert_eq!(loop_config.window_title, "Demo");
        assert_eq!(loop_config.max_render_fps, None);
        assert_eq!(loop_config.max_frame_delta, Duration::from_millis(250));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = load_from_path(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(error, ShowcaseConfigError::Read { .. }));
    }

    #[test]
    fn reduced_motion_flag_values() {
        assert!(reduced_motion_requested(Some("1")));
        assert!(reduced_motion_requested(Some(" true ")));
        assert!(!reduced_motion_requested(Some("0")));
        assert!(!reduced_motion_requested(None));
    }
}
