use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::{ModeControl, TextSink};

/// Control source of a seeking agent. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Auto,
    Manual,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Manual => "manual",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Mode::Auto => "Auto pilot",
            Mode::Manual => "Manual pilot",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode {0:?}; expected \"auto\" or \"manual\"")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "auto" => Ok(Mode::Auto),
            "manual" => Ok(Mode::Manual),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

pub const STATIC_VIEW_LABEL: &str = "Static view";

/// Optional mode label plus mode buttons reflecting the active [`Mode`].
#[derive(Default)]
pub struct ModeIndicator {
    label: Option<Box<dyn TextSink>>,
    controls: Vec<Box<dyn ModeControl>>,
}

impl ModeIndicator {
    pub fn new(label: Option<Box<dyn TextSink>>, controls: Vec<Box<dyn ModeControl>>) -> Self {
        Self { label, controls }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.controls.is_empty()
    }

    /// Writes the label for `mode` and presses exactly the controls that request it.
    pub fn show(&mut self, mode: Mode) {
        if let Some(label) = self.label.as_mut() {
            label.set_text(mode.label());
        }
        for control in &mut self.controls {
            let active = control.mode() == Some(mode);
            control.set_pressed(active);
        }
    }

    /// Motion-free presentation: label reads "Static view", every control is
    /// disabled and released.
    pub fn show_static(&mut self) {
        if let Some(label) = self.label.as_mut() {
            label.set_text(STATIC_VIEW_LABEL);
        }
        for control in &mut self.controls {
            control.set_enabled(false);
            control.set_pressed(false);
        }
    }
}

impl fmt::Debug for ModeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeIndicator")
            .field("has_label", &self.label.is_some())
            .field("controls", &self.controls.len())
            .finish()
    }
}
