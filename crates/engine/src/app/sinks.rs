use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::sim::Mode;

/// Destination for a piece of display text (score readout, mode label).
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

/// A host button that requests a specific [`Mode`] when activated.
pub trait ModeControl {
    /// The mode this control requests, if it carries one.
    fn mode(&self) -> Option<Mode>;
    fn set_pressed(&mut self, pressed: bool);
    fn set_enabled(&mut self, enabled: bool);
}

/// Text sink whose current value can be read back by the host, e.g. to draw a HUD.
#[derive(Debug, Clone, Default)]
pub struct SharedText {
    value: Rc<RefCell<String>>,
}

impl SharedText {
    pub fn get(&self) -> String {
        self.value.borrow().clone()
    }
}

impl TextSink for SharedText {
    fn set_text(&mut self, text: &str) {
        let mut value = self.value.borrow_mut();
        value.clear();
        value.push_str(text);
    }
}

#[derive(Debug, Default)]
struct ModeButtonState {
    pressed: Cell<bool>,
    disabled: Cell<bool>,
}

/// Mode control backed by shared flags so the host can render its state.
#[derive(Debug, Clone)]
pub struct SharedModeButton {
    mode: Option<Mode>,
    state: Rc<ModeButtonState>,
}

impl SharedModeButton {
    pub fn new(mode: Option<Mode>) -> Self {
        Self {
            mode,
            state: Rc::new(ModeButtonState::default()),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.state.pressed.get()
    }

    pub fn is_enabled(&self) -> bool {
        !self.state.disabled.get()
    }
}

impl ModeControl for SharedModeButton {
    fn mode(&self) -> Option<Mode> {
        self.mode
    }

    fn set_pressed(&mut self, pressed: bool) {
        self.state.pressed.set(pressed);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state.disabled.set(!enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_text_clones_observe_writes() {
        let text = SharedText::default();
        let mut writer = text.clone();
        writer.set_text("Auto pilot");
        assert_eq!(text.get(), "Auto pilot");
        writer.set_text("42");
        assert_eq!(text.get(), "42");
    }

    #[test]
    fn mode_button_clones_share_state() {
        let button = SharedModeButton::new(Some(Mode::Manual));
        let mut handle = button.clone();
        handle.set_pressed(true);
        handle.set_enabled(false);

        assert!(button.is_pressed());
        assert!(!button.is_enabled());
        assert_eq!(button.mode(), Some(Mode::Manual));
    }
}
