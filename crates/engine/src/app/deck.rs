use std::time::Duration;

use tracing::info;

use super::widget::Widget;
use super::{SimCommand, Viewport};

/// Ordered set of widgets sharing one window; only the active widget runs.
pub struct WidgetDeck {
    widgets: Vec<Widget>,
    active: usize,
}

impl WidgetDeck {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self { widgets, active: 0 }
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&Widget> {
        self.widgets.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Widget> {
        self.widgets.get_mut(self.active)
    }

    pub fn set_max_frame_delta(&mut self, max_frame_delta: Duration) {
        for widget in &mut self.widgets {
            widget.set_max_frame_delta(max_frame_delta);
        }
    }

    pub fn start_active(&mut self) {
        if let Some(widget) = self.active_mut() {
            widget.start();
        }
    }

    /// Queues a command for the active widget only.
    pub fn push_active(&mut self, command: SimCommand) {
        if let Some(widget) = self.active_mut() {
            widget.push(command);
        }
    }

    /// Stops the active widget and starts the next one in order. The outgoing
    /// widget gets a `Blur` so keys released while it is hidden do not stay held.
    pub fn cycle(&mut self) -> bool {
        if self.widgets.len() < 2 {
            return false;
        }
        let from = self.active;
        self.widgets[from].push(SimCommand::Blur);
        self.widgets[from].stop();
        self.active = (from + 1) % self.widgets.len();
        self.widgets[self.active].start();
        info!(
            from = self.widgets[from].name(),
            to = self.widgets[self.active].name(),
            "widget_switched"
        );
        true
    }

    /// Queues a resize for every widget so hidden ones are sized when shown.
    pub fn resize_all(&mut self, viewport: Viewport) {
        for widget in &mut self.widgets {
            widget.push(SimCommand::Resize {
                width: viewport.width,
                height: viewport.height,
                pixel_ratio: viewport.pixel_ratio,
            });
        }
    }

    pub fn shutdown_all(&mut self) {
        for widget in &mut self.widgets {
            widget.stop();
        }
    }
}
