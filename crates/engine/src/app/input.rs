use std::collections::VecDeque;

use crate::sim::{Mode, Vec2};

/// Physical movement keys. Arrow keys and WASD are tracked separately so that
/// holding both keys of one axis side counts twice before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    KeyW,
    KeyA,
    KeyS,
    KeyD,
}

const CONTROL_KEY_COUNT: usize = 8;

impl ControlKey {
    pub const ALL: [ControlKey; CONTROL_KEY_COUNT] = [
        ControlKey::ArrowUp,
        ControlKey::ArrowDown,
        ControlKey::ArrowLeft,
        ControlKey::ArrowRight,
        ControlKey::KeyW,
        ControlKey::KeyA,
        ControlKey::KeyS,
        ControlKey::KeyD,
    ];

    const fn index(self) -> usize {
        match self {
            ControlKey::ArrowUp => 0,
            ControlKey::ArrowDown => 1,
            ControlKey::ArrowLeft => 2,
            ControlKey::ArrowRight => 3,
            ControlKey::KeyW => 4,
            ControlKey::KeyA => 5,
            ControlKey::KeyS => 6,
            ControlKey::KeyD => 7,
        }
    }

    /// Unit contribution of this key in surface coordinates (+y points down).
    pub const fn axis(self) -> (i8, i8) {
        match self {
            ControlKey::ArrowUp | ControlKey::KeyW => (0, -1),
            ControlKey::ArrowDown | ControlKey::KeyS => (0, 1),
            ControlKey::ArrowLeft | ControlKey::KeyA => (-1, 0),
            ControlKey::ArrowRight | ControlKey::KeyD => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    down: [bool; CONTROL_KEY_COUNT],
}

impl HeldKeys {
    pub fn set(&mut self, key: ControlKey, is_down: bool) {
        self.down[key.index()] = is_down;
    }

    pub fn is_down(&self, key: ControlKey) -> bool {
        self.down[key.index()]
    }

    pub fn clear(&mut self) {
        self.down = [false; CONTROL_KEY_COUNT];
    }

    pub fn is_empty(&self) -> bool {
        !self.down.iter().any(|down| *down)
    }

    /// Net direction from opposing key pairs: (right - left, down - up).
    pub fn direction(&self) -> Vec2 {
        let mut x = 0i32;
        let mut y = 0i32;
        for key in ControlKey::ALL {
            if self.is_down(key) {
                let (dx, dy) = key.axis();
                x += i32::from(dx);
                y += i32::from(dy);
            }
        }
        Vec2::new(x as f32, y as f32)
    }
}

/// Host input, normalized and queued until the owning widget's next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimCommand {
    Key { key: ControlKey, pressed: bool },
    /// Pointer press at a surface-local logical position.
    Pointer(Vec2),
    SetMode(Mode),
    /// Focus left the surface; held input is dropped.
    Blur,
    Resize {
        width: f32,
        height: f32,
        pixel_ratio: f32,
    },
}

/// FIFO of commands written by event handlers and drained once per tick.
#[derive(Debug, Default)]
pub struct InputRouter {
    queue: VecDeque<SimCommand>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: SimCommand) {
        self.queue.push_back(command);
    }

    pub fn key(&mut self, key: ControlKey, pressed: bool) {
        self.push(SimCommand::Key { key, pressed });
    }

    pub fn pointer(&mut self, position: Vec2) {
        self.push(SimCommand::Pointer(position));
    }

    /// Routes a mode-control activation; unknown mode names are dropped.
    pub fn mode_named(&mut self, name: &str) -> bool {
        match name.parse::<Mode>() {
            Ok(mode) => {
                self.push(SimCommand::SetMode(mode));
                true
            }
            Err(_) => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SimCommand> + '_ {
        self.queue.drain(..)
    }
}
