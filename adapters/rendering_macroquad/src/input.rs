//! Keyboard and mouse polling.

use glam::Vec2;
use macroquad::input::{is_key_down, mouse_position, KeyCode};
use maze_chase_core::LogicalKey;
use maze_chase_rendering::InputCollaborator;

/// Physical key bound to each logical movement key.
pub(crate) const fn key_binding(key: LogicalKey) -> KeyCode {
    match key {
        LogicalKey::Forward => KeyCode::W,
        LogicalKey::Backward => KeyCode::S,
        LogicalKey::StrafeRight => KeyCode::D,
        LogicalKey::StrafeLeft => KeyCode::A,
    }
}

/// Mouse motion tracker that reports deltas between polls.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct MouseTracker {
    last: Option<Vec2>,
}

impl MouseTracker {
    /// Records the cursor position and returns the motion since the last one.
    ///
    /// The first observation only primes the tracker.
    pub(crate) fn observe(&mut self, position: Vec2) -> Vec2 {
        let delta = self
            .last
            .map_or(Vec2::ZERO, |previous| position - previous);
        self.last = Some(position);
        delta
    }
}

/// Input collaborator reading macroquad's global input state.
#[derive(Debug, Default)]
pub(crate) struct MacroquadInput {
    mouse: MouseTracker,
}

impl InputCollaborator for MacroquadInput {
    fn is_key_down(&self, key: LogicalKey) -> bool {
        is_key_down(key_binding(key))
    }

    fn take_mouse_delta(&mut self) -> Vec2 {
        let (x, y) = mouse_position();
        self.mouse.observe(Vec2::new(x, y))
    }
}
