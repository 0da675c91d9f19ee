//! Input mapping
//!
//! Keyboard and pointer/touch events both land here and are merged into one
//! [`InputIntent`] per tick, so every input source drives the rover the
//! same way.

use glam::Vec2;

use crate::sim::InputIntent;

/// Downward drag (CSS pixels) that turns a touch into a duck
pub const SWIPE_DUCK_DISTANCE: f32 = 30.0;

/// The two player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
    Duck,
}

/// Map a `KeyboardEvent.key` value to an action
pub fn action_for_key(key: &str) -> Option<Action> {
    match key {
        " " | "Spacebar" | "ArrowUp" | "w" | "W" => Some(Action::Jump),
        "ArrowDown" | "s" | "S" => Some(Action::Duck),
        _ => None,
    }
}

/// Held/pending state of every input source
#[derive(Debug, Clone, Default)]
pub struct InputState {
    jump_held: bool,
    duck_held: bool,
    /// Jump pressed since the last tick (survives a release before the tick)
    jump_pending: bool,
    pointer_duck: bool,
    pointer_origin: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed. Returns the action it maps to, if any.
    pub fn key_down(&mut self, key: &str) -> Option<Action> {
        let action = action_for_key(key)?;
        match action {
            Action::Jump => {
                self.jump_held = true;
                self.jump_pending = true;
            }
            Action::Duck => self.duck_held = true,
        }
        Some(action)
    }

    /// Key released
    pub fn key_up(&mut self, key: &str) -> Option<Action> {
        let action = action_for_key(key)?;
        match action {
            Action::Jump => self.jump_held = false,
            Action::Duck => self.duck_held = false,
        }
        Some(action)
    }

    /// Touch/pointer down at `pos` (relative to the canvas). The top half
    /// jumps, the bottom half ducks while held.
    pub fn pointer_start(&mut self, pos: Vec2, viewport_height: f32) -> Action {
        self.pointer_origin = Some(pos);
        if pos.y < viewport_height * 0.5 {
            self.jump_pending = true;
            Action::Jump
        } else {
            self.pointer_duck = true;
            Action::Duck
        }
    }

    /// Touch/pointer moved; a downward swipe ducks
    pub fn pointer_move(&mut self, pos: Vec2) {
        if let Some(origin) = self.pointer_origin {
            if pos.y - origin.y >= SWIPE_DUCK_DISTANCE {
                self.pointer_duck = true;
            }
        }
    }

    /// Touch/pointer released
    pub fn pointer_end(&mut self) {
        self.pointer_origin = None;
        self.pointer_duck = false;
    }

    /// Intent for the coming tick. Consumes a pending jump.
    pub fn intent(&mut self) -> InputIntent {
        let jump = self.jump_held || std::mem::take(&mut self.jump_pending);
        InputIntent {
            jump,
            duck: self.duck_held || self.pointer_duck,
        }
    }

    /// Forget everything (new run, lost focus)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
