//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keys, pointer, touch)
//! - Viewport orientation on touch devices

pub mod input;

pub use input::{Action, InputState, action_for_key};

/// Viewport is taller than it is wide
#[inline]
pub fn is_portrait(width: f32, height: f32) -> bool {
    height > width
}

/// Touch devices held upright cannot fit the playfield; play must stop
pub fn should_force_pause(is_touch: bool, width: f32, height: f32) -> bool {
    is_touch && is_portrait(width, height)
}
