//! Idle/demo mode driver
//!
//! Reads the session like a player would and produces the same
//! [`InputIntent`] the input layer does.

use glam::Vec2;

use super::collision::{Rect, hitbox};
use super::state::GameSession;
use super::vehicle::InputIntent;
use crate::tuning::Tuning;

/// Jump this many ticks before a ground obstacle reaches the rover's nose
const JUMP_LEAD_TICKS: f32 = 10.0;
/// Start ducking this many ticks before a low flyer arrives
const DUCK_LEAD_TICKS: f32 = 12.0;
/// Touch down with the mount's front edge this far behind the hitbox's left edge
const MOUNT_OVERHANG: f32 = 20.0;
/// Longest jump arc considered
const MAX_ARC_TICKS: u32 = 240;

/// Ticks from takeoff until a standing jump brings the hitbox bottom into the
/// mount band of a surface at `top` while falling. `None` if the arc misses.
fn ticks_to_touchdown(top: f32, standing: Rect, tuning: &Tuning) -> Option<u32> {
    let ground_y = tuning.ground_y();
    let feet_offset = standing.bottom() - ground_y;
    let mut y = ground_y;
    let mut vel = tuning.jump_power;
    for tick in 1..=MAX_ARC_TICKS {
        vel += tuning.gravity;
        y += vel;
        if y >= ground_y {
            return None;
        }
        let feet = y + feet_offset;
        if vel > 0.0
            && feet >= top - tuning.mount_tolerance_above
            && feet <= top + tuning.mount_tolerance_below
        {
            return Some(tick);
        }
    }
    None
}

/// Decide this tick's input from the current session
pub fn drive(state: &GameSession) -> InputIntent {
    let vehicle = &state.vehicle;
    let tuning = &state.tuning;
    if vehicle.jumping || vehicle.is_riding() {
        return InputIntent::default();
    }

    let standing = hitbox(
        Rect::new(
            Vec2::new(vehicle.pos.x, tuning.ground_y()),
            Vec2::new(vehicle.width, tuning.vehicle_height),
        ),
        tuning.hitbox_ratio,
        tuning.normal_hitbox_offset,
    );
    let nose = standing.right();

    let low_flyer_close = state.obstacles.aerial.iter().any(|flyer| {
        let rect = flyer.rect();
        let gap = rect.pos.x - nose;
        let aerial_speed = state.speed * tuning.aerial_speed_factor;
        rect.right() > standing.pos.x
            && gap < aerial_speed * DUCK_LEAD_TICKS
            && rect.pos.y < standing.bottom()
            && rect.bottom() > standing.pos.y
    });
    if low_flyer_close {
        return InputIntent {
            jump: false,
            duck: true,
        };
    }

    let mut jump = false;
    for obstacle in &state.obstacles.ground {
        let gap = obstacle.pos.x - nose;
        if gap < 0.0 {
            continue;
        }

        // Mountable: time the jump to come down on its top
        if obstacle.mountable() {
            let rect = obstacle.rect();
            if let Some(ticks) = ticks_to_touchdown(rect.pos.y, standing, tuning) {
                let landing_x = rect.pos.x - state.speed * ticks as f32;
                if landing_x + rect.size.x > standing.pos.x {
                    jump |= landing_x <= standing.pos.x - MOUNT_OVERHANG;
                    continue;
                }
            }
        }

        jump |= gap < state.speed * JUMP_LEAD_TICKS;
    }

    InputIntent { jump, duck: false }
}
