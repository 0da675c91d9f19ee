//! The rover: vertical kinematics, pose and mount handling
//!
//! The rover never moves horizontally. It jumps under constant gravity, ducks
//! on the ground, or rides on top of a mountable obstacle (tracked by id).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, hitbox};
use super::obstacle::{Obstacle, ObstacleSet};
use crate::tuning::Tuning;

/// Player intent for one tick, merged from every input source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub jump: bool,
    pub duck: bool,
}

/// Visual pose (what the renderer draws)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    Normal,
    Duck,
    /// Brief squash after touching down; drawn with the duck sprite
    Landing,
    Airborne,
    Riding,
}

/// Things that happened to the rover during an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VehicleEvents {
    pub jumped: bool,
    pub landed: bool,
    pub dismounted: bool,
}

/// The player-controlled rover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Top-left of the sprite box
    pub pos: Vec2,
    pub vel_y: f32,
    pub width: f32,
    /// Current pose height (normal or duck)
    pub height: f32,
    pub jumping: bool,
    pub ducking: bool,
    /// Id of the ground obstacle being ridden
    pub mount: Option<u32>,
    /// Ticks left on the landing pose
    pub landing_ticks: u32,
}

impl Vehicle {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.vehicle_x, tuning.ground_y()),
            vel_y: 0.0,
            width: tuning.vehicle_width,
            height: tuning.vehicle_height,
            jumping: false,
            ducking: false,
            mount: None,
            landing_ticks: 0,
        }
    }

    #[inline]
    pub fn is_riding(&self) -> bool {
        self.mount.is_some()
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.jumping && self.vel_y > 0.0
    }

    /// Full sprite box of the current pose
    pub fn sprite_rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    /// Collision box of the current pose
    pub fn hitbox(&self, tuning: &Tuning) -> Rect {
        let offset = if self.ducking {
            tuning.duck_hitbox_offset
        } else {
            tuning.normal_hitbox_offset
        };
        hitbox(self.sprite_rect(), tuning.hitbox_ratio, offset)
    }

    pub fn pose(&self) -> Pose {
        if self.is_riding() {
            Pose::Riding
        } else if self.jumping {
            Pose::Airborne
        } else if self.ducking {
            Pose::Duck
        } else if self.landing_ticks > 0 {
            Pose::Landing
        } else {
            Pose::Normal
        }
    }

    /// Box the renderer should draw. The landing pose borrows the duck sprite
    /// without touching the physical box.
    pub fn visual_rect(&self, tuning: &Tuning) -> Rect {
        match self.pose() {
            Pose::Landing => Rect::new(
                Vec2::new(self.pos.x, tuning.ground_line - tuning.duck_height),
                Vec2::new(self.width, tuning.duck_height),
            ),
            _ => self.sprite_rect(),
        }
    }

    /// Start a jump. Allowed from the ground when not ducking, or from a mount
    /// (which dismounts first).
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if self.is_riding() {
            self.mount = None;
        } else if self.jumping || self.ducking {
            return false;
        }
        self.jumping = true;
        self.ducking = false;
        self.height = tuning.vehicle_height;
        self.vel_y = tuning.jump_power;
        true
    }

    /// Crouch on the ground
    pub fn duck(&mut self, tuning: &Tuning) {
        self.ducking = true;
        self.height = tuning.duck_height;
        self.pos.y = tuning.ground_y() + (tuning.vehicle_height - tuning.duck_height);
    }

    /// Stand on the ground
    pub fn stand(&mut self, tuning: &Tuning) {
        self.ducking = false;
        self.height = tuning.vehicle_height;
        self.pos.y = tuning.ground_y();
    }

    /// Drop off the mount and start falling from rest
    pub fn dismount(&mut self) {
        self.mount = None;
        self.jumping = true;
        self.vel_y = 0.0;
    }

    /// Land on top of `obstacle` and ride it
    pub fn mount_on(&mut self, obstacle: &Obstacle, tuning: &Tuning) {
        self.mount = Some(obstacle.id);
        self.jumping = false;
        self.ducking = false;
        self.vel_y = 0.0;
        self.height = tuning.vehicle_height;
        self.pos.y = obstacle.pos.y - self.height - tuning.mount_clearance;
    }

    /// Advance one tick: pose, jump request, mount, then gravity.
    ///
    /// The pose follows this tick's duck input before the jump is checked, so
    /// releasing duck and jumping in the same tick jumps. Riding ends once the
    /// mount's trailing edge is at or behind the hitbox's left edge, which
    /// keeps the next collision pass from landing on it again.
    pub fn update(
        &mut self,
        intent: InputIntent,
        obstacles: &ObstacleSet,
        tuning: &Tuning,
    ) -> VehicleEvents {
        let mut events = VehicleEvents::default();

        self.landing_ticks = self.landing_ticks.saturating_sub(1);

        if !self.is_riding() && !self.jumping {
            if intent.duck {
                self.duck(tuning);
            } else {
                self.stand(tuning);
            }
        }

        if intent.jump {
            events.jumped = self.jump(tuning);
        }

        // Mount: ride until the obstacle's trailing edge clears our hitbox
        if let Some(id) = self.mount {
            let left = self.hitbox(tuning).pos.x;
            match obstacles.ground_by_id(id) {
                Some(mount) if mount.rect().right() > left => {
                    self.pos.y = mount.pos.y - self.height - tuning.mount_clearance;
                }
                _ => {
                    self.dismount();
                    events.dismounted = true;
                }
            }
        }

        if self.jumping {
            self.vel_y += tuning.gravity;
            self.pos.y += self.vel_y;

            let ground_y = tuning.ground_y();
            if self.pos.y >= ground_y {
                self.pos.y = ground_y;
                self.vel_y = 0.0;
                self.jumping = false;
                self.mount = None;
                self.landing_ticks = tuning.landing_frames;
                events.landed = true;
            }
        }

        events
    }
}
