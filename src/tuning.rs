//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults reproduce the shipped
//! balance; a JSON document may override any subset of fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Spawn interval configuration for one obstacle class (in frames)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalTuning {
    /// Minimum interval at zero difficulty
    pub base_min: u32,
    /// Maximum interval at zero difficulty
    pub base_max: u32,
    /// The minimum interval never drops below this
    pub floor_cap: u32,
    /// Guaranteed gap between the min and max of the window
    pub min_spacing: u32,
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Y of the ground surface (vehicle bottom when grounded)
    pub ground_line: f32,

    // === Vehicle ===
    pub vehicle_x: f32,
    pub vehicle_width: f32,
    pub vehicle_height: f32,
    pub duck_height: f32,
    pub gravity: f32,
    /// Initial vertical velocity of a jump (negative = up)
    pub jump_power: f32,
    /// Ticks the landing pose is shown after touching down
    pub landing_frames: u32,

    // === Hitboxes ===
    /// Fraction of the sprite box used for collision
    pub hitbox_ratio: f32,
    /// Explicit hitbox offset for the normal pose (None = centered)
    pub normal_hitbox_offset: Option<Vec2>,
    /// Explicit hitbox offset for the duck pose (None = centered)
    pub duck_hitbox_offset: Option<Vec2>,

    // === Mounting ===
    /// Landing band above the mount top edge
    pub mount_tolerance_above: f32,
    /// Landing band below the mount top edge
    pub mount_tolerance_below: f32,
    /// Gap kept between the vehicle and the mount while riding
    pub mount_clearance: f32,
    /// Score required before mountable obstacles appear
    pub mount_score_threshold: u64,

    // === Difficulty ===
    pub base_speed: f32,
    pub speed_increment: f32,
    /// Frames between difficulty steps
    pub speed_increase_interval: u32,
    /// Frames removed from spawn intervals per difficulty step
    pub interval_decrease_rate: u32,
    pub ground_interval: IntervalTuning,
    pub aerial_interval: IntervalTuning,
    /// Aerial obstacles move this much faster than the ground
    pub aerial_speed_factor: f32,

    // === Spawning ===
    pub initial_ground_delay: u32,
    pub initial_aerial_delay: u32,
    /// Short reschedule used when a spawn is suppressed
    pub retry_delay: u32,
    /// Horizontal distance from the right edge the other class must clear
    pub safe_distance: f32,
    /// Aerial obstacles stay disabled until the score exceeds this
    pub aerial_score_threshold: u64,
    /// Discrete heights (bottom edge above the ground line) for flyers
    pub flyer_heights: Vec<f32>,
    /// Ticks per flap frame
    pub flap_frames: u32,

    // === Scoring / presentation ===
    /// One survival point every N frames
    pub score_interval: u32,
    /// Frames per full day/night cycle
    pub day_cycle_frames: u32,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 300.0,
            ground_line: 250.0,

            vehicle_x: 50.0,
            vehicle_width: 44.0,
            vehicle_height: 50.0,
            duck_height: 30.0,
            gravity: 0.8,
            jump_power: -15.0,
            landing_frames: 6,

            hitbox_ratio: 0.7,
            normal_hitbox_offset: None,
            // Duck sprite carries its weight low
            duck_hitbox_offset: Some(Vec2::new(6.6, 7.0)),

            mount_tolerance_above: 5.0,
            mount_tolerance_below: 10.0,
            mount_clearance: 2.0,
            mount_score_threshold: 150,

            base_speed: 6.0,
            speed_increment: 0.5,
            speed_increase_interval: 300,
            interval_decrease_rate: 5,
            ground_interval: IntervalTuning {
                base_min: 60,
                base_max: 120,
                floor_cap: 35,
                min_spacing: 20,
            },
            aerial_interval: IntervalTuning {
                base_min: 150,
                base_max: 250,
                floor_cap: 80,
                min_spacing: 40,
            },
            aerial_speed_factor: 1.15,

            initial_ground_delay: 60,
            initial_aerial_delay: 120,
            retry_delay: 10,
            safe_distance: 250.0,
            aerial_score_threshold: 100,
            flyer_heights: vec![25.0, 55.0, 85.0],
            flap_frames: 10,

            score_interval: 5,
            day_cycle_frames: 1800,
            max_particles: 64,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON balance table over the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Y of the vehicle's top edge when standing on the ground
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.ground_line - self.vehicle_height
    }
}
