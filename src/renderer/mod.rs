//! Rendering boundary
//!
//! The simulation never draws. Each frame the host hands a read-only
//! [`Snapshot`] to a [`Renderer`], which owns all pixel output.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod trace;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use trace::TraceRenderer;

use crate::sim::{FlyingObstacle, GamePhase, GameSession, Obstacle, Particle, Pose, Rect};

/// Everything a renderer may read for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub frame: u64,
    pub score: u64,
    pub high_score: u64,
    pub speed: f32,
    /// Day/night cycle position in [0, 1)
    pub day_phase: f32,
    pub vehicle_pose: Pose,
    /// Box to draw the rover sprite in
    pub vehicle_rect: Rect,
    pub vehicle_hitbox: Rect,
    pub ground: &'a [Obstacle],
    pub aerial: &'a [FlyingObstacle],
    pub particles: &'a [Particle],
    pub ground_line: f32,
    pub width: f32,
    pub height: f32,
}

impl<'a> Snapshot<'a> {
    pub fn capture(session: &'a GameSession, high_score: u64) -> Self {
        let tuning = &session.tuning;
        Self {
            phase: session.phase,
            frame: session.frame,
            score: session.score,
            high_score,
            speed: session.speed,
            day_phase: session.day_phase,
            vehicle_pose: session.vehicle.pose(),
            vehicle_rect: session.vehicle.visual_rect(tuning),
            vehicle_hitbox: session.vehicle.hitbox(tuning),
            ground: &session.obstacles.ground,
            aerial: &session.obstacles.aerial,
            particles: &session.particles,
            ground_line: tuning.ground_line,
            width: tuning.canvas_width,
            height: tuning.canvas_height,
        }
    }

    /// Night is the middle half of the cycle, darkest at 0.5
    pub fn is_night(&self) -> bool {
        (0.25..0.75).contains(&self.day_phase)
    }
}

/// Consumer of per-frame snapshots
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot<'_>);
}
