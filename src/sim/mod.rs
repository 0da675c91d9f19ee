//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per animation frame
//! - Seeded RNG only
//! - Spawn-ordered obstacle collections
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod obstacle;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use collision::{Rect, Resolution, hitbox, lands_on_top, resolve};
pub use difficulty::{day_phase, interval_bounds, speed_at};
pub use obstacle::{
    FLYER_POINTS, FLYER_SIZE, FlyingObstacle, GroundKind, Obstacle, ObstacleKind, ObstacleSet,
};
pub use spawn::{ObstacleClass, SpawnOutcome, SpawnSchedule};
pub use state::{GameEvent, GamePhase, GameSession, Particle};
pub use tick::{force_pause, start, tick};
pub use vehicle::{InputIntent, Pose, Vehicle};
