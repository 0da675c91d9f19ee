//! Obstacle spawning
//!
//! Each class keeps its own next-spawn frame. A due spawn is suppressed when
//! the other class has just put something near the right edge, since a ground
//! and an aerial obstacle arriving together can demand incompatible poses.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::class_bounds;
use super::obstacle::{FlyingObstacle, GroundKind, Obstacle};
use super::state::{GameEvent, GameSession};
use crate::tuning::Tuning;

/// The two independently scheduled obstacle streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleClass {
    Ground,
    Aerial,
}

impl ObstacleClass {
    pub fn other(self) -> Self {
        match self {
            ObstacleClass::Ground => ObstacleClass::Aerial,
            ObstacleClass::Aerial => ObstacleClass::Ground,
        }
    }
}

/// Frame at which each class may next spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    pub next_ground: u64,
    pub next_aerial: u64,
}

impl SpawnSchedule {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            next_ground: u64::from(tuning.initial_ground_delay),
            next_aerial: u64::from(tuning.initial_aerial_delay),
        }
    }

    pub fn next(&self, class: ObstacleClass) -> u64 {
        match class {
            ObstacleClass::Ground => self.next_ground,
            ObstacleClass::Aerial => self.next_aerial,
        }
    }

    pub fn set(&mut self, class: ObstacleClass, frame: u64) {
        match class {
            ObstacleClass::Ground => self.next_ground = frame,
            ObstacleClass::Aerial => self.next_aerial = frame,
        }
    }
}

/// What a spawn attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// Not this class's turn yet
    NotDue,
    /// Class is locked at the current score
    Locked,
    /// Deferred by the anti-overlap rule; retried at `retry_at`
    Suppressed { retry_at: u64 },
    Spawned { id: u32, next_at: u64 },
}

/// Ground archetypes available at `score`. Mountable ones unlock late.
pub fn unlocked_ground_kinds(score: u64, tuning: &Tuning) -> &'static [GroundKind] {
    if score >= tuning.mount_score_threshold {
        &GroundKind::ALL
    } else {
        &GroundKind::COMMON
    }
}

/// Whether the other class's newest obstacle is still within the safe
/// distance of the right edge
fn blocked_by_other(state: &GameSession, class: ObstacleClass) -> bool {
    state
        .latest_x(class.other())
        .is_some_and(|x| state.tuning.canvas_width - x < state.tuning.safe_distance)
}

/// Draw the next interval for a class and return the frame it lands on
fn schedule_next(state: &mut GameSession, class: ObstacleClass) -> u64 {
    let bounds = match class {
        ObstacleClass::Ground => state.tuning.ground_interval,
        ObstacleClass::Aerial => state.tuning.aerial_interval,
    };
    let (min, max) = class_bounds(state.frame, &bounds, &state.tuning);
    let interval = state.rng.random_range(min..=max);
    let next_at = state.frame + u64::from(interval);
    state.schedule.set(class, next_at);
    next_at
}

/// Try to spawn one obstacle of `class` this frame
pub fn attempt(state: &mut GameSession, class: ObstacleClass) -> SpawnOutcome {
    if state.frame < state.schedule.next(class) {
        return SpawnOutcome::NotDue;
    }

    if class == ObstacleClass::Aerial
        && (state.score <= state.tuning.aerial_score_threshold
            || state.tuning.flyer_heights.is_empty())
    {
        return SpawnOutcome::Locked;
    }

    if blocked_by_other(state, class) {
        let retry_at = state.frame + u64::from(state.tuning.retry_delay);
        state.schedule.set(class, retry_at);
        log::debug!("{:?} spawn suppressed at frame {}, retry at {}", class, state.frame, retry_at);
        return SpawnOutcome::Suppressed { retry_at };
    }

    let id = state.next_entity_id();
    let x = state.tuning.canvas_width;
    let ground_line = state.tuning.ground_line;
    match class {
        ObstacleClass::Ground => {
            let kinds = unlocked_ground_kinds(state.score, &state.tuning);
            let kind = kinds[state.rng.random_range(0..kinds.len())];
            state.obstacles.ground.push(Obstacle::new(id, kind, x, ground_line));
            log::debug!("Spawned {:?} #{} at frame {}", kind, id, state.frame);
        }
        ObstacleClass::Aerial => {
            let heights = &state.tuning.flyer_heights;
            let height = heights[state.rng.random_range(0..heights.len())];
            state
                .obstacles
                .aerial
                .push(FlyingObstacle::new(id, x, height, ground_line));
            log::debug!("Spawned flyer #{} at height {} frame {}", id, height, state.frame);
        }
    }

    let next_at = schedule_next(state, class);
    SpawnOutcome::Spawned { id, next_at }
}

/// Run the spawner for both classes (ground first) and record events
pub fn spawn_obstacles(state: &mut GameSession) {
    for class in [ObstacleClass::Ground, ObstacleClass::Aerial] {
        match attempt(state, class) {
            SpawnOutcome::Spawned { id, .. } => state.events.push(GameEvent::Spawned { class, id }),
            SpawnOutcome::Suppressed { .. } => {
                state.events.push(GameEvent::SpawnSuppressed { class })
            }
            SpawnOutcome::NotDue | SpawnOutcome::Locked => {}
        }
    }
}
