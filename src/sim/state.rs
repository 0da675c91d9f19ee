//! Game session and core simulation types
//!
//! A [`GameSession`] owns every piece of mutable run state. Starting a run
//! rebuilds it from scratch, so nothing leaks from one run to the next.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacle::{ObstacleKind, ObstacleSet};
use super::spawn::{ObstacleClass, SpawnSchedule};
use super::vehicle::Vehicle;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start input
    Waiting,
    /// Active gameplay
    Playing,
    /// Run ended by a collision
    GameOver,
}

/// Notable things that happened during a tick (drained by the host)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Landed,
    Mounted { id: u32 },
    Dismounted,
    Spawned { class: ObstacleClass, id: u32 },
    SpawnSuppressed { class: ObstacleClass },
    ObstaclePassed { points: u64 },
    GameOver { score: u64, hit: ObstacleKind },
}

/// A dust/debris particle (visual only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Downward pull on particles
const PARTICLE_GRAVITY: f32 = 0.15;
/// Life lost per tick
const PARTICLE_FADE: f32 = 0.04;

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Balance table for this session
    pub tuning: Tuning,
    /// Run seed
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Ticks elapsed in this run
    pub frame: u64,
    pub score: u64,
    /// Current forward speed (pixels per tick)
    pub speed: f32,
    /// Day/night cycle position in [0, 1)
    pub day_phase: f32,
    pub vehicle: Vehicle,
    pub obstacles: ObstacleSet,
    pub schedule: SpawnSchedule,
    pub particles: Vec<Particle>,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameSession {
    /// Fresh session in the `Waiting` phase
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Waiting,
            frame: 0,
            score: 0,
            speed: tuning.base_speed,
            day_phase: 0.0,
            vehicle: Vehicle::new(&tuning),
            obstacles: ObstacleSet::new(),
            schedule: SpawnSchedule::new(&tuning),
            particles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Rebuild every field for a new run, keeping only the balance table
    pub fn reset(&mut self, seed: u64) {
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::new(tuning, seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Emit a burst of particles around `origin`, respecting the cap
    pub fn spawn_burst(&mut self, origin: Vec2, count: usize, spread: f32) {
        let room = self.tuning.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                self.rng.random_range(-spread..=spread),
                self.rng.random_range(-spread * 1.5..=0.0),
            );
            let size = self.rng.random_range(1.5..=3.5);
            self.particles.push(Particle {
                pos: origin,
                vel,
                life: 1.0,
                size,
            });
        }
    }

    /// Move particles and drop the faded ones
    pub fn update_particles(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.vel.y += PARTICLE_GRAVITY;
            particle.life -= PARTICLE_FADE;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Most recently spawned obstacle box of a class, if still on screen
    pub fn latest_x(&self, class: ObstacleClass) -> Option<f32> {
        match class {
            ObstacleClass::Ground => self.obstacles.ground.last().map(|o| o.pos.x),
            ObstacleClass::Aerial => self.obstacles.aerial.last().map(|f| f.pos.x),
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_waiting() {
        let session = GameSession::new(Tuning::default(), 1);
        assert_eq!(session.phase, GamePhase::Waiting);
        assert_eq!(session.score, 0);
        assert_eq!(session.frame, 0);
        assert!(session.obstacles.ground.is_empty());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut session = GameSession::new(Tuning::default(), 1);
        let a = session.next_entity_id();
        let b = session.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_particles_are_capped_and_fade() {
        let tuning = Tuning {
            max_particles: 5,
            ..Tuning::default()
        };
        let mut session = GameSession::new(tuning, 3);
        session.spawn_burst(Vec2::new(10.0, 10.0), 20, 2.0);
        assert_eq!(session.particles.len(), 5);

        for _ in 0..100 {
            session.update_particles();
        }
        assert!(session.particles.is_empty());
    }

    #[test]
    fn test_reset_keeps_tuning() {
        let tuning = Tuning {
            gravity: 2.0,
            ..Tuning::default()
        };
        let mut session = GameSession::new(tuning, 1);
        session.score = 99;
        session.reset(2);
        assert_eq!(session.tuning.gravity, 2.0);
        assert_eq!(session.score, 0);
        assert_eq!(session.seed, 2);
    }
}
