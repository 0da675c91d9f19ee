//! Fixed-step simulation tick
//!
//! One call advances the run by one animation frame. Phases run in a fixed
//! order and each observes the state left by the phases before it:
//! clock, difficulty, scoring, rover, obstacle scroll, spawning, particles,
//! collision.

use glam::Vec2;

use super::collision::resolve;
use super::difficulty::{day_phase, speed_at};
use super::spawn::spawn_obstacles;
use super::state::{GameEvent, GamePhase, GameSession};
use super::vehicle::InputIntent;

/// Dust kicked up by a jump or landing
const DUST_PARTICLES: usize = 6;
/// Debris thrown on a crash
const CRASH_PARTICLES: usize = 24;

/// Begin a new run. Only valid from `Waiting` or `GameOver`; every piece of
/// run state is rebuilt. Returns false (and does nothing) while playing.
pub fn start(state: &mut GameSession, seed: u64) -> bool {
    if state.phase == GamePhase::Playing {
        return false;
    }
    state.reset(seed);
    state.phase = GamePhase::Playing;
    log::info!("Run started (seed {})", seed);
    true
}

/// Drop out of play back to the title screen (e.g. the viewport turned
/// portrait). The run cannot be resumed; the next start resets it.
pub fn force_pause(state: &mut GameSession) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    state.phase = GamePhase::Waiting;
    log::info!("Run paused at frame {} (score {})", state.frame, state.score);
    true
}

/// Advance the run by one tick. No-op unless playing.
pub fn tick(state: &mut GameSession, intent: InputIntent) {
    if state.phase != GamePhase::Playing {
        return;
    }

    // Clock
    state.frame += 1;

    // Difficulty and day/night
    state.speed = speed_at(state.frame, &state.tuning);
    state.day_phase = day_phase(state.frame, state.tuning.day_cycle_frames);

    // Survival credit
    if state.frame.is_multiple_of(u64::from(state.tuning.score_interval.max(1))) {
        state.score += 1;
    }

    // Rover
    let moved = state.vehicle.update(intent, &state.obstacles, &state.tuning);
    let feet = Vec2::new(
        state.vehicle.pos.x + state.vehicle.width * 0.5,
        state.tuning.ground_line,
    );
    if moved.jumped {
        state.events.push(GameEvent::Jumped);
        state.spawn_burst(feet, DUST_PARTICLES, 1.5);
    }
    if moved.dismounted {
        state.events.push(GameEvent::Dismounted);
    }
    if moved.landed {
        state.events.push(GameEvent::Landed);
        state.spawn_burst(feet, DUST_PARTICLES, 1.0);
    }

    // Obstacle scroll and pass credit
    let aerial_speed = state.speed * state.tuning.aerial_speed_factor;
    let passed = state.obstacles.advance(
        state.speed,
        aerial_speed,
        state.frame,
        state.tuning.flap_frames,
    );
    if passed.points > 0 {
        state.score += passed.points;
        state.events.push(GameEvent::ObstaclePassed {
            points: passed.points,
        });
    }

    // Spawning
    spawn_obstacles(state);

    // Particles
    state.update_particles();

    // Collision
    let resolution = resolve(&mut state.vehicle, &state.obstacles, &state.tuning);
    if resolution.dropped_mount {
        state.events.push(GameEvent::Dismounted);
    }
    if let Some(id) = resolution.mounted {
        log::debug!("Mounted #{} at frame {}", id, state.frame);
        state.events.push(GameEvent::Mounted { id });
    }
    if let Some(hit) = resolution.hit {
        state.phase = GamePhase::GameOver;
        let center = state.vehicle.sprite_rect().pos
            + Vec2::new(state.vehicle.width, state.vehicle.height) * 0.5;
        state.spawn_burst(center, CRASH_PARTICLES, 3.0);
        state.events.push(GameEvent::GameOver {
            score: state.score,
            hit,
        });
        log::info!(
            "Game over: hit {:?} at frame {} with score {}",
            hit,
            state.frame,
            state.score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{FlyingObstacle, GroundKind, Obstacle, ObstacleKind};
    use crate::sim::spawn::ObstacleClass;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Tuning with spawning pushed far into the future
    fn quiet_tuning() -> Tuning {
        Tuning {
            initial_ground_delay: 100_000,
            initial_aerial_delay: 100_000,
            ..Tuning::default()
        }
    }

    fn playing(tuning: Tuning) -> GameSession {
        let mut state = GameSession::new(tuning, 42);
        assert!(start(&mut state, 42));
        state
    }

    #[test]
    fn test_tick_is_noop_unless_playing() {
        let mut state = GameSession::new(Tuning::default(), 1);
        tick(&mut state, InputIntent::default());
        assert_eq!(state.frame, 0);
        assert_eq!(state.phase, GamePhase::Waiting);
    }

    #[test]
    fn test_start_is_noop_while_playing() {
        let mut state = playing(quiet_tuning());
        for _ in 0..10 {
            tick(&mut state, InputIntent::default());
        }
        assert!(!start(&mut state, 9));
        assert_eq!(state.frame, 10);
    }

    #[test]
    fn test_survival_score_after_299_ticks() {
        let mut state = playing(quiet_tuning());
        let speed = state.speed;
        for _ in 0..299 {
            tick(&mut state, InputIntent::default());
        }
        assert_eq!(state.speed, speed);
        assert_eq!(state.score, 59);
        assert_eq!(state.phase, GamePhase::Playing);

        // Difficulty steps up on frame 300
        tick(&mut state, InputIntent::default());
        assert!(state.speed > speed);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = playing(quiet_tuning());
        let id = state.next_entity_id();
        let x = state.vehicle.pos.x + 10.0 + state.speed;
        let ground_line = state.tuning.ground_line;
        state
            .obstacles
            .ground
            .push(Obstacle::new(id, GroundKind::Tall, x, ground_line));

        tick(&mut state, InputIntent::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                hit: ObstacleKind::Ground(GroundKind::Tall),
                ..
            }
        )));

        // Frozen after game over
        let frame = state.frame;
        tick(&mut state, InputIntent::default());
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_ducking_under_low_flyer_survives() {
        let mut state = playing(quiet_tuning());
        let id = state.next_entity_id();
        let ground_line = state.tuning.ground_line;
        let x = state.vehicle.pos.x;
        state
            .obstacles
            .aerial
            .push(FlyingObstacle::new(id, x, 25.0, ground_line));

        let duck = InputIntent {
            jump: false,
            duck: true,
        };
        for _ in 0..20 {
            tick(&mut state, duck);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_landing_on_truck_then_riding_it_off() {
        let mut state = playing(quiet_tuning());
        let id = state.next_entity_id();
        let ground_line = state.tuning.ground_line;
        state
            .obstacles
            .ground
            .push(Obstacle::new(id, GroundKind::Truck, 230.0, ground_line));

        let mut mounted = false;
        let mut dismounted = false;
        tick(&mut state, InputIntent { jump: true, duck: false });
        for _ in 0..200 {
            tick(&mut state, InputIntent::default());
            for event in state.drain_events() {
                match event {
                    GameEvent::Mounted { id: m } => {
                        assert_eq!(m, id);
                        mounted = true;
                    }
                    GameEvent::Dismounted => dismounted = true,
                    _ => {}
                }
            }
            assert_eq!(state.phase, GamePhase::Playing);
        }
        assert!(mounted);
        assert!(dismounted);
        assert!(!state.vehicle.is_riding());
    }

    #[test]
    fn test_mount_removed_offscreen_forces_dismount() {
        let mut state = playing(quiet_tuning());
        let id = state.next_entity_id();
        let ground_line = state.tuning.ground_line;
        state
            .obstacles
            .ground
            .push(Obstacle::new(id, GroundKind::Truck, 20.0, ground_line));
        let truck = state.obstacles.ground[0].clone();
        state.vehicle.mount_on(&truck, &state.tuning);

        state.obstacles.ground.clear();
        tick(&mut state, InputIntent::default());
        assert!(!state.vehicle.is_riding());
        assert!(state.events.contains(&GameEvent::Dismounted));
    }

    #[test]
    fn test_restart_resets_every_field() {
        let tuning = Tuning::default();
        let mut state = playing(tuning.clone());
        // Dirty the session
        for i in 0..400 {
            tick(&mut state, InputIntent { jump: i % 40 == 0, duck: false });
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        state.phase = GamePhase::GameOver;
        state.spawn_burst(Vec2::ZERO, 10, 1.0);
        assert!(state.frame > 0);

        assert!(start(&mut state, 5));
        let mut fresh = GameSession::new(tuning, 5);
        fresh.phase = GamePhase::Playing;

        assert_eq!(state.frame, fresh.frame);
        assert_eq!(state.score, fresh.score);
        assert_eq!(state.speed, fresh.speed);
        assert_eq!(state.day_phase, fresh.day_phase);
        assert_eq!(state.vehicle, fresh.vehicle);
        assert_eq!(state.obstacles, fresh.obstacles);
        assert_eq!(state.schedule, fresh.schedule);
        assert_eq!(state.particles, fresh.particles);
        assert_eq!(state.events, fresh.events);
        assert_eq!(state.next_entity_id(), fresh.next_entity_id());

        // Same seed, same run from here on
        for _ in 0..200 {
            tick(&mut state, InputIntent::default());
            tick(&mut fresh, InputIntent::default());
        }
        assert_eq!(state.obstacles, fresh.obstacles);
        assert_eq!(state.score, fresh.score);
    }

    #[test]
    fn test_spawns_happen_during_play() {
        let mut state = playing(Tuning::default());
        let mut spawned = 0;
        for _ in 0..120 {
            tick(&mut state, InputIntent::default());
            spawned += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Spawned { class: ObstacleClass::Ground, .. }))
                .count();
        }
        assert!(spawned >= 1);
    }

    #[test]
    fn test_force_pause_only_from_playing() {
        let mut state = GameSession::new(Tuning::default(), 1);
        assert!(!force_pause(&mut state));
        start(&mut state, 1);
        assert!(force_pause(&mut state));
        assert_eq!(state.phase, GamePhase::Waiting);
        tick(&mut state, InputIntent::default());
        assert_eq!(state.frame, 0);
    }

    proptest! {
        #[test]
        fn prop_score_never_decreases(
            seed in any::<u64>(),
            inputs in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..400),
        ) {
            let mut state = GameSession::new(Tuning::default(), seed);
            start(&mut state, seed);
            let mut last = state.score;
            for (jump, duck) in inputs {
                tick(&mut state, InputIntent { jump, duck });
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }
    }
}
