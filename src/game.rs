//! Run lifecycle host
//!
//! Owns one [`GameSession`] plus everything that outlives a run: the best
//! score, its store, the input state and the demo toggle. Platform shells
//! forward raw events here and call [`Game::frame`] once per animation
//! frame.

use glam::Vec2;

use crate::highscores::HighScore;
use crate::persistence::KvStore;
use crate::platform::{self, Action, InputState};
use crate::renderer::{Renderer, Snapshot};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, GameSession, autopilot};
use crate::tuning::Tuning;

pub struct Game<S: KvStore> {
    pub session: GameSession,
    pub high_score: HighScore,
    pub input: InputState,
    /// Let the autopilot drive instead of the player
    pub autopilot: bool,
    store: S,
    final_score: Option<u64>,
}

impl<S: KvStore> Game<S> {
    pub fn new(mut tuning: Tuning, settings: &Settings, store: S, seed: u64) -> Self {
        tuning.max_particles = settings.max_particles();
        let high_score = HighScore::load(&store);
        Self {
            session: GameSession::new(tuning, seed),
            high_score,
            input: InputState::new(),
            autopilot: false,
            store,
            final_score: None,
        }
    }

    /// Pick up changed presentation settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.session.tuning.max_particles = settings.max_particles();
        self.session.particles.truncate(settings.max_particles());
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    /// Score of the last finished run, if any
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Begin a run from `Waiting` or `GameOver`. Every start path lands
    /// here so a run always begins from the same state.
    pub fn start(&mut self, seed: u64) -> bool {
        if !sim::start(&mut self.session, seed) {
            return false;
        }
        self.input.clear();
        self.final_score = None;
        true
    }

    pub fn force_pause(&mut self) -> bool {
        let paused = sim::force_pause(&mut self.session);
        if paused {
            self.input.clear();
        }
        paused
    }

    /// Key pressed. A jump key outside a run starts one instead of jumping.
    pub fn key_down(&mut self, key: &str, seed: u64) -> Option<Action> {
        if !self.is_playing() {
            let action = platform::action_for_key(key);
            if action == Some(Action::Jump) {
                self.start(seed);
            }
            return action;
        }
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Touch/click on the canvas. Any tap outside a run starts one.
    pub fn pointer_start(&mut self, pos: Vec2, viewport_height: f32, seed: u64) {
        if !self.is_playing() {
            self.start(seed);
            return;
        }
        self.input.pointer_start(pos, viewport_height);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.input.pointer_move(pos);
    }

    pub fn pointer_end(&mut self) {
        self.input.pointer_end();
    }

    /// Viewport resized or rotated
    pub fn viewport_changed(&mut self, width: f32, height: f32, is_touch: bool) {
        if platform::should_force_pause(is_touch, width, height) && self.force_pause() {
            log::info!("Paused: rotate to landscape to keep playing");
        }
    }

    pub fn toggle_autopilot(&mut self) -> bool {
        self.autopilot = !self.autopilot;
        log::info!("Autopilot: {}", self.autopilot);
        self.autopilot
    }

    /// Advance one tick and settle the high score when the run ends
    pub fn tick(&mut self) {
        if !self.is_playing() {
            return;
        }
        let intent = if self.autopilot {
            autopilot::drive(&self.session)
        } else {
            self.input.intent()
        };
        sim::tick(&mut self.session, intent);

        if self.session.phase == GamePhase::GameOver {
            let score = self.session.score;
            self.final_score = Some(score);
            self.high_score.submit(score, &mut self.store);
        }
    }

    /// One animation frame: tick, drain events, draw. Returns whether the
    /// host should schedule another frame.
    pub fn frame(&mut self, renderer: &mut impl Renderer) -> bool {
        self.tick();
        self.drain_events();
        renderer.render(&self.snapshot());
        self.is_playing()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(&self.session, self.high_score.best())
    }

    /// Take this tick's events, tracing the interesting ones
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let events = self.session.drain_events();
        for event in &events {
            match event {
                GameEvent::Mounted { id } => log::debug!("Riding obstacle {}", id),
                GameEvent::SpawnSuppressed { class } => {
                    log::trace!("{:?} spawn held back", class)
                }
                GameEvent::GameOver { score, hit } => {
                    log::debug!("Crashed into {:?} with {} points", hit, score)
                }
                _ => {}
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::STORAGE_KEY;
    use crate::persistence::MemoryStore;
    use crate::renderer::TraceRenderer;

    fn new_game(store: MemoryStore) -> Game<MemoryStore> {
        Game::new(Tuning::default(), &Settings::default(), store, 7)
    }

    fn run_until_over(game: &mut Game<MemoryStore>) {
        for _ in 0..10_000 {
            if !game.is_playing() {
                break;
            }
            game.tick();
        }
    }

    #[test]
    fn test_jump_key_starts_run() {
        let mut game = new_game(MemoryStore::new());
        assert_eq!(game.phase(), GamePhase::Waiting);
        game.key_down(" ", 1);
        assert!(game.is_playing());
        // The starting press is not carried into the run
        assert!(!game.input.intent().jump);
    }

    #[test]
    fn test_duck_key_does_not_start() {
        let mut game = new_game(MemoryStore::new());
        game.key_down("ArrowDown", 1);
        assert_eq!(game.phase(), GamePhase::Waiting);
    }

    #[test]
    fn test_key_and_tap_start_identically() {
        let mut by_key = new_game(MemoryStore::new());
        let mut by_tap = new_game(MemoryStore::new());
        by_key.key_down(" ", 99);
        by_tap.pointer_start(Vec2::new(400.0, 250.0), 300.0, 99);

        for _ in 0..120 {
            by_key.tick();
            by_tap.tick();
        }
        assert_eq!(by_key.session.frame, by_tap.session.frame);
        assert_eq!(by_key.session.score, by_tap.session.score);
        assert_eq!(by_key.session.vehicle, by_tap.session.vehicle);
        assert_eq!(by_key.session.obstacles, by_tap.session.obstacles);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut game = new_game(MemoryStore::new());
        assert!(game.start(3));
        for _ in 0..20 {
            game.tick();
        }
        assert!(!game.start(4));
        assert_eq!(game.session.frame, 20);
        assert_eq!(game.session.seed, 3);
    }

    #[test]
    fn test_game_over_persists_high_score() {
        let mut game = new_game(MemoryStore::new());
        game.start(5);
        run_until_over(&mut game);

        assert_eq!(game.phase(), GamePhase::GameOver);
        let score = game.final_score().unwrap();
        assert!(score > 0);
        assert_eq!(game.high_score.best(), score);
        assert_eq!(game.store().get(STORAGE_KEY), Some(score.to_string()));

        // A reload sees the same best
        let reloaded = HighScore::load(game.store());
        assert_eq!(reloaded.best(), score);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "100000");
        let mut game = new_game(store);
        game.start(5);
        run_until_over(&mut game);
        assert_eq!(game.high_score.best(), 100_000);
        assert_eq!(game.store().get(STORAGE_KEY).as_deref(), Some("100000"));
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = new_game(MemoryStore::new());
        game.start(5);
        run_until_over(&mut game);
        game.key_down("ArrowUp", 6);
        assert!(game.is_playing());
        assert_eq!(game.session.frame, 0);
        assert_eq!(game.session.score, 0);
        assert!(game.final_score().is_none());
    }

    #[test]
    fn test_portrait_touch_forces_pause() {
        let mut game = new_game(MemoryStore::new());
        game.start(1);
        game.viewport_changed(800.0, 600.0, true);
        assert!(game.is_playing());
        game.viewport_changed(390.0, 844.0, true);
        assert_eq!(game.phase(), GamePhase::Waiting);
        // Pausing never touches the best score
        assert_eq!(game.high_score.best(), 0);
    }

    #[test]
    fn test_desktop_run_survives_resize_and_records_score() {
        let mut game = new_game(MemoryStore::new());
        game.start(5);
        for _ in 0..30 {
            game.tick();
        }
        // Narrow desktop window: no pause, the run carries on to its score
        game.viewport_changed(390.0, 844.0, false);
        assert!(game.is_playing());

        run_until_over(&mut game);
        let score = game.final_score().unwrap();
        assert_eq!(game.high_score.best(), score);
        assert_eq!(game.store().get(STORAGE_KEY), Some(score.to_string()));
    }

    #[test]
    fn test_release_duck_then_jump_same_frame() {
        let mut game = new_game(MemoryStore::new());
        game.start(5);
        game.key_down("ArrowDown", 0);
        game.tick();
        assert!(game.session.vehicle.ducking);

        game.key_up("ArrowDown");
        game.key_down(" ", 0);
        game.tick();
        assert!(game.session.vehicle.jumping);
    }

    #[test]
    fn test_frame_stops_after_game_over() {
        let mut game = new_game(MemoryStore::new());
        let mut renderer = TraceRenderer::new(0);
        assert!(!game.frame(&mut renderer));

        game.start(5);
        let mut frames = 0;
        while game.frame(&mut renderer) {
            frames += 1;
            assert!(frames < 10_000);
        }
        assert_eq!(renderer.last_phase, Some(GamePhase::GameOver));
        assert_eq!(renderer.last_score, game.final_score().unwrap());
    }
}
