//! Rover Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use rover_dash::persistence::LocalStore;
    use rover_dash::renderer::CanvasRenderer;
    use rover_dash::{Game, Settings, Tuning};

    /// Everything the browser callbacks share
    struct App {
        game: Game<LocalStore>,
        renderer: CanvasRenderer,
        settings: Settings,
        canvas: HtmlCanvasElement,
        /// An animation frame is scheduled
        running: bool,
    }

    impl App {
        /// Map a client-space point into canvas pixels
        fn to_canvas(&self, client_x: f64, client_y: f64) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let sx = self.canvas.width() as f64 / rect.width().max(1.0);
            let sy = self.canvas.height() as f64 / rect.height().max(1.0);
            Vec2::new(
                ((client_x - rect.left()) * sx) as f32,
                ((client_y - rect.top()) * sy) as f32,
            )
        }

        fn canvas_height(&self) -> f32 {
            self.canvas.height() as f32
        }

        fn draw(&mut self) {
            let App { game, renderer, .. } = self;
            game.frame(renderer);
        }

        fn settings_changed(&mut self) {
            self.settings.save(self.game.store_mut());
            self.game.apply_settings(&self.settings);
            self.renderer.set_settings(self.settings.clone());
        }
    }

    fn seed() -> u64 {
        js_sys::Date::now() as u64
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Rover Dash starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let store = LocalStore;
        let settings = Settings::load(&store);
        let tuning = Tuning::default();
        canvas.set_width(tuning.canvas_width as u32);
        canvas.set_height(tuning.canvas_height as u32);

        let Some(renderer) = CanvasRenderer::new(&canvas, settings.clone()) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let seed = seed();
        let game = Game::new(tuning, &settings, store, seed);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            settings,
            canvas: canvas.clone(),
            running: false,
        }));

        // Title screen
        app.borrow_mut().draw();

        setup_keyboard(app.clone());
        setup_pointer(&canvas, app.clone());
        setup_touch(&canvas, app.clone());
        setup_viewport(app);

        log::info!("Rover Dash ready");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                {
                    let mut a = app.borrow_mut();
                    match key.as_str() {
                        "i" | "I" => {
                            a.game.toggle_autopilot();
                        }
                        "h" | "H" => {
                            a.settings.show_hitboxes = !a.settings.show_hitboxes;
                            a.settings_changed();
                        }
                        "p" | "P" => {
                            a.settings.particles = !a.settings.particles;
                            a.settings_changed();
                        }
                        _ => {
                            if a.game.key_down(&key, seed()).is_some() {
                                event.prevent_default();
                            }
                        }
                    }
                }
                ensure_running(&app);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                {
                    let mut a = app.borrow_mut();
                    let pos = a.to_canvas(event.client_x() as f64, event.client_y() as f64);
                    let height = a.canvas_height();
                    a.game.pointer_start(pos, height, seed());
                }
                ensure_running(&app);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.pointer_end();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    {
                        let mut a = app.borrow_mut();
                        let pos = a.to_canvas(touch.client_x() as f64, touch.client_y() as f64);
                        let height = a.canvas_height();
                        a.game.pointer_start(pos, height, seed());
                    }
                    ensure_running(&app);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move (swipe down to duck)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let pos = a.to_canvas(touch.client_x() as f64, touch.client_y() as f64);
                    a.game.pointer_move(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().game.pointer_end();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Forced pause on touch devices turned to portrait
    fn setup_viewport(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let is_touch = window.navigator().max_touch_points() > 0;

        let check = {
            let window = window.clone();
            move |app: &Rc<RefCell<App>>| {
                let width = window.inner_width().ok().and_then(|v| v.as_f64());
                let height = window.inner_height().ok().and_then(|v| v.as_f64());
                if let (Some(w), Some(h)) = (width, height) {
                    app.borrow_mut()
                        .game
                        .viewport_changed(w as f32, h as f32, is_touch);
                }
            }
        };
        check(&app);

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            check(&app);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule frames again if a run just started
    fn ensure_running(app: &Rc<RefCell<App>>) {
        let start = {
            let mut a = app.borrow_mut();
            if a.game.is_playing() && !a.running {
                a.running = true;
                true
            } else {
                false
            }
        };
        if start {
            request_animation_frame(app.clone());
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One fixed step per animation frame; stops scheduling once the run
    /// is no longer playing.
    fn game_loop(app: Rc<RefCell<App>>) {
        let keep_going = {
            let mut a = app.borrow_mut();
            let App { game, renderer, .. } = &mut *a;
            let keep_going = game.frame(renderer);
            if !keep_going {
                a.running = false;
            }
            keep_going
        };

        if keep_going {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Headless run cap (ten minutes of 60 Hz frames)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 36_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rover_dash::persistence::MemoryStore;
    use rover_dash::renderer::TraceRenderer;
    use rover_dash::{Game, QualityPreset, Settings};

    env_logger::init();
    log::info!("Rover Dash (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use `trunk serve` to play");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => rover_dash::Tuning::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let preset = std::env::args()
        .nth(2)
        .and_then(|arg| QualityPreset::parse(&arg))
        .unwrap_or(QualityPreset::Medium);
    log::info!("Quality preset: {}", preset.as_str());
    let settings = Settings::from_preset(preset);

    let mut game = Game::new(tuning, &settings, MemoryStore::new(), seed);
    game.toggle_autopilot();
    game.start(seed);

    let mut renderer = TraceRenderer::new(300);
    while renderer.frames < MAX_FRAMES && game.frame(&mut renderer) {}

    let score = game.final_score().unwrap_or(game.session.score);
    log::info!(
        "Demo finished after {} frames (peak {} obstacles on screen)",
        renderer.frames,
        renderer.peak_obstacles
    );
    println!("seed {} score {} frames {}", seed, score, renderer.frames);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> rover_dash::Tuning {
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| rover_dash::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Could not load tuning from {}: {} (using defaults)", path, e);
            rover_dash::Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
