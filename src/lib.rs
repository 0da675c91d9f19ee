//! Rover Dash - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rover physics, obstacles, spawning, collisions)
//! - `game`: Run lifecycle host tying input, simulation and high score together
//! - `renderer`: Snapshot boundary plus Canvas 2D and headless renderers
//! - `platform`: Keyboard/touch input mapping and viewport rules
//! - `persistence`: Key/value storage (LocalStorage or in-memory)
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;
