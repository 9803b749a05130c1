// Library surface for headless/integration tests and reuse.
// main.rs only wires the terminal, config and logging around `game::Game`.
pub mod app_dirs;
pub mod celebration;
pub mod clipboard;
pub mod config;
pub mod game;
pub mod generator;
pub mod keys;
pub mod layout;
pub mod logging;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod terminal;
pub mod timers;
pub mod ui;
pub mod validate;
pub mod variant;

/// Default interval between ticks, driving deferred actions and animation
pub const TICK_RATE_MS: u64 = 100;
