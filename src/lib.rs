//! Escapae - a wrapped-canvas arcade chase game
//!
//! Core modules:
//! - `sim`: Simulation core (player, chaser AI, interactions, spawners)
//! - `tuning`: Data-driven spawner balance
//! - `settings`: Host preferences (volume, debug overlay)
//! - `highscores`: Remote high score service client
//! - `audio`: Event cues (Web Audio playback on wasm32)
//! - `renderer`: Canvas 2D drawing (wasm32)

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use highscores::HighScoreBoard;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
///
/// Speeds are in pixels per tick, durations in sim-clock milliseconds.
pub mod consts {
    /// Player base speed
    pub const PLAYER_SPEED: f32 = 1.2;
    /// Player speed while a crate boost is active
    pub const PLAYER_BOOST_SPEED: f32 = 2.0;
    /// Slip multiplier applied to the base speed
    pub const SLIP_SPEED_FACTOR: f32 = 3.0;
    /// Per-tick slip decay
    pub const SLIP_DECAY: f32 = 0.95;
    /// Slip below this snaps to zero
    pub const SLIP_EPSILON: f32 = 0.01;
    pub const PLAYER_SIZE: f32 = 10.0;
    pub const PLAYER_LIVES: u8 = 3;

    /// Control lock after mud = base + mud size * per-size
    pub const MUD_LOCK_BASE_MS: f64 = 3000.0;
    pub const MUD_LOCK_PER_SIZE_MS: f64 = 20.0;
    pub const INVINCIBLE_MS: f64 = 2000.0;
    pub const SPEED_BOOST_MS: f64 = 10_000.0;

    pub const INITIAL_CHASER_SIZE: f32 = 120.0;
    pub const CHASER_SPEED: f32 = 1.1;
    /// Chasers never reach the player's base speed
    pub const CHASER_SPEED_MARGIN: f32 = 0.1;
    /// Permanent chaser speed gained when a chaser smashes a crate
    pub const CRATE_CHASER_BONUS: f32 = 0.1;

    /// AI re-roll interval: base + random [0, jitter)
    pub const AI_ROLL_BASE_MS: f64 = 10_000.0;
    pub const AI_ROLL_JITTER_MS: f64 = 5000.0;
    /// Wanderer picks a new point once this close
    pub const WANDER_ARRIVE_DIST: f32 = 10.0;
    /// Predictive intercept lookahead in player steps
    pub const PREDICTION_STEPS: f32 = 20.0;

    pub const MUD_AVOIDANCE_DISTANCE: f32 = 100.0;
    pub const MUD_AVOIDANCE_STRENGTH: f32 = 1.5;
    pub const MUD_REPULSION_SCALE: f32 = 50.0;

    pub const SPLIT_CHANCE: f64 = 0.25;
    pub const SPLIT_MIN_SIZE: f32 = 20.0;
    pub const SPLIT_SIZE_FACTOR: f32 = 0.7;
    /// Offspring spread either side of the parent-to-player axis (radians)
    pub const SPLIT_ANGLE: f32 = 0.3;
    pub const CORNER_SEEK_MS: f64 = 7000.0;

    pub const MERGE_MIN_CHASERS: usize = 25;
    pub const MERGE_DISTANCE: f32 = 40.0;

    pub const KEY_SIZE: f32 = 15.0;
    pub const CRATE_SIZE: f32 = 25.0;

    /// How long the game over screen holds before returning to start
    pub const GAME_OVER_MS: f64 = 5000.0;
    /// Frame delta clamp (ms) so a backgrounded tab doesn't leap the clock
    pub const MAX_FRAME_MS: f64 = 100.0;

    pub const STAR_COUNT: usize = 50;
}
