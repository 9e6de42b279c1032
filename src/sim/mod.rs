//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM:
//! - One `GameState` owned by the host, mutated only through `tick`
//! - Seeded RNG only
//! - Time comes from the sim clock, which freezes while paused

pub mod autopilot;
pub mod chaser;
pub mod interact;
pub mod player;
pub mod population;
pub mod state;
pub mod tick;
pub mod torus;

pub use autopilot::suggest_direction;
pub use chaser::{chaser_speed, update_chasers};
pub use population::{Spawners, merge_chasers, split_chaser};
pub use state::{
    AiType, Arena, Chaser, Collectible, Direction, GameEvent, GamePhase, GameState, MudPatch,
    Player, Side, SpeedCrate, Star,
};
pub use player::{PlayerTint, Status};
pub use tick::{TickInput, tick};
pub use torus::{aabb_overlap, circles_touch, distance, reflections, wrap_point};
