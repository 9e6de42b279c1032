//! Game state and core simulation types
//!
//! Everything the renderer reads lives here; the scheduler owns one
//! `GameState` and hands it to each subsystem by `&mut`.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::population::Spawners;
use crate::consts::*;
use crate::tuning::Tuning;

/// Canvas bounds, injected by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Uniform random point on the canvas
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.random::<f32>() * self.width,
            rng.random::<f32>() * self.height,
        )
    }

    /// One of the four canvas corners
    pub fn corner(&self, index: usize) -> Vec2 {
        match index % 4 {
            0 => Vec2::ZERO,
            1 => Vec2::new(self.width, 0.0),
            2 => Vec2::new(self.width, self.height),
            _ => Vec2::new(0.0, self.height),
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, showing the game over screen
    GameOver,
}

/// Cardinal travel directions (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn angle(self) -> f32 {
        match self {
            Direction::Left => PI,
            Direction::Right => 0.0,
            Direction::Up => -FRAC_PI_2,
            Direction::Down => FRAC_PI_2,
        }
    }
}

/// Chaser behaviour mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiType {
    /// Chase the player along the shortest wrapped path, avoiding mud
    Intercept,
    /// Go after keys before the player can
    KeySeeker,
    /// Head for where the player will be
    Predictive,
    /// Drift between random points
    Wanderer,
}

impl AiType {
    pub const ALL: [AiType; 4] = [
        AiType::Intercept,
        AiType::KeySeeker,
        AiType::Predictive,
        AiType::Wanderer,
    ];

    /// Uniform pick over the four modes
    pub fn roll(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// 1-based label shown in the debug overlay
    pub fn number(self) -> u8 {
        match self {
            AiType::Intercept => 1,
            AiType::KeySeeker => 2,
            AiType::Predictive => 3,
            AiType::Wanderer => 4,
        }
    }
}

/// Toroidal side label handed out on split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Clockwise successor
    pub fn next(self) -> Self {
        match self {
            Side::Top => Side::Right,
            Side::Right => Side::Bottom,
            Side::Bottom => Side::Left,
            Side::Left => Side::Top,
        }
    }
}

/// The player's dot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Travel angle (radians)
    pub heading: f32,
    pub size: f32,
    /// Mud slip, 1.0 on contact, decays toward 0
    pub slip: f32,
    pub control_disabled_until: f64,
    pub invincible_until: f64,
    pub speed_boost_until: f64,
    pub lives: u8,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            heading: 0.0,
            size: PLAYER_SIZE,
            slip: 0.0,
            control_disabled_until: 0.0,
            invincible_until: 0.0,
            speed_boost_until: 0.0,
            lives: PLAYER_LIVES,
        }
    }
}

/// An enemy slime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chaser {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub ai: AiType,
    /// When the AI mode is next re-rolled (`None` = on the next update)
    pub next_job_roll: Option<f64>,
    /// Wanderer destination
    pub random_target: Option<Vec2>,
    /// Id of the key a key seeker is after, kept while that key exists
    pub target_key: Option<u32>,
    /// Split bookkeeping, not read by the steering code
    pub side: Side,
    pub corner_target: Option<Vec2>,
    pub corner_until: f64,
}

impl Chaser {
    pub fn new(id: u32, pos: Vec2, size: f32, ai: AiType) -> Self {
        Self {
            id,
            pos,
            size,
            speed: CHASER_SPEED,
            ai,
            next_job_roll: None,
            random_target: None,
            target_key: None,
            side: Side::default(),
            corner_target: None,
            corner_until: 0.0,
        }
    }
}

/// A golden key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
}

/// Texture blob inside a mud patch (polar offset from the patch center)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MudSpot {
    pub angle: f32,
    pub dist: f32,
    pub size: f32,
}

/// Highlight inside a mud patch
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShineSpot {
    pub angle: f32,
    pub dist: f32,
}

/// A slippery mud hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MudPatch {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub spots: Vec<MudSpot>,
    pub shine: Vec<ShineSpot>,
}

impl MudPatch {
    /// Random patch: usually 30..60 across, occasionally a quarter canvas wide.
    /// Decorations are rolled once here and never change.
    pub fn random(id: u32, arena: &Arena, giant_chance: f64, rng: &mut impl Rng) -> Self {
        let size = if rng.random_bool(giant_chance) {
            arena.width / 4.0
        } else {
            rng.random::<f32>() * 30.0 + 30.0
        };
        let spots = (0..5)
            .map(|_| MudSpot {
                angle: rng.random::<f32>() * TAU,
                dist: rng.random::<f32>() * (size / 4.0),
                size: size / 3.0 + rng.random::<f32>() * (size / 4.0),
            })
            .collect();
        let shine = (0..3)
            .map(|_| ShineSpot {
                angle: rng.random::<f32>() * TAU,
                dist: rng.random::<f32>() * (size / 5.0),
            })
            .collect();
        Self {
            id,
            pos: arena.random_point(rng),
            size,
            spots,
            shine,
        }
    }
}

/// A speed-boost crate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedCrate {
    pub id: u32,
    pub pos: Vec2,
}

/// Decorative title-screen star
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
}

/// Discrete things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    KeyCollected,
    MudSlip,
    CrateBroken,
    PlayerHurt { lives: u8 },
    GameOver { score: u64 },
    ChaserSplit,
    ChaserMerged,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Saved with the state so a restored game continues the same stream
    pub rng: Pcg32,
    pub arena: Arena,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub paused: bool,
    /// Milliseconds of unpaused time since the state was created
    pub clock_ms: f64,
    pub game_over_at: f64,
    pub score: u64,
    /// Permanent chaser speed bonus, only ever grows during a run
    pub chaser_speed_increase: f32,
    pub player: Player,
    pub chasers: Vec<Chaser>,
    pub collectibles: Vec<Collectible>,
    pub mud: Vec<MudPatch>,
    pub crates: Vec<SpeedCrate>,
    pub stars: Vec<Star>,
    pub spawners: Spawners,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a state on the title screen
    pub fn new(seed: u64, arena: Arena) -> Self {
        Self::with_tuning(seed, arena, Tuning::default())
    }

    pub fn with_tuning(seed: u64, arena: Arena, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: arena.random_point(&mut rng),
                radius: rng.random::<f32>() * 2.0 + 1.0,
            })
            .collect();
        let spawners = Spawners::new(&tuning, 0.0);
        let mut state = Self {
            seed,
            rng,
            arena,
            tuning,
            phase: GamePhase::Start,
            paused: false,
            clock_ms: 0.0,
            game_over_at: 0.0,
            score: 0,
            chaser_speed_increase: 0.0,
            player: Player::new(arena.center()),
            chasers: Vec::new(),
            collectibles: Vec::new(),
            mud: Vec::new(),
            crates: Vec::new(),
            stars,
            spawners,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset_positions();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put every entity back where a fresh run starts
    pub fn reset_positions(&mut self) {
        self.player = Player::new(self.arena.center());
        let id = self.next_entity_id();
        let half = INITIAL_CHASER_SIZE / 2.0;
        self.chasers = vec![Chaser::new(
            id,
            Vec2::new(half, half),
            INITIAL_CHASER_SIZE,
            AiType::Intercept,
        )];
        self.collectibles.clear();
        self.spawn_key();
        self.mud.clear();
        self.crates.clear();
        self.chaser_speed_increase = 0.0;
    }

    /// Begin a new run from the title screen
    pub fn start_game(&mut self) {
        self.reset_positions();
        self.score = 0;
        self.paused = false;
        self.phase = GamePhase::Playing;
        self.tuning = self.tuning.clone().sanitized();
        self.spawners = Spawners::new(&self.tuning, self.clock_ms);
        self.events.push(GameEvent::GameStarted);
        log::info!("Game started (seed {})", self.seed);
    }

    /// Drop a key at a random spot
    pub fn spawn_key(&mut self) {
        let id = self.next_entity_id();
        let pos = self.arena.random_point(&mut self.rng);
        self.collectibles.push(Collectible {
            id,
            pos,
            size: KEY_SIZE,
        });
    }

    pub fn spawn_crate(&mut self) {
        let id = self.next_entity_id();
        let pos = self.arena.random_point(&mut self.rng);
        self.crates.push(SpeedCrate { id, pos });
    }

    pub fn spawn_mud(&mut self) {
        let id = self.next_entity_id();
        let patch = MudPatch::random(id, &self.arena, self.tuning.giant_mud_chance, &mut self.rng);
        self.mud.push(patch);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused
    }
}
