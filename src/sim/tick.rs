//! Frame tick
//!
//! One call per animation frame. The sim clock only moves while playing and
//! unpaused, so status timers and population spawners freeze with the game.

use super::autopilot::suggest_direction;
use super::chaser::{recompute_speeds, update_chasers};
use super::interact::resolve_interactions;
use super::population::{merge_chasers, run_spawners};
use super::state::{Direction, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested travel direction (arrow keys / on-screen buttons)
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
    /// Start a run from the title screen
    pub start: bool,
    /// Idle/demo mode - autopilot steers the player
    pub idle_mode: bool,
}

/// Advance the game by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    let dt_ms = if dt_ms.is_finite() {
        dt_ms.clamp(0.0, MAX_FRAME_MS)
    } else {
        0.0
    };

    match state.phase {
        GamePhase::Start => {
            if input.start {
                state.start_game();
            }
        }
        GamePhase::GameOver => {
            state.clock_ms += dt_ms;
            if state.clock_ms - state.game_over_at > GAME_OVER_MS {
                state.phase = GamePhase::Start;
                log::info!("Back to the title screen");
            }
        }
        GamePhase::Playing => {
            if input.pause {
                state.paused = !state.paused;
                log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
            }
            if state.paused {
                return;
            }
            state.clock_ms += dt_ms;
            step_playing(state, input);
        }
    }
}

fn step_playing(state: &mut GameState, input: &TickInput) {
    let now = state.clock_ms;

    let direction = if input.idle_mode {
        Some(suggest_direction(state))
    } else {
        input.direction
    };
    if let Some(dir) = direction {
        state.player.steer(dir, now);
    }
    state.player.advance(now, &state.arena);

    update_chasers(state);
    resolve_interactions(state);
    merge_chasers(state);
    recompute_speeds(state);

    if state.phase == GamePhase::Playing {
        run_spawners(state);
    }
}
