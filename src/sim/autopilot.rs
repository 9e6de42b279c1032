//! Idle/demo mode - the game plays itself
//!
//! Looks one short run ahead in each cardinal direction and picks the one
//! that gets away from the nearest slime, or toward the nearest key when no
//! slime is close.

use glam::Vec2;

use super::state::{Direction, GameState};
use super::torus::{heading, wrap_point, wrapped_distance};
use crate::consts::*;

/// Slimes closer than this (edge distance) take priority over keys
const DANGER_RADIUS: f32 = 150.0;
/// Steps of lookahead per candidate direction
const LOOKAHEAD_STEPS: f32 = 20.0;
/// Cost of a lookahead point landing in mud
const MUD_PENALTY: f32 = 400.0;

pub fn suggest_direction(state: &GameState) -> Direction {
    let player = &state.player;
    let arena = &state.arena;

    let threat = state
        .chasers
        .iter()
        .map(|c| (c, wrapped_distance(player.pos, c.pos, arena) - c.size / 2.0))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let goal = state
        .collectibles
        .iter()
        .map(|k| k.pos)
        .min_by(|a, b| {
            wrapped_distance(player.pos, *a, arena)
                .partial_cmp(&wrapped_distance(player.pos, *b, arena))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let score = |probe: Vec2| -> f32 {
        let mud_cost = state
            .mud
            .iter()
            .filter(|m| wrapped_distance(probe, m.pos, arena) < m.size / 2.0 + player.size)
            .count() as f32
            * MUD_PENALTY;
        let aim = match (threat, goal) {
            (Some((c, d)), _) if d < DANGER_RADIUS => wrapped_distance(probe, c.pos, arena),
            (_, Some(k)) => -wrapped_distance(probe, k, arena),
            (Some((c, _)), None) => wrapped_distance(probe, c.pos, arena),
            (None, None) => 0.0,
        };
        aim - mud_cost
    };

    let mut best = Direction::Right;
    let mut best_score = f32::NEG_INFINITY;
    for dir in Direction::ALL {
        let probe = wrap_point(
            player.pos + heading(dir.angle()) * PLAYER_SPEED * LOOKAHEAD_STEPS,
            arena,
        );
        let s = score(probe);
        if s > best_score {
            best_score = s;
            best = dir;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Arena, Collectible};

    fn state() -> GameState {
        let mut state = GameState::new(1, Arena::new(800.0, 600.0));
        state.start_game();
        state.collectibles.clear();
        state
    }

    #[test]
    fn test_runs_from_close_chaser() {
        let mut state = state();
        state.player.pos = Vec2::new(400.0, 300.0);
        state.chasers[0].pos = Vec2::new(300.0, 300.0);
        state.chasers[0].size = 40.0;
        assert_eq!(suggest_direction(&state), Direction::Right);
    }

    #[test]
    fn test_heads_for_key_when_safe() {
        let mut state = state();
        state.player.pos = Vec2::new(400.0, 300.0);
        state.chasers[0].pos = Vec2::new(60.0, 60.0);
        state.collectibles.push(Collectible {
            id: 77,
            pos: Vec2::new(400.0, 500.0),
            size: KEY_SIZE,
        });
        assert_eq!(suggest_direction(&state), Direction::Down);
    }
}
