//! Interaction resolver
//!
//! Runs after everything has moved. Order matters: chasers get first dibs on
//! keys, then the player picks up, slips, gets hurt, and finally crates are
//! smashed. Player-vs-chaser is a strict AABB test (slimes are squares);
//! everything else is a circle test.

use super::player::HitOutcome;
use super::population::maybe_split_on_pickup;
use super::state::{GameEvent, GamePhase, GameState};
use super::torus::{aabb_overlap, circles_touch};
use crate::consts::*;

pub fn resolve_interactions(state: &mut GameState) {
    chasers_eat_keys(state);
    collect_keys(state);
    touch_mud(state);
    chaser_contact(state);
    smash_crates(state);
}

/// A chaser rolling over a key destroys it
fn chasers_eat_keys(state: &mut GameState) {
    let chasers = &state.chasers;
    state.collectibles.retain(|key| {
        !chasers
            .iter()
            .any(|c| circles_touch(c.pos, c.size, key.pos, key.size))
    });
}

fn collect_keys(state: &mut GameState) {
    let (pos, size) = (state.player.pos, state.player.size);
    let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.collectibles)
        .into_iter()
        .partition(|key| circles_touch(pos, size, key.pos, key.size));
    state.collectibles = kept;

    for _ in taken {
        state.score += 1;
        state.events.push(GameEvent::KeyCollected);
        maybe_split_on_pickup(state);
    }
}

/// The last touching patch in list order sets the lock length
fn touch_mud(state: &mut GameState) {
    let now = state.clock_ms;
    if !state.player.controllable(now) {
        return;
    }
    let player = &state.player;
    let hit = state
        .mud
        .iter()
        .rev()
        .find(|m| circles_touch(player.pos, player.size, m.pos, m.size))
        .map(|m| m.size);
    let Some(size) = hit else {
        return;
    };
    if state.player.hit_mud(size, now) {
        state.events.push(GameEvent::MudSlip);
    }
}

fn chaser_contact(state: &mut GameState) {
    let player = &state.player;
    let touching = state
        .chasers
        .iter()
        .any(|c| aabb_overlap(player.pos, player.size, c.pos, c.size));
    if !touching {
        return;
    }

    let now = state.clock_ms;
    let center = state.arena.center();
    match state.player.take_hit(now, center) {
        HitOutcome::Ignored => {}
        HitOutcome::Respawned => {
            state.events.push(GameEvent::PlayerHurt {
                lives: state.player.lives,
            });
            log::info!("Player hit, {} lives left", state.player.lives);
        }
        HitOutcome::Dead => {
            state.events.push(GameEvent::PlayerHurt { lives: 0 });
            state.phase = GamePhase::GameOver;
            state.game_over_at = now;
            state.events.push(GameEvent::GameOver { score: state.score });
            log::info!("Game over with score {}", state.score);
        }
    }
}

/// Player smashes give a boost; chaser smashes speed up the whole swarm
fn smash_crates(state: &mut GameState) {
    let (pos, size) = (state.player.pos, state.player.size);
    let chasers = &state.chasers;
    let mut by_player = 0u32;
    let mut by_chasers = 0u32;
    state.crates.retain(|c| {
        if circles_touch(pos, size, c.pos, CRATE_SIZE) {
            by_player += 1;
            false
        } else if chasers
            .iter()
            .any(|ch| circles_touch(ch.pos, ch.size, c.pos, CRATE_SIZE))
        {
            by_chasers += 1;
            false
        } else {
            true
        }
    });

    if by_player > 0 {
        state.player.grant_boost(state.clock_ms);
        for _ in 0..by_player {
            state.events.push(GameEvent::CrateBroken);
        }
    }
    if by_chasers > 0 {
        state.chaser_speed_increase += CRATE_CHASER_BONUS * by_chasers as f32;
        log::debug!("chasers now +{:.1} speed", state.chaser_speed_increase);
    }
}
