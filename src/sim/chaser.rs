//! Chaser AI
//!
//! Each chaser runs one of four strategies, re-rolled every 10-15 seconds.
//! The first three steer around mud and wrap at the canvas edges; wanderers
//! do neither and can roam off-canvas.

use glam::Vec2;
use rand::Rng;

use super::state::{AiType, Arena, Chaser, Collectible, GameState, MudPatch};
use super::torus::{angle_to, distance, heading, nearest_reflection, reflections, wrap_point};
use crate::consts::*;

/// Read-only view of the world a chaser steers by
#[derive(Debug, Clone, Copy)]
pub struct AiContext<'a> {
    pub player_pos: Vec2,
    pub player_heading: f32,
    pub collectibles: &'a [Collectible],
    pub mud: &'a [MudPatch],
    pub arena: &'a Arena,
    pub now: f64,
}

/// Speed for a chaser of `size`: smaller is faster, never quite player speed
pub fn chaser_speed(size: f32, speed_increase: f32) -> f32 {
    let cap = PLAYER_SPEED - CHASER_SPEED_MARGIN;
    cap.min(CHASER_SPEED * (INITIAL_CHASER_SIZE / size) + speed_increase)
}

/// Steer and move every chaser one tick
pub fn update_chasers(state: &mut GameState) {
    let ctx = AiContext {
        player_pos: state.player.pos,
        player_heading: state.player.heading,
        collectibles: &state.collectibles,
        mud: &state.mud,
        arena: &state.arena,
        now: state.clock_ms,
    };
    for chaser in state.chasers.iter_mut() {
        update_chaser(chaser, &ctx, &mut state.rng);
    }
}

/// Re-apply the size/speed formula after interactions
pub fn recompute_speeds(state: &mut GameState) {
    let increase = state.chaser_speed_increase;
    for chaser in state.chasers.iter_mut() {
        chaser.speed = chaser_speed(chaser.size, increase);
    }
}

pub fn update_chaser(chaser: &mut Chaser, ctx: &AiContext, rng: &mut impl Rng) {
    maybe_reroll(chaser, ctx.now, rng);

    let target = match chaser.ai {
        AiType::Wanderer => wander_target(chaser, ctx.arena, rng),
        AiType::Intercept => intercept_target(chaser.pos, ctx),
        AiType::KeySeeker => key_seek_target(chaser, ctx),
        AiType::Predictive => predictive_target(chaser.pos, ctx),
    };
    let roams = chaser.ai == AiType::Wanderer;
    let target = if roams {
        target
    } else {
        target + mud_repulsion(chaser.pos, chaser.size, ctx.mud)
    };

    chaser.pos += heading(angle_to(chaser.pos, target)) * chaser.speed;
    if !roams {
        chaser.pos = wrap_point(chaser.pos, ctx.arena);
    }
}

fn maybe_reroll(chaser: &mut Chaser, now: f64, rng: &mut impl Rng) {
    let due = chaser.next_job_roll.is_none_or(|at| now >= at);
    if !due {
        return;
    }
    chaser.ai = AiType::roll(rng);
    chaser.next_job_roll = Some(now + rng.random::<f64>() * AI_ROLL_JITTER_MS + AI_ROLL_BASE_MS);
    log::debug!("chaser {} now runs {:?}", chaser.id, chaser.ai);
}

fn wander_target(chaser: &mut Chaser, arena: &Arena, rng: &mut impl Rng) -> Vec2 {
    match chaser.random_target {
        Some(t) if distance(chaser.pos, t) >= WANDER_ARRIVE_DIST => t,
        _ => {
            let t = arena.random_point(rng);
            chaser.random_target = Some(t);
            t
        }
    }
}

/// Shortest wrapped path to the player, penalising paths over mud
pub fn intercept_target(from: Vec2, ctx: &AiContext) -> Vec2 {
    let mut best = ctx.player_pos;
    let mut best_dist = f32::INFINITY;
    for cand in reflections(ctx.player_pos, ctx.arena) {
        let mid = (from + cand) / 2.0;
        let crossings = ctx
            .mud
            .iter()
            .filter(|m| distance(m.pos, mid) < m.size / 2.0 + MUD_AVOIDANCE_DISTANCE)
            .count();
        let dist = distance(from, cand) + crossings as f32 * MUD_AVOIDANCE_DISTANCE * 2.0;
        if dist < best_dist {
            best_dist = dist;
            best = cand;
        }
    }
    best
}

/// Where the player will be after a short run in a straight line
pub fn predictive_target(from: Vec2, ctx: &AiContext) -> Vec2 {
    let ahead = ctx.player_pos + heading(ctx.player_heading) * PLAYER_SPEED * PREDICTION_STEPS;
    nearest_reflection(from, ahead, ctx.arena).0
}

/// Cached key target, re-selected when the key is gone; the player otherwise
pub fn key_seek_target(chaser: &mut Chaser, ctx: &AiContext) -> Vec2 {
    let cached = chaser
        .target_key
        .and_then(|id| ctx.collectibles.iter().find(|k| k.id == id));
    let key = cached.or_else(|| nearest_key(chaser.pos, ctx));
    chaser.target_key = key.map(|k| k.id);
    key.map_or(ctx.player_pos, |k| k.pos)
}

fn nearest_key<'a>(from: Vec2, ctx: &AiContext<'a>) -> Option<&'a Collectible> {
    let mut best = None;
    let mut best_dist = f32::INFINITY;
    for key in ctx.collectibles {
        let (_, d) = nearest_reflection(from, key.pos, ctx.arena);
        if d < best_dist {
            best_dist = d;
            best = Some(key);
        }
    }
    best
}

/// Offset that pushes a steering target away from nearby mud
pub fn mud_repulsion(pos: Vec2, size: f32, mud: &[MudPatch]) -> Vec2 {
    let reach = MUD_AVOIDANCE_DISTANCE + size / 2.0;
    let mut push = Vec2::ZERO;
    for patch in mud {
        let away = pos - patch.pos;
        let d = away.length();
        // d == 0 has no direction to push in
        if d < reach && d > 0.0 {
            push += away / d * MUD_AVOIDANCE_STRENGTH * (1.0 - d / reach);
        }
    }
    push * MUD_REPULSION_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Arena {
        Arena::new(800.0, 600.0)
    }

    fn mud_at(pos: Vec2, size: f32) -> MudPatch {
        MudPatch {
            id: 99,
            pos,
            size,
            spots: Vec::new(),
            shine: Vec::new(),
        }
    }

    fn ctx<'a>(
        player: Vec2,
        keys: &'a [Collectible],
        mud: &'a [MudPatch],
        arena: &'a Arena,
    ) -> AiContext<'a> {
        AiContext {
            player_pos: player,
            player_heading: 0.0,
            collectibles: keys,
            mud,
            arena,
            now: 0.0,
        }
    }

    fn pinned(ai: AiType, pos: Vec2) -> Chaser {
        let mut c = Chaser::new(1, pos, 60.0, ai);
        c.next_job_roll = Some(f64::MAX);
        c
    }

    #[test]
    fn test_speed_formula() {
        assert!((chaser_speed(120.0, 0.0) - 1.1).abs() < 1e-6);
        // Small chasers hit the cap
        assert!((chaser_speed(10.0, 0.0) - 1.1).abs() < 1e-6);
        // Big chasers are slower, crates speed them up
        assert!((chaser_speed(240.0, 0.0) - 0.55).abs() < 1e-6);
        assert!((chaser_speed(240.0, 0.2) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_intercept_takes_wrapped_path() {
        let a = arena();
        let c = ctx(Vec2::new(10.0, 300.0), &[], &[], &a);
        let target = intercept_target(Vec2::new(780.0, 300.0), &c);
        assert_eq!(target, Vec2::new(810.0, 300.0));
    }

    #[test]
    fn test_intercept_avoids_muddy_path() {
        let a = arena();
        // Direct path is 200 long but crosses mud; the wrapped path is 600.
        let mud = [mud_at(Vec2::new(400.0, 300.0), 40.0)];
        let c = ctx(Vec2::new(500.0, 300.0), &[], &mud, &a);
        let target = intercept_target(Vec2::new(300.0, 300.0), &c);
        assert_eq!(target, Vec2::new(500.0, 300.0));

        // Two patches on the direct path make the long way round cheaper
        let mud = [
            mud_at(Vec2::new(400.0, 300.0), 40.0),
            mud_at(Vec2::new(400.0, 310.0), 40.0),
            mud_at(Vec2::new(400.0, 290.0), 40.0),
        ];
        let c = ctx(Vec2::new(500.0, 300.0), &[], &mud, &a);
        let target = intercept_target(Vec2::new(300.0, 300.0), &c);
        assert_ne!(target, Vec2::new(500.0, 300.0));
    }

    #[test]
    fn test_key_seeker_caches_and_falls_back() {
        let a = arena();
        let keys = vec![
            Collectible { id: 5, pos: Vec2::new(100.0, 100.0), size: KEY_SIZE },
            Collectible { id: 6, pos: Vec2::new(700.0, 500.0), size: KEY_SIZE },
        ];
        let mut chaser = pinned(AiType::KeySeeker, Vec2::new(120.0, 120.0));
        let c = ctx(Vec2::new(400.0, 300.0), &keys, &[], &a);
        assert_eq!(key_seek_target(&mut chaser, &c), Vec2::new(100.0, 100.0));
        assert_eq!(chaser.target_key, Some(5));

        // Cached even once another key is closer
        chaser.pos = Vec2::new(690.0, 490.0);
        assert_eq!(key_seek_target(&mut chaser, &c), Vec2::new(100.0, 100.0));

        // Key 5 gone: re-select
        let c = ctx(Vec2::new(400.0, 300.0), &keys[1..], &[], &a);
        assert_eq!(key_seek_target(&mut chaser, &c), Vec2::new(700.0, 500.0));

        // No keys at all: chase the player
        let c = ctx(Vec2::new(400.0, 300.0), &[], &[], &a);
        assert_eq!(key_seek_target(&mut chaser, &c), Vec2::new(400.0, 300.0));
        assert_eq!(chaser.target_key, None);
    }

    #[test]
    fn test_key_seeker_drops_collected_key() {
        let a = arena();
        let mut chaser = pinned(AiType::KeySeeker, Vec2::new(100.0, 100.0));
        // Key 40 was picked up: nothing left to seek, so go for the player
        chaser.target_key = Some(40);
        let c = ctx(Vec2::new(400.0, 300.0), &[], &[], &a);
        assert_eq!(key_seek_target(&mut chaser, &c), Vec2::new(400.0, 300.0));
        assert_eq!(chaser.target_key, None);

        // With a live key around it re-selects straight away
        let keys = [Collectible { id: 41, pos: Vec2::new(200.0, 100.0), size: KEY_SIZE }];
        chaser.target_key = Some(40);
        let c = ctx(Vec2::new(400.0, 300.0), &keys, &[], &a);
        assert_eq!(key_seek_target(&mut chaser, &c), Vec2::new(200.0, 100.0));
        assert_eq!(chaser.target_key, Some(41));
    }

    #[test]
    fn test_predictive_leads_the_player() {
        let a = arena();
        let mut c = ctx(Vec2::new(400.0, 300.0), &[], &[], &a);
        c.player_heading = 0.0;
        let target = predictive_target(Vec2::new(400.0, 100.0), &c);
        assert!((target.x - 424.0).abs() < 1e-3);
        assert!((target.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_repulsion_guards_zero_distance() {
        let mud = [mud_at(Vec2::new(50.0, 50.0), 40.0)];
        assert_eq!(mud_repulsion(Vec2::new(50.0, 50.0), 60.0, &mud), Vec2::ZERO);
        // Out of reach
        assert_eq!(mud_repulsion(Vec2::new(500.0, 50.0), 60.0, &mud), Vec2::ZERO);
        // Pushes away from the patch
        let push = mud_repulsion(Vec2::new(100.0, 50.0), 60.0, &mud);
        assert!(push.x > 0.0);
        assert!(push.y.abs() < 1e-4);
    }

    #[test]
    fn test_wanderer_is_never_wrapped() {
        let a = arena();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut chaser = pinned(AiType::Wanderer, Vec2::new(-30.0, 300.0));
        chaser.random_target = Some(Vec2::new(-400.0, 300.0));
        let c = ctx(Vec2::new(400.0, 300.0), &[], &[], &a);
        for _ in 0..200 {
            update_chaser(&mut chaser, &c, &mut rng);
            assert!(chaser.pos.x < 0.0, "wanderer teleported to {:?}", chaser.pos);
        }
        assert!(chaser.pos.x < -200.0);
    }

    #[test]
    fn test_wanderer_ignores_mud() {
        let a = arena();
        let mut rng = Pcg32::seed_from_u64(1);
        let mud = [mud_at(Vec2::new(150.0, 100.0), 60.0)];
        let mut chaser = pinned(AiType::Wanderer, Vec2::new(100.0, 100.0));
        chaser.speed = 1.0;
        chaser.random_target = Some(Vec2::new(300.0, 100.0));
        let c = ctx(Vec2::new(400.0, 300.0), &[], &mud, &a);
        update_chaser(&mut chaser, &c, &mut rng);
        assert_eq!(chaser.pos, Vec2::new(101.0, 100.0));
    }

    #[test]
    fn test_chaser_wraps_when_not_wandering() {
        let a = arena();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut chaser = pinned(AiType::Intercept, Vec2::new(799.5, 300.0));
        // Player just across the right edge
        let c = ctx(Vec2::new(5.0, 300.0), &[], &[], &a);
        update_chaser(&mut chaser, &c, &mut rng);
        assert_eq!(chaser.pos.x, 0.0);
    }

    #[test]
    fn test_reroll_schedule() {
        let a = arena();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut chaser = Chaser::new(1, Vec2::new(100.0, 100.0), 60.0, AiType::Intercept);
        let mut c = ctx(Vec2::new(400.0, 300.0), &[], &[], &a);
        c.now = 1000.0;
        update_chaser(&mut chaser, &c, &mut rng);
        let next = chaser.next_job_roll.unwrap();
        assert!((11_000.0..16_000.0).contains(&next));

        // Not due yet: schedule untouched
        c.now = next - 1.0;
        update_chaser(&mut chaser, &c, &mut rng);
        assert_eq!(chaser.next_job_roll, Some(next));
    }

    proptest! {
        #[test]
        fn speed_non_increasing_and_capped(
            a in 0.5f32..500.0,
            b in 0.5f32..500.0,
            inc in 0.0f32..2.0,
        ) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(chaser_speed(small, inc) >= chaser_speed(large, inc));
            prop_assert!(chaser_speed(small, inc) < PLAYER_SPEED);
            prop_assert!(chaser_speed(large, inc) < PLAYER_SPEED);
        }
    }
}
