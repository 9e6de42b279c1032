//! Population control
//!
//! Chasers split when the player grabs keys and merge back together once the
//! swarm gets crowded. Mud, keys and crates come and go on periodic timers
//! that run on the sim clock, each firing as one indivisible step.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{AiType, Arena, Chaser, GameEvent, GameState};
use super::torus::{angle_to, distance, heading};
use crate::consts::*;
use crate::tuning::Tuning;

/// Everything a split needs besides the parent
#[derive(Debug, Clone, Copy)]
pub struct SplitSeed {
    pub player_pos: Vec2,
    /// Mode for the second offspring
    pub new_ai: AiType,
    pub ids: [u32; 2],
    pub now: f64,
}

/// Split `parent` into two smaller chasers flanking the line to the player.
///
/// Chasers under the size floor are returned unchanged.
pub fn split_chaser(
    parent: &Chaser,
    seed: &SplitSeed,
    arena: &Arena,
    rng: &mut impl Rng,
) -> Vec<Chaser> {
    if parent.size < SPLIT_MIN_SIZE {
        return vec![parent.clone()];
    }

    let toward_player = angle_to(parent.pos, seed.player_pos);
    let offset = parent.size / 2.0;
    let first_corner = rng.random_range(0..4);
    let second_corner = (first_corner + rng.random_range(1..4)) % 4;

    let child = |id: u32, angle: f32, ai: AiType, corner: usize| Chaser {
        id,
        pos: parent.pos + heading(angle) * offset,
        size: parent.size * SPLIT_SIZE_FACTOR,
        speed: parent.speed,
        ai,
        next_job_roll: parent.next_job_roll,
        random_target: None,
        target_key: None,
        side: parent.side,
        corner_target: Some(arena.corner(corner)),
        corner_until: seed.now + CORNER_SEEK_MS,
    };

    let keeper = child(seed.ids[0], toward_player + SPLIT_ANGLE, parent.ai, first_corner);
    let mut rookie = child(seed.ids[1], toward_player - SPLIT_ANGLE, seed.new_ai, second_corner);
    rookie.side = parent.side.next();

    vec![keeper, rookie]
}

/// Roll the pickup split chance and split the chaser nearest the player
pub fn maybe_split_on_pickup(state: &mut GameState) -> bool {
    if state.chasers.is_empty() || !state.rng.random_bool(SPLIT_CHANCE) {
        return false;
    }
    split_nearest(state)
}

/// Replace the chaser nearest the player with its offspring
pub fn split_nearest(state: &mut GameState) -> bool {
    let player_pos = state.player.pos;
    let Some(idx) = nearest_chaser(&state.chasers, player_pos) else {
        return false;
    };

    let new_ai = AiType::roll(&mut state.rng);
    let ids = [state.next_entity_id(), state.next_entity_id()];
    let seed = SplitSeed {
        player_pos,
        new_ai,
        ids,
        now: state.clock_ms,
    };
    let offspring = split_chaser(&state.chasers[idx], &seed, &state.arena, &mut state.rng);
    let did_split = offspring.len() == 2;
    if did_split {
        log::debug!(
            "chaser {} split at size {:.1}",
            state.chasers[idx].id,
            state.chasers[idx].size
        );
        state.events.push(GameEvent::ChaserSplit);
    }
    state.chasers.splice(idx..=idx, offspring);
    did_split
}

fn nearest_chaser(chasers: &[Chaser], to: Vec2) -> Option<usize> {
    let mut best = None;
    let mut best_dist = f32::INFINITY;
    for (idx, chaser) in chasers.iter().enumerate() {
        let d = distance(to, chaser.pos);
        if d < best_dist {
            best_dist = d;
            best = Some(idx);
        }
    }
    best
}

/// Merge the first pair of chasers that are close together.
///
/// Inactive until the swarm reaches `MERGE_MIN_CHASERS`; at most one merge
/// per call. The pair scan is O(n²), fine at these population sizes.
pub fn merge_chasers(state: &mut GameState) -> bool {
    if state.chasers.len() < MERGE_MIN_CHASERS {
        return false;
    }
    let Some((i, j)) = find_merge_pair(&state.chasers) else {
        return false;
    };

    let id = state.next_entity_id();
    let a = &state.chasers[i];
    let b = &state.chasers[j];
    let mut merged = Chaser::new(id, (a.pos + b.pos) / 2.0, a.size + b.size * 0.5, a.ai);
    merged.speed = a.speed.max(b.speed);
    log::debug!("chasers {} and {} merged into {}", a.id, b.id, id);

    // j > i, so removing j first keeps i valid
    state.chasers.remove(j);
    state.chasers.remove(i);
    state.chasers.push(merged);
    state.events.push(GameEvent::ChaserMerged);
    true
}

fn find_merge_pair(chasers: &[Chaser]) -> Option<(usize, usize)> {
    for i in 0..chasers.len() {
        for j in (i + 1)..chasers.len() {
            if distance(chasers[i].pos, chasers[j].pos) < MERGE_DISTANCE {
                return Some((i, j));
            }
        }
    }
    None
}

/// A repeating sim-clock timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub interval_ms: f64,
    pub next_due: f64,
}

impl Timer {
    pub fn new(interval_ms: f64, now: f64) -> Self {
        Self {
            interval_ms,
            next_due: now + interval_ms,
        }
    }

    /// Consume one firing if due
    pub fn take_due(&mut self, now: f64) -> bool {
        if now >= self.next_due {
            self.next_due += self.interval_ms;
            true
        } else {
            false
        }
    }
}

/// Periodic population timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawners {
    pub mud: Timer,
    pub mud_cull: Option<Timer>,
    pub keys: Timer,
    pub key_cull: Timer,
    pub crates: Timer,
    pub crate_cull: Timer,
}

impl Spawners {
    pub fn new(tuning: &Tuning, now: f64) -> Self {
        Self {
            mud: Timer::new(tuning.mud_interval_ms, now),
            mud_cull: tuning.mud_cull_interval_ms.map(|ms| Timer::new(ms, now)),
            keys: Timer::new(tuning.key_interval_ms, now),
            key_cull: Timer::new(tuning.key_cull_interval_ms, now),
            crates: Timer::new(tuning.crate_interval_ms, now),
            crate_cull: Timer::new(tuning.crate_cull_interval_ms, now),
        }
    }
}

/// Fire every timer that has come due
pub fn run_spawners(state: &mut GameState) {
    let now = state.clock_ms;
    while state.spawners.mud.take_due(now) {
        spawn_mud_burst(state);
    }
    while state
        .spawners
        .mud_cull
        .as_mut()
        .is_some_and(|t| t.take_due(now))
    {
        let max = state.tuning.mud_cull_max;
        let removed = cull_random(&mut state.mud, max, &mut state.rng);
        log::debug!("culled {removed} mud patches");
    }
    while state.spawners.keys.take_due(now) {
        let (lo, hi) = state.tuning.keys_per_burst;
        let count = state.rng.random_range(lo..=hi);
        for _ in 0..count {
            state.spawn_key();
        }
        log::debug!("spawned {count} keys ({} total)", state.collectibles.len());
    }
    while state.spawners.key_cull.take_due(now) {
        let max = state.tuning.key_cull_max;
        let removed = cull_random(&mut state.collectibles, max, &mut state.rng);
        log::debug!("culled {removed} keys");
    }
    while state.spawners.crates.take_due(now) {
        let (lo, hi) = state.tuning.crates_per_burst;
        let count = state.rng.random_range(lo..=hi);
        for _ in 0..count {
            state.spawn_crate();
        }
    }
    while state.spawners.crate_cull.take_due(now) {
        if !state.crates.is_empty() && state.rng.random_bool(state.tuning.crate_cull_chance) {
            let idx = state.rng.random_range(0..state.crates.len());
            state.crates.remove(idx);
        }
    }
}

fn spawn_mud_burst(state: &mut GameState) {
    let (lo, hi) = state.tuning.mud_per_burst;
    let count = state.rng.random_range(lo..=hi);
    for _ in 0..count {
        state.spawn_mud();
    }
    log::info!("{count} new mud patches ({} total)", state.mud.len());
}

/// Remove between 0 and `max` random entries
fn cull_random<T>(items: &mut Vec<T>, max: u32, rng: &mut impl Rng) -> u32 {
    if items.is_empty() {
        return 0;
    }
    let rolls = rng.random_range(0..=max);
    let mut removed = 0;
    for _ in 0..rolls {
        if items.is_empty() {
            break;
        }
        let idx = rng.random_range(0..items.len());
        items.remove(idx);
        removed += 1;
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Side;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42, Arena::new(800.0, 600.0));
        state.start_game();
        state.events.clear();
        state
    }

    fn seed() -> SplitSeed {
        SplitSeed {
            player_pos: Vec2::new(400.0, 100.0),
            new_ai: AiType::Wanderer,
            ids: [10, 11],
            now: 5000.0,
        }
    }

    #[test]
    fn test_split_refused_below_floor() {
        let mut rng = Pcg32::seed_from_u64(1);
        let parent = Chaser::new(1, Vec2::new(100.0, 100.0), 19.9, AiType::Predictive);
        let out = split_chaser(&parent, &seed(), &Arena::default(), &mut rng);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
        assert_eq!(out[0].size, 19.9);
        assert_eq!(out[0].pos, parent.pos);
    }

    #[test]
    fn test_split_at_exact_floor() {
        let mut rng = Pcg32::seed_from_u64(1);
        let parent = Chaser::new(1, Vec2::new(100.0, 100.0), SPLIT_MIN_SIZE, AiType::Intercept);
        let out = split_chaser(&parent, &seed(), &Arena::default(), &mut rng);
        assert_eq!(out.len(), 2);
        for child in &out {
            assert!((child.size - 14.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_split_offspring() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut parent = Chaser::new(1, Vec2::new(100.0, 100.0), 100.0, AiType::Predictive);
        parent.side = Side::Left;
        parent.next_job_roll = Some(9000.0);
        let out = split_chaser(&parent, &seed(), &Arena::default(), &mut rng);
        assert_eq!(out.len(), 2);

        let (a, b) = (&out[0], &out[1]);
        assert!((a.size - 70.0).abs() < 1e-4);
        assert!((b.size - 70.0).abs() < 1e-4);
        assert_eq!(a.ai, AiType::Predictive);
        assert_eq!(b.ai, AiType::Wanderer);
        assert_eq!(a.next_job_roll, Some(9000.0));
        // Neither child inherits a key to chase; key seekers pick afresh
        assert_eq!(a.target_key, None);
        assert_eq!(b.target_key, None);
        assert_eq!(a.side, Side::Left);
        assert_eq!(b.side, Side::Top);
        assert_ne!(a.corner_target, b.corner_target);
        assert_eq!(a.corner_until, 12_000.0);

        // Both 50 away from the parent, fanned ±0.3 rad off the line to the player
        for child in &out {
            assert!((distance(child.pos, parent.pos) - 50.0).abs() < 1e-3);
        }
        assert!(a.pos.y > parent.pos.y);
        assert!(b.pos.y < parent.pos.y);
    }

    #[test]
    fn test_split_nearest_replaces_in_place() {
        let mut state = playing_state();
        state.player.pos = Vec2::new(700.0, 500.0);
        state.chasers.push(Chaser::new(50, Vec2::new(650.0, 450.0), 80.0, AiType::Intercept));
        state.chasers.push(Chaser::new(51, Vec2::new(300.0, 300.0), 80.0, AiType::Intercept));

        assert!(split_nearest(&mut state));
        assert_eq!(state.chasers.len(), 4);
        assert!(state.chasers.iter().all(|c| c.id != 50));
        assert!((state.chasers[1].size - 56.0).abs() < 1e-4);
        assert!((state.chasers[2].size - 56.0).abs() < 1e-4);
        assert_eq!(state.chasers[3].id, 51);
        assert_eq!(state.events, vec![GameEvent::ChaserSplit]);
    }

    fn crowd(state: &mut GameState, n: usize, spacing: f32) {
        state.chasers.clear();
        for i in 0..n {
            let pos = Vec2::new(i as f32 * spacing, 10.0);
            let mut c = Chaser::new(100 + i as u32, pos, 30.0, AiType::KeySeeker);
            c.speed = 0.5 + i as f32 * 0.01;
            state.chasers.push(c);
        }
    }

    #[test]
    fn test_merge_inactive_below_threshold() {
        let mut state = playing_state();
        crowd(&mut state, MERGE_MIN_CHASERS - 1, 1.0);
        assert!(!merge_chasers(&mut state));
        assert_eq!(state.chasers.len(), MERGE_MIN_CHASERS - 1);
    }

    #[test]
    fn test_merge_first_close_pair() {
        let mut state = playing_state();
        crowd(&mut state, MERGE_MIN_CHASERS, 100.0);
        // Chasers 3 and 7 end up close together
        state.chasers[7].pos = Vec2::new(310.0, 10.0);
        state.chasers[7].size = 20.0;

        assert!(merge_chasers(&mut state));
        assert_eq!(state.chasers.len(), MERGE_MIN_CHASERS - 1);
        let merged = state.chasers.last().unwrap();
        assert_eq!(merged.pos, Vec2::new(305.0, 10.0));
        assert_eq!(merged.size, 40.0);
        assert!((merged.speed - 0.57).abs() < 1e-5);
        assert_eq!(merged.ai, AiType::KeySeeker);
        assert!(state.chasers.iter().all(|c| c.id != 103 && c.id != 107));
    }

    #[test]
    fn test_merge_needs_a_close_pair() {
        let mut state = playing_state();
        crowd(&mut state, 30, 50.0);
        assert!(!merge_chasers(&mut state));
        assert_eq!(state.chasers.len(), 30);
    }

    #[test]
    fn test_timers_fire_on_schedule() {
        let mut state = playing_state();
        let keys_before = state.collectibles.len();

        state.clock_ms = 19_999.0;
        run_spawners(&mut state);
        assert_eq!(state.collectibles.len(), keys_before);

        state.clock_ms = 20_000.0;
        run_spawners(&mut state);
        let added = state.collectibles.len() - keys_before;
        assert!((2..=6).contains(&added));
        assert!(state.mud.is_empty());

        state.clock_ms = 30_000.0;
        run_spawners(&mut state);
        assert!((1..=5).contains(&state.mud.len()));
        assert!(state.crates.is_empty());

        // Crate culler's first firing, nothing to cull yet
        state.clock_ms = 40_000.0;
        run_spawners(&mut state);

        state.clock_ms = 60_000.0;
        run_spawners(&mut state);
        assert!(!state.crates.is_empty() && state.crates.len() <= 2);
    }

    #[test]
    fn test_mud_accumulates_without_culler() {
        let mut state = playing_state();
        for step in 1..=6 {
            state.clock_ms = step as f64 * 30_000.0;
            run_spawners(&mut state);
        }
        assert!(state.mud.len() >= 6);
        assert!(state.spawners.mud_cull.is_none());
    }

    #[test]
    fn test_optional_mud_culler() {
        let tuning = Tuning {
            mud_cull_interval_ms: Some(1000.0),
            mud_cull_max: 100,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(5, Arena::default(), tuning);
        state.start_game();
        for _ in 0..20 {
            state.spawn_mud();
        }
        let mut seen_removal = false;
        for step in 1..=10 {
            state.clock_ms = step as f64 * 1000.0;
            let before = state.mud.len();
            run_spawners(&mut state);
            seen_removal |= state.mud.len() < before;
        }
        assert!(seen_removal);
    }

    #[test]
    fn test_cull_random_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut items: Vec<u32> = (0..30).collect();
        for _ in 0..20 {
            let before = items.len();
            let removed = cull_random(&mut items, 10, &mut rng);
            assert!(removed <= 10);
            assert_eq!(items.len(), before - removed as usize);
        }
        let mut empty: Vec<u32> = Vec::new();
        assert_eq!(cull_random(&mut empty, 10, &mut rng), 0);
    }
}
