//! Wave and portal orchestration
//!
//! Waves open a ring of portals around the player, then stagger enemy drops
//! through the timer queue. Every third wave adds a triangle boss behind its
//! own long-lived portal; cone bosses roll in probabilistically, capped by a
//! live-cone limit. When the last enemy and portal are gone the next wave is
//! scheduled after a fixed breather.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::clamp_to_arena;
use crate::consts::GROUND_Y;

use super::enemy::{Enemy, EnemyKind};
use super::registry::Portal;
use super::state::{GameEvent, GameState};
use super::timer::TimerKind;

/// Angular jitter applied to each portal's evenly spaced base angle
const PORTAL_ANGLE_JITTER: f32 = 0.35;

/// Route a fired timer to its effect
pub fn handle_timer(state: &mut GameState, kind: TimerKind) {
    match kind {
        TimerKind::SpawnEnemy {
            portal_id,
            kind,
            pos,
        } => spawn_enemy(state, portal_id, kind, pos),
        TimerKind::ClosePortal { portal_id } => state.registry.close_portal(portal_id),
        TimerKind::NextWave => start_next_wave(state),
    }
}

/// Open the next wave: portals, staggered minion drops, and boss rolls
pub fn start_next_wave(state: &mut GameState) {
    state.wave += 1;
    let wave = state.wave;
    state.push_event(GameEvent::WaveStarted { wave });

    let t = state.tuning.clone();
    let portal_count = (t.portals_per_wave_min + wave / 4)
        .clamp(t.portals_per_wave_min, t.portals_per_wave_max) as usize;
    let budget = t.wave_budget_base + wave;
    log::info!("wave {wave}: {portal_count} portals, {budget} minions");

    // evenly spaced ring around the player with a random phase
    let phase = state.rng.random_range(0.0..TAU);
    let mut portal_ids = Vec::with_capacity(portal_count);
    for i in 0..portal_count {
        let angle = phase + i as f32 / portal_count as f32 * TAU
            + state.rng.random_range(-PORTAL_ANGLE_JITTER..PORTAL_ANGLE_JITTER);
        let pos = portal_pos(state, angle);
        portal_ids.push(open_portal(state, pos, false, t.portal_lifetime_ms));
    }

    // minions distributed round-robin; stagger counts per portal
    let mut per_portal = vec![0u32; portal_count];
    for j in 0..budget {
        let slot = (j % portal_count as u32) as usize;
        let portal_id = portal_ids[slot];
        let pos = state
            .registry
            .portals
            .iter()
            .find(|p| p.id == portal_id)
            .map(|p| p.pos)
            .unwrap_or_default();
        state.timers.schedule(
            per_portal[slot] as f32 * t.portal_stagger_ms,
            TimerKind::SpawnEnemy {
                portal_id,
                kind: EnemyKind::Minion,
                pos,
            },
        );
        per_portal[slot] += 1;
    }

    if wave % t.triangle_wave_every == 0 {
        open_boss_portal(state, EnemyKind::TriangleBoss);
    }

    let mut cones = 0u32;
    if state.rng.random::<f32>() < t.cone_chance {
        cones += 1;
        if state.rng.random::<f32>() < t.cone_second_chance {
            cones += 1;
        }
    }
    let headroom = t.cones_max.saturating_sub(state.registry.cone_count()) as u32;
    for _ in 0..cones.min(headroom) {
        open_boss_portal(state, EnemyKind::ConeBoss);
    }
}

fn portal_pos(state: &mut GameState, angle: f32) -> Vec3 {
    let t = &state.tuning;
    let radius = state
        .rng
        .random_range(t.portal_radius_min..t.portal_radius_max);
    let pos = state.player.pos + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
    let mut pos = clamp_to_arena(pos, 2.0);
    pos.y = GROUND_Y;
    pos
}

fn open_portal(state: &mut GameState, pos: Vec3, boss: bool, lifetime_ms: f32) -> super::state::EntityId {
    let id = state.next_entity_id();
    state.registry.portals.push(Portal { id, pos, boss });
    state
        .timers
        .schedule(lifetime_ms, TimerKind::ClosePortal { portal_id: id });
    id
}

fn open_boss_portal(state: &mut GameState, kind: EnemyKind) {
    let angle = state.rng.random_range(0.0..TAU);
    let pos = portal_pos(state, angle);
    let lifetime = state.tuning.portal_boss_lifetime_ms;
    let id = open_portal(state, pos, true, lifetime);
    state
        .timers
        .schedule(0.0, TimerKind::SpawnEnemy { portal_id: id, kind, pos });
}

/// Materialize one enemy at its portal. Dropped silently if the portal
/// closed before the stagger came due.
fn spawn_enemy(state: &mut GameState, portal_id: super::state::EntityId, kind: EnemyKind, pos: Vec3) {
    if !state.registry.portals.iter().any(|p| p.id == portal_id) {
        log::debug!("portal {portal_id:?} closed before {kind:?} drop");
        return;
    }
    let id = state.next_entity_id();
    state
        .registry
        .enemies
        .push(Enemy::spawn(id, kind, pos, &state.tuning));
    if kind.is_boss() {
        state.push_event(GameEvent::BossSpawned { id, kind });
        log::info!("boss {kind:?} spawned at wave {}", state.wave);
    }
}

/// Schedule the next wave once this one is fully cleared: no live enemies,
/// no open portals, and nothing still pending in the queue.
pub fn check_wave_exhausted(state: &mut GameState) {
    if state.wave == 0 || state.registry.wave_population() != 0 {
        return;
    }
    let pending = state.timers.any_pending(|k| {
        matches!(k, TimerKind::SpawnEnemy { .. } | TimerKind::NextWave)
    });
    if !pending {
        state
            .timers
            .schedule(state.tuning.wave_interval_ms, TimerKind::NextWave);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    fn fresh(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.timers.cancel_all();
        state
    }

    fn minion_drop_count(state: &GameState) -> usize {
        state
            .timers
            .pending()
            .filter(|k| matches!(k, TimerKind::SpawnEnemy { kind: EnemyKind::Minion, .. }))
            .count()
    }

    #[test]
    fn test_wave_one_scaling() {
        let mut state = fresh(7);
        start_next_wave(&mut state);
        let regular = state.registry.portals.iter().filter(|p| !p.boss).count();
        assert_eq!(regular, 2, "wave 1 opens the minimum portal ring");
        assert_eq!(minion_drop_count(&state), 6, "budget is base + wave");
        assert!(matches!(
            state.events.first(),
            Some(GameEvent::WaveStarted { wave: 1 })
        ));
    }

    #[test]
    fn test_portal_count_grows_and_caps() {
        let mut state = fresh(7);
        state.wave = 7; // next wave is 8: 2 + 8/4 = 4
        start_next_wave(&mut state);
        let regular = state.registry.portals.iter().filter(|p| !p.boss).count();
        assert_eq!(regular, 4);

        let mut late = fresh(7);
        late.wave = 39;
        start_next_wave(&mut late);
        let regular = late.registry.portals.iter().filter(|p| !p.boss).count();
        assert_eq!(regular, 4, "portal ring never exceeds the cap");
    }

    #[test]
    fn test_every_third_wave_gets_a_triangle() {
        let mut state = fresh(7);
        state.wave = 8;
        start_next_wave(&mut state);
        assert!(state.timers.pending().any(|k| matches!(
            k,
            TimerKind::SpawnEnemy { kind: EnemyKind::TriangleBoss, .. }
        )));
        assert!(state.registry.portals.iter().any(|p| p.boss));
    }

    #[test]
    fn test_no_triangle_off_cycle() {
        let mut state = fresh(7);
        state.wave = 6; // wave 7
        start_next_wave(&mut state);
        assert!(!state.timers.pending().any(|k| matches!(
            k,
            TimerKind::SpawnEnemy { kind: EnemyKind::TriangleBoss, .. }
        )));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = fresh(1234);
        let mut b = fresh(1234);
        start_next_wave(&mut a);
        start_next_wave(&mut b);
        let pa: Vec<_> = a.registry.portals.iter().map(|p| p.pos).collect();
        let pb: Vec<_> = b.registry.portals.iter().map(|p| p.pos).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_exhaustion_schedules_exactly_one_next_wave() {
        let mut state = fresh(7);
        state.wave = 1; // wave ran and was cleared
        check_wave_exhausted(&mut state);
        check_wave_exhausted(&mut state);
        let count = state
            .timers
            .pending()
            .filter(|k| matches!(k, TimerKind::NextWave))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_no_wave_while_portals_open() {
        let mut state = fresh(7);
        start_next_wave(&mut state);
        check_wave_exhausted(&mut state);
        assert!(!state.timers.pending().any(|k| matches!(k, TimerKind::NextWave)));
    }
}
