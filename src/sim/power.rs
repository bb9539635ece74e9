//! Power buff, invulnerability, and area denial
//!
//! A collected power pickup opens a timed buff whose duration is its amount
//! times a fixed per-unit grant, and an invulnerability orb opens a fixed
//! damage-immunity window that also lights up a damaging ring around the
//! arena. Both countdowns run in fixed 100 ms quanta fed by a shared
//! accumulator, so buff durations are identical across frame rates and the
//! barrage and ring cadences stay phase-locked to them. High-amount power
//! pickups additionally enable a radial bullet barrage.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::dist_xz;
use crate::tuning::Tuning;

use super::bullet::BulletStyle;
use super::collision::apply_damage;
use super::state::{EntityId, GameState};

/// Quantum for the buff countdowns; cadence intervals are multiples of this
const POWER_STEP_MS: f32 = 100.0;

#[derive(Debug, Clone, Default)]
pub struct PowerState {
    invuln_ms_remaining: f32,
    power_ms_remaining: f32,
    /// Frame time not yet converted into whole countdown steps
    step_accum_ms: f32,
    barrage: bool,
    barrage_elapsed_ms: f32,
    area_elapsed_ms: f32,
}

impl PowerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_ms_remaining > 0.0
    }

    /// Open (or extend) the immunity window; the ring cadence restarts on a
    /// fresh grant only
    pub fn grant_invulnerability(&mut self, duration_ms: f32) {
        if !self.is_invulnerable() {
            self.area_elapsed_ms = 0.0;
            if !self.is_active() {
                self.step_accum_ms = 0.0;
            }
        }
        self.invuln_ms_remaining = self.invuln_ms_remaining.max(duration_ms);
    }

    pub fn is_active(&self) -> bool {
        self.power_ms_remaining > 0.0
    }

    pub fn barrage_enabled(&self) -> bool {
        self.barrage
    }

    /// Start (or extend) the buff from a collected power pickup
    pub fn activate(&mut self, amount: u32, tuning: &Tuning) {
        if !self.is_active() && !self.is_invulnerable() {
            self.step_accum_ms = 0.0;
        }
        self.power_ms_remaining += amount as f32 * tuning.power_ms_per_amount;
        if amount as i32 >= tuning.power_barrage_threshold {
            self.barrage = true;
            self.barrage_elapsed_ms = 0.0;
        }
    }

    fn deactivate(&mut self) {
        self.power_ms_remaining = 0.0;
        self.barrage = false;
    }

    fn any_buff_active(&self) -> bool {
        self.is_invulnerable() || self.is_active()
    }
}

/// Advance both buffs one tick in whole 100 ms steps
pub fn update_power(state: &mut GameState, dt: f32) {
    if !state.power.any_buff_active() {
        state.power.step_accum_ms = 0.0;
        return;
    }

    let t = state.tuning.clone();
    state.power.step_accum_ms += dt * 1000.0;
    while state.power.step_accum_ms >= POWER_STEP_MS && state.power.any_buff_active() {
        state.power.step_accum_ms -= POWER_STEP_MS;

        if state.power.is_invulnerable() {
            state.power.invuln_ms_remaining =
                (state.power.invuln_ms_remaining - POWER_STEP_MS).max(0.0);

            if t.area_denial_enabled {
                state.power.area_elapsed_ms += POWER_STEP_MS;
                if state.power.area_elapsed_ms >= t.area_denial_tick_ms {
                    state.power.area_elapsed_ms -= t.area_denial_tick_ms;
                    ring_damage(state, &t);
                }
            }
        }

        if state.power.is_active() {
            state.power.power_ms_remaining -= POWER_STEP_MS;

            if state.power.barrage {
                state.power.barrage_elapsed_ms += POWER_STEP_MS;
                if state.power.barrage_elapsed_ms >= t.barrage_interval_ms {
                    state.power.barrage_elapsed_ms -= t.barrage_interval_ms;
                    fire_barrage(state, &t);
                }
            }

            if state.power.power_ms_remaining <= 0.0 {
                state.power.deactivate();
            }
        }
    }
}

/// Damage every enemy standing in the ring band around the arena center
fn ring_damage(state: &mut GameState, t: &Tuning) {
    let center = Vec3::ZERO;
    let hit: Vec<EntityId> = state
        .registry
        .enemies
        .iter()
        .filter(|e| {
            e.alive && (dist_xz(e.pos, center) - t.shape_path_radius).abs() <= t.shape_path_half_width
        })
        .map(|e| e.id)
        .collect();
    for id in hit {
        apply_damage(state, id, t.area_denial_damage);
    }
}

/// Fire a full radial spread from the player
fn fire_barrage(state: &mut GameState, t: &Tuning) {
    let origin = state.player.pos;
    let n = t.barrage_bullet_count;
    for i in 0..n {
        let angle = i as f32 / n as f32 * TAU;
        let vel = Vec3::new(angle.cos(), 0.0, angle.sin()) * t.bullet_speed;
        // pool exhaustion quietly truncates the spread
        if state.bullets.fire(origin, vel, BulletStyle::default()).is_none() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::consts::{GROUND_Y, SIM_DT};
    use crate::sim::enemy::{Enemy, EnemyKind};

    fn fresh() -> GameState {
        let mut state = GameState::new(1, Tuning::default());
        state.timers.cancel_all();
        state
    }

    fn run_for(state: &mut GameState, seconds: f32) {
        let steps = (seconds / SIM_DT).round() as usize;
        for _ in 0..steps {
            update_power(state, SIM_DT);
        }
    }

    #[test]
    fn test_invulnerability_window() {
        let mut state = fresh();
        state.power.grant_invulnerability(state.tuning.invuln_duration_ms);
        state.damage_player(40);
        assert_eq!(state.player.health, state.tuning.player_max_health);

        run_for(&mut state, 5.2);
        state.damage_player(40);
        assert_eq!(state.player.health, state.tuning.player_max_health - 40);
    }

    #[test]
    fn test_buff_duration_scales_with_amount() {
        let mut state = fresh();
        state.power.activate(10, &state.tuning.clone()); // 1000 ms
        run_for(&mut state, 0.9);
        assert!(state.power.is_active());
        run_for(&mut state, 0.2);
        assert!(!state.power.is_active());
    }

    #[test]
    fn test_low_amount_never_barrages() {
        let mut state = fresh();
        state.power.activate(50, &state.tuning.clone());
        run_for(&mut state, 3.0);
        assert_eq!(state.bullets.active_count(), 0);
    }

    #[test]
    fn test_barrage_cadence() {
        let mut state = fresh();
        state.tuning.bullet_lifetime_ms = f32::MAX; // keep fired bullets around
        state.power.activate(100, &state.tuning.clone()); // 10 s of buff
        assert!(state.power.barrage_enabled());
        run_for(&mut state, 1.5); // crosses the 0.7 s mark twice
        assert_eq!(
            state.bullets.active_count(),
            2 * state.tuning.barrage_bullet_count as usize
        );
    }

    #[test]
    fn test_ring_hits_band_members_while_invulnerable() {
        let mut state = fresh();
        let t = state.tuning.clone();
        let on_ring = Vec3::new(t.shape_path_radius, GROUND_Y, 0.0);
        let inside = Vec3::new(5.0, GROUND_Y, 0.0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        state
            .registry
            .enemies
            .push(Enemy::spawn(a, EnemyKind::ConeBoss, on_ring, &t));
        state
            .registry
            .enemies
            .push(Enemy::spawn(b, EnemyKind::ConeBoss, inside, &t));

        state.power.grant_invulnerability(t.invuln_duration_ms); // 5 s, five ring ticks
        run_for(&mut state, 5.2);

        assert_eq!(
            state.registry.enemy(a).unwrap().health,
            t.max_health.cone - 5 * t.area_denial_damage
        );
        assert_eq!(state.registry.enemy(b).unwrap().health, t.max_health.cone);
    }

    #[test]
    fn test_ring_can_be_disabled() {
        let mut state = fresh();
        state.tuning.area_denial_enabled = false;
        let t = state.tuning.clone();
        let on_ring = Vec3::new(t.shape_path_radius, GROUND_Y, 0.0);
        let a = state.next_entity_id();
        state
            .registry
            .enemies
            .push(Enemy::spawn(a, EnemyKind::ConeBoss, on_ring, &t));

        state.power.grant_invulnerability(t.invuln_duration_ms);
        run_for(&mut state, 5.2);
        assert_eq!(state.registry.enemy(a).unwrap().health, t.max_health.cone);
    }
}
