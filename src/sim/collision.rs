//! Bullet collision, damage, and the drop economy
//!
//! Bullets test against enemies in registry order and stop at the first
//! overlap. All damage funnels through `apply_damage`, which owns the
//! exactly-once death latch, scoring, and drop rolls; the area-denial ring
//! in `power` reuses the same entry point so an enemy can never die twice
//! or pay out twice.

use rand::Rng;

use crate::consts::{BOUNDARY_LIMIT, GROUND_Y};
use crate::{dist_xz, normalize_xz, speed_scale};

use super::registry::{EnemyCommand, Pickup};
use super::state::{EntityId, GameEvent, GameState, PickupKind};

/// Advance active bullets and retire the ones that age out or leave the
/// arena
pub fn update_bullets(state: &mut GameState, dt: f32) {
    let lifetime = state.tuning.bullet_lifetime_ms;
    for index in 0..state.bullets.capacity() {
        let b = state.bullets.get_mut(index);
        if !b.active {
            continue;
        }
        b.pos += b.vel * dt;
        b.age_ms += dt * 1000.0;
        if b.age_ms >= lifetime || b.pos.x.abs() > BOUNDARY_LIMIT || b.pos.z.abs() > BOUNDARY_LIMIT
        {
            state.bullets.release(index);
        }
    }
}

/// Test every active bullet against the enemy list; a bullet is consumed by
/// the first enemy it overlaps
pub fn resolve_bullet_hits(state: &mut GameState) {
    let t = state.tuning.clone();
    for index in 0..state.bullets.capacity() {
        let b = state.bullets.get(index);
        if !b.active {
            continue;
        }
        let (bullet_pos, bullet_vel, stun_round) = (b.pos, b.vel, b.style.stun);

        let hit = state.registry.enemies.iter().find_map(|e| {
            if !e.alive {
                return None;
            }
            let radius = e.kind.pick(&t.hit_radius);
            let d = dist_xz(e.pos, bullet_pos);
            (d <= radius).then_some((e.id, e.kind, e.pos, d))
        });
        let Some((id, kind, enemy_pos, hit_dist)) = hit else {
            continue;
        };
        state.bullets.release(index);

        // push from the bullet toward the enemy, fading with hit distance
        let mut dir = normalize_xz(enemy_pos - bullet_pos);
        if dir == glam::Vec3::ZERO {
            dir = normalize_xz(bullet_vel);
        }
        let falloff = (1.0 - hit_dist / t.knockback_distance_max).max(0.0);
        let strength = kind.pick(&t.knockback) / speed_scale() * falloff;
        if strength > 0.0 {
            state.registry.dispatch(EnemyCommand::ApplyImpulse { id, dir, strength });
        }

        if stun_round {
            state.registry.dispatch(EnemyCommand::ApplyStun {
                id,
                duration_ms: t.bullet_stun_ms,
            });
            // stunning a boss can shake a health pickup loose
            if kind.is_boss()
                && state.rng.random::<f32>() < t.boss_stun_health_drop_chance
            {
                spawn_pickup(state, enemy_pos, PickupKind::Health);
            }
        } else {
            let damage = if state.power.is_active() {
                t.bullet_damage * t.power_damage_mul
            } else {
                t.bullet_damage
            };
            apply_damage(state, id, damage);
        }
    }
}

/// Damage one enemy by id. Returns true if this call killed it.
///
/// Charging triangles are immune to damage (the impulse still lands). The
/// alive latch guarantees death side effects run at most once per enemy.
pub fn apply_damage(state: &mut GameState, id: EntityId, amount: i32) -> bool {
    let Some(enemy) = state.registry.enemy_mut(id) else {
        return false;
    };
    if !enemy.alive || enemy.is_charging() {
        return false;
    }
    enemy.health -= amount;
    let dead = enemy.health <= 0;
    if dead {
        enemy.alive = false;
    }
    let (kind, pos) = (enemy.kind, enemy.pos);

    state.push_event(GameEvent::DamageDealt { target: id, amount });
    if !dead {
        return false;
    }
    state.score += kind.pick(&state.tuning.score);
    state.push_event(GameEvent::EnemyDied { id, kind, pos });
    roll_drop(state, pos);
    true
}

/// Death payout: a rare invulnerability orb, otherwise a health-or-power
/// roll gated by the base drop chance
fn roll_drop(state: &mut GameState, pos: glam::Vec3) {
    let t = state.tuning.clone();
    if state.rng.random::<f32>() < t.invuln_drop_chance {
        spawn_pickup(state, pos, PickupKind::Invulnerability);
        return;
    }
    if state.rng.random::<f32>() < t.drop_chance {
        let kind = if state.rng.random::<f32>() < t.drop_health_weight {
            PickupKind::Health
        } else {
            PickupKind::Power
        };
        spawn_pickup(state, pos, kind);
    }
}

/// Drop a pickup above `pos`; it falls to the ground and then waits to be
/// collected. Ignored when the arena is already saturated.
pub fn spawn_pickup(state: &mut GameState, pos: glam::Vec3, kind: PickupKind) {
    if state.registry.pickups.len() >= state.tuning.max_pickups {
        return;
    }
    let power_amount = match kind {
        PickupKind::Power => state.rng.random_range(10..=100),
        _ => 0,
    };
    let id = state.next_entity_id();
    let mut pos = pos;
    pos.y = state.tuning.drop_spawn_height;
    state.registry.pickups.push(Pickup {
        id,
        kind,
        pos,
        age_sec: 0.0,
        power_amount,
    });
}

/// Let pickups fall, expire the stale ones, and collect any the player is
/// standing on
pub fn update_pickups(state: &mut GameState, dt: f32) {
    let t = state.tuning.clone();
    let player_pos = state.player.pos;
    let can_collect = !state.player_respawning();

    let mut collected = Vec::new();
    let mut pickups = std::mem::take(&mut state.registry.pickups);
    pickups.retain_mut(|p| {
        if p.pos.y > GROUND_Y {
            p.pos.y = (p.pos.y - t.drop_speed * dt).max(GROUND_Y);
        }
        p.age_sec += dt;
        if p.age_sec >= t.pickup_lifetime_sec {
            return false;
        }
        // grounded pickups only; a drop still falling cannot be grabbed
        if can_collect
            && p.pos.y <= GROUND_Y
            && dist_xz(p.pos, player_pos) <= t.pickup_collect_distance
        {
            collected.push((p.kind, p.power_amount));
            return false;
        }
        true
    });
    state.registry.pickups = pickups;

    for (kind, power_amount) in collected {
        let amount = match kind {
            PickupKind::Health => {
                state.player.health =
                    (state.player.health + t.health_pickup_amount).min(t.player_max_health);
                t.health_pickup_amount
            }
            PickupKind::Power => {
                state.power.activate(power_amount, &t);
                power_amount as i32
            }
            PickupKind::Invulnerability => {
                state.power.grant_invulnerability(t.invuln_duration_ms);
                0
            }
        };
        state.push_event(GameEvent::PickupCollected { kind, amount });
    }
}
