//! Enemy archetypes and their per-tick behavior
//!
//! Three archetypes share one `Enemy` struct and differ only in the
//! `Behavior` payload: minions chase and detonate on contact, triangle
//! bosses orbit and periodically charge along a snapshotted direction, and
//! cone bosses alternate between grounded rest and ballistic leaps. All
//! movement here is AI-driven; impulse physics lives in `physics` and is
//! layered on top.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY, GROUND_Y, LAUNCH_UP_VEL};
use crate::tuning::PerArchetype;
use crate::{clamp_to_arena, dist_xz, normalize_xz};

use super::physics::{BallisticArc, Knockback};
use super::state::{EntityId, GameEvent, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Minion,
    TriangleBoss,
    ConeBoss,
}

impl EnemyKind {
    pub fn is_boss(self) -> bool {
        !matches!(self, EnemyKind::Minion)
    }

    /// Select this archetype's entry from a per-archetype tuning table
    pub fn pick<T: Copy>(self, per: &PerArchetype<T>) -> T {
        match self {
            EnemyKind::Minion => per.minion,
            EnemyKind::TriangleBoss => per.triangle,
            EnemyKind::ConeBoss => per.cone,
        }
    }
}

/// A triangle boss mid-charge. The direction is snapshotted when the charge
/// begins and never re-aimed.
#[derive(Debug, Clone)]
pub struct Charge {
    pub dir: Vec3,
    pub remaining_sec: f32,
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Minion,
    Triangle {
        orbit_angle: f32,
        /// Counts down to the next charge while orbiting
        charge_timer_sec: f32,
        charging: Option<Charge>,
    },
    Cone {
        /// Time until the next leap; suspended by stun, but only on the
        /// ground. An arc already in flight always completes.
        idle_remaining_sec: f32,
        arc: Option<BallisticArc>,
        rest_damage_cooldown_sec: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec3,
    pub health: i32,
    /// Cleared exactly once; dead enemies are swept after collision
    pub alive: bool,
    /// True while dropping in from the portal's spawn height; AI takes
    /// over on touchdown
    pub spawning: bool,
    pub stun_ms_remaining: f32,
    pub knockback: Knockback,
    /// Brief post-landing grace during which the enemy holds still
    pub settle_sec_remaining: f32,
    /// Throttles repeated contact damage from bosses standing on the player
    pub touch_cooldown_sec: f32,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn spawn(id: EntityId, kind: EnemyKind, pos: Vec3, tuning: &crate::Tuning) -> Self {
        let behavior = match kind {
            EnemyKind::Minion => Behavior::Minion,
            EnemyKind::TriangleBoss => Behavior::Triangle {
                orbit_angle: f32::atan2(pos.z, pos.x),
                charge_timer_sec: tuning.triangle_charge_interval,
                charging: None,
            },
            EnemyKind::ConeBoss => Behavior::Cone {
                idle_remaining_sec: tuning.cone_first_idle,
                arc: None,
                rest_damage_cooldown_sec: 0.0,
            },
        };
        let mut pos = pos;
        pos.y = tuning.drop_spawn_height;
        Self {
            id,
            kind,
            pos,
            health: kind.pick(&tuning.max_health),
            alive: true,
            spawning: true,
            stun_ms_remaining: 0.0,
            knockback: Knockback::new(),
            settle_sec_remaining: tuning.post_land_settle,
            touch_cooldown_sec: 0.0,
            behavior,
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_ms_remaining > 0.0
    }

    /// Charging triangles shrug off bullet and area damage
    pub fn is_charging(&self) -> bool {
        matches!(
            &self.behavior,
            Behavior::Triangle { charging: Some(_), .. }
        )
    }

    pub fn is_airborne(&self) -> bool {
        matches!(&self.behavior, Behavior::Cone { arc: Some(_), .. })
    }

    pub fn apply_stun(&mut self, duration_ms: f32) {
        self.stun_ms_remaining = self.stun_ms_remaining.max(duration_ms);
    }
}

/// Advance every enemy one tick: stun and knockback bookkeeping, archetype
/// movement, and contact damage against the player.
pub fn update_enemies(state: &mut GameState, dt: f32) {
    // positions snapshotted up front so separation sees a consistent frame
    let neighbor_pos: Vec<Vec3> = state.registry.enemies.iter().map(|e| e.pos).collect();
    let player_pos = state.player.pos;
    let tuning = state.tuning.clone();
    let wave = state.wave;

    let mut enemies = std::mem::take(&mut state.registry.enemies);
    for enemy in enemies.iter_mut() {
        if !enemy.alive {
            continue;
        }
        enemy.stun_ms_remaining = (enemy.stun_ms_remaining - dt * 1000.0).max(0.0);
        enemy.touch_cooldown_sec = (enemy.touch_cooldown_sec - dt).max(0.0);

        // spawn drop-in: fall to the ground, then settle, then think
        if enemy.spawning {
            enemy.pos.y = (enemy.pos.y - tuning.drop_speed * dt).max(GROUND_Y);
            if enemy.pos.y <= GROUND_Y {
                enemy.spawning = false;
            }
            continue;
        }
        let stunned = enemy.is_stunned();
        let decay = enemy.kind.pick(&tuning.knockback_decay);
        enemy.knockback.integrate(&mut enemy.pos, stunned, decay, dt);

        if enemy.settle_sec_remaining > 0.0 {
            enemy.settle_sec_remaining -= dt;
            // minions ramp their speed in through the settle window;
            // bosses suspend AI (but not impulses) until it ends
            if enemy.kind != EnemyKind::Minion {
                enemy.pos = clamp_to_arena(enemy.pos, 1.0);
                continue;
            }
        }

        match enemy.kind {
            EnemyKind::Minion => {
                update_minion(enemy, state, player_pos, &neighbor_pos, &tuning, wave, dt);
            }
            EnemyKind::TriangleBoss => {
                update_triangle(enemy, state, player_pos, &tuning, dt);
            }
            EnemyKind::ConeBoss => {
                update_cone(enemy, state, player_pos, &tuning, dt);
            }
        }
        enemy.pos = clamp_to_arena(enemy.pos, 1.0);
    }
    state.registry.enemies = enemies;
}

fn update_minion(
    enemy: &mut Enemy,
    state: &mut GameState,
    player_pos: Vec3,
    neighbors: &[Vec3],
    tuning: &crate::Tuning,
    wave: u32,
    dt: f32,
) {
    if enemy.is_stunned() {
        return;
    }
    let dist = dist_xz(enemy.pos, player_pos);
    if dist <= tuning.minion_contact_distance {
        // kamikaze: damage the player and die
        state.damage_player(tuning.contact_damage.minion);
        enemy.alive = false;
        state.push_event(GameEvent::EnemyDied {
            id: enemy.id,
            kind: enemy.kind,
            pos: enemy.pos,
        });
        return;
    }

    let base = tuning.minion_speed_base + wave as f32 * tuning.minion_speed_per_wave;
    let mut speed = base.min(tuning.minion_max_speed);
    // ease in on final approach instead of overshooting
    if dist < tuning.approach_slow_radius {
        speed *= (dist / tuning.approach_slow_radius).max(0.2);
    }
    // linear ramp-in after landing from the spawn drop
    if enemy.settle_sec_remaining > 0.0 {
        speed *= 1.0 - (enemy.settle_sec_remaining / tuning.post_land_settle).clamp(0.0, 1.0);
    }

    let mut dir = normalize_xz(player_pos - enemy.pos);
    // separation is averaged over nearby siblings so a dense cluster does
    // not drown out the chase direction
    let mut separation = Vec3::ZERO;
    let mut crowd = 0;
    for &other in neighbors {
        if other == enemy.pos {
            continue;
        }
        let d = dist_xz(enemy.pos, other);
        if d > 0.0 && d < tuning.separation_radius {
            separation += normalize_xz(enemy.pos - other) * (1.0 - d / tuning.separation_radius);
            crowd += 1;
        }
    }
    if crowd > 0 {
        dir += separation / crowd as f32 * tuning.separation_weight;
    }
    dir = normalize_xz(dir);
    enemy.pos += dir * speed * dt;
}

fn update_triangle(
    enemy: &mut Enemy,
    state: &mut GameState,
    player_pos: Vec3,
    tuning: &crate::Tuning,
    dt: f32,
) {
    let contact = dist_xz(enemy.pos, player_pos) <= tuning.triangle_contact_distance;
    if contact && enemy.touch_cooldown_sec <= 0.0 {
        state.damage_player(tuning.contact_damage.triangle);
        enemy.touch_cooldown_sec = tuning.cone_rest_damage_cooldown;
    }

    if enemy.is_stunned() {
        return;
    }
    let Behavior::Triangle {
        orbit_angle,
        charge_timer_sec,
        charging,
    } = &mut enemy.behavior
    else {
        return;
    };

    if let Some(charge) = charging {
        enemy.pos += charge.dir * tuning.triangle_charge_max * dt;
        charge.remaining_sec -= dt;
        if charge.remaining_sec <= 0.0 {
            *charging = None;
            *charge_timer_sec = tuning.triangle_charge_interval;
        }
        return;
    }

    *charge_timer_sec -= dt;
    if *charge_timer_sec <= 0.0 {
        *charging = Some(Charge {
            dir: normalize_xz(player_pos - enemy.pos),
            remaining_sec: tuning.triangle_charge_duration,
        });
        return;
    }

    // circle the player at a fixed radius
    *orbit_angle += tuning.triangle_orbit_angular_speed * dt;
    let target = player_pos
        + Vec3::new(
            orbit_angle.cos() * tuning.triangle_orbit_radius,
            0.0,
            orbit_angle.sin() * tuning.triangle_orbit_radius,
        );
    let to_target = target - enemy.pos;
    let d = dist_xz(enemy.pos, target);
    if d > 0.001 {
        let step = (tuning.triangle_circle_max * dt).min(d);
        enemy.pos += normalize_xz(to_target) * step;
    }
}

fn update_cone(
    enemy: &mut Enemy,
    state: &mut GameState,
    player_pos: Vec3,
    tuning: &crate::Tuning,
    dt: f32,
) {
    let stunned = enemy.is_stunned();
    let Behavior::Cone {
        idle_remaining_sec,
        arc,
        rest_damage_cooldown_sec,
    } = &mut enemy.behavior
    else {
        return;
    };

    if let Some(flight) = arc {
        // an arc in flight ignores stun entirely
        if flight.integrate(&mut enemy.pos, GRAVITY, dt) {
            if dist_xz(enemy.pos, player_pos) <= tuning.cone_land_damage_radius {
                state.damage_player(tuning.contact_damage.cone);
            }
            *arc = None;
            *idle_remaining_sec = tuning.cone_jump_cooldown;
            *rest_damage_cooldown_sec = 0.0;
        }
        return;
    }

    if stunned {
        // grounded stun freezes the jump countdown
        return;
    }

    *rest_damage_cooldown_sec -= dt;
    if dist_xz(enemy.pos, player_pos) <= tuning.cone_rest_damage_radius
        && *rest_damage_cooldown_sec <= 0.0
    {
        state.damage_player(tuning.contact_damage.cone);
        *rest_damage_cooldown_sec = tuning.cone_rest_damage_cooldown;
    }

    *idle_remaining_sec -= dt;
    if *idle_remaining_sec <= 0.0 {
        *arc = Some(BallisticArc::launch_toward(
            enemy.pos,
            player_pos,
            LAUNCH_UP_VEL,
            GRAVITY,
            tuning.cone_flight_time_scale,
            tuning.cone_jump_max,
        ));
    }
}
