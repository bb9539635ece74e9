//! Entity registry and command dispatch
//!
//! The registry is a plain owned collection of enemies, portals, and
//! pickups, addressed by `EntityId`. Cross-module effects on enemies go
//! through `EnemyCommand` values dispatched by id, so the collision and
//! power systems never hold direct references into the enemy list.

use glam::Vec3;

use super::enemy::Enemy;
use super::state::{EntityId, PickupKind};

#[derive(Debug, Clone)]
pub struct Portal {
    pub id: EntityId,
    pub pos: Vec3,
    /// Boss portals stay open longer
    pub boss: bool,
}

#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    pub pos: Vec3,
    pub age_sec: f32,
    /// Meaningful for power pickups only; sets the buff duration
    pub power_amount: u32,
}

/// A deferred effect on one enemy, applied by id
#[derive(Debug, Clone)]
pub enum EnemyCommand {
    ApplyImpulse {
        id: EntityId,
        dir: Vec3,
        strength: f32,
    },
    ApplyStun {
        id: EntityId,
        duration_ms: f32,
    },
}

#[derive(Debug, Default)]
pub struct EnemyRegistry {
    pub enemies: Vec<Enemy>,
    pub portals: Vec<Portal>,
    pub pickups: Vec<Pickup>,
}

impl EnemyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Apply a command; silently ignored if the target despawned this tick
    pub fn dispatch(&mut self, cmd: EnemyCommand) {
        match cmd {
            EnemyCommand::ApplyImpulse { id, dir, strength } => {
                if let Some(enemy) = self.enemy_mut(id) {
                    enemy.knockback.apply_impulse(dir, strength);
                }
            }
            EnemyCommand::ApplyStun { id, duration_ms } => {
                if let Some(enemy) = self.enemy_mut(id) {
                    enemy.apply_stun(duration_ms);
                }
            }
        }
    }

    /// Remove enemies whose alive latch has been cleared
    pub fn sweep_dead(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| e.alive);
        before - self.enemies.len()
    }

    pub fn close_portal(&mut self, id: EntityId) {
        self.portals.retain(|p| p.id != id);
    }

    pub fn cone_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| e.kind == super::enemy::EnemyKind::ConeBoss)
            .count()
    }

    /// Live enemies plus portals still open; the wave is exhausted when
    /// this reaches zero
    pub fn wave_population(&self) -> usize {
        self.enemies.len() + self.portals.len()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
        self.portals.clear();
        self.pickups.clear();
    }
}
