//! Core simulation state
//!
//! `GameState` is the single root object: it owns the RNG, the timer queue,
//! the enemy registry, the bullet pool, and the player. Everything the sim
//! does is a function of this state plus per-tick input; there is no global
//! or thread-local state anywhere in the crate.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::GROUND_Y;
use crate::tuning::Tuning;

use super::bullet::BulletPool;
use super::enemy::EnemyKind;
use super::physics::BallisticArc;
use super::power::PowerState;
use super::registry::EnemyRegistry;
use super::timer::{TimerKind, TimerQueue};

/// Opaque handle for enemies, portals, and pickups. Ids are never reused
/// within a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    Paused,
    GameOver,
}

/// What a pickup grants when collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Health,
    Power,
    Invulnerability,
}

/// Notable things that happened during a tick, drained by the caller.
/// The sim never renders or plays audio; it reports.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WaveStarted { wave: u32 },
    BossSpawned { id: EntityId, kind: EnemyKind },
    /// Bullet or ring damage landed on an enemy (floating combat text)
    DamageDealt { target: EntityId, amount: i32 },
    EnemyDied { id: EntityId, kind: EnemyKind, pos: Vec3 },
    PlayerDamaged { amount: i32 },
    PlayerDied { lives_left: u32 },
    /// `amount` is health restored or the power pickup's charge
    PickupCollected { kind: PickupKind, amount: i32 },
    GameOver { score: u64, wave: u32 },
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub pos: Vec3,
    /// Unit XZ aim direction, updated from input every tick
    pub aim: Vec3,
    pub health: i32,
    /// Present while airborne from a launch-jump; landing triggers the slam
    pub arc: Option<BallisticArc>,
    pub fire_cooldown_ms: f32,
    /// Portal proximity debuff; player moves at `speed_debuff_factor` while
    /// this is positive
    pub slow_ms_remaining: f32,
}

impl PlayerState {
    fn new(max_health: i32) -> Self {
        Self {
            pos: Vec3::new(0.0, GROUND_Y, 0.0),
            aim: Vec3::new(0.0, 0.0, 1.0),
            health: max_health,
            arc: None,
            fire_cooldown_ms: 0.0,
            slow_ms_remaining: 0.0,
        }
    }

    pub fn airborne(&self) -> bool {
        self.arc.is_some()
    }
}

#[derive(Debug)]
pub struct GameState {
    pub tuning: Tuning,
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub wave: u32,
    pub score: u64,
    pub lives: u32,
    /// Positive while the player is waiting to respawn after losing a life
    pub respawn_ms_remaining: f32,
    pub player: PlayerState,
    pub timers: TimerQueue,
    pub registry: EnemyRegistry,
    pub bullets: BulletPool,
    pub power: PowerState,
    pub events: Vec<GameEvent>,
    next_id: u64,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            wave: 0,
            score: 0,
            lives: tuning.starting_lives,
            respawn_ms_remaining: 0.0,
            player: PlayerState::new(tuning.player_max_health),
            timers: TimerQueue::new(),
            registry: EnemyRegistry::new(),
            bullets: BulletPool::new(tuning.bullet_pool_size),
            power: PowerState::new(),
            events: Vec::new(),
            next_id: 0,
            tuning,
        };
        // wave 1 begins on the first tick
        state.timers.schedule(0.0, TimerKind::NextWave);
        state
    }

    pub fn next_entity_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Multiplier applied to player movement input this tick
    pub fn player_speed_mul(&self) -> f32 {
        if self.player.slow_ms_remaining > 0.0 {
            self.tuning.speed_debuff_factor
        } else {
            1.0
        }
    }

    pub fn player_respawning(&self) -> bool {
        self.respawn_ms_remaining > 0.0
    }

    /// Apply contact or area damage to the player. Ignored while
    /// invulnerable, respawning, or after game over.
    pub fn damage_player(&mut self, amount: i32) {
        if self.phase == GamePhase::GameOver
            || self.power.is_invulnerable()
            || self.player_respawning()
        {
            return;
        }
        self.player.health -= amount;
        self.push_event(GameEvent::PlayerDamaged { amount });
        if self.player.health <= 0 {
            self.kill_player();
        }
    }

    fn kill_player(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.push_event(GameEvent::PlayerDied {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.push_event(GameEvent::GameOver {
                score: self.score,
                wave: self.wave,
            });
            return;
        }
        self.respawn_ms_remaining = self.tuning.respawn_ms;
        self.player.arc = None;
        self.player.slow_ms_remaining = 0.0;
    }

    /// Finish a respawn countdown: restore health and return to the arena
    /// center.
    pub fn respawn_player(&mut self) {
        self.player.health = self.tuning.player_max_health;
        self.player.pos = Vec3::new(0.0, GROUND_Y, 0.0);
        self.respawn_ms_remaining = 0.0;
    }

    /// Reset to a fresh run with the same seed and tuning
    pub fn restart(&mut self) {
        *self = GameState::new(self.seed, self.tuning.clone());
    }
}
