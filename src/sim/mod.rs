//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by registry insertion)
//! - No rendering or platform dependencies

pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod physics;
pub mod power;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use bullet::{Bullet, BulletColor, BulletPool, BulletStyle};
pub use enemy::{Behavior, Enemy, EnemyKind};
pub use physics::{BallisticArc, Knockback, flight_time};
pub use power::PowerState;
pub use registry::{EnemyCommand, EnemyRegistry, Pickup, Portal};
pub use state::{EntityId, GameEvent, GamePhase, GameState, PickupKind, PlayerState};
pub use tick::{TickInput, tick};
pub use timer::{TimerKind, TimerQueue};
