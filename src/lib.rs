//! Wave Arena - wave-based arena combat simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (enemy AI, spawning, collisions, buffs)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input devices, audio, and persistence are external
//! collaborators: they feed the sim a player position/aim, shoot and pause
//! signals, and read back entity lists, counters, and discrete events.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed reference timestep used by the demo binary and tests (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena half-extent; play area spans [-BOUNDARY_LIMIT, BOUNDARY_LIMIT] on X and Z
    pub const BOUNDARY_LIMIT: f32 = 100.0;
    /// Resting height of grounded entities
    pub const GROUND_Y: f32 = 0.5;

    /// Reference player speed the knockback tables were balanced against
    pub const SPEED_TUNING_BASE: f32 = 14.0;
    /// Current base player speed
    pub const PLAYER_SPEED: f32 = 24.0;

    /// Gravity for all ballistic arcs (player launch, cone leap)
    pub const GRAVITY: f32 = 24.0;
    /// Apex launch velocity shared by player jump and cone leap
    pub const LAUNCH_UP_VEL: f32 = 14.0;
}

/// Global speed scale: normalizes knockback tuning against the reference
/// speed so raising `PLAYER_SPEED` does not distort impulse feel.
#[inline]
pub fn speed_scale() -> f32 {
    (consts::PLAYER_SPEED / consts::SPEED_TUNING_BASE).max(0.5)
}

/// Distance between two points on the XZ ground plane
#[inline]
pub fn dist_xz(a: Vec3, b: Vec3) -> f32 {
    dist_xz_sq(a, b).sqrt()
}

/// Squared XZ distance (cheap overlap tests)
#[inline]
pub fn dist_xz_sq(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

/// Normalize the XZ components of a vector, dropping Y; zero stays zero
#[inline]
pub fn normalize_xz(v: Vec3) -> Vec3 {
    let len = (v.x * v.x + v.z * v.z).sqrt();
    if len > 1e-6 {
        Vec3::new(v.x / len, 0.0, v.z / len)
    } else {
        Vec3::ZERO
    }
}

/// Clamp a point to the arena interior with the given margin
#[inline]
pub fn clamp_to_arena(mut p: Vec3, margin: f32) -> Vec3 {
    let limit = consts::BOUNDARY_LIMIT - margin;
    p.x = p.x.clamp(-limit, limit);
    p.z = p.z.clamp(-limit, limit);
    p
}
