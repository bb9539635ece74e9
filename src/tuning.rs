//! Data-driven game balance
//!
//! Every gameplay constant that is a tuning decision (rather than a physical
//! or structural invariant) lives here, so balance passes touch data instead
//! of code. Defaults reproduce the shipped balance; a JSON override can be
//! loaded at startup for playtesting.

use serde::{Deserialize, Serialize};

/// A per-archetype value table (minion / triangle boss / cone boss)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerArchetype<T> {
    pub minion: T,
    pub triangle: T,
    pub cone: T,
}

/// Full balance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bullets ===
    /// Bullet travel speed (u/s)
    pub bullet_speed: f32,
    /// Bullet lifetime before expiry (ms)
    pub bullet_lifetime_ms: f32,
    /// Fixed bullet pool capacity; shots beyond this are dropped
    pub bullet_pool_size: usize,
    /// Damage per bullet hit
    pub bullet_damage: i32,
    /// Stun applied by stun-variant bullets (ms)
    pub bullet_stun_ms: f32,
    /// Minimum interval between player shots (ms)
    pub fire_rate_ms: f32,

    // === Knockback ===
    /// Base impulse strength per archetype
    pub knockback: PerArchetype<f32>,
    /// Exponential decay rate per archetype
    pub knockback_decay: PerArchetype<f32>,
    /// Impulse fades linearly to zero at this bullet-to-target distance
    pub knockback_distance_max: f32,

    // === Enemy movement ===
    /// Minion base chase speed (u/s), before wave scaling
    pub minion_speed_base: f32,
    /// Added minion speed per wave
    pub minion_speed_per_wave: f32,
    /// Hard cap for minion chase speed
    pub minion_max_speed: f32,
    /// Start slowing the approach inside this distance to the player
    pub approach_slow_radius: f32,
    /// Seconds an enemy holds still after materializing from a portal
    pub post_land_settle: f32,
    /// Neighbors closer than this contribute separation steering
    pub separation_radius: f32,
    /// Weight of the averaged separation correction
    pub separation_weight: f32,

    // === Triangle boss ===
    /// Hard cap for circling speed
    pub triangle_circle_max: f32,
    /// Hard cap for charge speed
    pub triangle_charge_max: f32,
    /// Orbit radius around the player while circling
    pub triangle_orbit_radius: f32,
    /// Orbit angular speed (rad/s)
    pub triangle_orbit_angular_speed: f32,
    /// Seconds of circling before each charge
    pub triangle_charge_interval: f32,
    /// Duration of a charge dash (seconds)
    pub triangle_charge_duration: f32,

    // === Cone boss ===
    /// Idle time before the very first jump (seconds)
    pub cone_first_idle: f32,
    /// Idle time between jumps after landing (seconds)
    pub cone_jump_cooldown: f32,
    /// Hard cap for horizontal leap speed
    pub cone_jump_max: f32,
    /// Flight-time compression for the leap arc (< 1 = faster to target)
    pub cone_flight_time_scale: f32,
    /// Splash damage radius on landing
    pub cone_land_damage_radius: f32,
    /// Contact damage radius while idle
    pub cone_rest_damage_radius: f32,
    /// Cooldown between repeated rest-contact damage ticks (seconds)
    pub cone_rest_damage_cooldown: f32,

    // === Combat ===
    /// Contact damage dealt to the player per archetype
    pub contact_damage: PerArchetype<i32>,
    /// Bullet hit radius per archetype (bosses are bigger targets)
    pub hit_radius: PerArchetype<f32>,
    /// Max health per archetype
    pub max_health: PerArchetype<i32>,
    /// Score awarded on kill per archetype
    pub score: PerArchetype<u64>,
    /// Player contact trigger distance for minions
    pub minion_contact_distance: f32,
    /// Player contact trigger distance for the triangle boss
    pub triangle_contact_distance: f32,

    // === Spawning ===
    /// Portal lifetime (ms)
    pub portal_lifetime_ms: f32,
    /// Extended lifetime for boss portals (ms)
    pub portal_boss_lifetime_ms: f32,
    /// Portal count bounds per wave
    pub portals_per_wave_min: u32,
    pub portals_per_wave_max: u32,
    /// Portal placement radius range around the player
    pub portal_radius_min: f32,
    pub portal_radius_max: f32,
    /// Delay between consecutive enemy drops from one portal (ms)
    pub portal_stagger_ms: f32,
    /// Delay between clearing a wave and opening the next (ms)
    pub wave_interval_ms: f32,
    /// Enemy budget for wave 1; each later wave adds one
    pub wave_budget_base: u32,
    /// A triangle-boss portal opens every this many waves
    pub triangle_wave_every: u32,
    /// Chance of a first / second cone-boss portal per wave
    pub cone_chance: f32,
    pub cone_second_chance: f32,
    /// Global cap on concurrently live cone bosses
    pub cones_max: usize,
    /// Height pickups start falling from when dropped
    pub drop_spawn_height: f32,
    /// Pickup fall speed (u/s)
    pub drop_speed: f32,

    // === Drop economy ===
    /// Chance any enemy death drops a pickup
    pub drop_chance: f32,
    /// Within a drop, weight of health vs power
    pub drop_health_weight: f32,
    /// Independent rarer roll for an invulnerability pickup
    pub invuln_drop_chance: f32,
    /// Chance a stun landing on a boss shakes loose a health pickup
    pub boss_stun_health_drop_chance: f32,
    /// Concurrent live pickup cap; extra drops are discarded
    pub max_pickups: usize,
    /// Pickup time-to-live (seconds)
    pub pickup_lifetime_sec: f32,
    /// Collection radius around the player
    pub pickup_collect_distance: f32,
    /// Health restored by a health pickup
    pub health_pickup_amount: i32,

    // === Player ===
    pub player_max_health: i32,
    pub starting_lives: u32,
    /// Respawn countdown after losing a life (ms)
    pub respawn_ms: f32,
    /// Ground-slam effect radius on landing from a launch-jump
    pub slam_radius: f32,
    /// Stun applied by the ground slam (ms)
    pub slam_stun_ms: f32,
    /// Knockback impulse strength of the ground slam
    pub slam_power: f32,
    /// Launch-jump target distance as a fraction of the arena span
    pub launch_target_fraction: f32,

    // === Power-state ===
    /// Invulnerability buff duration (ms, fixed)
    pub invuln_duration_ms: f32,
    /// Power buff duration per point of pickup amount (ms)
    pub power_ms_per_amount: f32,
    /// Bullet damage multiplier while the power buff is active
    pub power_damage_mul: i32,
    /// Bullet visual scale while the power buff is active
    pub power_bullet_scale: f32,
    /// Pickup amount at or above which the radial barrage activates
    pub power_barrage_threshold: i32,
    /// Interval between barrage volleys (ms)
    pub barrage_interval_ms: f32,
    /// Bullets per barrage volley, spread evenly around the circle
    pub barrage_bullet_count: u32,
    /// Whether invulnerability also runs the area-denial ring
    pub area_denial_enabled: bool,
    /// Radius of the area-denial ring around the arena center
    pub shape_path_radius: f32,
    /// Half-width of the area-denial ring band
    pub shape_path_half_width: f32,
    /// Interval between area-denial damage ticks (ms)
    pub area_denial_tick_ms: f32,
    /// Damage per area-denial tick
    pub area_denial_damage: i32,
    /// Movement multiplier while slowed by a portal
    pub speed_debuff_factor: f32,
    /// Portal slow debuff duration (ms)
    pub speed_debuff_duration_ms: f32,
    /// Standing inside this radius of a portal applies the slow
    pub portal_debuff_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bullet_speed: 38.0,
            bullet_lifetime_ms: 3000.0,
            bullet_pool_size: 50,
            bullet_damage: 1,
            bullet_stun_ms: 5000.0,
            fire_rate_ms: 120.0,

            knockback: PerArchetype {
                minion: 12.0,
                triangle: 7.0,
                cone: 8.0,
            },
            knockback_decay: PerArchetype {
                minion: 8.0,
                triangle: 6.0,
                cone: 6.0,
            },
            knockback_distance_max: 8.0,

            minion_speed_base: 18.0,
            minion_speed_per_wave: 0.1,
            minion_max_speed: 12.0,
            approach_slow_radius: 2.5,
            post_land_settle: 0.3,
            separation_radius: 2.5,
            separation_weight: 0.3,

            triangle_circle_max: 12.0,
            triangle_charge_max: 18.0,
            triangle_orbit_radius: 8.0,
            triangle_orbit_angular_speed: 1.2,
            triangle_charge_interval: 3.0,
            triangle_charge_duration: 1.5,

            cone_first_idle: 10.0,
            cone_jump_cooldown: 3.0,
            cone_jump_max: 22.0,
            cone_flight_time_scale: 0.6,
            cone_land_damage_radius: 4.4,
            cone_rest_damage_radius: 1.6,
            cone_rest_damage_cooldown: 0.7,

            contact_damage: PerArchetype {
                minion: 2,
                triangle: 31,
                cone: 42,
            },
            hit_radius: PerArchetype {
                minion: 1.0,
                triangle: 1.6,
                cone: 1.8,
            },
            max_health: PerArchetype {
                minion: 1,
                triangle: 3,
                cone: 10,
            },
            score: PerArchetype {
                minion: 10,
                triangle: 50,
                cone: 100,
            },
            minion_contact_distance: 1.2,
            triangle_contact_distance: 1.4,

            portal_lifetime_ms: 4500.0,
            portal_boss_lifetime_ms: 9000.0,
            portals_per_wave_min: 2,
            portals_per_wave_max: 4,
            portal_radius_min: 12.0,
            portal_radius_max: 20.0,
            portal_stagger_ms: 260.0,
            wave_interval_ms: 2000.0,
            wave_budget_base: 5,
            triangle_wave_every: 3,
            cone_chance: 0.8,
            cone_second_chance: 0.4,
            cones_max: 6,
            drop_spawn_height: 8.0,
            drop_speed: 10.0,

            drop_chance: 0.2,
            drop_health_weight: 0.7,
            invuln_drop_chance: 0.05,
            boss_stun_health_drop_chance: 0.7,
            max_pickups: 25,
            pickup_lifetime_sec: 20.0,
            pickup_collect_distance: 3.8,
            health_pickup_amount: 25,

            player_max_health: 100,
            starting_lives: 3,
            respawn_ms: 3000.0,
            slam_radius: 9.0,
            slam_stun_ms: 1400.0,
            slam_power: 30.0,
            launch_target_fraction: 0.25,

            invuln_duration_ms: 5000.0,
            power_ms_per_amount: 100.0,
            power_damage_mul: 2,
            power_bullet_scale: 1.5,
            power_barrage_threshold: 90,
            barrage_interval_ms: 700.0,
            barrage_bullet_count: 12,
            area_denial_enabled: true,
            shape_path_radius: 24.0,
            shape_path_half_width: 2.5,
            area_denial_tick_ms: 1000.0,
            area_denial_damage: 1,
            speed_debuff_factor: 0.9,
            speed_debuff_duration_ms: 4000.0,
            portal_debuff_radius: 3.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning override from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
