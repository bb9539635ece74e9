//! Knockback and ballistic physics
//!
//! Two small solvers shared across the sim: an exponential-decay impulse
//! integrator (bullet knockback, ground-slam shove) and a symmetric
//! ballistic arc (player launch-jump, cone boss leap). Neither is a general
//! rigid-body system; all other collision in the game is radius overlap.

use glam::Vec3;

use crate::consts::GROUND_Y;
use crate::normalize_xz;

/// Velocity snaps to exactly zero below this squared magnitude, so decayed
/// impulses do not leave entities drifting forever.
const KNOCKBACK_EPSILON_SQ: f32 = 1e-6;

/// A decaying impulse velocity, independent of AI-driven movement
#[derive(Debug, Clone, Default)]
pub struct Knockback {
    pub velocity: Vec3,
}

impl Knockback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dir * strength` to the pending impulse. `dir` is expected to be
    /// a unit XZ direction.
    pub fn apply_impulse(&mut self, dir: Vec3, strength: f32) {
        self.velocity.x += dir.x * strength;
        self.velocity.z += dir.z * strength;
    }

    pub fn is_active(&self) -> bool {
        self.velocity.length_squared() > KNOCKBACK_EPSILON_SQ
    }

    /// Integrate one tick: translate the position (unless stunned - a
    /// stunned entity shakes in place but does not slide), then decay.
    pub fn integrate(&mut self, pos: &mut Vec3, stunned: bool, decay_rate: f32, dt: f32) {
        if !self.is_active() {
            return;
        }
        if !stunned {
            *pos += self.velocity * dt;
        }
        self.velocity *= (-decay_rate * dt).exp();
        if self.velocity.length_squared() < KNOCKBACK_EPSILON_SQ {
            self.velocity = Vec3::ZERO;
        }
    }
}

/// Time of flight for a symmetric arc launched at `up_vel` under `gravity`
#[inline]
pub fn flight_time(up_vel: f32, gravity: f32) -> f32 {
    2.0 * up_vel / gravity
}

/// An in-flight ballistic arc: fixed horizontal carry plus integrated
/// vertical motion. Landing is detected when Y returns to ground height.
#[derive(Debug, Clone, Default)]
pub struct BallisticArc {
    pub vertical_vel: f32,
    pub forward_vel: f32,
    pub forward_dir: Vec3,
}

impl BallisticArc {
    /// Launch from `from` toward `target` (both at ground height). The
    /// horizontal speed is whatever covers the displacement in the arc's
    /// flight time, capped at `max_forward` to prevent degenerate
    /// long-range snaps.
    pub fn launch_toward(
        from: Vec3,
        target: Vec3,
        up_vel: f32,
        gravity: f32,
        flight_time_scale: f32,
        max_forward: f32,
    ) -> Self {
        let disp = target - from;
        let disp_len = (disp.x * disp.x + disp.z * disp.z).sqrt().max(0.001);
        let t = flight_time(up_vel, gravity) * flight_time_scale;
        Self {
            vertical_vel: up_vel,
            forward_vel: (disp_len / t).min(max_forward),
            forward_dir: normalize_xz(disp),
        }
    }

    /// Advance the arc one tick. Returns `true` exactly once, on the tick
    /// the arc lands; the position is snapped to ground height and both
    /// velocities are zeroed.
    ///
    /// Semi-implicit: velocity updates before position, which keeps the
    /// discrete landing time within one tick of the analytic `2*v0/g`.
    pub fn integrate(&mut self, pos: &mut Vec3, gravity: f32, dt: f32) -> bool {
        self.vertical_vel -= gravity * dt;
        pos.y += self.vertical_vel * dt;
        if self.forward_vel > 0.0 {
            pos.x += self.forward_dir.x * self.forward_vel * dt;
            pos.z += self.forward_dir.z * self.forward_vel * dt;
        }
        if pos.y <= GROUND_Y {
            pos.y = GROUND_Y;
            self.vertical_vel = 0.0;
            self.forward_vel = 0.0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_impulse_accumulates() {
        let mut kb = Knockback::new();
        kb.apply_impulse(Vec3::new(1.0, 0.0, 0.0), 5.0);
        kb.apply_impulse(Vec3::new(1.0, 0.0, 0.0), 5.0);
        assert!((kb.velocity.x - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_stun_freezes_translation_but_not_decay() {
        let mut kb = Knockback::new();
        kb.apply_impulse(Vec3::new(1.0, 0.0, 0.0), 10.0);
        let mut pos = Vec3::new(0.0, GROUND_Y, 0.0);
        let before = kb.velocity.length();
        kb.integrate(&mut pos, true, 8.0, SIM_DT);
        assert_eq!(pos.x, 0.0, "stunned entity must not translate");
        assert!(kb.velocity.length() < before, "decay still runs while stunned");
    }

    #[test]
    fn test_snaps_to_zero() {
        let mut kb = Knockback::new();
        kb.apply_impulse(Vec3::new(1.0, 0.0, 0.0), 0.001);
        let mut pos = Vec3::ZERO;
        kb.integrate(&mut pos, false, 8.0, SIM_DT);
        assert_eq!(kb.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_ballistic_landing_time() {
        // v0 = 14, g = 24 -> t = 2*14/24 ~= 1.167 s
        let from = Vec3::new(0.0, GROUND_Y, 0.0);
        let target = Vec3::new(10.0, GROUND_Y, 0.0);
        let mut arc = BallisticArc::launch_toward(from, target, 14.0, 24.0, 1.0, 100.0);
        let mut pos = from;
        let dt = 1.0 / 240.0;
        let mut t = 0.0;
        while !arc.integrate(&mut pos, 24.0, dt) {
            t += dt;
            assert!(t < 3.0, "arc never landed");
        }
        let expected = flight_time(14.0, 24.0);
        assert!((t - expected).abs() < 0.02, "landed at {t}, expected {expected}");
        // horizontal displacement covers the requested distance
        assert!((pos.x - 10.0).abs() < 0.2, "landed at x={}", pos.x);
        assert_eq!(pos.y, GROUND_Y);
        assert_eq!(arc.forward_vel, 0.0);
        assert_eq!(arc.vertical_vel, 0.0);
    }

    #[test]
    fn test_landing_tick_matches_flight_time_at_sim_rate() {
        // v0 = 14, g = 24 at 60 Hz: nominal 70 ticks of flight
        let from = Vec3::new(0.0, GROUND_Y, 0.0);
        let mut arc = BallisticArc::launch_toward(from, from, 14.0, 24.0, 1.0, 100.0);
        let mut pos = from;
        let mut ticks = 0;
        while !arc.integrate(&mut pos, 24.0, SIM_DT) {
            ticks += 1;
            assert!(ticks < 200, "arc never landed");
        }
        ticks += 1;
        let nominal = flight_time(14.0, 24.0) / SIM_DT;
        assert!(
            (ticks as f32 - nominal).abs() <= 1.0,
            "landed after {ticks} ticks, nominal {nominal}"
        );
    }

    #[test]
    fn test_forward_speed_is_capped() {
        let from = Vec3::new(0.0, GROUND_Y, 0.0);
        let target = Vec3::new(500.0, GROUND_Y, 0.0);
        let arc = BallisticArc::launch_toward(from, target, 14.0, 24.0, 0.6, 22.0);
        assert!(arc.forward_vel <= 22.0);
    }

    mod convergence {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Repeated impulses followed by free decay must always settle
            // below 1e-3 within a tick count proportional to 1/decay_rate.
            #[test]
            fn knockback_decays_to_rest(
                strength in 0.1f32..50.0,
                decay_rate in 2.0f32..12.0,
                dir_angle in 0.0f32..std::f32::consts::TAU,
            ) {
                let mut kb = Knockback::new();
                let dir = Vec3::new(dir_angle.cos(), 0.0, dir_angle.sin());
                kb.apply_impulse(dir, strength);
                let mut pos = Vec3::ZERO;
                // ln(50/1e-3) / decay_rate seconds is enough; pad 2x
                let bound = (2.0 * (50.0f32 / 1e-3).ln() / decay_rate / SIM_DT) as usize;
                let mut ticks = 0;
                while kb.velocity.length() >= 1e-3 {
                    kb.integrate(&mut pos, false, decay_rate, SIM_DT);
                    ticks += 1;
                    prop_assert!(ticks <= bound, "no convergence after {} ticks", ticks);
                }
            }
        }
    }
}
