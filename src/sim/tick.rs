//! Per-tick simulation entry point
//!
//! `tick` advances the whole game by one fixed step in a fixed order:
//! timers and spawning, then enemy AI, then bullets and collision, then the
//! power systems. Paused frames return before any of it, so nothing in the
//! sim can drift while paused. Input is a plain value; the sim has no
//! knowledge of keyboards or pointers.

use glam::Vec3;

use crate::consts::{BOUNDARY_LIMIT, GRAVITY, GROUND_Y, LAUNCH_UP_VEL};
use crate::{clamp_to_arena, dist_xz, normalize_xz, speed_scale};

use super::bullet::{BulletColor, BulletStyle};
use super::collision;
use super::physics::BallisticArc;
use super::power;
use super::registry::EnemyCommand;
use super::spawn;
use super::state::{GamePhase, GameState};

/// One frame of player intent
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Where the controller wants the player this frame; adopted (clamped)
    /// while grounded, ignored mid-flight
    pub player_pos: Vec3,
    /// Desired facing; normalized on the XZ plane
    pub aim: Vec3,
    pub shoot: bool,
    /// Fire a stun round instead of a damaging one
    pub shoot_stun: bool,
    pub jump: bool,
    pub pause: bool,
    pub restart: bool,
}

/// Advance the simulation one step of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart {
        state.restart();
    }
    if state.phase == GamePhase::GameOver {
        return;
    }

    // pause is level-triggered: held pause freezes, release resumes
    if input.pause {
        state.phase = GamePhase::Paused;
        return;
    }
    state.phase = GamePhase::Playing;

    if state.player_respawning() {
        state.respawn_ms_remaining -= dt * 1000.0;
        if state.respawn_ms_remaining <= 0.0 {
            state.respawn_player();
        }
    } else {
        update_player(state, input, dt);
    }

    // 1. scheduling: portals open, enemies drop, waves begin
    for due in state.timers.advance(dt * 1000.0) {
        spawn::handle_timer(state, due);
    }

    // 2. enemy AI and contact damage
    super::enemy::update_enemies(state, dt);

    // 3. bullets, hits, and pickups
    collision::update_bullets(state, dt);
    collision::resolve_bullet_hits(state);
    collision::update_pickups(state, dt);
    state.registry.sweep_dead();

    // 4. buffs, barrage, and the denial ring
    power::update_power(state, dt);

    spawn::check_wave_exhausted(state);
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let t = state.tuning.clone();

    let aim = normalize_xz(input.aim);
    if aim != Vec3::ZERO {
        state.player.aim = aim;
    }

    if let Some(mut arc) = state.player.arc.take() {
        if arc.integrate(&mut state.player.pos, GRAVITY, dt) {
            ground_slam(state, &t);
        } else {
            state.player.arc = Some(arc);
        }
    } else {
        let mut pos = clamp_to_arena(input.player_pos, 1.0);
        pos.y = GROUND_Y;
        state.player.pos = pos;

        if input.jump {
            let target = state.player.pos
                + state.player.aim * (BOUNDARY_LIMIT * t.launch_target_fraction);
            state.player.arc = Some(BallisticArc::launch_toward(
                state.player.pos,
                clamp_to_arena(target, 1.0),
                LAUNCH_UP_VEL,
                GRAVITY,
                1.0,
                f32::MAX,
            ));
        }
    }

    // portal proximity slows the player for a while
    let near_portal = state
        .registry
        .portals
        .iter()
        .any(|p| dist_xz(p.pos, state.player.pos) <= t.portal_debuff_radius);
    if near_portal {
        state.player.slow_ms_remaining = t.speed_debuff_duration_ms;
    } else {
        state.player.slow_ms_remaining = (state.player.slow_ms_remaining - dt * 1000.0).max(0.0);
    }

    state.player.fire_cooldown_ms = (state.player.fire_cooldown_ms - dt * 1000.0).max(0.0);
    if (input.shoot || input.shoot_stun)
        && state.player.fire_cooldown_ms <= 0.0
        && !state.player.airborne()
    {
        let vel = state.player.aim * t.bullet_speed;
        let powered = state.power.is_active();
        let style = BulletStyle {
            color: if input.shoot_stun {
                BulletColor::Stun
            } else if powered {
                BulletColor::Powered
            } else {
                BulletColor::Standard
            },
            // powered shots are drawn bigger so the damage boost reads
            scale_mul: if powered { t.power_bullet_scale } else { 1.0 },
            stun: input.shoot_stun,
        };
        if state.bullets.fire(state.player.pos, vel, style).is_some() {
            state.player.fire_cooldown_ms = t.fire_rate_ms;
        }
    }
}

/// Landing shockwave: shove and stun everything close by
fn ground_slam(state: &mut GameState, t: &crate::Tuning) {
    let origin = state.player.pos;
    let targets: Vec<_> = state
        .registry
        .enemies
        .iter()
        .filter(|e| e.alive && dist_xz(e.pos, origin) <= t.slam_radius)
        .map(|e| (e.id, e.pos))
        .collect();
    for (id, pos) in targets {
        let falloff = 1.0 - dist_xz(pos, origin) / t.slam_radius;
        state.registry.dispatch(EnemyCommand::ApplyImpulse {
            id,
            dir: normalize_xz(pos - origin),
            strength: t.slam_power / speed_scale() * falloff,
        });
        state.registry.dispatch(EnemyCommand::ApplyStun {
            id,
            duration_ms: t.slam_stun_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::consts::SIM_DT;
    use crate::sim::enemy::{Enemy, EnemyKind};
    use crate::sim::physics::flight_time;
    use crate::sim::state::GameEvent;

    fn fresh(seed: u64) -> GameState {
        GameState::new(seed, Tuning::default())
    }

    fn idle_input(state: &GameState) -> TickInput {
        TickInput {
            player_pos: state.player.pos,
            aim: Vec3::new(0.0, 0.0, 1.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_tick_starts_wave_one() {
        let mut state = fresh(3);
        let input = idle_input(&state);
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.wave, 1);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::WaveStarted { wave: 1 })));
        assert!(!state.registry.portals.is_empty());
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = fresh(3);
        let input = idle_input(&state);
        // run a bit so there is live machinery to freeze
        for _ in 0..120 {
            tick(&mut state, &input, SIM_DT);
        }
        let wave = state.wave;
        let score = state.score;
        let enemy_pos: Vec<_> = state.registry.enemies.iter().map(|e| e.pos).collect();
        let due = state.timers.next_due_ms();
        let bullets = state.bullets.active_count();

        let paused = TickInput {
            pause: true,
            ..idle_input(&state)
        };
        for _ in 0..600 {
            tick(&mut state, &paused, SIM_DT);
        }

        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.wave, wave);
        assert_eq!(state.score, score);
        assert_eq!(
            state.registry.enemies.iter().map(|e| e.pos).collect::<Vec<_>>(),
            enemy_pos
        );
        assert_eq!(state.timers.next_due_ms(), due);
        assert_eq!(state.bullets.active_count(), bullets);
    }

    #[test]
    fn test_resume_picks_up_where_it_left_off() {
        let mut state = fresh(3);
        let input = idle_input(&state);
        tick(&mut state, &input, SIM_DT);
        let due_before = state.timers.next_due_ms();

        let paused = TickInput {
            pause: true,
            ..idle_input(&state)
        };
        for _ in 0..600 {
            tick(&mut state, &paused, SIM_DT);
        }
        assert_eq!(state.timers.next_due_ms(), due_before);

        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_fire_rate_is_limited() {
        let mut state = fresh(3);
        state.timers.cancel_all(); // no wave machinery in the way
        let shooting = TickInput {
            shoot: true,
            ..idle_input(&state)
        };
        for _ in 0..6 {
            tick(&mut state, &shooting, SIM_DT);
        }
        // 6 ticks at ~16.7 ms vs a 120 ms cooldown: exactly one shot
        assert_eq!(state.bullets.active_count(), 1);
    }

    #[test]
    fn test_shot_styling_follows_buffs() {
        let mut state = fresh(3);
        state.timers.cancel_all();
        let shooting = TickInput {
            shoot: true,
            ..idle_input(&state)
        };
        tick(&mut state, &shooting, SIM_DT);
        let (_, plain) = state.bullets.iter_active().next().unwrap();
        assert_eq!(plain.style.color, BulletColor::Standard);
        assert_eq!(plain.style.scale_mul, 1.0);

        let mut state = fresh(3);
        state.timers.cancel_all();
        state.power.activate(10, &state.tuning.clone());
        tick(&mut state, &shooting, SIM_DT);
        let (_, powered) = state.bullets.iter_active().next().unwrap();
        assert_eq!(powered.style.color, BulletColor::Powered);
        assert_eq!(powered.style.scale_mul, state.tuning.power_bullet_scale);

        let mut state = fresh(3);
        state.timers.cancel_all();
        let stunning = TickInput {
            shoot_stun: true,
            ..idle_input(&state)
        };
        tick(&mut state, &stunning, SIM_DT);
        let (_, stun) = state.bullets.iter_active().next().unwrap();
        assert_eq!(stun.style.color, BulletColor::Stun);
        assert!(stun.style.stun);
    }

    #[test]
    fn test_launch_jump_lands_on_schedule() {
        let mut state = fresh(3);
        state.timers.cancel_all();
        let jump = TickInput {
            jump: true,
            ..idle_input(&state)
        };
        tick(&mut state, &jump, SIM_DT);
        assert!(state.player.airborne());

        let input = idle_input(&state);
        let mut ticks = 1;
        while state.player.airborne() {
            tick(&mut state, &input, SIM_DT);
            ticks += 1;
            assert!(ticks < 300, "never landed");
        }
        let expected = flight_time(LAUNCH_UP_VEL, GRAVITY) / SIM_DT;
        assert!((ticks as f32 - expected).abs() < 3.0);
    }

    #[test]
    fn test_slam_stuns_nearby_enemies() {
        let mut state = fresh(3);
        state.timers.cancel_all();
        let near = state.next_entity_id();
        let far = state.next_entity_id();
        // the launch carries the player ~25 units along +Z; park one boss
        // near the landing zone and one far outside the shockwave
        state.registry.enemies.push(Enemy::spawn(
            near,
            EnemyKind::ConeBoss,
            Vec3::new(4.0, GROUND_Y, 25.0),
            &state.tuning,
        ));
        state.registry.enemies.push(Enemy::spawn(
            far,
            EnemyKind::ConeBoss,
            Vec3::new(-50.0, GROUND_Y, -50.0),
            &state.tuning,
        ));

        let jump = TickInput {
            jump: true,
            ..idle_input(&state)
        };
        tick(&mut state, &jump, SIM_DT);
        let input = idle_input(&state);
        while state.player.airborne() {
            tick(&mut state, &input, SIM_DT);
        }

        assert!(state.registry.enemy(near).unwrap().is_stunned());
        assert!(!state.registry.enemy(far).unwrap().is_stunned());
    }

    #[test]
    fn test_restart_input_resets_the_run() {
        let mut state = fresh(3);
        let input = idle_input(&state);
        for _ in 0..300 {
            tick(&mut state, &input, SIM_DT);
        }
        let restart = TickInput {
            restart: true,
            ..idle_input(&state)
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.score, 0);
        assert_eq!(state.wave, 1, "restart begins a fresh run immediately");
        assert_eq!(state.lives, state.tuning.starting_lives);
    }

    #[test]
    fn test_game_over_ignores_everything_but_restart() {
        let mut state = fresh(3);
        state.lives = 1;
        state.damage_player(9999);
        assert_eq!(state.phase, GamePhase::GameOver);

        let input = idle_input(&state);
        let wave = state.wave;
        for _ in 0..120 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.wave, wave);

        let restart = TickInput {
            restart: true,
            ..idle_input(&state)
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_portal_proximity_slows_player() {
        let mut state = fresh(3);
        let input = idle_input(&state);
        tick(&mut state, &input, SIM_DT);
        let portal_pos = state.registry.portals[0].pos;

        let on_portal = TickInput {
            player_pos: portal_pos,
            ..idle_input(&state)
        };
        tick(&mut state, &on_portal, SIM_DT);
        assert!((state.player_speed_mul() - state.tuning.speed_debuff_factor).abs() < 1e-6);
    }
}
